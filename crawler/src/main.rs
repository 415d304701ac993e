use anyhow::Result;
use clap::{Parser, Subcommand};
use crawler::{chrome_dex, init_tracing, load_snapshot, CacheArgs, HttpOrigin, SnapshotArgs};
use dexcore::persist::{list_snapshots, CachePaths};
use dexcore::{Section, SnapshotResolver};

#[derive(Parser)]
#[command(name = "crawler")]
#[command(about = "Populate the local usage-statistics and dex caches", long_about = None)]
struct Cli {
    #[command(flatten)]
    cache: CacheArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print which snapshot a request resolves to, without downloading it
    Resolve {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
    /// Download a snapshot into the cache (no-op when already cached)
    Fetch {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
    /// Scrape a dex listing page into the cache
    Scrape {
        /// moves or abilities
        #[arg(long, default_value = "moves")]
        section: Section,
        /// Game version slug, e.g. sm, xy
        #[arg(long, default_value = "sm")]
        version: String,
        /// Re-scrape even if a cached dictionary exists
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// List cached snapshots, newest first
    Snapshots,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = cli.cache.to_config()?;

    match cli.command {
        Commands::Resolve { snapshot } => {
            let origin = HttpOrigin::new(&cfg)?;
            let id = SnapshotResolver::new(&cfg, &origin).resolve(snapshot.date, &snapshot.meta, snapshot.rank)?;
            println!("{}", id.month);
        }
        Commands::Fetch { snapshot } => {
            let (id, data) = load_snapshot(&cfg, &snapshot)?;
            let path = CachePaths::new(&cfg.cache_root).snapshot(&id);
            println!("{} ({} entities) -> {}", id, data.data.len(), path.display());
        }
        Commands::Scrape { section, version, force } => {
            let dex = chrome_dex(&cfg, &version);
            let dict = if force { dex.refresh(section)? } else { dex.dictionary(section)? };
            let path = CachePaths::new(&cfg.cache_root).reference(section, &version);
            println!("{} {} records -> {}", dict.len(), section, path.display());
        }
        Commands::Snapshots => {
            for id in list_snapshots(&CachePaths::new(&cfg.cache_root)) {
                println!("{}\t{}\t{}", id.month, id.metagame, id.rank);
            }
        }
    }
    Ok(())
}
