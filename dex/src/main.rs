use anyhow::Result;
use clap::Parser;
use crawler::{chrome_dex, init_tracing, CacheArgs};
use dex::format_record;
use dexcore::Section;

#[derive(Parser)]
#[command(name = "dex")]
#[command(about = "Look up a move or ability, scraping the dex listing on first use", long_about = None)]
struct Cli {
    /// Move or ability name, slug or id, e.g. "Thunder Punch" or thunder-punch
    name: String,
    /// moves or abilities
    #[arg(long, default_value = "moves")]
    section: Section,
    /// Game version slug, e.g. sm, xy
    #[arg(long, default_value = "sm")]
    version: String,
    #[command(flatten)]
    cache: CacheArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = cli.cache.to_config()?;

    let dex = chrome_dex(&cfg, &cli.version);
    let record = dex.record(cli.section, &cli.name)?;
    tracing::debug!(id = record.id(), section = %cli.section, "record found");
    print!("{}", format_record(&record, &cfg.origin));
    println!();
    Ok(())
}
