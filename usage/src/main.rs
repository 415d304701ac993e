use anyhow::{Context, Result};
use clap::Parser;
use crawler::{init_tracing, load_snapshot, CacheArgs, SnapshotArgs};
use dexcore::{normalize, SnapshotId};
use std::io::{self, Write};

#[derive(Parser)]
#[command(name = "usage")]
#[command(about = "Show an entity's most used options from a monthly usage snapshot", long_about = None)]
struct Cli {
    /// Entity name as listed in the snapshot, e.g. Landorus-Therian
    pokemon: String,
    /// Category to list, e.g. Moves, Items, Abilities, Spreads, Teammates
    category: String,
    #[command(flatten)]
    snapshot: SnapshotArgs,
    #[command(flatten)]
    cache: CacheArgs,
    /// Hide entries at or below this share (0.01 = 1%)
    #[arg(long, default_value_t = 0.01)]
    min_share: f64,
    /// Category whose counts sum to the entity's total
    #[arg(long)]
    denominator: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut cfg = cli.cache.to_config()?;
    if let Some(d) = cli.denominator {
        cfg.denominator = d;
    }

    let (id, data) = load_snapshot(&cfg, &cli.snapshot)?;
    let usage = normalize(&data, &cli.pokemon, &cfg.denominator)?;
    let rows = usage.ranked(&cli.category, cli.min_share).with_context(|| {
        format!("available categories: {}", usage.categories().collect::<Vec<_>>().join(", "))
    })?;
    tracing::debug!(entity = %usage.entity, total = usage.total, rows = rows.len(), "ranked category");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &id, data.battles(), &usage.entity, &rows)?;
    Ok(())
}

fn write_report<W: Write>(out: &mut W, id: &SnapshotId, battles: Option<u64>, entity: &str, rows: &[(String, f64)]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "===================")?;
    writeln!(out, "{entity}")?;
    match battles {
        Some(n) => writeln!(out, "{id} ({n} battles)")?,
        None => writeln!(out, "{id}")?,
    }
    writeln!(out, "===================")?;
    for (label, share) in rows {
        writeln!(out, "{label} {:.2}%", share * 100.0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_shares_as_percentages() {
        let id = SnapshotId::new("2017-05".parse().unwrap(), "gen7ou", 1500);
        let rows = vec![("stealthrock".to_string(), 0.6), ("leechseed".to_string(), 0.4567)];
        let mut buf = Vec::new();
        write_report(&mut buf, &id, Some(42), "Ferrothorn", &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Ferrothorn\n2017-05 gen7ou-1500 (42 battles)\n"));
        assert!(text.contains("stealthrock 60.00%\n"));
        assert!(text.contains("leechseed 45.67%\n"));
    }
}
