pub mod browser;
pub mod cli;
pub mod http;

use anyhow::Result;
use dexcore::{Config, Dex, ReferenceScraper, SnapshotData, SnapshotFetcher, SnapshotId, SnapshotResolver};

pub use browser::{ChromeLauncher, ChromeSession};
pub use cli::{init_tracing, CacheArgs, SnapshotArgs};
pub use http::HttpOrigin;

/// Resolve and fetch the snapshot described by `args` over HTTP.
pub fn load_snapshot(cfg: &Config, args: &SnapshotArgs) -> Result<(SnapshotId, SnapshotData)> {
    let origin = HttpOrigin::new(cfg)?;
    let id = SnapshotResolver::new(cfg, &origin).resolve(args.date, &args.meta, args.rank)?;
    let data = SnapshotFetcher::new(cfg, &origin).fetch(&id)?;
    Ok((id, data))
}

/// Reference cache backed by a headless-browser scraper.
pub fn chrome_dex<'a>(cfg: &'a Config, version: &str) -> Dex<'a, ReferenceScraper<'a, ChromeLauncher>> {
    let scraper = ReferenceScraper::new(cfg, ChromeLauncher::new(cfg.browser_path.clone()));
    Dex::new(cfg, scraper, version)
}
