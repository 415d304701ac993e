use anyhow::Result;
use clap::Args;
use dexcore::{Config, Requested};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Cache and origin options shared by every binary.
#[derive(Args, Debug, Clone, Default)]
pub struct CacheArgs {
    /// Directory holding the stats/ and dex/ caches
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,
    /// Base URL of the statistics site
    #[arg(long, global = true)]
    pub origin: Option<String>,
    /// Serve from the local cache only; never contact the origin
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,
    /// Chrome/Chromium executable used for scraping
    #[arg(long, global = true)]
    pub browser: Option<PathBuf>,
    /// Months to walk back when looking for the latest snapshot
    #[arg(long, global = true)]
    pub max_lookback: Option<usize>,
    /// Scroll passes before giving up on a listing page
    #[arg(long, global = true)]
    pub max_scroll_passes: Option<usize>,
}

impl CacheArgs {
    /// Defaults, then `DEX_*` environment variables, then these flags.
    pub fn to_config(&self) -> Result<Config> {
        let mut cfg = Config::from_env()?;
        if let Some(origin) = &self.origin {
            cfg = cfg.with_origin(origin)?;
        }
        if let Some(dir) = &self.cache_dir {
            cfg.cache_root = dir.clone();
        }
        if self.offline {
            cfg.auto_download = false;
        }
        if let Some(path) = &self.browser {
            cfg.browser_path = Some(path.clone());
        }
        if let Some(n) = self.max_lookback {
            cfg.max_lookback_months = n;
        }
        if let Some(n) = self.max_scroll_passes {
            cfg.max_scroll_passes = n;
        }
        Ok(cfg)
    }
}

/// Which snapshot to load.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Snapshot month as YYYY-MM, or "latest"
    #[arg(long, default_value = "latest")]
    pub date: Requested,
    /// Metagame tag
    #[arg(long, default_value = "gen7ou")]
    pub meta: String,
    /// Rank threshold
    #[arg(long, default_value_t = 1500)]
    pub rank: u32,
}

/// Log to stderr so stdout carries only command output.
pub fn init_tracing() {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
}
