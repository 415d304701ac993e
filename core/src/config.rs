use std::path::PathBuf;
use url::Url;

use crate::error::Result;

pub const DEFAULT_ORIGIN: &str = "http://www.smogon.com/";
pub const DEFAULT_DENOMINATOR: &str = "Abilities";

/// Browser window size used while scraping listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// Settings shared by the resolver, fetcher, scraper and reference cache.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the statistics site; always ends with `/`.
    pub origin: Url,
    /// Directory holding `stats/` and `dex/`.
    pub cache_root: PathBuf,
    pub auto_download: bool,
    /// Chrome/Chromium executable; `None` lets the driver locate one.
    pub browser_path: Option<PathBuf>,
    pub viewport: Viewport,
    pub max_lookback_months: usize,
    pub max_scroll_passes: usize,
    /// Category whose values sum to an entity's total count.
    pub denominator: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("valid default origin"),
            cache_root: PathBuf::from("."),
            auto_download: true,
            browser_path: None,
            viewport: Viewport::default(),
            max_lookback_months: 24,
            max_scroll_passes: 500,
            denominator: DEFAULT_DENOMINATOR.to_string(),
            timeout_secs: 30,
            user_agent: concat!("dexcore/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with `DEX_ORIGIN`, `DEX_CACHE_DIR`, `DEX_AUTO_DOWNLOAD` and `DEX_BROWSER`.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(origin) = std::env::var("DEX_ORIGIN") {
            cfg = cfg.with_origin(&origin)?;
        }
        if let Ok(dir) = std::env::var("DEX_CACHE_DIR") {
            cfg.cache_root = PathBuf::from(dir);
        }
        if let Ok(flag) = std::env::var("DEX_AUTO_DOWNLOAD") {
            cfg.auto_download = parse_flag(&flag);
        }
        if let Ok(path) = std::env::var("DEX_BROWSER") {
            if !path.trim().is_empty() {
                cfg.browser_path = Some(PathBuf::from(path));
            }
        }
        Ok(cfg)
    }

    pub fn with_origin(mut self, origin: &str) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let origin = if origin.ends_with('/') { origin.to_string() } else { format!("{origin}/") };
        self.origin = Url::parse(&origin)?;
        Ok(self)
    }

    /// Absolute URL of a path relative to the origin.
    pub fn remote_url(&self, rel: &str) -> Result<Url> {
        Ok(self.origin.join(rel.trim_start_matches('/'))?)
    }
}

fn parse_flag(v: &str) -> bool {
    !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_gets_trailing_slash() {
        let cfg = Config::default().with_origin("http://localhost:8000/mirror").unwrap();
        assert_eq!(cfg.origin.as_str(), "http://localhost:8000/mirror/");
        let url = cfg.remote_url("/stats/2017-05/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/mirror/stats/2017-05/");
    }

    #[test]
    fn flag_parsing() {
        assert!(!parse_flag("off"));
        assert!(!parse_flag(" FALSE "));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
    }
}
