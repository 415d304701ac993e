use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{check_segment, SnapshotId};
use crate::month::Month;
use crate::origin::{Origin, ProbeOutcome};
use crate::persist::{snapshot_exists, CachePaths};

/// Which snapshot month the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requested {
    /// Newest month available locally or published remotely.
    Latest,
    Exact(Month),
}

impl FromStr for Requested {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "latest" | "default" | "" => Ok(Requested::Latest),
            other => Ok(Requested::Exact(other.parse()?)),
        }
    }
}

impl fmt::Display for Requested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requested::Latest => f.write_str("latest"),
            Requested::Exact(m) => write!(f, "{m}"),
        }
    }
}

/// Turns a requested month into a concrete snapshot id without downloading anything.
pub struct SnapshotResolver<'a, O> {
    cfg: &'a Config,
    paths: CachePaths,
    origin: O,
}

impl<'a, O: Origin> SnapshotResolver<'a, O> {
    pub fn new(cfg: &'a Config, origin: O) -> Self {
        Self { cfg, paths: CachePaths::new(&cfg.cache_root), origin }
    }

    pub fn resolve(&self, requested: Requested, metagame: &str, rank: u32) -> Result<SnapshotId> {
        self.resolve_from(Month::current(), requested, metagame, rank)
    }

    /// Like [`resolve`](Self::resolve) with the walk for `Latest` starting at `start`.
    ///
    /// Each candidate month is checked in the local cache first, then (when
    /// auto-download is on) against the origin's release marker. Unavailable
    /// probes count as "not this month". At most `max_lookback_months`
    /// candidates are tried.
    pub fn resolve_from(&self, start: Month, requested: Requested, metagame: &str, rank: u32) -> Result<SnapshotId> {
        check_segment("metagame", metagame)?;
        let start = match requested {
            Requested::Exact(month) => return Ok(SnapshotId::new(month, metagame, rank)),
            Requested::Latest => start,
        };

        for month in start.walk_back(self.cfg.max_lookback_months) {
            let id = SnapshotId::new(month, metagame, rank);
            info!(%month, metagame, rank, "trying snapshot month");
            if snapshot_exists(&self.paths, &id) {
                info!(%month, "found in local cache");
                return Ok(id);
            }
            if !self.cfg.auto_download {
                continue;
            }
            match self.origin.probe_release(month) {
                ProbeOutcome::Found => {
                    info!(%month, "release published on origin");
                    return Ok(id);
                }
                ProbeOutcome::Absent => debug!(%month, "no release on origin"),
                ProbeOutcome::Unavailable(reason) => warn!(%month, %reason, "release probe failed, trying earlier month"),
            }
        }

        Err(Error::not_found(format!(
            "{metagame}-{rank} snapshot in the {} months up to {start}",
            self.cfg.max_lookback_months
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_parsing() {
        assert_eq!("latest".parse::<Requested>().unwrap(), Requested::Latest);
        assert_eq!(
            "2016-11".parse::<Requested>().unwrap(),
            Requested::Exact(Month::new(2016, 11).unwrap())
        );
        assert!("Nov 2016".parse::<Requested>().is_err());
    }
}
