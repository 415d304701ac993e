use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{SnapshotData, SnapshotId};
use crate::origin::Origin;
use crate::persist::{load_snapshot, save_snapshot_bytes, snapshot_exists, CachePaths};

/// Cache-first retrieval of snapshot bodies.
pub struct SnapshotFetcher<'a, O> {
    cfg: &'a Config,
    paths: CachePaths,
    origin: O,
}

impl<'a, O: Origin> SnapshotFetcher<'a, O> {
    pub fn new(cfg: &'a Config, origin: O) -> Self {
        Self { cfg, paths: CachePaths::new(&cfg.cache_root), origin }
    }

    pub fn fetch(&self, id: &SnapshotId) -> Result<SnapshotData> {
        id.check()?;
        if snapshot_exists(&self.paths, id) {
            return load_snapshot(&self.paths, id);
        }
        if !self.cfg.auto_download {
            return Err(Error::not_found(format!("snapshot {id} (auto-download disabled)")));
        }

        let rel = id.rel_path();
        info!(url = %self.cfg.remote_url(&rel)?, "downloading snapshot");
        let bytes = self.origin.download(&rel)?;
        // Validate before caching so a bad body is not served again on the next run.
        let data: SnapshotData = serde_json::from_slice(&bytes)
            .map_err(|source| Error::Parse { path: self.paths.snapshot(id), source })?;
        let path = save_snapshot_bytes(&self.paths, id, &bytes)?;
        info!(path = %path.display(), entities = data.data.len(), "snapshot cached");
        Ok(data)
    }
}
