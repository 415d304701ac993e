use crate::error::{Error, Result};
use crate::model::{check_segment, AbilityRecord, MoveRecord, ReferenceDictionary, ReferenceRecord, Section, SnapshotData, SnapshotId};
use crate::month::Month;
use std::collections::BTreeMap;
use std::fs::{self, create_dir_all, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Layout of the on-disk cache. Relative paths mirror the remote origin.
///
/// Writes go through a temp file renamed into place, so readers never see a
/// partial artifact. Two processes writing the same path still race; the last
/// rename wins.
#[derive(Debug, Clone)]
pub struct CachePaths {
    pub root: PathBuf,
}

impl CachePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn snapshot(&self, id: &SnapshotId) -> PathBuf { self.root.join(id.rel_path()) }
    pub fn reference(&self, section: Section, version: &str) -> PathBuf { self.root.join(section.cache_rel_path(version)) }
    fn stats_dir(&self) -> PathBuf { self.root.join("stats") }
}

pub fn snapshot_exists(paths: &CachePaths, id: &SnapshotId) -> bool {
    paths.snapshot(id).is_file()
}

pub fn load_snapshot(paths: &CachePaths, id: &SnapshotId) -> Result<SnapshotData> {
    id.check()?;
    let path = paths.snapshot(id);
    let f = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::not_found(format!("snapshot {id}"))),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_reader(BufReader::new(f)).map_err(|source| Error::Parse { path, source })
}

/// Store a downloaded snapshot body exactly as received.
pub fn save_snapshot_bytes(paths: &CachePaths, id: &SnapshotId, bytes: &[u8]) -> Result<PathBuf> {
    id.check()?;
    let path = paths.snapshot(id);
    write_atomic(&path, |w| w.write_all(bytes))?;
    Ok(path)
}

/// Every cached snapshot whose path parses back into an id, newest month first.
pub fn list_snapshots(paths: &CachePaths) -> Vec<SnapshotId> {
    let stats = paths.stats_dir();
    let mut ids: Vec<SnapshotId> = WalkDir::new(&stats)
        .min_depth(3)
        .max_depth(3)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(&stats).ok().and_then(snapshot_id_from_rel))
        .collect();
    ids.sort_by(|a, b| b.month.cmp(&a.month).then_with(|| a.metagame.cmp(&b.metagame)).then(a.rank.cmp(&b.rank)));
    ids
}

fn snapshot_id_from_rel(rel: &Path) -> Option<SnapshotId> {
    let mut parts = rel.iter().map(|p| p.to_str());
    let month: Month = parts.next()??.parse().ok()?;
    if parts.next()?? != "chaos" {
        return None;
    }
    let file = parts.next()??;
    let stem = file.strip_suffix(".json")?;
    let (metagame, rank) = stem.rsplit_once('-')?;
    Some(SnapshotId::new(month, metagame, rank.parse().ok()?))
}

/// `Ok(None)` when the dictionary has never been cached.
///
/// Entries are read as the section's own record type, so a moves file never
/// decodes into abilities or the reverse.
pub fn load_reference(paths: &CachePaths, section: Section, version: &str) -> Result<Option<ReferenceDictionary>> {
    check_segment("version", version)?;
    let path = paths.reference(section, version);
    let f = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let reader = BufReader::new(f);
    let dict: serde_json::Result<ReferenceDictionary> = match section {
        Section::Moves => serde_json::from_reader::<_, BTreeMap<String, MoveRecord>>(reader)
            .map(|m| m.into_iter().map(|(id, r)| (id, ReferenceRecord::Move(r))).collect()),
        Section::Abilities => serde_json::from_reader::<_, BTreeMap<String, AbilityRecord>>(reader)
            .map(|m| m.into_iter().map(|(id, r)| (id, ReferenceRecord::Ability(r))).collect()),
    };
    dict.map(Some).map_err(|source| Error::Parse { path, source })
}

pub fn save_reference(paths: &CachePaths, section: Section, version: &str, dict: &ReferenceDictionary) -> Result<PathBuf> {
    check_segment("version", version)?;
    let path = paths.reference(section, version);
    write_atomic(&path, |w| {
        serde_json::to_writer_pretty(&mut *w, dict)?;
        Ok(())
    })?;
    Ok(path)
}

fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> std::io::Result<()>,
{
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    create_dir_all(parent)?;
    let tmp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(&tmp);
        fill(&mut writer)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Remove a cached artifact; missing files are not an error.
pub fn evict(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rel_path_round_trips_through_listing_parser() {
        let id = SnapshotId::new("2017-05".parse().unwrap(), "gen7ou", 1500);
        let rel = PathBuf::from(id.rel_path());
        let rel = rel.strip_prefix("stats").unwrap();
        assert_eq!(snapshot_id_from_rel(rel), Some(id));
    }

    #[test]
    fn listing_parser_rejects_foreign_files() {
        assert_eq!(snapshot_id_from_rel(Path::new("2017-05/moveset/gen7ou-1500.txt")), None);
        assert_eq!(snapshot_id_from_rel(Path::new("notes/chaos/gen7ou-1500.json")), None);
    }

    #[test]
    fn metagame_with_dash_splits_on_last() {
        let id = snapshot_id_from_rel(Path::new("2017-05/chaos/gen7doubles-ou-1695.json")).unwrap();
        assert_eq!(id.metagame, "gen7doubles-ou");
        assert_eq!(id.rank, 1695);
    }
}
