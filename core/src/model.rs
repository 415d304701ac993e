use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::month::Month;

/// Category name -> either a nested label->count map or a scalar.
pub type Categories = serde_json::Map<String, serde_json::Value>;

/// Identifies one published snapshot: month, metagame tag and rank threshold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotId {
    pub month: Month,
    pub metagame: String,
    pub rank: u32,
}

impl SnapshotId {
    pub fn new(month: Month, metagame: impl Into<String>, rank: u32) -> Self {
        Self { month, metagame: metagame.into(), rank }
    }

    /// Rejects metagame tags that would escape the cache directory.
    pub fn check(&self) -> Result<()> {
        check_segment("metagame", &self.metagame)
    }

    /// `stats/{month}/chaos/{metagame}-{rank}.json`, both the cache path and the remote path.
    pub fn rel_path(&self) -> String {
        format!("stats/{}/chaos/{}-{}.json", self.month, self.metagame, self.rank)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.month, self.metagame, self.rank)
    }
}

/// `value` must be usable as one component of a cache path.
pub fn check_segment(what: &'static str, value: &str) -> Result<()> {
    let bad = value.is_empty() || value.contains(['/', '\\']) || value.contains("..");
    if bad {
        return Err(Error::InvalidSegment { what, value: value.to_string() });
    }
    Ok(())
}

/// Path of the directory whose presence marks a published month.
pub fn release_rel_path(month: Month) -> String {
    format!("stats/{month}/")
}

/// A monthly usage snapshot as published: a header plus per-entity categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapshotData {
    #[serde(default)]
    pub info: serde_json::Map<String, serde_json::Value>,
    pub data: BTreeMap<String, Categories>,
}

impl SnapshotData {
    pub fn battles(&self) -> Option<u64> {
        self.info.get("number of battles").and_then(|v| v.as_u64())
    }
}

/// Listing pages that can be scraped into a reference dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Moves,
    Abilities,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Moves => "moves",
            Section::Abilities => "abilities",
        }
    }

    /// CSS class carried by each rendered row of the listing.
    pub fn row_class(&self) -> &'static str {
        match self {
            Section::Moves => "MoveRow",
            Section::Abilities => "AbilityRow",
        }
    }

    /// `dex/{version}/{section}/`
    pub fn listing_rel_path(&self, version: &str) -> String {
        format!("dex/{}/{}/", version, self.as_str())
    }

    /// `dex/{version}/{section}.json`
    pub fn cache_rel_path(&self, version: &str) -> String {
        format!("dex/{}/{}.json", version, self.as_str())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moves" | "move" => Ok(Section::Moves),
            "abilities" | "ability" => Ok(Section::Abilities),
            other => Err(Error::not_found(format!("section {other:?}"))),
        }
    }
}

/// A link to another dex entry, e.g. the type of a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLink {
    pub id: String,
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub id: String,
    pub url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryLink,
    /// Damage class: physical, special or non-damaging.
    pub damage: String,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub pp: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbilityRecord {
    pub id: String,
    pub url: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceRecord {
    Move(MoveRecord),
    Ability(AbilityRecord),
}

impl ReferenceRecord {
    pub fn id(&self) -> &str {
        match self {
            ReferenceRecord::Move(m) => &m.id,
            ReferenceRecord::Ability(a) => &a.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ReferenceRecord::Move(m) => &m.name,
            ReferenceRecord::Ability(a) => &a.name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ReferenceRecord::Move(m) => &m.url,
            ReferenceRecord::Ability(a) => &a.url,
        }
    }
}

/// Canonical id -> record, for one (section, version) pair.
pub type ReferenceDictionary = BTreeMap<String, ReferenceRecord>;
