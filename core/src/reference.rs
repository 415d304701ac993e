use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::keys::to_key;
use crate::model::{check_segment, AbilityRecord, MoveRecord, ReferenceDictionary, ReferenceRecord, Section};
use crate::persist::{evict, load_reference, save_reference, CachePaths};
use crate::scrape::Scrape;

/// Cached move/ability dictionaries for one game version, scraped on a miss.
pub struct Dex<'a, S> {
    cfg: &'a Config,
    paths: CachePaths,
    scraper: S,
    version: String,
}

impl<'a, S: Scrape> Dex<'a, S> {
    pub fn new(cfg: &'a Config, scraper: S, version: impl Into<String>) -> Self {
        Self { cfg, paths: CachePaths::new(&cfg.cache_root), scraper, version: version.into() }
    }

    pub fn version(&self) -> &str { &self.version }

    /// Cached dictionary, or `None` on a miss.
    pub fn get(&self, section: Section) -> Result<Option<ReferenceDictionary>> {
        load_reference(&self.paths, section, &self.version)
    }

    pub fn put(&self, section: Section, dict: &ReferenceDictionary) -> Result<()> {
        let path = save_reference(&self.paths, section, &self.version, dict)?;
        info!(path = %path.display(), records = dict.len(), "reference dictionary cached");
        Ok(())
    }

    /// The cached dictionary, scraping and caching it first on a miss.
    pub fn dictionary(&self, section: Section) -> Result<ReferenceDictionary> {
        if let Some(dict) = self.get(section)? {
            return Ok(dict);
        }
        if !self.cfg.auto_download {
            return Err(Error::not_found(format!("{section} for {} (auto-download disabled)", self.version)));
        }
        self.refresh(section)
    }

    /// Scrape unconditionally and replace the cached dictionary.
    pub fn refresh(&self, section: Section) -> Result<ReferenceDictionary> {
        check_segment("version", &self.version)?;
        let dict = self.scraper.scrape(section, &self.version)?;
        if dict.is_empty() {
            return Err(Error::Scrape {
                section: section.to_string(),
                version: self.version.clone(),
                reason: "scrape returned no records".into(),
            });
        }
        self.put(section, &dict)?;
        Ok(dict)
    }

    /// Drop the cached dictionary so the next lookup scrapes again.
    pub fn invalidate(&self, section: Section) -> Result<()> {
        evict(&self.paths.reference(section, &self.version))
    }

    /// Look a record up by display name, slug or id.
    pub fn record(&self, section: Section, name: &str) -> Result<ReferenceRecord> {
        let dict = self.dictionary(section)?;
        dict.get(&to_key(name))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("{} {name:?}", singular(section))))
    }

    pub fn lookup_move(&self, name: &str) -> Result<MoveRecord> {
        match self.record(Section::Moves, name)? {
            ReferenceRecord::Move(m) => Ok(m),
            ReferenceRecord::Ability(_) => Err(Error::not_found(format!("move {name:?}"))),
        }
    }

    pub fn lookup_ability(&self, name: &str) -> Result<AbilityRecord> {
        match self.record(Section::Abilities, name)? {
            ReferenceRecord::Ability(a) => Ok(a),
            ReferenceRecord::Move(_) => Err(Error::not_found(format!("ability {name:?}"))),
        }
    }
}

fn singular(section: Section) -> &'static str {
    match section {
        Section::Moves => "move",
        Section::Abilities => "ability",
    }
}
