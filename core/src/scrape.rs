use std::ops::{Deref, DerefMut};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{Config, Viewport};
use crate::error::{Error, Result};
use crate::model::{ReferenceDictionary, Section};
use crate::rows::parse_row;

/// A live page in a rendering engine, scrolled and read as the user would.
pub trait RenderSession {
    /// Inner HTML of every element currently rendered with class `row_class`.
    fn rendered_rows(&mut self, row_class: &str) -> anyhow::Result<Vec<String>>;
    /// Scroll down by one viewport height.
    fn scroll_viewport(&mut self) -> anyhow::Result<()>;
    /// Current vertical scroll offset in pixels.
    fn scroll_offset(&mut self) -> anyhow::Result<f64>;
    /// Release the page and its browser. Called exactly once by [`SessionGuard`].
    fn close(&mut self) -> anyhow::Result<()>;
}

/// Opens rendering sessions on a URL.
pub trait SessionLauncher {
    type Session: RenderSession;
    fn open(&self, url: &Url, viewport: Viewport) -> anyhow::Result<Self::Session>;
}

/// Closes the wrapped session when dropped, whichever way the scrape ends.
pub struct SessionGuard<S: RenderSession> {
    session: S,
}

impl<S: RenderSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }
}

impl<S: RenderSession> Deref for SessionGuard<S> {
    type Target = S;
    fn deref(&self) -> &S { &self.session }
}

impl<S: RenderSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S { &mut self.session }
}

impl<S: RenderSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Err(e) = self.session.close() {
            warn!(error = %e, "failed to close rendering session");
        }
    }
}

/// Anything that can produce a full reference dictionary for a section.
pub trait Scrape {
    fn scrape(&self, section: Section, version: &str) -> Result<ReferenceDictionary>;
}

/// Scrapes a virtualized listing page by scrolling until the offset stops moving.
pub struct ReferenceScraper<'a, L> {
    cfg: &'a Config,
    launcher: L,
}

impl<'a, L: SessionLauncher> ReferenceScraper<'a, L> {
    pub fn new(cfg: &'a Config, launcher: L) -> Self {
        Self { cfg, launcher }
    }
}

impl<'a, L: SessionLauncher> Scrape for ReferenceScraper<'a, L> {
    fn scrape(&self, section: Section, version: &str) -> Result<ReferenceDictionary> {
        let url = self.cfg.remote_url(&section.listing_rel_path(version))?;
        info!(%url, "opening listing page");
        let session = self.launcher.open(&url, self.cfg.viewport).map_err(Error::Automation)?;
        let mut guard = SessionGuard::new(session);
        let dict = collect_rows(&mut *guard, section, self.cfg.max_scroll_passes)?;
        if dict.is_empty() {
            return Err(Error::Scrape {
                section: section.to_string(),
                version: version.to_string(),
                reason: format!("no {} rows parsed", section.row_class()),
            });
        }
        info!(%section, version, records = dict.len(), "scrape complete");
        Ok(dict)
    }
}

/// Read every rendered row, scroll one viewport, repeat until two consecutive
/// offsets match. Records are merged by id, so rows seen on several passes
/// collapse into one entry. Gives up after `max_passes` passes.
pub fn collect_rows<S>(session: &mut S, section: Section, max_passes: usize) -> Result<ReferenceDictionary>
where
    S: RenderSession + ?Sized,
{
    let mut dict = ReferenceDictionary::new();
    let mut offset = session.scroll_offset().map_err(Error::Automation)?;

    for pass in 1..=max_passes {
        let rows = session.rendered_rows(section.row_class()).map_err(Error::Automation)?;
        let mut skipped = 0usize;
        for html in &rows {
            match parse_row(section, html) {
                Ok(record) => {
                    dict.insert(record.id().to_string(), record);
                }
                Err(e) => {
                    skipped += 1;
                    warn!(pass, error = %e, "skipping malformed row");
                }
            }
        }

        session.scroll_viewport().map_err(Error::Automation)?;
        let next = session.scroll_offset().map_err(Error::Automation)?;
        debug!(pass, rows = rows.len(), skipped, records = dict.len(), offset = next, "collection pass");
        if next == offset {
            return Ok(dict);
        }
        offset = next;
    }

    Err(Error::ScrollNotSettled { passes: max_passes })
}

impl<T: Scrape + ?Sized> Scrape for &T {
    fn scrape(&self, section: Section, version: &str) -> Result<ReferenceDictionary> {
        (**self).scrape(section, version)
    }
}
