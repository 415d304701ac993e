#![allow(dead_code)]

use dexcore::{Config, Month, Origin, ProbeOutcome, RenderSession, Result, SessionLauncher, Viewport};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;
use url::Url;

pub fn config(root: &Path) -> Config {
    Config { cache_root: root.to_path_buf(), max_lookback_months: 6, ..Config::default() }
}

pub fn month(s: &str) -> Month {
    s.parse().unwrap()
}

/// Origin with a fixed set of published months and bodies.
#[derive(Default)]
pub struct FakeOrigin {
    pub published: HashSet<Month>,
    pub unreachable: HashSet<Month>,
    pub bodies: HashMap<String, Vec<u8>>,
    pub probes: RefCell<Vec<Month>>,
    pub downloads: RefCell<Vec<String>>,
}

impl Origin for FakeOrigin {
    fn probe_release(&self, month: Month) -> ProbeOutcome {
        self.probes.borrow_mut().push(month);
        if self.unreachable.contains(&month) {
            ProbeOutcome::Unavailable("connection refused".into())
        } else if self.published.contains(&month) {
            ProbeOutcome::Found
        } else {
            ProbeOutcome::Absent
        }
    }

    fn download(&self, rel: &str) -> Result<Vec<u8>> {
        self.downloads.borrow_mut().push(rel.to_string());
        self.bodies.get(rel).cloned().ok_or_else(|| dexcore::Error::not_found(rel.to_string()))
    }
}

/// Scripted page: `offsets` is the sequence returned by successive offset
/// reads, `passes[i]` the rows rendered on the i-th read of rows.
pub struct FakeSession {
    pub offsets: Vec<f64>,
    pub passes: Vec<Vec<String>>,
    pub offset_reads: usize,
    pub row_reads: Rc<Cell<usize>>,
    pub closed: Rc<Cell<usize>>,
    pub fail_rows: bool,
}

impl RenderSession for FakeSession {
    fn rendered_rows(&mut self, _row_class: &str) -> anyhow::Result<Vec<String>> {
        if self.fail_rows {
            anyhow::bail!("page crashed");
        }
        let i = self.row_reads.get();
        self.row_reads.set(i + 1);
        Ok(self.passes.get(i).or(self.passes.last()).cloned().unwrap_or_default())
    }

    fn scroll_viewport(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn scroll_offset(&mut self) -> anyhow::Result<f64> {
        let i = self.offset_reads.min(self.offsets.len() - 1);
        self.offset_reads += 1;
        Ok(self.offsets[i])
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.closed.set(self.closed.get() + 1);
        Ok(())
    }
}

/// Hands out fresh copies of one scripted page and counts launches and closes.
#[derive(Default)]
pub struct FakeLauncher {
    pub offsets: Vec<f64>,
    pub passes: Vec<Vec<String>>,
    pub fail_rows: bool,
    pub opened: Cell<usize>,
    pub row_reads: Rc<Cell<usize>>,
    pub closed: Rc<Cell<usize>>,
    pub urls: RefCell<Vec<String>>,
}

impl SessionLauncher for &FakeLauncher {
    type Session = FakeSession;

    fn open(&self, url: &Url, _viewport: Viewport) -> anyhow::Result<FakeSession> {
        self.opened.set(self.opened.get() + 1);
        self.urls.borrow_mut().push(url.to_string());
        Ok(FakeSession {
            offsets: self.offsets.clone(),
            passes: self.passes.clone(),
            offset_reads: 0,
            row_reads: self.row_reads.clone(),
            closed: self.closed.clone(),
            fail_rows: self.fail_rows,
        })
    }
}

pub fn move_row(slug: &str, name: &str, power: &str) -> String {
    format!(
        r#"<div class="MoveRow-name"><a href="/dex/sm/moves/{slug}/">{name}</a></div>
<div class="MoveRow-type"><a href="/dex/sm/types/normal/">Normal</a></div>
<div class="MoveRow-damage"><div class="DamageCategory physical"></div></div>
<div class="MoveRow-power"><span>{power}</span></div>
<div class="MoveRow-accuracy"><span>100%</span></div>
<div class="MoveRow-pp"><span>10</span></div>
<div class="MoveRow-description">{name} description.</div>"#
    )
}
