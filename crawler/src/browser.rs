use anyhow::{anyhow, Context, Result};
use dexcore::{RenderSession, SessionLauncher, Viewport};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use url::Url;

/// Pause after each scroll so the virtualized list can render new rows.
const SCROLL_SETTLE: Duration = Duration::from_millis(250);

/// Launches headless Chrome/Chromium.
#[derive(Debug, Clone, Default)]
pub struct ChromeLauncher {
    pub browser_path: Option<PathBuf>,
}

impl ChromeLauncher {
    pub fn new(browser_path: Option<PathBuf>) -> Self {
        Self { browser_path }
    }
}

impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    fn open(&self, url: &Url, viewport: Viewport) -> Result<ChromeSession> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((viewport.width, viewport.height)))
            .path(self.browser_path.clone())
            .build()
            .map_err(|e| anyhow!("invalid browser launch options: {e}"))?;
        let browser = Browser::new(options).context("launching browser")?;
        let tab = browser.new_tab()?;
        tab.navigate_to(url.as_str())?.wait_until_navigated()?;
        tracing::debug!(%url, "page loaded");
        Ok(ChromeSession { tab, browser: Some(browser), waited: false })
    }
}

/// One tab in a dedicated browser process; the process exits on close.
pub struct ChromeSession {
    tab: Arc<Tab>,
    browser: Option<Browser>,
    waited: bool,
}

impl ChromeSession {
    fn eval(&self, js: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.tab.evaluate(js, false)?.value)
    }
}

impl RenderSession for ChromeSession {
    fn rendered_rows(&mut self, row_class: &str) -> Result<Vec<String>> {
        if !self.waited {
            self.waited = true;
            if let Err(e) = self.tab.wait_for_element(&format!(".{row_class}")) {
                tracing::debug!(row_class, error = %e, "no rows rendered before timeout");
            }
        }
        let class = serde_json::to_string(row_class)?;
        let js = format!(
            "JSON.stringify(Array.from(document.getElementsByClassName({class})).map(e => e.innerHTML))"
        );
        match self.eval(&js)? {
            Some(serde_json::Value::String(json)) => Ok(serde_json::from_str(&json)?),
            other => Err(anyhow!("unexpected row payload: {other:?}")),
        }
    }

    fn scroll_viewport(&mut self) -> Result<()> {
        self.eval("window.scrollBy(0, window.innerHeight + 1)")?;
        sleep(SCROLL_SETTLE);
        Ok(())
    }

    fn scroll_offset(&mut self) -> Result<f64> {
        self.eval("window.pageYOffset")?
            .and_then(|v| v.as_f64())
            .ok_or_else(|| anyhow!("page did not report a scroll offset"))
    }

    fn close(&mut self) -> Result<()> {
        let Some(browser) = self.browser.take() else {
            return Ok(());
        };
        let closed = self.tab.close(false).map(|_| ());
        // Dropping the Browser kills the child process.
        drop(browser);
        closed
    }
}
