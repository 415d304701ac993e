use anyhow::Result;
use dexcore::{Config, Error, Month, Origin, ProbeOutcome};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// The statistics site over blocking HTTP.
pub struct HttpOrigin {
    client: Client,
    cfg: Config,
}

impl HttpOrigin {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self { client, cfg: cfg.clone() })
    }

    fn url(&self, rel: &str) -> dexcore::Result<Url> {
        self.cfg.remote_url(rel)
    }
}

impl Origin for HttpOrigin {
    fn probe_release(&self, month: Month) -> ProbeOutcome {
        let url = match self.url(&dexcore::release_rel_path(month)) {
            Ok(u) => u,
            Err(e) => return ProbeOutcome::Unavailable(e.to_string()),
        };
        match self.client.get(url).send() {
            Ok(resp) if resp.status().is_success() => ProbeOutcome::Found,
            Ok(resp) if resp.status().is_client_error() => ProbeOutcome::Absent,
            Ok(resp) => ProbeOutcome::Unavailable(format!("HTTP {}", resp.status())),
            Err(e) => ProbeOutcome::Unavailable(e.to_string()),
        }
    }

    fn download(&self, rel: &str) -> dexcore::Result<Vec<u8>> {
        let url = self.url(rel)?;
        let unavailable = |reason: String| Error::RemoteUnavailable { url: url.to_string(), reason };
        let resp = self.client.get(url.clone()).send().map_err(|e| unavailable(e.to_string()))?;
        match resp.status() {
            s if s.is_success() => Ok(resp.bytes().map_err(|e| unavailable(e.to_string()))?.to_vec()),
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(Error::not_found(url.to_string())),
            s => Err(unavailable(format!("HTTP {s}"))),
        }
    }
}
