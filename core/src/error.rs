use std::path::PathBuf;

/// Failures surfaced by the snapshot and reference pipelines.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("remote unavailable: {url}: {reason}")]
    RemoteUnavailable { url: String, reason: String },
    #[error("not found: {what}")]
    NotFound { what: String },
    #[error("malformed content in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown entity: {name}")]
    UnknownEntity { name: String },
    #[error("entity {entity} has no usable {category:?} category")]
    MissingCategory { entity: String, category: String },
    #[error("entity {entity} has a zero {category:?} total")]
    EmptyDenominator { entity: String, category: String },
    #[error("scrape of {section} ({version}) failed: {reason}")]
    Scrape { section: String, version: String, reason: String },
    #[error("scroll offset did not settle after {passes} passes")]
    ScrollNotSettled { passes: usize },
    #[error("browser automation failed: {0:#}")]
    Automation(anyhow::Error),
    #[error("invalid {what} {value:?}: must be a single path segment")]
    InvalidSegment { what: &'static str, value: String },
    #[error("invalid month {0:?}, expected YYYY-MM")]
    InvalidMonth(String),
    #[error("invalid origin url: {0}")]
    InvalidOrigin(#[from] url::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound { what: what.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
