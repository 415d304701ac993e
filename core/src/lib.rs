pub mod config;
pub mod error;
pub mod fetch;
pub mod keys;
pub mod model;
pub mod month;
pub mod origin;
pub mod persist;
pub mod reference;
pub mod resolve;
pub mod rows;
pub mod scrape;
pub mod usage;

pub use config::{Config, Viewport};
pub use error::{Error, Result};
pub use fetch::SnapshotFetcher;
pub use model::*;
pub use month::Month;
pub use origin::{Origin, ProbeOutcome};
pub use reference::Dex;
pub use resolve::{Requested, SnapshotResolver};
pub use scrape::{ReferenceScraper, RenderSession, Scrape, SessionGuard, SessionLauncher};
pub use usage::{normalize, NormalizedUsage};
