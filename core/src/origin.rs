use crate::error::Result;
use crate::month::Month;

/// Result of a lightweight existence check against the remote origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found,
    Absent,
    /// Connectivity or server failure; the resource may or may not exist.
    Unavailable(String),
}

/// Remote side of the statistics site.
///
/// Implementations block until the request completes.
pub trait Origin {
    /// Whether `stats/{month}/` has been published.
    fn probe_release(&self, month: Month) -> ProbeOutcome;

    /// Body at `rel` (relative to the origin root). A missing resource is
    /// `Error::NotFound`; transport failures are `Error::RemoteUnavailable`.
    fn download(&self, rel: &str) -> Result<Vec<u8>>;
}

impl<O: Origin + ?Sized> Origin for &O {
    fn probe_release(&self, month: Month) -> ProbeOutcome { (**self).probe_release(month) }
    fn download(&self, rel: &str) -> Result<Vec<u8>> { (**self).download(rel) }
}
