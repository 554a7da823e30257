//! Library Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. Per-file extraction failures never appear here; they degrade
/// to placeholder entries inside the scan and are only logged.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The root itself is missing, unreadable, or not a directory. The
    /// reconciler skips the root for this cycle and keeps its prior catalog
    /// entries; nothing is lost for a temporarily-unmounted drive.
    #[display("root unavailable: {}", _0.display())]
    RootUnavailable(#[error(not(source))] PathBuf),
    /// Scanning the root exceeded the soft deadline.
    #[display("scan deadline exceeded for {}", _0.display())]
    ScanTimeout(#[error(not(source))] PathBuf),
    /// A catalog read or write failed. The catalog is guaranteed unchanged
    /// for the affected root, so the whole refresh may be retried wholesale.
    #[display("catalog operation failed")]
    Catalog,
    /// Updating the watched-root configuration failed.
    #[display("configuration update failed")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RootUnavailable(_) | Self::ScanTimeout(_) | Self::Catalog)
    }
}
