//! Configuration Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No home directory could be determined for the current user, so there
    /// is nowhere to put the configuration file. Fatal at startup.
    #[display("cannot locate a configuration directory")]
    Locate,
    /// The configuration directory could not be created.
    #[display("cannot create {}", _0.display())]
    Create(#[error(not(source))] PathBuf),
    /// The configuration file exists but could not be read or parsed.
    #[display("cannot load configuration")]
    Load,
    /// The configuration file could not be written back. The in-memory
    /// settings remain the source of truth until a later save succeeds.
    #[display("cannot persist configuration to {}", _0.display())]
    Persist(#[error(not(source))] PathBuf),
    /// A root was removed that was never registered.
    #[display("not a watched root: {}", _0.display())]
    UnknownRoot(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persist(_))
    }
}
