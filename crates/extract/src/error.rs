//! Extraction Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. Callers in this workspace treat every variant the same way
/// (degrade to a placeholder entry), so the distinctions exist mostly for
/// logging.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bytes do not form a structurally valid PDF document.
    #[display("malformed PDF: {_0}")]
    Malformed(#[error(not(source))] String),
    /// The document is encrypted; metadata would require a password.
    #[display("document is encrypted")]
    Encrypted,
    /// The page tree produced a count outside the addressable range.
    #[display("unrepresentable page count")]
    PageCount,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A PDF is either parseable or it's not; re-reading the same
        // bytes won't change the outcome.
        false
    }
}
