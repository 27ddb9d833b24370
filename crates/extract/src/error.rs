//! Extraction Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Every variant is an extraction failure: the file stays
//! where it is and nothing downstream sees a partial record.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file could not be opened or read (missing, permissions, I/O).
    #[display("could not open media file: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// The decoder does not recognise the file as an image, or it is corrupt.
    #[display("unreadable media: {}", _0.display())]
    UnreadableMedia(#[error(not(source))] PathBuf),
    /// Filesystem metadata (size) could not be read.
    #[display("could not stat media file: {}", _0.display())]
    Metadata(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A file still being written can fail to open or decode, and succeed
        // once the writer is done with it.
        matches!(self, Self::Open(_) | Self::Metadata(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::UnreadableMedia(PathBuf::from("/in/notes.jpg")).to_string(),
            "unreadable media: /in/notes.jpg"
        );
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Open(PathBuf::from("a.jpg")).is_retryable());
        assert!(!ErrorKind::UnreadableMedia(PathBuf::from("a.jpg")).is_retryable());
    }
}
