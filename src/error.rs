//! Error types for bamslice

use std::fmt;
use std::io;

/// Result type alias for bamslice operations
pub type Result<T> = std::result::Result<T, SliceError>;

/// Error types that can occur while slicing
///
/// Region-local anomalies (a partition hitting its record budget, a remote
/// position resolving to nothing) are absorbed as counters and never appear
/// here. Everything in this enum either aborts the whole job or, in the case
/// of [`SliceError::MalformedRegion`], drops a single region at admission.
#[derive(Debug)]
pub enum SliceError {
    /// The alignment source could not be opened or queried (bad path,
    /// missing index). Fatal: every partition shares the same source.
    SourceUnavailable {
        /// Description of the underlying failure
        detail: String,
    },

    /// A requested region is unusable (start past end, unknown chromosome).
    /// Skipped per-region at job admission; fatal only to that region.
    MalformedRegion {
        /// The region as given by the caller
        region: String,
        /// Why it was rejected
        reason: String,
    },

    /// The output sink failed to persist a record. Fatal: partial output
    /// is unreliable for downstream consumers.
    Write(io::Error),

    /// Other I/O failure (e.g. worker pool construction)
    Io(io::Error),
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceError::SourceUnavailable { detail } => {
                write!(f, "alignment source unavailable: {}", detail)
            }
            SliceError::MalformedRegion { region, reason } => {
                write!(f, "malformed region '{}': {}", region, reason)
            }
            SliceError::Write(e) => write!(f, "failed to write output record: {}", e),
            SliceError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for SliceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SliceError::Write(e) => Some(e),
            SliceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SliceError {
    fn from(error: io::Error) -> Self {
        SliceError::Io(error)
    }
}
