//! # Economy Error Types
//!
//! Errors raised by the ambient paths of the economy: config parsing and
//! snapshot I/O. Rate resolution itself never fails.

use thiserror::Error;

/// Errors that can occur in the economy system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A resource category name that is not part of the closed enumeration.
    #[error("unknown resource category: {0}")]
    UnknownResourceCategory(String),

    /// Two regions in one config normalize to the same registry key.
    #[error("duplicate region name: {0}")]
    DuplicateRegion(String),

    /// Filesystem failure while reading or writing a snapshot.
    #[error("i/o failure: {0}")]
    Io(String),

    /// Snapshot bytes are truncated or structurally invalid.
    #[error("corrupt region snapshot: {0}")]
    CorruptSnapshot(String),

    /// A snapshot record failed its CRC32 check.
    #[error("snapshot checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch {
        /// CRC stored in the snapshot.
        expected: u32,
        /// CRC computed over the payload.
        actual: u32,
    },

    /// Snapshot written by a format version this build cannot read.
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

impl From<std::io::Error> for EconomyError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
