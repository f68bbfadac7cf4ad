//! Error types for the tar-index library.
//!
//! All fallible operations return a [`Result<T>`], an alias for
//! `Result<T, Error>`.
//!
//! # Error Categories
//!
//! - **Opening archives**: [`NotFound`], [`Io`]
//! - **Scanning archives**: [`Scan`], [`UnsupportedLayout`]
//! - **Opening members**: [`NoSuchMember`], [`RangeOutOfBounds`]
//!
//! Reaching the end of a member while reading is not an error; readers simply
//! return `Ok(0)`.
//!
//! [`NotFound`]: Error::NotFound
//! [`Io`]: Error::Io
//! [`Scan`]: Error::Scan
//! [`UnsupportedLayout`]: Error::UnsupportedLayout
//! [`NoSuchMember`]: Error::NoSuchMember
//! [`RangeOutOfBounds`]: Error::RangeOutOfBounds

use std::path::PathBuf;

/// Result type alias for operations that may return an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for indexing and reading tar archives.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while opening, duplicating, seeking, stat'ing or reading a
    /// file descriptor.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive path does not exist.
    #[error("tar file {path:?} not found: {source}")]
    NotFound {
        /// Path that was asked for.
        path: PathBuf,
        /// Error from opening the path.
        source: std::io::Error,
    },

    /// The archive is malformed at the tar format level, such as a header
    /// with a bad checksum, or its member contents could not be drained.
    #[error("tar file {archive:?}: malformed archive: {source}")]
    Scan {
        /// Name of the archive being scanned.
        archive: PathBuf,
        /// Error reported by the tar parser.
        source: std::io::Error,
    },

    /// A member's contents are not stored as one contiguous byte range,
    /// as is the case for sparse files with holes.
    #[error("tar file {archive:?}: unsupported sparse file {member:?}")]
    UnsupportedLayout {
        /// Name of the archive being scanned.
        archive: PathBuf,
        /// Name of the offending member.
        member: String,
    },

    /// The index has no member with the requested name.
    #[error("tar file {archive:?}: no such element {name:?}")]
    NoSuchMember {
        /// Name of the indexed archive.
        archive: PathBuf,
        /// Member name that was asked for.
        name: String,
    },

    /// A range reader was asked to start at or beyond the end of the file.
    #[error("cannot seek beyond end of file: offset {offset}")]
    RangeOutOfBounds {
        /// Requested start offset.
        offset: u64,
    },
}
