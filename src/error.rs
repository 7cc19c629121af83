//! Error types for WAD container operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when working with WAD containers and texture packs, along
//! with a convenient [`Result<T>`] type alias.
//!
//! All fallible operations in this crate return `Result<T, Error>` and fail
//! synchronously from the offending call; nothing is swallowed or deferred.
//! A failed mutation leaves the archive exactly as it was before the call.
//!
//! ```rust,no_run
//! use wadex::{Result, WadArchive};
//!
//! fn entry_bytes(path: &str, name: &str) -> Result<Vec<u8>> {
//!     let archive = WadArchive::open(path)?;
//!     archive.resolve_name(name)
//! }
//! ```
//!
//! For fine-grained handling, match on specific variants:
//!
//! ```rust,no_run
//! use wadex::{Error, WadArchive};
//!
//! match WadArchive::open("resources.wad") {
//!     Ok(archive) => println!("{} entries", archive.entry_count()),
//!     Err(Error::Io(e)) => eprintln!("cannot read file: {}", e),
//!     Err(Error::InvalidFormat(msg)) => eprintln!("not a WAD: {}", msg),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use std::io;

/// The main error type for WAD container and texture pack operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | File system operations |
/// | Container | [`InvalidFormat`][Self::InvalidFormat], [`CorruptEntry`][Self::CorruptEntry] | Damaged or foreign files |
/// | Naming | [`DuplicateName`][Self::DuplicateName], [`InvalidEntryName`][Self::InvalidEntryName], [`EntryNotFound`][Self::EntryNotFound] | Entry identity rules |
/// | Indexing | [`IndexOutOfRange`][Self::IndexOutOfRange], [`EntryRemoved`][Self::EntryRemoved] | Bad entry or frame indices |
/// | Preview | [`Decode`][Self::Decode], [`Parse`][Self::Parse] | Bitmap or frame-description bytes |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading or writing a file.
    ///
    /// Also raised when an original entry is resolved after the source
    /// file has been moved or deleted since the archive was opened.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The container structure is not recognized.
    ///
    /// Returned when the leading magic bytes are absent, the format
    /// version is unknown, or a directory record cannot be decoded.
    #[error("invalid WAD format: {0}")]
    InvalidFormat(String),

    /// A directory record points outside the file.
    ///
    /// The entry's declared byte range (`offset + size`) exceeds the
    /// length of the container it was read from, so its payload can never
    /// be resolved. The archive is refused at open time.
    #[error(
        "corrupt entry {index} ({name}): range {offset}+{size} exceeds file length {file_len}"
    )]
    CorruptEntry {
        /// Index of the offending directory record.
        index: usize,
        /// Entry name as stored in the directory.
        name: String,
        /// Declared payload offset.
        offset: u64,
        /// Declared payload size.
        size: u64,
        /// Actual length of the container file.
        file_len: u64,
    },

    /// An entry with this name already exists in the archive.
    ///
    /// Names are compared case-insensitively, so `Sprites/A.png` collides
    /// with `sprites/a.png`. Raised by [`add`](crate::WadArchive::add) and
    /// when a directory being parsed declares the same name twice.
    #[error("duplicate entry name: {name}")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },

    /// An entry or frame index is out of range.
    #[error("index {index} out of range (count {count})")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of valid slots at the time of the call.
        count: usize,
    },

    /// The slot at this index holds a removed entry.
    ///
    /// Removal tombstones a slot rather than shifting its successors, so
    /// a stale index names a dead entry instead of a neighbouring live
    /// one. Only [`save`](crate::WadArchive::save) reclaims the slots.
    #[error("entry {index} has been removed")]
    EntryRemoved {
        /// Arena index of the tombstoned slot.
        index: usize,
    },

    /// No entry with the given name exists in the archive.
    #[error("entry not found: {name}")]
    EntryNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// An entry name failed validation.
    ///
    /// See [`EntryName`](crate::EntryName) for the rules.
    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),

    /// Bitmap bytes could not be decoded, or an atlas is too small.
    ///
    /// Raised by [`extract_bitmap`](crate::WadArchive::extract_bitmap) on
    /// non-image payloads and by
    /// [`FrameCompositor::new`](crate::FrameCompositor::new) when a frame
    /// rectangle reaches past the atlas bounds.
    #[error("bitmap decode failed: {0}")]
    Decode(String),

    /// A frame-description resource is malformed.
    ///
    /// The byte offset locates the first record that could not be
    /// accepted.
    #[error("frame description parse failed at offset {offset}: {reason}")]
    Parse {
        /// Byte offset of the rejected data.
        offset: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl Error {
    /// Returns `true` if this error indicates damaged container or
    /// descriptor data (as opposed to caller mistakes or I/O failures).
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::InvalidFormat(_) | Error::CorruptEntry { .. } | Error::Parse { .. }
        )
    }

    /// Returns the entry index associated with this error, if any.
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            Error::CorruptEntry { index, .. } => Some(*index),
            Error::IndexOutOfRange { index, .. } => Some(*index),
            Error::EntryRemoved { index } => Some(*index),
            _ => None,
        }
    }

    /// Returns the entry name associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::CorruptEntry { name, .. } => Some(name.as_str()),
            Error::DuplicateName { name } => Some(name.as_str()),
            Error::EntryNotFound { name } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Creates a `CorruptEntry` error.
    pub(crate) fn corrupt_entry(
        index: usize,
        name: impl Into<String>,
        offset: u64,
        size: u64,
        file_len: u64,
    ) -> Self {
        Error::CorruptEntry {
            index,
            name: name.into(),
            offset,
            size,
            file_len,
        }
    }

    /// Creates a `Parse` error.
    pub(crate) fn parse(offset: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            offset,
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for WAD operations.
pub type Result<T> = std::result::Result<T, Error>;
