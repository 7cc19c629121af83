//! Archive store: one opened container and its edit state.
//!
//! [`WadArchive`] owns the directory of an opened WAD file, resolves entry
//! payloads lazily, and carries in-session modifications (added, replaced
//! and removed entries) until they are flushed by a save.

mod archive;
mod entry;
mod rows;

pub use archive::WadArchive;
pub use entry::{EntrySource, WadEntry};
pub use rows::{Column, RowChange, RowModel, human_size};
