//! The archive store: open, resolve, edit, save.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tempfile::NamedTempFile;

use crate::format::directory::Directory;
use crate::store::entry::{EntrySource, WadEntry};
use crate::store::rows::{Column, RowChange, RowModel, human_size};
use crate::{EntryName, Error, Result};

/// A single opened WAD container and its in-session edit state.
///
/// The directory is read eagerly at [`open`](Self::open); payload bytes
/// stay on disk until [`resolve`](Self::resolve) asks for them. Edits
/// (add / replace / remove) live in memory until a save rewrites the
/// container. Entries sit in an append-only arena: removal tombstones a
/// slot instead of shifting its successors, so indices held by a caller
/// stay valid for the whole session. Only a save compacts the arena.
///
/// # Examples
///
/// ```rust,no_run
/// use wadex::{Result, WadArchive};
///
/// fn retint(path: &str, sprite: &[u8]) -> Result<()> {
///     let mut archive = WadArchive::open(path)?;
///     let index = archive
///         .index_of("sprites/player.png")
///         .expect("entry exists");
///     archive.replace(index, sprite.to_vec())?;
///     archive.save()
/// }
/// ```
pub struct WadArchive {
    /// Source file, unset for a freshly created archive.
    path: Option<PathBuf>,
    /// Append-only arena; tombstones stay in place until save.
    entries: Vec<WadEntry>,
    modified: bool,
    row_listener: Option<Box<dyn FnMut(RowChange) + Send>>,
}

impl fmt::Debug for WadArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WadArchive")
            .field("path", &self.path)
            .field("slots", &self.entries.len())
            .field("live", &self.entry_count())
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

impl WadArchive {
    /// Opens a container file, reading its directory eagerly.
    ///
    /// Payload bytes are not read here; they are resolved on demand from
    /// the file at `path`, which therefore must stay in place for the
    /// lifetime of the archive.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file cannot be read, plus everything
    /// [`Directory::parse`] rejects: [`Error::InvalidFormat`],
    /// [`Error::CorruptEntry`], [`Error::DuplicateName`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let directory = Directory::parse(&mut reader, file_len)?;

        let entries = directory
            .records()
            .iter()
            .map(|r| {
                WadEntry::new(
                    r.name.clone(),
                    EntrySource::Original {
                        offset: r.offset,
                        size: r.size,
                    },
                )
            })
            .collect::<Vec<_>>();

        log::debug!("opened {}: {} entries", path.display(), entries.len());
        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
            modified: false,
            row_listener: None,
        })
    }

    /// Creates an empty archive with no source file.
    ///
    /// The archive has no path until the first [`save_as`](Self::save_as);
    /// a plain [`save`](Self::save) on it fails.
    pub fn create() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
            modified: false,
            row_listener: None,
        }
    }

    /// The archive's source file, if it has ever been bound to one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// `true` when any entry differs from the last opened/saved state.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Number of live (non-removed) entries.
    pub fn entry_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_removed()).count()
    }

    /// Number of arena slots, tombstones included.
    ///
    /// This is the exclusive upper bound for entry indices.
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the entry at an arena index.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] past the arena,
    /// [`Error::EntryRemoved`] for a tombstoned slot.
    pub fn entry(&self, index: usize) -> Result<&WadEntry> {
        let entry = self.entries.get(index).ok_or(Error::IndexOutOfRange {
            index,
            count: self.entries.len(),
        })?;
        if entry.is_removed() {
            return Err(Error::EntryRemoved { index });
        }
        Ok(entry)
    }

    /// Iterates live entries with their arena indices, in arena order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &WadEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_removed())
    }

    /// Finds a live entry's arena index by name, case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries()
            .find(|(_, e)| e.name().matches(name))
            .map(|(i, _)| i)
    }

    /// Finds a live entry by name, case-insensitively.
    pub fn entry_by_name(&self, name: &str) -> Option<&WadEntry> {
        self.entries()
            .find(|(_, e)| e.name().matches(name))
            .map(|(_, e)| e)
    }

    /// Resolves an entry's payload bytes.
    ///
    /// Original entries are read from the source file by re-opening it,
    /// so a file that has been moved or deleted since [`open`](Self::open)
    /// surfaces as [`Error::Io`] here. Added/replaced entries return a
    /// copy of their in-memory buffer. The returned vector is always an
    /// independent copy the caller owns outright.
    pub fn resolve(&self, index: usize) -> Result<Vec<u8>> {
        let entry = self.entry(index)?;
        match entry.source() {
            EntrySource::Memory(data) => Ok(data.clone()),
            EntrySource::Original { offset, size } => self.read_original(*offset, *size),
        }
    }

    /// Resolves an entry's payload bytes by name.
    ///
    /// # Errors
    ///
    /// [`Error::EntryNotFound`] when no live entry matches, otherwise as
    /// [`resolve`](Self::resolve).
    pub fn resolve_name(&self, name: &str) -> Result<Vec<u8>> {
        let index = self.index_of(name).ok_or_else(|| Error::EntryNotFound {
            name: name.to_string(),
        })?;
        self.resolve(index)
    }

    fn read_original(&self, offset: u64, size: u64) -> Result<Vec<u8>> {
        let path = self.path.as_ref().ok_or_else(|| {
            // Original sources only exist after open(), which binds a path;
            // fail cleanly rather than panic if that invariant ever breaks.
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "archive has no source file",
            ))
        })?;
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; size as usize];
        file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Appends a new entry with an in-memory payload.
    ///
    /// Returns the new entry's arena index and emits
    /// [`RowChange::Appended`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEntryName`] for a bad name,
    /// [`Error::DuplicateName`] when a live entry already has it.
    pub fn add(&mut self, name: &str, data: Vec<u8>) -> Result<usize> {
        let name = EntryName::new(name)?;
        if self.index_of(name.as_str()).is_some() {
            return Err(Error::DuplicateName {
                name: name.as_str().to_string(),
            });
        }

        self.entries
            .push(WadEntry::new(name, EntrySource::Memory(data)));
        self.modified = true;
        let row = self.entry_count() - 1;
        self.emit(RowChange::Appended { row });
        Ok(self.entries.len() - 1)
    }

    /// Swaps an entry's payload for an in-memory buffer, keeping its name.
    ///
    /// Emits [`RowChange::Changed`].
    pub fn replace(&mut self, index: usize, data: Vec<u8>) -> Result<()> {
        self.entry(index)?;
        let row = self.row_of(index);
        self.entries[index].set_source(EntrySource::Memory(data));
        self.modified = true;
        self.emit(RowChange::Changed { row });
        Ok(())
    }

    /// Tombstones an entry.
    ///
    /// The slot is kept so other indices stay stable; the entry vanishes
    /// from enumeration and from save output. Emits
    /// [`RowChange::Removed`].
    pub fn remove(&mut self, index: usize) -> Result<()> {
        self.entry(index)?;
        let row = self.row_of(index);
        self.entries[index].mark_removed();
        self.modified = true;
        self.emit(RowChange::Removed { row });
        Ok(())
    }

    /// Live position of a validated live arena index.
    fn row_of(&self, index: usize) -> usize {
        self.entries[..index]
            .iter()
            .filter(|e| !e.is_removed())
            .count()
    }

    fn emit(&mut self, change: RowChange) {
        log::trace!("row change: {:?}", change);
        if let Some(listener) = &mut self.row_listener {
            listener(change);
        }
    }

    /// Registers a listener for [`RowChange`] events.
    ///
    /// At most one listener is held; a new registration replaces the old.
    pub fn set_row_listener(&mut self, listener: impl FnMut(RowChange) + Send + 'static) {
        self.row_listener = Some(Box::new(listener));
    }

    /// Drops the registered [`RowChange`] listener, if any.
    pub fn clear_row_listener(&mut self) {
        self.row_listener = None;
    }

    /// Rewrites the archive's own file.
    ///
    /// # Errors
    ///
    /// Fails with a `NotFound` [`Error::Io`] when the archive has never
    /// been bound to a path; use [`save_as`](Self::save_as) first.
    pub fn save(&mut self) -> Result<()> {
        let dest = self.path.clone().ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "archive has no file path, use save_as",
            ))
        })?;
        self.save_to(&dest)
    }

    /// Writes the archive to `path` and rebinds it there.
    ///
    /// The previous source file (if any) is left untouched.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.save_to(path.as_ref())
    }

    /// Serializes live entries and atomically replaces `dest`.
    ///
    /// The complete output image is assembled in memory first — every
    /// lazily-read payload is resolved before the destination is touched —
    /// and then written to a temporary file beside `dest` that is renamed
    /// over it. Overwriting the file the payloads come from is therefore
    /// safe, and a failed save leaves `dest` byte-identical.
    ///
    /// On success the arena is compacted: tombstones disappear and the
    /// surviving entries are rebound to their on-disk ranges in the new
    /// file. Outstanding arena indices from before the save are invalid
    /// afterwards.
    fn save_to(&mut self, dest: &Path) -> Result<()> {
        let live: Vec<usize> = self.entries().map(|(i, _)| i).collect();
        let names: Vec<&EntryName> = live.iter().map(|&i| self.entries[i].name()).collect();

        let mut image = Vec::new();
        let directory = Directory::serialize(&names, |pos| self.resolve(live[pos]), &mut image)?;

        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(&image)?;
        temp.flush()?;
        temp.persist(dest).map_err(|e| Error::Io(e.error))?;

        self.entries = directory
            .records()
            .iter()
            .map(|r| {
                WadEntry::new(
                    r.name.clone(),
                    EntrySource::Original {
                        offset: r.offset,
                        size: r.size,
                    },
                )
            })
            .collect();
        self.path = Some(dest.to_path_buf());
        self.modified = false;

        log::debug!(
            "saved {}: {} entries, {} bytes",
            dest.display(),
            self.entries.len(),
            image.len()
        );
        Ok(())
    }

    /// Extracts an entry's payload bytes.
    ///
    /// Alias for [`resolve`](Self::resolve), named for the shell boundary.
    pub fn extract(&self, index: usize) -> Result<Vec<u8>> {
        self.resolve(index)
    }

    /// Extracts an entry's payload to a file, creating parent directories.
    pub fn extract_to_path(&self, index: usize, dest: impl AsRef<Path>) -> Result<()> {
        let bytes = self.resolve(index)?;
        let dest = dest.as_ref();
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(dest, bytes)?;
        Ok(())
    }

    /// Extracts an entry and decodes it as an RGBA bitmap.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] when the payload is not a decodable image.
    pub fn extract_bitmap(&self, index: usize) -> Result<RgbaImage> {
        let bytes = self.resolve(index)?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| Error::Decode(e.to_string()))?;
        Ok(decoded.to_rgba8())
    }
}

impl Default for WadArchive {
    fn default() -> Self {
        Self::create()
    }
}

impl RowModel for WadArchive {
    fn row_count(&self) -> usize {
        self.entry_count()
    }

    fn row_value(&self, row: usize, column: Column) -> Option<String> {
        let (_, entry) = self.entries().nth(row)?;
        Some(match column {
            Column::Name => entry.name().to_string(),
            Column::Size => human_size(entry.size()),
        })
    }
}
