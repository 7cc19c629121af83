//! The archive directory: parsing and serialization of entry records.
//!
//! The directory is the index at the front of a WAD container. Parsing is
//! eager and validating; payload bytes are never touched here. Serialization
//! recomputes every offset from scratch, so a directory written after edits
//! is always internally consistent regardless of how entries moved.

use std::collections::HashSet;
use std::io::{self, Read, Write};

use crate::format::reader::{
    read_bytes, read_u16_le, read_u32_le, read_u64_le, write_u16_le, write_u32_le, write_u64_le,
};
use crate::format::{HEADER_SIZE, MAGIC, RECORD_FIXED_SIZE, VERSION};
use crate::{EntryName, Error, Result};

/// One directory record: where an entry's payload lives in the container.
#[derive(Debug, Clone)]
pub struct DirectoryRecord {
    /// Entry name.
    pub name: EntryName,
    /// Absolute payload offset in the container file.
    pub offset: u64,
    /// Payload size in bytes.
    pub size: u64,
}

/// A parsed WAD directory: the ordered list of entry records.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    records: Vec<DirectoryRecord>,
}

/// Maps a mid-directory EOF to a format error instead of a bare I/O error;
/// a directory that ends early is a malformed container, not a read failure.
fn truncated(e: io::Error, what: &str) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::InvalidFormat(format!("truncated directory ({})", what))
    } else {
        Error::Io(e)
    }
}

impl Directory {
    /// Parses a directory from the front of a container.
    ///
    /// `file_len` is the total length of the container file; every record's
    /// declared range is validated against it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFormat`] — missing magic, unknown version,
    ///   truncated or undecodable records, implausible entry count.
    /// - [`Error::CorruptEntry`] — a record's `offset + size` exceeds
    ///   `file_len`.
    /// - [`Error::DuplicateName`] — two records collide case-insensitively.
    pub fn parse<R: Read>(r: &mut R, file_len: u64) -> Result<Self> {
        let magic = read_bytes(r, MAGIC.len()).map_err(|e| truncated(e, "magic"))?;
        if magic != MAGIC {
            return Err(Error::InvalidFormat(format!(
                "bad magic {:02x?}, expected {:02x?}",
                magic, MAGIC
            )));
        }

        let version = read_u16_le(r).map_err(|e| truncated(e, "version"))?;
        if version != VERSION {
            return Err(Error::InvalidFormat(format!(
                "unsupported version {}",
                version
            )));
        }

        let count = read_u32_le(r).map_err(|e| truncated(e, "entry count"))? as u64;
        // Smallest possible record is the fixed part plus a one-byte name.
        if count * (RECORD_FIXED_SIZE + 1) > file_len.saturating_sub(HEADER_SIZE) {
            return Err(Error::InvalidFormat(format!(
                "entry count {} cannot fit in a {}-byte file",
                count, file_len
            )));
        }

        let mut records = Vec::with_capacity(count as usize);
        let mut seen: HashSet<EntryName> = HashSet::with_capacity(count as usize);

        for index in 0..count as usize {
            let name_len = read_u16_le(r).map_err(|e| truncated(e, "name length"))? as usize;
            let name_bytes = read_bytes(r, name_len).map_err(|e| truncated(e, "name"))?;
            let name_str = std::str::from_utf8(&name_bytes).map_err(|_| {
                Error::InvalidFormat(format!("entry {} name is not valid UTF-8", index))
            })?;
            let name = EntryName::new(name_str)
                .map_err(|e| Error::InvalidFormat(format!("entry {}: {}", index, e)))?;

            let offset = read_u64_le(r).map_err(|e| truncated(e, "offset"))?;
            let size = read_u64_le(r).map_err(|e| truncated(e, "size"))?;

            if offset.checked_add(size).is_none_or(|end| end > file_len) {
                return Err(Error::corrupt_entry(
                    index,
                    name.as_str(),
                    offset,
                    size,
                    file_len,
                ));
            }

            if !seen.insert(name.clone()) {
                return Err(Error::DuplicateName {
                    name: name.as_str().to_string(),
                });
            }

            records.push(DirectoryRecord { name, offset, size });
        }

        log::debug!("parsed directory: {} entries", records.len());
        Ok(Self { records })
    }

    /// Parses a directory from an in-memory container image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = io::Cursor::new(bytes);
        Self::parse(&mut cursor, bytes.len() as u64)
    }

    /// Returns the ordered records.
    pub fn records(&self) -> &[DirectoryRecord] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the directory holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds a record index by name, case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name.matches(name))
    }

    /// Size in bytes of the serialized header plus records for `names`.
    fn directory_size(names: &[&EntryName]) -> u64 {
        HEADER_SIZE
            + names
                .iter()
                .map(|n| RECORD_FIXED_SIZE + n.as_str().len() as u64)
                .sum::<u64>()
    }

    /// Serializes a complete container: directory followed by payloads.
    ///
    /// `provider` is called once per entry, in order, and must return that
    /// entry's payload bytes; all payloads are collected before the first
    /// byte is written. Offsets are recomputed from scratch. Returns the
    /// directory that was written, so callers can rebind entries to their
    /// new on-disk ranges.
    pub fn serialize<W, F>(names: &[&EntryName], mut provider: F, w: &mut W) -> Result<Self>
    where
        W: Write,
        F: FnMut(usize) -> Result<Vec<u8>>,
    {
        // Resolve every payload up front. When the destination is the file
        // the payloads are lazily read from, this is what keeps the data
        // intact: nothing may be overwritten until everything is in memory.
        let mut payloads = Vec::with_capacity(names.len());
        for index in 0..names.len() {
            payloads.push(provider(index)?);
        }

        let mut offset = Self::directory_size(names);
        let mut records = Vec::with_capacity(names.len());
        for (name, payload) in names.iter().zip(&payloads) {
            records.push(DirectoryRecord {
                name: (*name).clone(),
                offset,
                size: payload.len() as u64,
            });
            offset += payload.len() as u64;
        }

        w.write_all(MAGIC)?;
        write_u16_le(w, VERSION)?;
        write_u32_le(w, records.len() as u32)?;
        for record in &records {
            let name_bytes = record.name.as_str().as_bytes();
            write_u16_le(w, name_bytes.len() as u16)?;
            w.write_all(name_bytes)?;
            write_u64_le(w, record.offset)?;
            write_u64_le(w, record.size)?;
        }
        for payload in &payloads {
            w.write_all(payload)?;
        }

        log::debug!(
            "serialized directory: {} entries, {} bytes total",
            records.len(),
            offset
        );
        Ok(Self { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_container() -> Vec<u8> {
        let names = [
            EntryName::new("a.png").unwrap(),
            EntryName::new("a.meta").unwrap(),
        ];
        let name_refs: Vec<&EntryName> = names.iter().collect();
        let payloads: [&[u8]; 2] = [&[1u8; 100], &[2u8; 40]];

        let mut out = Vec::new();
        Directory::serialize(&name_refs, |i| Ok(payloads[i].to_vec()), &mut out).unwrap();
        out
    }

    #[test]
    fn test_serialize_then_parse() {
        let bytes = sample_container();
        let dir = Directory::from_bytes(&bytes).unwrap();

        assert_eq!(dir.len(), 2);
        assert_eq!(dir.records()[0].name.as_str(), "a.png");
        assert_eq!(dir.records()[0].size, 100);
        assert_eq!(dir.records()[1].name.as_str(), "a.meta");
        assert_eq!(dir.records()[1].size, 40);

        // Payloads are laid out back to back after the directory.
        let first = &dir.records()[0];
        assert_eq!(
            &bytes[first.offset as usize..(first.offset + first.size) as usize],
            &[1u8; 100]
        );
        let second = &dir.records()[1];
        assert_eq!(second.offset, first.offset + first.size);
    }

    #[test]
    fn test_index_of_is_case_insensitive() {
        let bytes = sample_container();
        let dir = Directory::from_bytes(&bytes).unwrap();
        assert_eq!(dir.index_of("A.PNG"), Some(0));
        assert_eq!(dir.index_of("a.meta"), Some(1));
        assert_eq!(dir.index_of("missing"), None);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = sample_container();
        bytes[0] = b'Z';
        let err = Directory::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_unknown_version() {
        let mut bytes = sample_container();
        bytes[4] = 0xFF;
        let err = Directory::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_range_beyond_file_is_corrupt_entry() {
        let bytes = sample_container();
        // Shorter declared file length puts the last payload out of bounds.
        let mut cursor = io::Cursor::new(&bytes);
        let err = Directory::parse(&mut cursor, bytes.len() as u64 - 1).unwrap_err();
        match err {
            Error::CorruptEntry { index, name, .. } => {
                assert_eq!(index, 1);
                assert_eq!(name, "a.meta");
            }
            e => panic!("expected CorruptEntry, got {:?}", e),
        }
    }

    #[test]
    fn test_truncated_directory() {
        let bytes = sample_container();
        let err = Directory::from_bytes(&bytes[..HEADER_SIZE as usize + 4]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let names = [
            EntryName::new("dup.txt").unwrap(),
            EntryName::new("DUP.TXT").unwrap(),
        ];
        let name_refs: Vec<&EntryName> = names.iter().collect();
        let mut out = Vec::new();
        // serialize doesn't enforce uniqueness (the store does); build the
        // colliding container anyway and check the parser rejects it.
        Directory::serialize(&name_refs, |_| Ok(vec![0u8; 4]), &mut out).unwrap();

        let err = Directory::from_bytes(&out).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { .. }));
    }

    #[test]
    fn test_implausible_entry_count() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = Directory::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_empty_directory() {
        let mut out = Vec::new();
        Directory::serialize(&[], |_| unreachable!(), &mut out).unwrap();
        assert_eq!(out.len(), HEADER_SIZE as usize);

        let dir = Directory::from_bytes(&out).unwrap();
        assert!(dir.is_empty());
    }
}
