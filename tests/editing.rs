//! Integration tests for archive editing operations.
//!
//! These tests verify that the editing API correctly:
//! - swaps entry content on replace while preserving names
//! - tombstones removed entries without disturbing other indices
//! - tracks the aggregate modified flag across the edit/save cycle
//! - compacts the arena only at save time
//! - fails cleanly without mutating state

mod common;

use std::fs;

use wadex::{Error, WadArchive};

#[test]
fn test_replace_fidelity() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_wad(
        dir.path(),
        "replace.wad",
        &[("target.bin", b"old content"), ("bystander.txt", b"asis")],
    );

    let mut archive = WadArchive::open(&path).unwrap();
    let new_bytes = vec![0x5Au8; 777];
    archive.replace(0, new_bytes.clone()).unwrap();

    // Extraction returns exactly the replacement bytes, before any save.
    assert_eq!(archive.extract(0).unwrap(), new_bytes);
    // Name survives the swap.
    assert_eq!(archive.entry(0).unwrap().name().as_str(), "target.bin");
    // The neighbour still reads from disk.
    assert_eq!(archive.extract(1).unwrap(), b"asis");
}

#[test]
fn test_modified_flag_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_wad(dir.path(), "flag.wad", &[("a.txt", b"a")]);

    let mut archive = WadArchive::open(&path).unwrap();
    assert!(!archive.is_modified());

    archive.replace(0, b"b".to_vec()).unwrap();
    assert!(archive.is_modified());

    archive.save().unwrap();
    assert!(!archive.is_modified());

    archive.remove(0).unwrap();
    assert!(archive.is_modified());
}

#[test]
fn test_failed_mutations_leave_state_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_wad(dir.path(), "atomic.wad", &[("a.txt", b"a")]);

    let mut archive = WadArchive::open(&path).unwrap();

    assert!(matches!(
        archive.add("A.TXT", Vec::new()),
        Err(Error::DuplicateName { .. })
    ));
    assert!(matches!(
        archive.replace(5, Vec::new()),
        Err(Error::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        archive.remove(5),
        Err(Error::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        archive.add("bad//name", Vec::new()),
        Err(Error::InvalidEntryName(_))
    ));

    // Nothing above may have dirtied the archive.
    assert!(!archive.is_modified());
    assert_eq!(archive.entry_count(), 1);
    assert_eq!(archive.extract(0).unwrap(), b"a");
}

#[test]
fn test_tombstone_keeps_indices_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_wad(
        dir.path(),
        "stable.wad",
        &[("zero.txt", b"0"), ("one.txt", b"1"), ("two.txt", b"2")],
    );

    let mut archive = WadArchive::open(&path).unwrap();
    archive.remove(1).unwrap();

    // Indices held before the removal still name the same entries.
    assert_eq!(archive.extract(0).unwrap(), b"0");
    assert_eq!(archive.extract(2).unwrap(), b"2");
    assert!(matches!(
        archive.extract(1),
        Err(Error::EntryRemoved { index: 1 })
    ));

    // Removing the same slot twice is an error, not a no-op.
    assert!(matches!(
        archive.remove(1),
        Err(Error::EntryRemoved { index: 1 })
    ));
    assert!(matches!(
        archive.replace(1, Vec::new()),
        Err(Error::EntryRemoved { index: 1 })
    ));

    // The removed name is gone from lookup.
    assert_eq!(archive.index_of("one.txt"), None);
}

#[test]
fn test_save_compacts_tombstones() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_wad(
        dir.path(),
        "compact.wad",
        &[("zero.txt", b"0"), ("one.txt", b"1"), ("two.txt", b"2")],
    );

    let mut archive = WadArchive::open(&path).unwrap();
    archive.remove(1).unwrap();
    assert_eq!(archive.slot_count(), 3);

    archive.save().unwrap();
    // After the save the arena is dense again.
    assert_eq!(archive.slot_count(), 2);
    assert_eq!(archive.entry_count(), 2);
    assert_eq!(archive.entry(0).unwrap().name().as_str(), "zero.txt");
    assert_eq!(archive.entry(1).unwrap().name().as_str(), "two.txt");

    // And the file on disk agrees.
    let contents = common::read_wad_contents(&path);
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0].0, "zero.txt");
    assert_eq!(contents[1].0, "two.txt");
}

#[test]
fn test_resolve_fails_after_source_vanishes() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_wad(dir.path(), "vanish.wad", &[("a.txt", b"bytes")]);

    let mut archive = WadArchive::open(&path).unwrap();
    // An in-memory entry stays resolvable; the original one must fail.
    archive.add("mem.txt", b"held".to_vec()).unwrap();

    fs::remove_file(&path).unwrap();

    assert!(matches!(archive.resolve(0), Err(Error::Io(_))));
    assert_eq!(archive.resolve(1).unwrap(), b"held");
}

#[test]
fn test_case_insensitive_lookup_and_replace() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_wad(
        dir.path(),
        "case.wad",
        &[("Sprites/Player.PNG", b"sprite")],
    );

    let archive = WadArchive::open(&path).unwrap();
    assert_eq!(archive.index_of("sprites/player.png"), Some(0));
    assert_eq!(
        archive.entry_by_name("SPRITES/PLAYER.png").unwrap().size(),
        6
    );
    assert_eq!(archive.resolve_name("sprites/PLAYER.png").unwrap(), b"sprite");
}

#[test]
fn test_extract_to_path_creates_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_wad(dir.path(), "extract.wad", &[("deep/tree/a.txt", b"x")]);

    let archive = WadArchive::open(&path).unwrap();
    let dest = dir.path().join("out").join("deep").join("a.txt");
    archive.extract_to_path(0, &dest).unwrap();
    assert_eq!(fs::read(&dest).unwrap(), b"x");
}
