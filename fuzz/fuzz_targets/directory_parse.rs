//! Fuzz target for Directory::from_bytes with arbitrary byte input.
//!
//! This target exercises the container directory parser with potentially
//! malformed or adversarial input. The goal is to find panics, hangs, or
//! runaway allocations in the parsing logic.
//!
//! Run with: cargo +nightly fuzz run directory_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use wadex::format::directory::Directory;

fuzz_target!(|data: &[u8]| {
    // We don't care about the result - we're looking for panics or hangs
    let _ = Directory::from_bytes(data);

    // If parsing succeeded, every record must respect the declared length
    if let Ok(directory) = Directory::from_bytes(data) {
        for record in directory.records() {
            let end = record.offset.checked_add(record.size);
            assert!(
                end.is_some() && end.unwrap() <= data.len() as u64,
                "record range escapes the file: {:?}",
                record
            );
        }
    }
});
