//! Fuzz target for EntryName::new with arbitrary string input.
//!
//! This target exercises the name validation logic with potentially
//! malformed or adversarial strings. The goal is to find panics or logic
//! errors in normalization and the security checks.
//!
//! Run with: cargo +nightly fuzz run entry_name
//!
//! Key security properties being tested:
//! - Path traversal rejection (../)
//! - Absolute path rejection
//! - NUL byte handling
//! - Separator normalization edge cases

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Try to interpret bytes as UTF-8 string
    if let Ok(name_str) = std::str::from_utf8(data) {
        let result = wadex::EntryName::new(name_str);

        // If creation succeeded, verify security invariants
        if let Ok(name) = result {
            let normalized = name.as_str();

            assert!(
                !normalized.split('/').any(|s| s == ".." || s == "."),
                "traversal segment in accepted name: {:?}",
                normalized
            );
            assert!(
                !normalized.starts_with('/'),
                "absolute name accepted: {:?}",
                normalized
            );
            assert!(
                !normalized.contains('\0'),
                "NUL byte in accepted name: {:?}",
                normalized
            );
            assert!(
                !normalized.contains('\\'),
                "unnormalized separator in accepted name: {:?}",
                normalized
            );
        }
    }
});
