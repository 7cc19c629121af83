//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test
//! file compiles as a separate crate and may only use a subset of these
//! helpers.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use wadex::WadArchive;

/// Creates a container file under `dir` with the given entries.
///
/// Entries are added in order to a fresh archive which is then saved, so
/// the resulting file has the canonical layout this crate writes.
pub fn create_wad(dir: &Path, file_name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let mut archive = WadArchive::create();
    for (name, data) in entries {
        archive
            .add(name, data.to_vec())
            .expect("failed to add test entry");
    }
    let path = dir.join(file_name);
    archive.save_as(&path).expect("failed to save test archive");
    path
}

/// Reads back every live entry of a container as (name, bytes) pairs.
pub fn read_wad_contents(path: &Path) -> Vec<(String, Vec<u8>)> {
    let archive = WadArchive::open(path).expect("failed to open archive");
    archive
        .entries()
        .map(|(index, entry)| {
            (
                entry.name().as_str().to_string(),
                archive.resolve(index).expect("failed to resolve entry"),
            )
        })
        .collect()
}

/// A small atlas with a unique color per pixel: (x, y) -> (x, y, x+y, 255).
pub fn test_atlas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([x as u8, y as u8, (x + y) as u8, 255])
    })
}

/// PNG-encodes an image for use as an entry payload.
pub fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("failed to encode test PNG");
    bytes
}

/// Builds frame-description bytes: canvas size, then one
/// (x, y, w, h, ox, oy) record per frame.
pub fn meta_bytes(canvas: (u32, u32), frames: &[(u32, u32, u32, u32, i32, i32)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&canvas.0.to_le_bytes());
    bytes.extend_from_slice(&canvas.1.to_le_bytes());
    bytes.extend_from_slice(&(frames.len() as u32).to_le_bytes());
    for &(x, y, w, h, ox, oy) in frames {
        bytes.extend_from_slice(&x.to_le_bytes());
        bytes.extend_from_slice(&y.to_le_bytes());
        bytes.extend_from_slice(&w.to_le_bytes());
        bytes.extend_from_slice(&h.to_le_bytes());
        bytes.extend_from_slice(&ox.to_le_bytes());
        bytes.extend_from_slice(&oy.to_le_bytes());
    }
    bytes
}
