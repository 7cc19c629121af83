//! # wadex
//!
//! Reading, editing and texture-pack preview for WAD resource containers.
//!
//! A WAD container bundles named, variable-length resource entries behind
//! a single directory. This crate opens such containers, resolves entry
//! payloads lazily, edits them in place (add / replace / remove) and
//! rewrites the file safely on save. It also decodes the texture packs
//! found inside: an atlas bitmap plus a frame-description resource,
//! composited into per-frame bitmaps for preview or animation export.
//!
//! ## Quick Start
//!
//! ### Inspecting and extracting
//!
//! ```rust,no_run
//! use wadex::{Result, WadArchive};
//!
//! fn main() -> Result<()> {
//!     let archive = WadArchive::open("resources.wad")?;
//!
//!     for (index, entry) in archive.entries() {
//!         println!("{:3}  {:10}  {}", index, entry.size(), entry.name());
//!     }
//!
//!     let bytes = archive.resolve_name("music/credits.ogg")?;
//!     std::fs::write("credits.ogg", bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ### Editing
//!
//! ```rust,no_run
//! use wadex::{Result, WadArchive};
//!
//! fn main() -> Result<()> {
//!     let mut archive = WadArchive::open("resources.wad")?;
//!
//!     let index = archive.index_of("gfx/title.png").expect("entry exists");
//!     archive.replace(index, std::fs::read("new_title.png")?)?;
//!     archive.add("gfx/extra.png", std::fs::read("extra.png")?)?;
//!
//!     // Rewrites the container; original payloads are read out before
//!     // the file is touched, and the swap is atomic.
//!     archive.save()?;
//!     Ok(())
//! }
//! ```
//!
//! ### Previewing a texture pack
//!
//! ```rust,no_run
//! use wadex::{FrameCompositor, Result, TexturePack, WadArchive, atlas_name_for};
//!
//! fn main() -> Result<()> {
//!     let archive = WadArchive::open("resources.wad")?;
//!
//!     let meta_index = archive.index_of("sprites/walk.meta").expect("meta entry");
//!     let pack = TexturePack::parse(&archive.resolve(meta_index)?)?;
//!
//!     let meta_name = archive.entry(meta_index)?.name().clone();
//!     let atlas_name = atlas_name_for(&meta_name)?;
//!     let atlas_index = archive.index_of(atlas_name.as_str()).expect("paired atlas");
//!
//!     let compositor = FrameCompositor::new(archive.extract_bitmap(atlas_index)?, pack)?;
//!     let frame = compositor.render_frame(0, 2, image::Rgba([64, 64, 64, 255]))?;
//!     frame.save("frame0.png").expect("write preview");
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! All operations are synchronous and may block on file I/O. One archive
//! has one writer at a time; callers needing responsiveness run calls on
//! a worker and keep mutations serialized. Every buffer and bitmap handed
//! out is an owned, independent copy.

#![warn(missing_docs)]

pub mod error;
pub mod format;
mod entry_name;
mod preview;
mod store;
mod texture;

pub use entry_name::EntryName;
pub use error::{Error, Result};
pub use preview::{PreviewKind, atlas_name_for};
pub use store::{Column, EntrySource, RowChange, RowModel, WadArchive, WadEntry, human_size};
pub use texture::{DEFAULT_FRAME_DURATION, Frame, FrameCompositor, TexturePack};

// Re-export the image types that appear in the public API.
pub use image::{Rgba, RgbaImage};
