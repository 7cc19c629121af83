//! Command implementations for the CLI tool.

use std::fs;
use std::path::Path;

use wadex::{
    Column, EntryName, FrameCompositor, PreviewKind, Rgba, RowModel, TexturePack, WadArchive,
    atlas_name_for, human_size,
};

use crate::exit_codes::{ExitCode, error_to_exit_code};

fn open_archive(path: &Path) -> Result<WadArchive, ExitCode> {
    WadArchive::open(path).map_err(|e| {
        eprintln!("Error: {}", e);
        error_to_exit_code(&e)
    })
}

fn find_entry(archive: &WadArchive, entry: &str) -> Result<usize, ExitCode> {
    archive.index_of(entry).ok_or_else(|| {
        eprintln!("Error: entry not found: {}", entry);
        ExitCode::BadArgs
    })
}

/// List command implementation
pub fn list(archive_path: &Path) -> ExitCode {
    let archive = match open_archive(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    for row in 0..archive.row_count() {
        let name = archive.row_value(row, Column::Name).unwrap_or_default();
        let size = archive.row_value(row, Column::Size).unwrap_or_default();
        println!("{:>10}  {}", size, name);
    }
    ExitCode::Success
}

/// Info command implementation
pub fn info(archive_path: &Path) -> ExitCode {
    let archive = match open_archive(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let total: u64 = archive.entries().map(|(_, e)| e.size()).sum();
    let packs = archive
        .entries()
        .filter(|(_, e)| PreviewKind::for_name(e.name()) == PreviewKind::TexturePack)
        .count();

    println!("Archive: {}", archive_path.display());
    println!("Entries: {}", archive.entry_count());
    println!("Payload: {}", human_size(total));
    println!("Texture packs: {}", packs);
    ExitCode::Success
}

/// Extract command implementation
pub fn extract(
    archive_path: &Path,
    entry: &str,
    output: Option<&Path>,
    quiet: bool,
) -> ExitCode {
    let archive = match open_archive(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let index = match find_entry(&archive, entry) {
        Ok(i) => i,
        Err(code) => return code,
    };

    let default_name = match archive.entry(index) {
        Ok(e) => e.name().file_name().to_string(),
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };
    let dest = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_name.into());

    if let Err(e) = archive.extract_to_path(index, &dest) {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }
    if !quiet {
        println!("Extracted {} to {}", entry, dest.display());
    }
    ExitCode::Success
}

/// Add command implementation
pub fn add(archive_path: &Path, name: &str, file: &Path, quiet: bool) -> ExitCode {
    let mut archive = match open_archive(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data = match fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", file.display(), e);
            return ExitCode::IoError;
        }
    };

    if let Err(e) = archive.add(name, data).and_then(|_| archive.save()) {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }
    if !quiet {
        println!("Added {}", name);
    }
    ExitCode::Success
}

/// Replace command implementation
pub fn replace(archive_path: &Path, entry: &str, file: &Path, quiet: bool) -> ExitCode {
    let mut archive = match open_archive(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let index = match find_entry(&archive, entry) {
        Ok(i) => i,
        Err(code) => return code,
    };

    let data = match fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", file.display(), e);
            return ExitCode::IoError;
        }
    };

    if let Err(e) = archive.replace(index, data).and_then(|_| archive.save()) {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }
    if !quiet {
        println!("Replaced {}", entry);
    }
    ExitCode::Success
}

/// Remove command implementation
pub fn remove(archive_path: &Path, entry: &str, quiet: bool) -> ExitCode {
    let mut archive = match open_archive(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let index = match find_entry(&archive, entry) {
        Ok(i) => i,
        Err(code) => return code,
    };

    if let Err(e) = archive.remove(index).and_then(|_| archive.save()) {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }
    if !quiet {
        println!("Removed {}", entry);
    }
    ExitCode::Success
}

/// Frames command implementation
pub fn frames(
    archive_path: &Path,
    entry: &str,
    output: &Path,
    zoom: u32,
    background: &str,
    quiet: bool,
) -> ExitCode {
    let background = match parse_color(background) {
        Some(c) => c,
        None => {
            eprintln!("Error: background must be RRGGBB hex, got {:?}", background);
            return ExitCode::BadArgs;
        }
    };

    let archive = match open_archive(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let meta_index = match find_entry(&archive, entry) {
        Ok(i) => i,
        Err(code) => return code,
    };

    let result = (|| -> wadex::Result<usize> {
        let pack = TexturePack::parse(&archive.resolve(meta_index)?)?;
        let meta_name = archive.entry(meta_index)?.name().clone();
        let atlas_name = atlas_name_for(&meta_name)?;
        let atlas_index =
            archive
                .index_of(atlas_name.as_str())
                .ok_or_else(|| wadex::Error::EntryNotFound {
                    name: atlas_name.as_str().to_string(),
                })?;
        let compositor = FrameCompositor::new(archive.extract_bitmap(atlas_index)?, pack)?;

        fs::create_dir_all(output)?;
        let stem = stem_of(&meta_name);
        for index in 0..compositor.frame_count() {
            let bitmap = compositor.render_frame(index, zoom, background)?;
            let dest = output.join(format!("{}_{:03}.png", stem, index));
            bitmap
                .save(&dest)
                .map_err(|e| wadex::Error::Decode(e.to_string()))?;
        }
        Ok(compositor.frame_count())
    })();

    match result {
        Ok(count) => {
            if !quiet {
                println!("Rendered {} frames to {}", count, output.display());
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// File-name stem of an entry, for naming rendered frames.
fn stem_of(name: &EntryName) -> String {
    let file_name = name.file_name();
    match file_name.rfind('.') {
        Some(0) | None => file_name.to_string(),
        Some(pos) => file_name[..pos].to_string(),
    }
}

/// Parses an RRGGBB hex string into an opaque color.
fn parse_color(s: &str) -> Option<Rgba<u8>> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some(Rgba([r, g, b, 255]))
}
