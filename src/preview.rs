//! Preview selection for archive entries.
//!
//! How an entry is previewed is a closed set of variants chosen by file
//! extension, not a runtime type check: raster images get an image view,
//! frame descriptions get the texture pack view, everything else falls
//! back to a generic byte view.

use crate::{EntryName, Result};

/// How an entry should be previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// No specialized preview; show raw bytes or metadata.
    Generic,
    /// A raster image, decodable with
    /// [`extract_bitmap`](crate::WadArchive::extract_bitmap).
    Image,
    /// A frame-description resource with a paired atlas image; preview
    /// through [`TexturePack`](crate::TexturePack) and
    /// [`FrameCompositor`](crate::FrameCompositor).
    TexturePack,
}

impl PreviewKind {
    /// Selects the preview for an entry name by its extension,
    /// case-insensitively.
    ///
    /// ```
    /// use wadex::{EntryName, PreviewKind};
    ///
    /// let name = EntryName::new("gfx/Walk.PNG").unwrap();
    /// assert_eq!(PreviewKind::for_name(&name), PreviewKind::Image);
    /// ```
    pub fn for_name(name: &EntryName) -> Self {
        match name.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("png") => Self::Image,
            Some(ext) if ext.eq_ignore_ascii_case("jpg") => Self::Image,
            Some(ext) if ext.eq_ignore_ascii_case("jpeg") => Self::Image,
            Some(ext) if ext.eq_ignore_ascii_case("meta") => Self::TexturePack,
            _ => Self::Generic,
        }
    }
}

/// Name of the atlas image paired with a frame-description entry.
///
/// The pairing rule is extension substitution: `sprites/walk.meta` pairs
/// with `sprites/walk.png`.
pub fn atlas_name_for(meta_name: &EntryName) -> Result<EntryName> {
    meta_name.with_extension("png")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> EntryName {
        EntryName::new(s).unwrap()
    }

    #[test]
    fn test_kind_by_extension() {
        assert_eq!(PreviewKind::for_name(&name("a.png")), PreviewKind::Image);
        assert_eq!(PreviewKind::for_name(&name("a.JPG")), PreviewKind::Image);
        assert_eq!(PreviewKind::for_name(&name("b.jpeg")), PreviewKind::Image);
        assert_eq!(
            PreviewKind::for_name(&name("a.meta")),
            PreviewKind::TexturePack
        );
        assert_eq!(PreviewKind::for_name(&name("a.txt")), PreviewKind::Generic);
        assert_eq!(PreviewKind::for_name(&name("noext")), PreviewKind::Generic);
    }

    #[test]
    fn test_atlas_pairing() {
        assert_eq!(
            atlas_name_for(&name("sprites/walk.meta")).unwrap().as_str(),
            "sprites/walk.png"
        );
    }
}
