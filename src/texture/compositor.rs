//! Frame compositing: cropping, placement, zoom, and export sequences.

use std::time::Duration;

use image::{Rgba, RgbaImage};

use crate::texture::descriptor::{Frame, TexturePack};
use crate::{Error, Result};

/// Display duration paired with each frame by
/// [`sequence_for_export`](FrameCompositor::sequence_for_export).
///
/// The descriptor grammar carries no per-frame delay; the external encoder
/// owns the final timing, and this is the hand-off default.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(100);

/// Renders texture pack frames from an atlas bitmap.
///
/// Construction validates every frame rectangle against the atlas bounds,
/// so rendering itself can only fail on a bad frame index. All returned
/// bitmaps are owned copies; the caller may mutate or discard them freely.
///
/// # Examples
///
/// ```rust,no_run
/// use wadex::{FrameCompositor, TexturePack, WadArchive};
///
/// # fn main() -> wadex::Result<()> {
/// let archive = WadArchive::open("resources.wad")?;
/// let pack = TexturePack::parse(&archive.resolve_name("gfx/walk.meta")?)?;
/// let atlas = archive.extract_bitmap(
///     archive.index_of("gfx/walk.png").expect("paired atlas"),
/// )?;
///
/// let compositor = FrameCompositor::new(atlas, pack)?;
/// let bitmap = compositor.render_frame(0, 2, image::Rgba([40, 40, 40, 255]))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    atlas: RgbaImage,
    pack: TexturePack,
}

impl FrameCompositor {
    /// Builds a compositor from a decoded atlas and a parsed pack.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] when any frame's source rectangle reaches past
    /// the atlas bounds.
    pub fn new(atlas: RgbaImage, pack: TexturePack) -> Result<Self> {
        for (index, frame) in pack.frames().iter().enumerate() {
            let fits_x = frame
                .x
                .checked_add(frame.width)
                .is_some_and(|right| right <= atlas.width());
            let fits_y = frame
                .y
                .checked_add(frame.height)
                .is_some_and(|bottom| bottom <= atlas.height());
            if !fits_x || !fits_y {
                return Err(Error::Decode(format!(
                    "frame {}: rectangle {}x{} at ({}, {}) exceeds {}x{} atlas",
                    index,
                    frame.width,
                    frame.height,
                    frame.x,
                    frame.y,
                    atlas.width(),
                    atlas.height()
                )));
            }
        }
        Ok(Self { atlas, pack })
    }

    /// Number of frames in the pack.
    pub fn frame_count(&self) -> usize {
        self.pack.frame_count()
    }

    /// The parsed pack this compositor renders from.
    pub fn pack(&self) -> &TexturePack {
        &self.pack
    }

    /// Renders one frame onto the logical canvas.
    ///
    /// The frame's rectangle is cropped out of the atlas and placed at its
    /// compositing offset; the rest of the canvas is filled with
    /// `background`. The result is then scaled by the integer `zoom`
    /// factor with plain pixel duplication — nearest neighbor, no
    /// interpolation. Zoom values below 1 render at 1.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for `index >= frame_count()`.
    pub fn render_frame(&self, index: usize, zoom: u32, background: Rgba<u8>) -> Result<RgbaImage> {
        let frame = self
            .pack
            .frames()
            .get(index)
            .ok_or(Error::IndexOutOfRange {
                index,
                count: self.pack.frame_count(),
            })?;
        let canvas = self.composite(frame, background);

        let zoom = zoom.max(1);
        if zoom == 1 {
            return Ok(canvas);
        }
        let mut scaled = RgbaImage::new(canvas.width() * zoom, canvas.height() * zoom);
        for (x, y, pixel) in scaled.enumerate_pixels_mut() {
            *pixel = *canvas.get_pixel(x / zoom, y / zoom);
        }
        Ok(scaled)
    }

    /// Crops `frame` out of the atlas onto a background-filled canvas.
    fn composite(&self, frame: &Frame, background: Rgba<u8>) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(
            self.pack.canvas_width(),
            self.pack.canvas_height(),
            background,
        );
        for dy in 0..frame.height {
            for dx in 0..frame.width {
                let pixel = self.atlas.get_pixel(frame.x + dx, frame.y + dy);
                canvas.put_pixel(frame.offset_x + dx, frame.offset_y + dy, *pixel);
            }
        }
        canvas
    }

    /// Produces every frame at zoom 1 for an external animation encoder.
    ///
    /// Frames are composited over a fully transparent canvas (no
    /// background beyond the pack's own canvas) and paired with
    /// [`DEFAULT_FRAME_DURATION`].
    pub fn sequence_for_export(&self) -> Vec<(RgbaImage, Duration)> {
        self.pack
            .frames()
            .iter()
            .map(|frame| {
                (
                    self.composite(frame, Rgba([0, 0, 0, 0])),
                    DEFAULT_FRAME_DURATION,
                )
            })
            .collect()
    }

    /// Frame after `current`, wrapping past the last frame to 0.
    pub fn next_frame(&self, current: usize) -> usize {
        let count = self.pack.frame_count();
        if count == 0 { 0 } else { (current + 1) % count }
    }

    /// Frame before `current`, wrapping before frame 0 to the last frame.
    pub fn prev_frame(&self, current: usize) -> usize {
        let count = self.pack.frame_count();
        if count == 0 {
            0
        } else if current == 0 || current > count {
            count - 1
        } else {
            current - 1
        }
    }

    /// Clamps a manually entered index into `[0, frame_count)`.
    pub fn clamp_index(&self, index: i64) -> usize {
        let count = self.pack.frame_count();
        if count == 0 {
            0
        } else {
            index.clamp(0, count as i64 - 1) as usize
        }
    }
}
