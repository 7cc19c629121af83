//! Frame-description resource parsing.

use std::io::Cursor;

use crate::format::reader::{read_i32_le, read_u32_le};
use crate::{Error, Result};

/// Size in bytes of one serialized frame record.
const FRAME_RECORD_SIZE: usize = 24;

/// Size in bytes of the descriptor header (canvas w/h + frame count).
const DESCRIPTOR_HEADER_SIZE: usize = 12;

/// One animation cell: a rectangle in the atlas and where it sits on the
/// logical canvas.
///
/// Frames are immutable once parsed. The atlas-bounds check happens when a
/// [`FrameCompositor`](crate::FrameCompositor) is built, since only then is
/// the atlas size known; the canvas-bounds check happens at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Left edge of the source rectangle in the atlas.
    pub x: u32,
    /// Top edge of the source rectangle in the atlas.
    pub y: u32,
    /// Source rectangle width; always > 0.
    pub width: u32,
    /// Source rectangle height; always > 0.
    pub height: u32,
    /// Horizontal placement of the rectangle's left edge on the canvas.
    pub offset_x: u32,
    /// Vertical placement of the rectangle's top edge on the canvas.
    pub offset_y: u32,
}

/// A parsed frame-description resource.
///
/// Wire layout (all little-endian): u32 canvas width, u32 canvas height,
/// u32 frame count, then one 24-byte record per frame — u32 x, u32 y,
/// u32 w, u32 h, i32 offset x, i32 offset y.
///
/// Frames keep their file-declared order; that order is the animation
/// order and is never re-sorted.
#[derive(Debug, Clone)]
pub struct TexturePack {
    canvas_width: u32,
    canvas_height: u32,
    frames: Vec<Frame>,
}

impl TexturePack {
    /// Parses a frame-description resource.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] on a truncated header or record set, a zero canvas
    /// dimension, a zero frame width/height, a negative compositing
    /// offset, or a frame placed partially outside the canvas. The offset
    /// in the error locates the rejected data. Parsing never touches
    /// shared state, so a failure leaves any existing preview intact.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut r = Cursor::new(bytes);

        let canvas_width =
            read_u32_le(&mut r).map_err(|_| Error::parse(0, "truncated header"))?;
        let canvas_height =
            read_u32_le(&mut r).map_err(|_| Error::parse(4, "truncated header"))?;
        if canvas_width == 0 || canvas_height == 0 {
            return Err(Error::parse(
                0,
                format!("zero canvas dimension {}x{}", canvas_width, canvas_height),
            ));
        }

        let count = read_u32_le(&mut r).map_err(|_| Error::parse(8, "truncated header"))? as usize;
        let available = bytes.len().saturating_sub(DESCRIPTOR_HEADER_SIZE);
        if count as u64 * FRAME_RECORD_SIZE as u64 != available as u64 {
            return Err(Error::parse(
                8,
                format!(
                    "frame count {} does not match {} bytes of records",
                    count, available
                ),
            ));
        }

        let mut frames = Vec::with_capacity(count);
        for index in 0..count {
            let record_offset = DESCRIPTOR_HEADER_SIZE + index * FRAME_RECORD_SIZE;
            let bad = |reason: String| Error::parse(record_offset, reason);

            let x = read_u32_le(&mut r).map_err(|e| bad(e.to_string()))?;
            let y = read_u32_le(&mut r).map_err(|e| bad(e.to_string()))?;
            let width = read_u32_le(&mut r).map_err(|e| bad(e.to_string()))?;
            let height = read_u32_le(&mut r).map_err(|e| bad(e.to_string()))?;
            let offset_x = read_i32_le(&mut r).map_err(|e| bad(e.to_string()))?;
            let offset_y = read_i32_le(&mut r).map_err(|e| bad(e.to_string()))?;

            if width == 0 || height == 0 {
                return Err(bad(format!("frame {}: zero extent {}x{}", index, width, height)));
            }
            if offset_x < 0 || offset_y < 0 {
                return Err(bad(format!(
                    "frame {}: negative offset ({}, {})",
                    index, offset_x, offset_y
                )));
            }
            let (offset_x, offset_y) = (offset_x as u32, offset_y as u32);
            let fits_x = offset_x
                .checked_add(width)
                .is_some_and(|right| right <= canvas_width);
            let fits_y = offset_y
                .checked_add(height)
                .is_some_and(|bottom| bottom <= canvas_height);
            if !fits_x || !fits_y {
                return Err(bad(format!(
                    "frame {}: {}x{} at ({}, {}) extends past {}x{} canvas",
                    index, width, height, offset_x, offset_y, canvas_width, canvas_height
                )));
            }

            frames.push(Frame {
                x,
                y,
                width,
                height,
                offset_x,
                offset_y,
            });
        }

        log::debug!(
            "parsed texture pack: {} frames on {}x{} canvas",
            frames.len(),
            canvas_width,
            canvas_height
        );
        Ok(Self {
            canvas_width,
            canvas_height,
            frames,
        })
    }

    /// Width of the shared logical canvas.
    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    /// Height of the shared logical canvas.
    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    /// Frames in animation order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds descriptor bytes: canvas, then (x, y, w, h, ox, oy) tuples.
    fn descriptor(canvas: (u32, u32), frames: &[(u32, u32, u32, u32, i32, i32)]) -> Vec<u8> {
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

    #[test]
    fn test_parse_preserves_order() {
        let bytes = descriptor(
            (64, 32),
            &[(32, 0, 16, 16, 4, 4), (0, 0, 16, 16, 0, 0), (16, 0, 8, 8, 2, 2)],
        );
        let pack = TexturePack::parse(&bytes).unwrap();

        assert_eq!(pack.canvas_width(), 64);
        assert_eq!(pack.canvas_height(), 32);
        assert_eq!(pack.frame_count(), 3);
        // File order is animation order.
        assert_eq!(pack.frames()[0].x, 32);
        assert_eq!(pack.frames()[1].x, 0);
        assert_eq!(pack.frames()[2].width, 8);
    }

    #[test]
    fn test_empty_pack() {
        let bytes = descriptor((8, 8), &[]);
        let pack = TexturePack::parse(&bytes).unwrap();
        assert_eq!(pack.frame_count(), 0);
    }

    #[test]
    fn test_truncated_header() {
        let err = TexturePack::parse(&[0u8; 7]).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_zero_canvas() {
        let bytes = descriptor((0, 8), &[]);
        assert!(matches!(
            TexturePack::parse(&bytes),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_count_mismatch() {
        let mut bytes = descriptor((8, 8), &[(0, 0, 4, 4, 0, 0)]);
        // Declare a second frame without providing its record.
        bytes[8] = 2;
        let err = TexturePack::parse(&bytes).unwrap_err();
        match err {
            Error::Parse { offset, reason } => {
                assert_eq!(offset, 8);
                assert!(reason.contains("frame count"));
            }
            e => panic!("expected Parse, got {:?}", e),
        }
    }

    #[test]
    fn test_zero_extent_frame() {
        let bytes = descriptor((8, 8), &[(0, 0, 0, 4, 0, 0)]);
        assert!(matches!(
            TexturePack::parse(&bytes),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_negative_offset() {
        let bytes = descriptor((8, 8), &[(0, 0, 4, 4, -1, 0)]);
        assert!(matches!(
            TexturePack::parse(&bytes),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_frame_past_canvas() {
        let bytes = descriptor((8, 8), &[(0, 0, 4, 4, 6, 0)]);
        let err = TexturePack::parse(&bytes).unwrap_err();
        match err {
            Error::Parse { offset, reason } => {
                assert_eq!(offset, DESCRIPTOR_HEADER_SIZE);
                assert!(reason.contains("extends past"));
            }
            e => panic!("expected Parse, got {:?}", e),
        }
    }
}
