//! Canvas dimensions and layout validation
//!
//! Row 0 of the canvas is reserved for the header, so a sprite of height `h`
//! needs a canvas of at least `h + 1` rows.

use crate::formats::{DEFAULT_TEX_HEIGHT, DEFAULT_TEX_WIDTH, HEADER_PIXELS};

/// Output texture dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(DEFAULT_TEX_WIDTH, DEFAULT_TEX_HEIGHT)
    }
}

/// Error produced when a sprite cannot be laid out on the requested canvas
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Sprite does not fit below the header row
    #[error(
        "input image is too large ({source_width}x{source_height}) for a \
         {canvas_width}x{canvas_height} texture - increase the output texture size"
    )]
    OversizeSourceImage {
        source_width: u32,
        source_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    /// Canvas cannot hold the header pixels
    #[error(
        "output texture width {width} is too small (header needs {min} pixels)",
        min = HEADER_PIXELS
    )]
    CanvasTooNarrow { width: u32 },

    /// Sprite dimensions do not fit the signed 16-bit size field
    #[error(
        "input image dimensions {width}x{height} exceed the header limit of {max}",
        max = i16::MAX
    )]
    DimensionOverflow { width: u32, height: u32 },
}

/// Check that a `source_width × source_height` sprite can be written to `canvas`
///
/// Nothing should be written to the canvas unless this returns `Ok`.
pub fn validate_layout(
    source_width: u32,
    source_height: u32,
    canvas: CanvasSize,
) -> Result<(), LayoutError> {
    // source_height > canvas.height - 1, without underflow on empty canvases
    if source_width > canvas.width || source_height >= canvas.height {
        return Err(LayoutError::OversizeSourceImage {
            source_width,
            source_height,
            canvas_width: canvas.width,
            canvas_height: canvas.height,
        });
    }

    if (canvas.width as usize) < HEADER_PIXELS {
        return Err(LayoutError::CanvasTooNarrow {
            width: canvas.width,
        });
    }

    if i16::try_from(source_width).is_err() || i16::try_from(source_height).is_err() {
        return Err(LayoutError::DimensionOverflow {
            width: source_width,
            height: source_height,
        });
    }

    Ok(())
}
