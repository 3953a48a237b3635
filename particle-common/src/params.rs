//! Caller-facing particle options and flag derivation
//!
//! Forced rotation and size are `Option`s: presence sets the flag bit, the
//! value only fills the pixel. An absent rotation tells the renderer to
//! billboard on that axis, which is different from a forced rotation of 0.

use serde::Deserialize;

use crate::formats::{
    DEFAULT_MAGIC, FLAG_HAS_FORCED_ROT_X, FLAG_HAS_FORCED_ROT_Y, FLAG_HAS_X_SIZE, FLAG_HAS_Y_SIZE,
    FLAG_IGNORE_LIGHTING, ParticleTexHeader,
};
use crate::layout::LayoutError;

/// How the Y size is encoded
///
/// Published particle packs derive the Y size flag from the X size and write
/// the X size into the Y size pixel. Renderers in the wild read that layout,
/// so it stays the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderCompat {
    /// Y size flag and pixel (6,0) both follow the X size
    #[default]
    Legacy,
    /// Y size flag and pixel (6,0) follow the Y size
    Corrected,
}

/// Options for one particle texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleParams {
    /// Tag identifying particle textures to the renderer
    pub magic: u16,
    /// Forced X rotation in degrees
    pub rotation_x: Option<f64>,
    /// Forced Y rotation in degrees
    pub rotation_y: Option<f64>,
    /// Forced X size in blocks
    pub x_size: Option<f64>,
    /// Forced Y size in blocks
    pub y_size: Option<f64>,
    /// Render at full brightness
    pub ignore_lighting: bool,
    pub compat: HeaderCompat,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            magic: DEFAULT_MAGIC,
            rotation_x: None,
            rotation_y: None,
            x_size: None,
            y_size: None,
            ignore_lighting: false,
            compat: HeaderCompat::Legacy,
        }
    }
}

impl ParticleParams {
    /// Compute the header flag bitmask
    pub fn flags(&self) -> u16 {
        let mut flags = 0;

        if self.rotation_x.is_some() {
            flags |= FLAG_HAS_FORCED_ROT_X;
        }

        if self.rotation_y.is_some() {
            flags |= FLAG_HAS_FORCED_ROT_Y;
        }

        if is_forced_size(self.x_size) {
            flags |= FLAG_HAS_X_SIZE;
        }

        let y_forced = match self.compat {
            HeaderCompat::Legacy => is_forced_size(self.x_size),
            HeaderCompat::Corrected => is_forced_size(self.y_size),
        };
        if y_forced {
            flags |= FLAG_HAS_Y_SIZE;
        }

        if self.ignore_lighting {
            flags |= FLAG_IGNORE_LIGHTING;
        }

        flags
    }

    /// Size multipliers written to pixels (5,0) and (6,0)
    pub fn encoded_size(&self) -> [f32; 2] {
        match self.compat {
            HeaderCompat::Legacy => {
                let x = legacy_size(self.x_size);
                [x, x]
            }
            HeaderCompat::Corrected => [narrow_size(self.x_size), narrow_size(self.y_size)],
        }
    }

    /// Rotations written to pixels (3,0) and (4,0), in radians
    ///
    /// A forced rotation of `-0.0` is written as `+0.0`, same as an absent one.
    pub fn encoded_rotation(&self) -> [f32; 2] {
        [
            degrees_to_radians(nonzero_or(self.rotation_x, 0.0)),
            degrees_to_radians(nonzero_or(self.rotation_y, 0.0)),
        ]
    }

    /// Build the header for a `source_width × source_height` sprite
    pub fn header(
        &self,
        source_width: u32,
        source_height: u32,
    ) -> Result<ParticleTexHeader, LayoutError> {
        let overflow = || LayoutError::DimensionOverflow {
            width: source_width,
            height: source_height,
        };
        let width = i16::try_from(source_width).map_err(|_| overflow())?;
        let height = i16::try_from(source_height).map_err(|_| overflow())?;

        let mut header = ParticleTexHeader::new(self.magic, width, height);
        header.flags = self.flags();
        header.rotation = self.encoded_rotation();
        header.size = self.encoded_size();
        Ok(header)
    }
}

/// A size of exactly 1 is the renderer default and does not count as forced
fn is_forced_size(size: Option<f64>) -> bool {
    size.is_some_and(|s| s != 1.0)
}

/// `value`, or `fallback` when absent or zero (either sign)
fn nonzero_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|&v| v != 0.0).unwrap_or(fallback)
}

/// Legacy packing treats a zero size like an absent one
fn legacy_size(size: Option<f64>) -> f32 {
    nonzero_or(size, 1.0) as f32
}

fn narrow_size(size: Option<f64>) -> f32 {
    size.unwrap_or(1.0) as f32
}

/// Inputs stay f64 until here; rounding to f32 only once keeps the stored
/// value nearest to the exact radian angle
fn degrees_to_radians(degrees: f64) -> f32 {
    degrees.to_radians() as f32
}
