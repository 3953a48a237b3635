//! Shared types and utilities for particle textures
//!
//! This crate provides the particle texture wire format shared between:
//! - `particle-export` (asset pipeline)
//! - renderers and inspectors that read the header back
//!
//! # Modules
//!
//! - [`packing`] - Per-field pixel packing (u16/i16 pairs, f32, big-endian)
//! - [`formats`] - The particle texture header and its constants
//! - [`params`] - Caller-facing options and flag derivation
//! - [`layout`] - Canvas dimensions and size validation

pub mod formats;
pub mod layout;
pub mod packing;
pub mod params;

pub use layout::{CanvasSize, LayoutError, validate_layout};
pub use params::{HeaderCompat, ParticleParams};

// Re-export commonly used packing items
pub use packing::{
    PixelBytes, pack_f32, pack_i16_pair, pack_u16_pair, unpack_f32, unpack_i16_pair,
    unpack_u16_pair,
};

// Re-export commonly used format items
pub use formats::{
    DEFAULT_MAGIC,
    DEFAULT_TEX_HEIGHT,
    DEFAULT_TEX_WIDTH,
    // Flags
    FLAG_HAS_FORCED_ROT_X,
    FLAG_HAS_FORCED_ROT_Y,
    FLAG_HAS_X_SIZE,
    FLAG_HAS_Y_SIZE,
    FLAG_IGNORE_LIGHTING,
    FLAG_MASK,
    HEADER_PIXELS,
    HEADER_ROW,
    ParticleTexHeader,
    TEX_OFFSET,
};
