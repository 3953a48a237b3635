//! Particle texture header (row 0 of a particle texture)
//!
//! The header is stored in the first seven pixels of the texture's top row.
//! Each pixel carries one big-endian field in its R, G, B, A channels.
//!
//! # Layout
//! ```text
//! (0,0): magic u16 | flags u16
//! (1,0): tex_offset.x i16 | tex_offset.y i16   (always 0, 1)
//! (2,0): tex_size.x i16 | tex_size.y i16
//! (3,0): forced rotation x f32 (radians)
//! (4,0): forced rotation y f32 (radians)
//! (5,0): forced size x f32
//! (6,0): forced size y f32
//! (0..W, 1..H): sprite pixels, top-left aligned
//! ```

use crate::packing::{
    PixelBytes, pack_f32, pack_i16_pair, pack_u16_pair, unpack_f32, unpack_i16_pair,
    unpack_u16_pair,
};

// ============================================================================
// Flag Constants
// ============================================================================

/// Header flag: forced rotation on the X axis (billboard in X when clear)
pub const FLAG_HAS_FORCED_ROT_X: u16 = 0x0001;
/// Header flag: forced rotation on the Y axis (billboard in Y when clear)
pub const FLAG_HAS_FORCED_ROT_Y: u16 = 0x0002;
/// Header flag: forced X size
pub const FLAG_HAS_X_SIZE: u16 = 0x0004;
/// Header flag: forced Y size
pub const FLAG_HAS_Y_SIZE: u16 = 0x0008;
/// Header flag: render at full brightness regardless of lighting
pub const FLAG_IGNORE_LIGHTING: u16 = 0x0010;

/// All flag bits the renderer understands
pub const FLAG_MASK: u16 = FLAG_HAS_FORCED_ROT_X
    | FLAG_HAS_FORCED_ROT_Y
    | FLAG_HAS_X_SIZE
    | FLAG_HAS_Y_SIZE
    | FLAG_IGNORE_LIGHTING;

// ============================================================================
// Pixel Coordinates (all on row 0)
// ============================================================================

/// Row holding the header
pub const HEADER_ROW: u32 = 0;
/// Pixel column: magic + flags
pub const PIXEL_MAGIC_FLAGS: u32 = 0;
/// Pixel column: texture offset
pub const PIXEL_TEX_OFFSET: u32 = 1;
/// Pixel column: texture size
pub const PIXEL_TEX_SIZE: u32 = 2;
/// Pixel column: forced rotation X
pub const PIXEL_ROTATION_X: u32 = 3;
/// Pixel column: forced rotation Y
pub const PIXEL_ROTATION_Y: u32 = 4;
/// Pixel column: forced size X
pub const PIXEL_SIZE_X: u32 = 5;
/// Pixel column: forced size Y
pub const PIXEL_SIZE_Y: u32 = 6;

/// Number of header pixels; the canvas must be at least this wide
pub const HEADER_PIXELS: usize = 7;

/// Sprite region origin inside the canvas (column 0, first row below the header)
pub const TEX_OFFSET: [i16; 2] = [0, 1];

// ============================================================================
// Defaults (mirrored by PARTICLE_TEX_* in the renderer config)
// ============================================================================

/// Default magic tag (PARTICLE_TEX_MAGIC)
pub const DEFAULT_MAGIC: u16 = 103;
/// Default output texture width (PARTICLE_TEX_WIDTH)
pub const DEFAULT_TEX_WIDTH: u32 = 64;
/// Default output texture height (PARTICLE_TEX_HEIGHT)
pub const DEFAULT_TEX_HEIGHT: u32 = 65;

/// Particle texture header (7 pixels, 28 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTexHeader {
    /// Tag identifying the texture as a particle texture
    pub magic: u16,
    /// `FLAG_*` bitmask
    pub flags: u16,
    /// Top-left of the sprite region within the canvas
    pub tex_offset: [i16; 2],
    /// Sprite width/height in pixels
    pub tex_size: [i16; 2],
    /// Forced rotation per axis, radians
    pub rotation: [f32; 2],
    /// Forced size multiplier per axis
    pub size: [f32; 2],
}

impl ParticleTexHeader {
    pub const SIZE: usize = HEADER_PIXELS * 4;

    /// Header with no forced values for a sprite of the given size
    pub fn new(magic: u16, tex_width: i16, tex_height: i16) -> Self {
        Self {
            magic,
            flags: 0,
            tex_offset: TEX_OFFSET,
            tex_size: [tex_width, tex_height],
            rotation: [0.0, 0.0],
            size: [1.0, 1.0],
        }
    }

    #[inline]
    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    /// Encode to the seven header pixels, indexed by pixel column
    pub fn to_pixels(&self) -> [PixelBytes; HEADER_PIXELS] {
        let mut pixels = [[0u8; 4]; HEADER_PIXELS];
        pixels[PIXEL_MAGIC_FLAGS as usize] = pack_u16_pair(self.magic, self.flags);
        pixels[PIXEL_TEX_OFFSET as usize] = pack_i16_pair(self.tex_offset[0], self.tex_offset[1]);
        pixels[PIXEL_TEX_SIZE as usize] = pack_i16_pair(self.tex_size[0], self.tex_size[1]);
        pixels[PIXEL_ROTATION_X as usize] = pack_f32(self.rotation[0]);
        pixels[PIXEL_ROTATION_Y as usize] = pack_f32(self.rotation[1]);
        pixels[PIXEL_SIZE_X as usize] = pack_f32(self.size[0]);
        pixels[PIXEL_SIZE_Y as usize] = pack_f32(self.size[1]);
        pixels
    }

    /// Decode from header pixels
    ///
    /// Returns `None` if fewer than [`HEADER_PIXELS`] pixels are given.
    pub fn from_pixels(pixels: &[PixelBytes]) -> Option<Self> {
        if pixels.len() < HEADER_PIXELS {
            return None;
        }
        let (magic, flags) = unpack_u16_pair(pixels[PIXEL_MAGIC_FLAGS as usize]);
        let (offset_x, offset_y) = unpack_i16_pair(pixels[PIXEL_TEX_OFFSET as usize]);
        let (size_x, size_y) = unpack_i16_pair(pixels[PIXEL_TEX_SIZE as usize]);
        Some(Self {
            magic,
            flags,
            tex_offset: [offset_x, offset_y],
            tex_size: [size_x, size_y],
            rotation: [
                unpack_f32(pixels[PIXEL_ROTATION_X as usize]),
                unpack_f32(pixels[PIXEL_ROTATION_Y as usize]),
            ],
            size: [
                unpack_f32(pixels[PIXEL_SIZE_X as usize]),
                unpack_f32(pixels[PIXEL_SIZE_Y as usize]),
            ],
        })
    }

    /// Write header to bytes (the raw RGBA8 contents of row 0, x = 0..7)
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        for (chunk, pixel) in bytes.chunks_exact_mut(4).zip(self.to_pixels()) {
            chunk.copy_from_slice(&pixel);
        }
        bytes
    }

    /// Read header from raw RGBA8 bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut pixels = [[0u8; 4]; HEADER_PIXELS];
        for (pixel, chunk) in pixels.iter_mut().zip(bytes.chunks_exact(4)) {
            pixel.copy_from_slice(chunk);
        }
        Self::from_pixels(&pixels)
    }
}
