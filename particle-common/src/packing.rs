//! Pixel packing utilities
//!
//! Every header field occupies exactly one RGBA8 pixel. The four channels are
//! treated as four raw bytes of a big-endian value:
//! - u16 pair → `[a_hi, a_lo, b_hi, b_lo]`
//! - i16 pair → `[a_hi, a_lo, b_hi, b_lo]` (two's complement)
//! - f32 → IEEE 754 bits, most significant byte in the red channel

/// One pixel worth of header bytes (R, G, B, A)
pub type PixelBytes = [u8; 4];

/// Pack two big-endian u16 values into one pixel
#[inline]
pub fn pack_u16_pair(a: u16, b: u16) -> PixelBytes {
    let [a_hi, a_lo] = a.to_be_bytes();
    let [b_hi, b_lo] = b.to_be_bytes();
    [a_hi, a_lo, b_hi, b_lo]
}

/// Unpack two big-endian u16 values from one pixel
#[inline]
pub fn unpack_u16_pair(pixel: PixelBytes) -> (u16, u16) {
    (
        u16::from_be_bytes([pixel[0], pixel[1]]),
        u16::from_be_bytes([pixel[2], pixel[3]]),
    )
}

/// Pack two big-endian i16 values into one pixel
#[inline]
pub fn pack_i16_pair(a: i16, b: i16) -> PixelBytes {
    let [a_hi, a_lo] = a.to_be_bytes();
    let [b_hi, b_lo] = b.to_be_bytes();
    [a_hi, a_lo, b_hi, b_lo]
}

/// Unpack two big-endian i16 values from one pixel
#[inline]
pub fn unpack_i16_pair(pixel: PixelBytes) -> (i16, i16) {
    (
        i16::from_be_bytes([pixel[0], pixel[1]]),
        i16::from_be_bytes([pixel[2], pixel[3]]),
    )
}

/// Pack a big-endian f32 into one pixel
#[inline]
pub fn pack_f32(value: f32) -> PixelBytes {
    value.to_be_bytes()
}

/// Unpack a big-endian f32 from one pixel
#[inline]
pub fn unpack_f32(pixel: PixelBytes) -> f32 {
    f32::from_be_bytes(pixel)
}
