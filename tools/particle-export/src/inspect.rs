//! Inspect command - decode the header of an existing particle texture

use anyhow::{Context, Result, bail};
use image::{GenericImageView, Rgba, RgbaImage, imageops};
use particle_common::{
    FLAG_HAS_FORCED_ROT_X, FLAG_HAS_FORCED_ROT_Y, FLAG_HAS_X_SIZE, FLAG_HAS_Y_SIZE,
    FLAG_IGNORE_LIGHTING, FLAG_MASK, HEADER_PIXELS, HEADER_ROW, ParticleTexHeader,
};
use std::path::Path;

const FLAG_NAMES: [(u16, &str); 5] = [
    (FLAG_HAS_FORCED_ROT_X, "forced-rotation-x"),
    (FLAG_HAS_FORCED_ROT_Y, "forced-rotation-y"),
    (FLAG_HAS_X_SIZE, "forced-size-x"),
    (FLAG_HAS_Y_SIZE, "forced-size-y"),
    (FLAG_IGNORE_LIGHTING, "ignore-lighting"),
];

/// Read the header pixels from row 0 of a texture
///
/// Returns `None` if the texture is too small to hold a header.
pub fn read_header<I>(texture: &I) -> Option<ParticleTexHeader>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (width, height) = texture.dimensions();
    if (width as usize) < HEADER_PIXELS || height <= HEADER_ROW {
        return None;
    }

    let mut pixels = [[0u8; 4]; HEADER_PIXELS];
    for (x, pixel) in (0u32..).zip(pixels.iter_mut()) {
        *pixel = texture.get_pixel(x, HEADER_ROW).0;
    }
    ParticleTexHeader::from_pixels(&pixels)
}

/// Names of the known flags set in `header`, in bit order
pub fn flag_names(header: &ParticleTexHeader) -> Vec<&'static str> {
    FLAG_NAMES
        .iter()
        .filter(|(bit, _)| header.has_flag(*bit))
        .map(|(_, name)| *name)
        .collect()
}

/// Copy the sprite region described by `header` out of `texture`
pub fn extract_sprite(texture: &RgbaImage, header: &ParticleTexHeader) -> Result<RgbaImage> {
    let [x, y] = header.tex_offset;
    let [width, height] = header.tex_size;
    if x < 0 || y < 0 || width < 0 || height < 0 {
        bail!(
            "Header describes a negative sprite region: offset ({}, {}), size {}x{}",
            x,
            y,
            width,
            height
        );
    }

    let (x, y, width, height) = (x as u32, y as u32, width as u32, height as u32);
    if x + width > texture.width() || y + height > texture.height() {
        bail!(
            "Sprite region {}x{} at ({}, {}) exceeds the {}x{} texture",
            width,
            height,
            x,
            y,
            texture.width(),
            texture.height()
        );
    }

    Ok(imageops::crop_imm(texture, x, y, width, height).to_image())
}

/// Load a particle texture, log its header, and optionally extract the sprite
pub fn inspect_texture(
    input: &Path,
    expected_magic: Option<u16>,
    extract: Option<&Path>,
) -> Result<ParticleTexHeader> {
    let texture = image::open(input)
        .with_context(|| format!("Failed to load texture: {:?}", input))?
        .to_rgba8();

    let header = read_header(&texture).with_context(|| {
        format!(
            "{:?} is too small to hold a particle header ({}x{})",
            input,
            texture.width(),
            texture.height()
        )
    })?;

    if let Some(magic) = expected_magic.filter(|&m| m != header.magic) {
        bail!(
            "{:?} is not a particle texture: magic {} (expected {})",
            input,
            header.magic,
            magic
        );
    }

    tracing::info!("Particle texture {:?}", input);
    tracing::info!("  Magic: {}", header.magic);
    tracing::info!(
        "  Flags: {:#06x} [{}]",
        header.flags,
        flag_names(&header).join(", ")
    );
    if header.flags & !FLAG_MASK != 0 {
        tracing::warn!("  Unknown flag bits: {:#06x}", header.flags & !FLAG_MASK);
    }
    tracing::info!(
        "  Sprite: {}x{} at ({}, {})",
        header.tex_size[0],
        header.tex_size[1],
        header.tex_offset[0],
        header.tex_offset[1]
    );
    tracing::info!(
        "  Rotation: x={}° y={}°",
        header.rotation[0].to_degrees(),
        header.rotation[1].to_degrees()
    );
    tracing::info!("  Size: x={} y={}", header.size[0], header.size[1]);

    if let Some(path) = extract {
        let sprite = extract_sprite(&texture, &header)?;
        sprite
            .save(path)
            .with_context(|| format!("Failed to write sprite: {:?}", path))?;
        tracing::info!("Extracted sprite -> {:?}", path);
    }

    Ok(header)
}
