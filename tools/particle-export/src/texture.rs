//! Particle texture encoder (PNG sprite -> header row + sprite atlas)

use anyhow::{Context, Result};
use image::{GenericImageView, Rgba, RgbaImage, imageops};
use particle_common::{
    CanvasSize, HEADER_ROW, LayoutError, ParticleParams, ParticleTexHeader, TEX_OFFSET,
    validate_layout,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix inserted before the extension of the default output path
pub const OUTPUT_SUFFIX: &str = "out";

/// Encode `source` into a new `canvas`-sized particle texture
///
/// The header goes into row 0, the sprite is copied unblended starting at
/// row 1. Fails before allocating anything if the sprite does not fit.
pub fn encode_particle_texture<I>(
    source: &I,
    params: &ParticleParams,
    canvas: CanvasSize,
) -> Result<RgbaImage, LayoutError>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let header = layout_header(source, params, canvas)?;
    Ok(write_texture(source, &header, canvas))
}

/// Validate the layout and build the header for `source`
fn layout_header<I>(
    source: &I,
    params: &ParticleParams,
    canvas: CanvasSize,
) -> Result<ParticleTexHeader, LayoutError>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (width, height) = source.dimensions();
    validate_layout(width, height, canvas)?;
    params.header(width, height)
}

/// Write `header` into row 0 of a fresh canvas and copy `source` below it
///
/// Callers must have validated the layout.
fn write_texture<I>(source: &I, header: &ParticleTexHeader, canvas: CanvasSize) -> RgbaImage
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let mut texture = RgbaImage::new(canvas.width, canvas.height);
    for (x, pixel) in (0u32..).zip(header.to_pixels()) {
        texture.put_pixel(x, HEADER_ROW, Rgba(pixel));
    }

    imageops::replace(
        &mut texture,
        source,
        i64::from(TEX_OFFSET[0]),
        i64::from(TEX_OFFSET[1]),
    );

    texture
}

/// Convert an image file to a particle texture
pub fn convert_image(
    input: &Path,
    output: &Path,
    params: &ParticleParams,
    canvas: CanvasSize,
) -> Result<ParticleTexHeader> {
    let img = image::open(input).with_context(|| format!("Failed to load image: {:?}", input))?;
    let rgba = img.to_rgba8();

    let header =
        layout_header(&rgba, params, canvas).with_context(|| format!("Cannot pack {:?}", input))?;
    let texture = write_texture(&rgba, &header, canvas);

    if !is_lossless_output(output) {
        tracing::warn!(
            "{:?} is not a PNG - lossy formats will corrupt the particle header",
            output
        );
    }

    texture
        .save(output)
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Packed particle: {}x{} sprite into {}x{} texture (magic={}, flags={:#06x})",
        rgba.width(),
        rgba.height(),
        canvas.width,
        canvas.height,
        header.magic,
        header.flags
    );

    Ok(header)
}

/// Output path next to `input` with `.out` inserted before the extension
///
/// `fire.png` -> `fire.out.png`, `fire` -> `fire.out`
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.file_stem().unwrap_or_default());
    name.push(".");
    name.push(OUTPUT_SUFFIX);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

fn is_lossless_output(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_common::{
        FLAG_HAS_FORCED_ROT_X, FLAG_HAS_FORCED_ROT_Y, FLAG_HAS_X_SIZE, FLAG_HAS_Y_SIZE,
        FLAG_IGNORE_LIGHTING, unpack_f32, unpack_i16_pair, unpack_u16_pair,
    };
    use tempfile::tempdir;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([x as u8, y as u8, (x ^ y) as u8, 255 - (x + y) as u8])
        })
    }

    fn header_pixel(texture: &RgbaImage, x: u32) -> [u8; 4] {
        texture.get_pixel(x, 0).0
    }

    #[test]
    fn test_default_layout() {
        let source = gradient(16, 8);
        let texture =
            encode_particle_texture(&source, &ParticleParams::default(), CanvasSize::default())
                .unwrap();

        assert_eq!(texture.dimensions(), (64, 65));
        assert_eq!(unpack_u16_pair(header_pixel(&texture, 0)), (103, 0));
        assert_eq!(unpack_i16_pair(header_pixel(&texture, 1)), (0, 1));
        assert_eq!(unpack_i16_pair(header_pixel(&texture, 2)), (16, 8));
        assert_eq!(unpack_f32(header_pixel(&texture, 3)).to_bits(), 0.0f32.to_bits());
        assert_eq!(unpack_f32(header_pixel(&texture, 4)).to_bits(), 0.0f32.to_bits());
        assert_eq!(unpack_f32(header_pixel(&texture, 5)), 1.0);
        assert_eq!(unpack_f32(header_pixel(&texture, 6)), 1.0);
    }

    #[test]
    fn test_rest_of_header_row_transparent() {
        let texture = encode_particle_texture(
            &gradient(4, 4),
            &ParticleParams::default(),
            CanvasSize::default(),
        )
        .unwrap();
        for x in 7..64 {
            assert_eq!(texture.get_pixel(x, 0).0, [0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_sprite_copied_below_header() {
        let source = gradient(20, 30);
        let texture =
            encode_particle_texture(&source, &ParticleParams::default(), CanvasSize::default())
                .unwrap();

        for (x, y, pixel) in source.enumerate_pixels() {
            assert_eq!(texture.get_pixel(x, y + 1), pixel);
        }
        // Outside the sprite stays zeroed
        assert_eq!(texture.get_pixel(20, 1).0, [0, 0, 0, 0]);
        assert_eq!(texture.get_pixel(0, 31).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_transparent_sprite_not_blended() {
        // Fully transparent source pixels must still be copied verbatim
        let source = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 0]));
        let texture =
            encode_particle_texture(&source, &ParticleParams::default(), CanvasSize::default())
                .unwrap();
        assert_eq!(texture.get_pixel(3, 4).0, [10, 20, 30, 0]);
    }

    #[test]
    fn test_forced_rotation_x() {
        let params = ParticleParams {
            rotation_x: Some(90.0),
            ..Default::default()
        };
        let texture =
            encode_particle_texture(&gradient(4, 4), &params, CanvasSize::default()).unwrap();

        let (_, flags) = unpack_u16_pair(header_pixel(&texture, 0));
        assert_eq!(flags & FLAG_HAS_FORCED_ROT_X, FLAG_HAS_FORCED_ROT_X);
        assert_eq!(flags & FLAG_HAS_FORCED_ROT_Y, 0);

        let rot_x = unpack_f32(header_pixel(&texture, 3));
        assert!((rot_x - std::f32::consts::FRAC_PI_2).abs() <= f32::EPSILON);
        assert_eq!(unpack_f32(header_pixel(&texture, 4)).to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn test_rotation_pixels_bit_exact() {
        let params = ParticleParams {
            rotation_x: Some(0.019),
            rotation_y: Some(-0.0),
            ..Default::default()
        };
        let texture =
            encode_particle_texture(&gradient(4, 4), &params, CanvasSize::default()).unwrap();

        assert_eq!(
            header_pixel(&texture, 3),
            (0.019f64.to_radians() as f32).to_be_bytes()
        );
        assert_eq!(header_pixel(&texture, 4), [0, 0, 0, 0]);
    }

    #[test]
    fn test_size_just_above_one_flags() {
        let params = ParticleParams {
            x_size: Some(1.000_000_01),
            ..Default::default()
        };
        let texture =
            encode_particle_texture(&gradient(4, 4), &params, CanvasSize::default()).unwrap();

        let (_, flags) = unpack_u16_pair(header_pixel(&texture, 0));
        assert_eq!(flags, FLAG_HAS_X_SIZE | FLAG_HAS_Y_SIZE);
        assert_eq!(unpack_f32(header_pixel(&texture, 5)), 1.0);
    }

    #[test]
    fn test_x_size_written_twice() {
        let params = ParticleParams {
            x_size: Some(2.0),
            ..Default::default()
        };
        let texture =
            encode_particle_texture(&gradient(4, 4), &params, CanvasSize::default()).unwrap();

        let (_, flags) = unpack_u16_pair(header_pixel(&texture, 0));
        assert_eq!(flags, FLAG_HAS_X_SIZE | FLAG_HAS_Y_SIZE);
        assert_eq!(unpack_f32(header_pixel(&texture, 5)), 2.0);
        assert_eq!(unpack_f32(header_pixel(&texture, 6)), 2.0);
    }

    #[test]
    fn test_ignore_lighting_flag() {
        let params = ParticleParams {
            ignore_lighting: true,
            ..Default::default()
        };
        let texture =
            encode_particle_texture(&gradient(4, 4), &params, CanvasSize::default()).unwrap();
        assert_eq!(
            unpack_u16_pair(header_pixel(&texture, 0)),
            (103, FLAG_IGNORE_LIGHTING)
        );
    }

    #[test]
    fn test_oversize_rejected() {
        let err = encode_particle_texture(
            &gradient(65, 66),
            &ParticleParams::default(),
            CanvasSize::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::OversizeSourceImage { .. }));
    }

    #[test]
    fn test_exact_fit_accepted() {
        let source = gradient(64, 64);
        let texture =
            encode_particle_texture(&source, &ParticleParams::default(), CanvasSize::default())
                .unwrap();
        assert_eq!(texture.get_pixel(63, 64), source.get_pixel(63, 63));
    }

    #[test]
    fn test_custom_canvas() {
        let texture = encode_particle_texture(
            &gradient(100, 10),
            &ParticleParams::default(),
            CanvasSize::new(128, 11),
        )
        .unwrap();
        assert_eq!(texture.dimensions(), (128, 11));
        assert_eq!(unpack_i16_pair(header_pixel(&texture, 2)), (100, 10));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("sprites/fire.png")),
            PathBuf::from("sprites/fire.out.png")
        );
        assert_eq!(
            default_output_path(Path::new("smoke.tar.png")),
            PathBuf::from("smoke.tar.out.png")
        );
        assert_eq!(
            default_output_path(Path::new("spark")),
            PathBuf::from("spark.out")
        );
        assert_eq!(
            default_output_path(Path::new(".hidden")),
            PathBuf::from(".hidden.out")
        );
    }

    #[test]
    fn test_convert_image_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("dust.png");
        let output = dir.path().join("dust.out.png");
        let source = gradient(12, 9);
        source.save(&input).unwrap();

        let params = ParticleParams {
            rotation_y: Some(45.0),
            ..Default::default()
        };
        let header = convert_image(&input, &output, &params, CanvasSize::default()).unwrap();
        assert_eq!(header.flags, FLAG_HAS_FORCED_ROT_Y);
        assert_eq!(header, params.header(12, 9).unwrap());

        let written = image::open(&output).unwrap().to_rgba8();
        assert_eq!(written.dimensions(), (64, 65));
        let decoded =
            ParticleTexHeader::from_bytes(&written.as_raw()[..ParticleTexHeader::SIZE]).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(written.get_pixel(11, 9), source.get_pixel(11, 8));
    }

    #[test]
    fn test_convert_image_oversize_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("big.png");
        let output = dir.path().join("big.out.png");
        gradient(65, 66).save(&input).unwrap();

        let result = convert_image(
            &input,
            &output,
            &ParticleParams::default(),
            CanvasSize::default(),
        );
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
