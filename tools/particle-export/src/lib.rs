//! particle-export library
//!
//! Provides particle texture packing for use by other tools and by the
//! `particle-export` binary.

pub mod inspect;
pub mod manifest;
pub mod texture;

// Re-export the wire format from particle-common
pub use particle_common::{CanvasSize, HeaderCompat, LayoutError, ParticleParams, ParticleTexHeader};

// Re-export key entry points
pub use inspect::{extract_sprite, inspect_texture, read_header};
pub use manifest::{ParticleManifest, build_all, load_manifest};
pub use texture::{convert_image, default_output_path, encode_particle_texture};
