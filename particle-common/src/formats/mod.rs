//! Particle texture binary formats
//!
//! POD formats written into texture pixels. The consuming renderer detects a
//! particle texture by the magic value in pixel (0,0); everything else is at
//! fixed coordinates.

pub mod particle_tex;

pub use particle_tex::*;
