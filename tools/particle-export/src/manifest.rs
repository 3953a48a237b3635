//! particles.toml manifest parsing and batch builds
//!
//! A manifest lists sprites to pack with shared output settings:
//!
//! ```toml
//! [output]
//! dir = "build/particles"
//! magic = 103
//! tex_width = 64
//! tex_height = 65
//!
//! [[particles]]
//! path = "sprites/fire.png"
//! rotation_x = 90.0
//! x_size = 2.0
//! ignore_lighting = true
//! ```
//!
//! Relative paths resolve against the manifest's directory.

use anyhow::{Context, Result};
use particle_common::{
    CanvasSize, DEFAULT_MAGIC, DEFAULT_TEX_HEIGHT, DEFAULT_TEX_WIDTH, HEADER_PIXELS, HeaderCompat,
    ParticleParams,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::texture::{convert_image, default_output_path};

/// particles.toml manifest structure
#[derive(Debug, Deserialize)]
pub struct ParticleManifest {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub particles: Vec<ParticleEntry>,

    /// Directory relative paths resolve against (set by [`load_manifest`])
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Shared output settings
#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Output directory. Default: next to each input
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Magic tag (PARTICLE_TEX_MAGIC in the renderer config)
    #[serde(default = "default_magic")]
    pub magic: u16,

    /// Output texture width (PARTICLE_TEX_WIDTH)
    #[serde(default = "default_tex_width")]
    pub tex_width: u32,

    /// Output texture height (PARTICLE_TEX_HEIGHT)
    #[serde(default = "default_tex_height")]
    pub tex_height: u32,

    /// Y size encoding: "legacy" (default) or "corrected"
    #[serde(default)]
    pub compat: HeaderCompat,
}

fn default_magic() -> u16 {
    DEFAULT_MAGIC
}

fn default_tex_width() -> u32 {
    DEFAULT_TEX_WIDTH
}

fn default_tex_height() -> u32 {
    DEFAULT_TEX_HEIGHT
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: None,
            magic: DEFAULT_MAGIC,
            tex_width: DEFAULT_TEX_WIDTH,
            tex_height: DEFAULT_TEX_HEIGHT,
            compat: HeaderCompat::default(),
        }
    }
}

impl OutputSection {
    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.tex_width, self.tex_height)
    }
}

/// Single particle entry
#[derive(Debug, Deserialize)]
pub struct ParticleEntry {
    /// Source sprite
    pub path: PathBuf,

    /// Output file name. Default: `<stem>.out.<ext>`
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Forced X rotation in degrees (billboard in X if absent)
    #[serde(default)]
    pub rotation_x: Option<f64>,

    /// Forced Y rotation in degrees (billboard in Y if absent)
    #[serde(default)]
    pub rotation_y: Option<f64>,

    /// X size in blocks
    #[serde(default)]
    pub x_size: Option<f64>,

    /// Y size in blocks
    #[serde(default)]
    pub y_size: Option<f64>,

    /// Always display at full brightness
    #[serde(default)]
    pub ignore_lighting: bool,

    /// Overrides `output.magic` for this entry
    #[serde(default)]
    pub magic: Option<u16>,
}

impl ParticleEntry {
    /// Encoder options for this entry
    pub fn params(&self, output: &OutputSection) -> ParticleParams {
        ParticleParams {
            magic: self.magic.unwrap_or(output.magic),
            rotation_x: self.rotation_x,
            rotation_y: self.rotation_y,
            x_size: self.x_size,
            y_size: self.y_size,
            ignore_lighting: self.ignore_lighting,
            compat: output.compat,
        }
    }
}

impl ParticleManifest {
    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse particles.toml")
    }

    /// Resolve a manifest-relative path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Where `entry` is written, given an optional CLI output directory
    pub fn output_path(&self, entry: &ParticleEntry, output_dir: Option<&Path>) -> PathBuf {
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| self.output.dir.as_deref().map(|d| self.resolve(d)));

        match (dir, &entry.output) {
            (Some(dir), Some(name)) => dir.join(name),
            (Some(dir), None) => {
                let default = default_output_path(&entry.path);
                dir.join(default.file_name().unwrap_or_default())
            }
            (None, Some(name)) => self.resolve(name),
            (None, None) => default_output_path(&self.resolve(&entry.path)),
        }
    }
}

/// Load manifest from file
pub fn load_manifest(path: &Path) -> Result<ParticleManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    let mut manifest = ParticleManifest::parse(&content)
        .with_context(|| format!("Invalid manifest: {}", path.display()))?;
    manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(manifest)
}

/// Validate manifest fields and source files without building
pub fn validate(manifest: &ParticleManifest) -> Result<()> {
    if manifest.particles.is_empty() {
        anyhow::bail!("Manifest declares no [[particles]]");
    }

    if (manifest.output.tex_width as usize) < HEADER_PIXELS {
        anyhow::bail!(
            "Invalid tex_width {} (must be at least {} to hold the header)",
            manifest.output.tex_width,
            HEADER_PIXELS
        );
    }

    if manifest.output.tex_height < 2 {
        anyhow::bail!(
            "Invalid tex_height {} (must be at least 2: one header row plus the sprite)",
            manifest.output.tex_height
        );
    }

    for entry in &manifest.particles {
        let input = manifest.resolve(&entry.path);
        if !input.is_file() {
            anyhow::bail!("Particle source not found: {}", input.display());
        }
    }

    check_unique_outputs(manifest, None)
}

/// Reject entries that would be written to the same file
fn check_unique_outputs(manifest: &ParticleManifest, output_dir: Option<&Path>) -> Result<()> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    for entry in &manifest.particles {
        let output = manifest.output_path(entry, output_dir);
        if let Some(previous) = seen.insert(output.clone(), &entry.path) {
            anyhow::bail!(
                "Particles {} and {} have the same output {} (set `output` on one of them)",
                previous.display(),
                entry.path.display(),
                output.display()
            );
        }
    }
    Ok(())
}

/// Build every particle in the manifest, returning the written paths
pub fn build_all(manifest: &ParticleManifest, output_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    validate(manifest)?;
    if output_dir.is_some() {
        check_unique_outputs(manifest, output_dir)?;
    }

    let canvas = manifest.output.canvas();
    let mut written = Vec::with_capacity(manifest.particles.len());

    for entry in &manifest.particles {
        let input = manifest.resolve(&entry.path);
        let output = manifest.output_path(entry, output_dir);

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        tracing::debug!("Packing {:?} -> {:?}", input, output);
        convert_image(&input, &output, &entry.params(&manifest.output), canvas)?;
        written.push(output);
    }

    tracing::info!("Built {} particle texture(s)", written.len());
    Ok(written)
}
