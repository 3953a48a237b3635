//! particle-export - particle texture packing tool
//!
//! Packs particle metadata (magic, flags, forced rotation and size) into the
//! top row of a texture and copies the sprite below it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use particle_common::{
    CanvasSize, DEFAULT_MAGIC, DEFAULT_TEX_HEIGHT, DEFAULT_TEX_WIDTH, HeaderCompat, ParticleParams,
};
use std::path::PathBuf;

// Use modules from library
use particle_export::{inspect, manifest, texture};

#[derive(Parser)]
#[command(name = "particle-export")]
#[command(about = "Generates textures for custom particle packs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a single sprite into a particle texture
    Create {
        /// Input sprite (PNG)
        filename: PathBuf,

        /// Output texture (default: <name>.out.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// X rotation to force, in degrees - will billboard in X if not present
        #[arg(long, allow_negative_numbers = true)]
        rotation_x: Option<f64>,

        /// Y rotation to force, in degrees - will billboard in Y if not present
        #[arg(long, allow_negative_numbers = true)]
        rotation_y: Option<f64>,

        /// X size (in blocks)
        #[arg(long, allow_negative_numbers = true)]
        x_size: Option<f64>,

        /// Y size (in blocks)
        #[arg(long, allow_negative_numbers = true)]
        y_size: Option<f64>,

        /// Always display at full brightness, ignoring lighting (including inside a block)
        #[arg(long)]
        ignore_lighting: bool,

        /// Custom magic color (PARTICLE_TEX_MAGIC in config)
        #[arg(long, default_value_t = DEFAULT_MAGIC)]
        magic: u16,

        /// Output texture width (PARTICLE_TEX_WIDTH in config)
        #[arg(long, default_value_t = DEFAULT_TEX_WIDTH)]
        output_tex_width: u32,

        /// Output texture height (PARTICLE_TEX_HEIGHT in config)
        #[arg(long, default_value_t = DEFAULT_TEX_HEIGHT)]
        output_tex_height: u32,

        /// Encode the Y size from --y-size instead of mirroring --x-size
        #[arg(long)]
        corrected_y_size: bool,
    },

    /// Build particle textures from a manifest file
    Build {
        /// Path to particles.toml manifest
        #[arg(default_value = "particles.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to particles.toml manifest
        #[arg(default_value = "particles.toml")]
        manifest: PathBuf,
    },

    /// Decode the header of an existing particle texture
    Inspect {
        /// Particle texture to inspect
        input: PathBuf,

        /// Fail unless the header carries this magic
        #[arg(long)]
        magic: Option<u16>,

        /// Write the embedded sprite to this file
        #[arg(long)]
        extract: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            filename,
            output,
            rotation_x,
            rotation_y,
            x_size,
            y_size,
            ignore_lighting,
            magic,
            output_tex_width,
            output_tex_height,
            corrected_y_size,
        } => {
            let output = output.unwrap_or_else(|| texture::default_output_path(&filename));
            let params = ParticleParams {
                magic,
                rotation_x,
                rotation_y,
                x_size,
                y_size,
                ignore_lighting,
                compat: if corrected_y_size {
                    HeaderCompat::Corrected
                } else {
                    HeaderCompat::Legacy
                },
            };
            let canvas = CanvasSize::new(output_tex_width, output_tex_height);

            tracing::info!("Converting {:?} -> {:?}", filename, output);
            texture::convert_image(&filename, &output, &params, canvas)?;
            tracing::info!("Done!");
        }

        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building particles from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let written = manifest::build_all(&config, output.as_deref())?;
            if verbose {
                for path in &written {
                    tracing::info!("  {:?}", path);
                }
            }
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Inspect {
            input,
            magic,
            extract,
        } => {
            inspect::inspect_texture(&input, magic, extract.as_deref())?;
        }
    }

    Ok(())
}
