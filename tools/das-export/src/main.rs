//! das-export - das2 model export tool
//!
//! Converts OBJ meshes to .das model containers

use anyhow::Result;
use clap::{Parser, Subcommand};
use das_common::{DAS_EXT, load_model};
use std::path::PathBuf;

use das_export::{ConvertOptions, convert_obj, manifest};

#[derive(Parser)]
#[command(name = "das-export")]
#[command(about = "das2 model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single OBJ file
    Convert {
        /// Input OBJ file
        input: PathBuf,

        /// Output .das file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Recompute every normal, ignoring normals in the source
        #[arg(long)]
        smooth: bool,

        /// Convert groups in parallel
        #[arg(long)]
        parallel: bool,

        /// Author written into the header
        #[arg(long, default_value = "")]
        author: String,

        /// Comment written into the header
        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Build models from a manifest file
    Build {
        /// Path to das.toml manifest
        #[arg(default_value = "das.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to das.toml manifest
        #[arg(default_value = "das.toml")]
        manifest: PathBuf,
    },

    /// Print a summary of a .das file
    Inspect {
        /// Input .das file
        input: PathBuf,
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
        Commands::Convert {
            input,
            output,
            smooth,
            parallel,
            author,
            comment,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(DAS_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let ext = input
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_lowercase())
                .unwrap_or_default();
            if ext != "obj" {
                anyhow::bail!("Unsupported model format: {:?} (use .obj)", input);
            }

            let options = ConvertOptions {
                smooth_normals: smooth,
                parallel,
                author,
                comment,
            };
            let report = convert_obj(&input, &output, &options)?;
            for diagnostic in &report.diagnostics {
                tracing::debug!("{:?}", diagnostic);
            }
            tracing::info!("Done!");
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building models from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Inspect { input } => inspect(&input)?,
    }

    Ok(())
}

fn inspect(input: &std::path::Path) -> Result<()> {
    let model = load_model(input)?;
    let header = &model.header;

    println!("{}", input.display());
    println!("  author:    {}", header.author);
    println!("  comment:   {}", header.comment);
    println!("  meshes:    {}", header.mesh_count);
    println!("  vertices:  {}", header.vertices_count);
    println!("  anims:     {}", header.animation_count);
    println!("  scenes:    {} (default {})", model.scenes.len(), header.default_scene_index);
    for (id, buffer) in model.buffers.iter().enumerate() {
        println!("  buffer {}: {} bytes", id, buffer.size());
    }
    for (id, mesh) in model.meshes.iter().enumerate() {
        let channel = |present: bool| if present { "yes" } else { "no" };
        println!(
            "  mesh {}: {} vertices, {} indices, uv channels {}, normals {}, skinned {}, morph targets {}, lods {}",
            id,
            mesh.vertex_count,
            mesh.draw_count,
            mesh.uv_channel_count(),
            channel(mesh.normals.is_present()),
            channel(mesh.is_skinned()),
            mesh.morph_targets.len(),
            mesh.lods.len()
        );
    }

    Ok(())
}
