//! ink-mesh-export - stroke mesh packing tool
//!
//! Packs JSON meshes into quantized `.inkmesh` files and inspects the result.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ink_mesh_export::{inspect_file, pack_file};

#[derive(Parser)]
#[command(name = "ink-mesh-export")]
#[command(about = "Stroke mesh packing tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a JSON mesh into .inkmesh files
    Pack {
        /// Input mesh (JSON)
        input: PathBuf,

        /// Output .inkmesh file (numbered when the mesh is partitioned)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Packing manifest (TOML)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Print the contents of an .inkmesh file
    Inspect {
        /// Input .inkmesh file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            input,
            output,
            manifest,
        } => {
            tracing::info!("Packing {:?}", input);
            let written = pack_file(&input, output.as_deref(), manifest.as_deref())?;
            tracing::info!("Wrote {} mesh file(s)", written.len());
        }
        Commands::Inspect { input } => {
            inspect_file(&input)?;
        }
    }

    Ok(())
}
