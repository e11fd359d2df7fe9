mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panelcut", about = "Cut comic strips into panels at native resolution")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image metadata and fit zoom
    Info(commands::info::InfoArgs),
    /// Ask the detection service for panel rectangles
    Detect(commands::detect::DetectArgs),
    /// Extract panels from one image into a ZIP archive
    Crop(commands::crop::CropArgs),
    /// Detect and extract panels for many images, one folder per image
    Batch(commands::batch::BatchArgs),
    /// Render the editor canvas with region overlays
    Preview(commands::preview::PreviewArgs),
    /// Print or save the default editor config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Crop(args) => commands::crop::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
