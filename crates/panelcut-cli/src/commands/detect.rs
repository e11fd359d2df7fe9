use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use panelcut_core::detect::{HttpDetector, PanelDetector, PanelList};

use super::{load_config, open_source, DetectionArgs};

#[derive(Args)]
pub struct DetectArgs {
    /// Input image
    pub file: PathBuf,

    /// Editor config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Write the regions as JSON instead of printing a table
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.detection.apply(&mut config);
    let source = open_source(&args.file, &config)?;

    let detector = HttpDetector::new(&config.detection)?;
    println!(
        "Detecting panels in {} via {} ({})",
        source.name(),
        detector.endpoint(),
        config.detection.params
    );
    let panels = detector
        .detect(&source, &config.detection.params)
        .context("Panel detection failed")?;

    if let Some(ref path) = args.output {
        let list = PanelList {
            panels,
            error: None,
        };
        let json = serde_json::to_string_pretty(&list)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write regions to {}", path.display()))?;
        println!("{} regions saved to {}", list.panels.len(), path.display());
        return Ok(());
    }

    println!("\n{} panels:", panels.len());
    println!("{:>5}  {:>8}  {:>8}  {:>8}  {:>8}", "#", "Left", "Top", "Width", "Height");
    println!("{}", "-".repeat(45));
    for (i, p) in panels.iter().enumerate() {
        println!(
            "{:>5}  {:>8.0}  {:>8.0}  {:>8.0}  {:>8.0}",
            i + 1,
            p.left,
            p.top,
            p.width,
            p.height
        );
    }

    Ok(())
}
