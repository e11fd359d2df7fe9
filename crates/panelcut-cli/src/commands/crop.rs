use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use panelcut_core::detect::HttpDetector;
use panelcut_core::EditorSession;

use super::{load_config, open_source, read_regions, DetectionArgs, NamingArg};
use crate::summary::print_crop_summary;

#[derive(Args)]
pub struct CropArgs {
    /// Input image
    pub file: PathBuf,

    /// Editor config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Regions file (JSON, native pixels); detection is used when omitted
    #[arg(long)]
    pub regions: Option<PathBuf>,

    /// Zoom the regions are placed at
    #[arg(long, default_value = "1.0")]
    pub zoom: f64,

    /// Panel file naming scheme
    #[arg(long, value_enum)]
    pub naming: Option<NamingArg>,

    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Also write each panel as a separate PNG into this directory
    #[arg(long)]
    pub panels_dir: Option<PathBuf>,

    /// Output archive path (defaults to the configured archive name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CropArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.detection.apply(&mut config);
    if let Some(naming) = args.naming {
        config.naming = naming.into();
    }
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.archive_name));

    let source = open_source(&args.file, &config)?;
    let source_name = source.name().to_string();
    let size = (source.width(), source.height());

    let mut session = EditorSession::new(config)?;
    session.load_image(source);
    session.set_zoom(args.zoom)?;

    if let Some(ref path) = args.regions {
        let regions = read_regions(path)?;
        let mut dropped = 0;
        for region in &regions {
            if session.add_native_region(region)?.is_none() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            println!("Skipped {} region(s) below the minimum size", dropped);
        }
    } else {
        let detector = HttpDetector::new(&session.config().detection)?;
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        spinner.set_message(format!("Detecting panels via {}", detector.endpoint()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        let result = session.run_detection(&detector);
        spinner.finish_and_clear();
        result.context("Panel detection failed")?;
    }

    let bytes = session
        .export_archive()
        .context("No panels to export")?;
    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write archive to {}", output.display()))?;

    if let Some(ref dir) = args.panels_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for index in 1..=session.previews().len() {
            if let Some((name, png)) = session.export_panel(index) {
                let path = dir.join(name);
                std::fs::write(&path, png)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
    }

    print_crop_summary(
        &source_name,
        size,
        session.previews(),
        session.config().naming,
        &output,
    );

    Ok(())
}
