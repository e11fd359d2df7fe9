use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use panelcut_core::batch::{run_batch_files, BatchStage, ProgressReporter};
use panelcut_core::detect::HttpDetector;

use super::{load_config, DetectionArgs, NamingArg};
use crate::summary::print_batch_summary;

#[derive(Args)]
pub struct BatchArgs {
    /// Input images
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Editor config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Panel file naming scheme
    #[arg(long, value_enum)]
    pub naming: Option<NamingArg>,

    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Output archive path (defaults to the configured archive name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Drives a single progress bar through the batch stages.
struct BarReporter {
    pb: ProgressBar,
}

impl BarReporter {
    fn new() -> Result<Self> {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:18} [{bar:40}] {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        Ok(Self { pb })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: BatchStage, total_items: Option<usize>) {
        self.pb.reset();
        self.pb.set_prefix(stage.to_string());
        self.pb.set_length(total_items.unwrap_or(0) as u64);
    }

    fn item_started(&self, name: &str) {
        self.pb.set_message(name.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        self.pb.set_message("");
    }
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.detection.apply(&mut config);
    if let Some(naming) = args.naming {
        config.naming = naming.into();
    }
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.archive_name));

    println!(
        "Processing {} image(s) via {} ({})",
        args.files.len(),
        config.detection.endpoint,
        config.detection.params
    );

    let detector = HttpDetector::new(&config.detection)?;
    let reporter = BarReporter::new()?;
    let report = run_batch_files(&args.files, &config, &detector, &reporter)?;
    let bytes = report.package(config.naming, &reporter);
    reporter.pb.finish_with_message("Done");

    let bytes = bytes.context("No panels found in any image")?;
    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write archive to {}", output.display()))?;

    print_batch_summary(&report, config.naming, &output);

    Ok(())
}
