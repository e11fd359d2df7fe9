use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use panelcut_core::detect::HttpDetector;
use panelcut_core::extract::encode_png;
use panelcut_core::EditorSession;

use super::{load_config, open_source, read_regions, DetectionArgs};

#[derive(Args)]
pub struct PreviewArgs {
    /// Input image
    pub file: PathBuf,

    /// Editor config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Regions file (JSON, native pixels)
    #[arg(long)]
    pub regions: Option<PathBuf>,

    /// Ask the detection service when no regions file is given
    #[arg(long)]
    pub detect: bool,

    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Zoom to render the canvas at
    #[arg(long, default_value = "0.5")]
    pub zoom: f64,

    /// Output PNG path
    #[arg(short, long, default_value = "preview.png")]
    pub output: PathBuf,
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.detection.apply(&mut config);
    let source = open_source(&args.file, &config)?;

    let mut session = EditorSession::new(config)?;
    session.load_image(source);
    session.set_zoom(args.zoom)?;

    if let Some(ref path) = args.regions {
        for region in read_regions(path)? {
            session.add_native_region(&region)?;
        }
    } else if args.detect {
        let detector = HttpDetector::new(&session.config().detection)?;
        session
            .run_detection(&detector)
            .context("Panel detection failed")?;
    }

    let canvas = session
        .render_view()
        .context("No image loaded")?;
    let png = encode_png(&canvas)?;
    std::fs::write(&args.output, png)
        .with_context(|| format!("Failed to write preview to {}", args.output.display()))?;

    println!(
        "Preview {}x{} with {} region(s) saved to {}",
        canvas.width(),
        canvas.height(),
        session.registry().len(),
        args.output.display()
    );

    Ok(())
}
