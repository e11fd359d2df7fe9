use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use panelcut_core::EditorSession;

use super::{load_config, open_source};

#[derive(Args)]
pub struct InfoArgs {
    /// Input image
    pub file: PathBuf,

    /// Editor config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Container width used to compute the fit zoom
    #[arg(long, default_value = "1280")]
    pub container_width: f64,

    /// Container height used to compute the fit zoom
    #[arg(long, default_value = "800")]
    pub container_height: f64,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let source = open_source(&args.file, &config)?;

    println!("File:        {}", source.name());
    println!("Dimensions:  {}x{}", source.width(), source.height());
    println!("Format:      {}", source.mime_type());
    println!(
        "File size:   {:.1} KB",
        source.bytes().len() as f64 / 1024.0
    );

    let mut session = EditorSession::new(config)?;
    session.set_container(args.container_width, args.container_height);
    session.load_image(source);
    let zoom = session.viewport().zoom();
    if let Some((w, h)) = session.viewport().canvas_size() {
        println!(
            "Fit zoom:    {:.3} ({:.0}x{:.0} in {}x{})",
            zoom, w, h, args.container_width, args.container_height
        );
    }

    Ok(())
}
