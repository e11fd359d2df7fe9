pub mod batch;
pub mod config;
pub mod crop;
pub mod detect;
pub mod info;
pub mod preview;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use panelcut_core::detect::{DetectedPanel, PanelList};
use panelcut_core::ordering::PanelNaming;
use panelcut_core::source::SourceImage;
use panelcut_core::EditorConfig;
use tracing::debug;

#[derive(Clone, Copy, ValueEnum)]
pub enum NamingArg {
    /// p1.png, p2.png, ...
    Short,
    /// panel_1.png, panel_2.png, ...
    Long,
}

impl From<NamingArg> for PanelNaming {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::Short => PanelNaming::Short,
            NamingArg::Long => PanelNaming::Long,
        }
    }
}

/// Detection service options shared by every command that calls it.
/// Anything left unset keeps the value from the config file.
#[derive(Args)]
pub struct DetectionArgs {
    /// Detection service endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Fallback binarization threshold (0-255)
    #[arg(long)]
    pub thresh: Option<u8>,

    /// Median blur kernel size
    #[arg(long)]
    pub blur: Option<u32>,

    /// Enhance contrast before detection
    #[arg(long)]
    pub enhance: bool,

    /// Light panels on a dark background
    #[arg(long)]
    pub invert: bool,
}

impl DetectionArgs {
    pub fn apply(&self, config: &mut EditorConfig) {
        let detection = &mut config.detection;
        if let Some(ref endpoint) = self.endpoint {
            detection.endpoint = endpoint.clone();
        }
        if let Some(thresh) = self.thresh {
            detection.params.thresh = thresh;
        }
        if let Some(blur) = self.blur {
            detection.params.blur = blur;
        }
        detection.params.enhance |= self.enhance;
        detection.params.invert |= self.invert;
    }
}

/// Load an editor config from TOML, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let config = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: EditorConfig =
                toml::from_str(&contents).context("Invalid editor config")?;
            debug!(path = %path.display(), "Loaded editor config");
            config
        }
        None => EditorConfig::default(),
    };
    Ok(config)
}

/// Read a regions file: the detection response format, native pixels.
pub fn read_regions(path: &Path) -> Result<Vec<DetectedPanel>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read regions {}", path.display()))?;
    PanelList::from_json(&contents)
        .with_context(|| format!("Invalid regions file {}", path.display()))
}

pub fn open_source(path: &Path, config: &EditorConfig) -> Result<SourceImage> {
    SourceImage::open(path, config.decode_timeout())
        .with_context(|| format!("Failed to load image {}", path.display()))
}
