use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ARCHIVE_NAME, DEFAULT_DECODE_TIMEOUT_SECS, DEFAULT_DETECTION_BLUR,
    DEFAULT_DETECTION_ENDPOINT, DEFAULT_DETECTION_THRESH, DEFAULT_DETECTION_TIMEOUT_SECS,
    DEFAULT_FIT_PADDING, DEFAULT_INITIAL_ZOOM, DEFAULT_MAX_ZOOM, DEFAULT_MIN_REGION_SIZE,
    DEFAULT_MIN_ZOOM, DEFAULT_ZOOM_STEP,
};
use crate::error::{PanelcutError, Result};
use crate::ordering::PanelNaming;
use crate::region::RegionKind;

/// Full editor configuration. Every field has a default so partial TOML
/// files are accepted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub zoom: ZoomConfig,
    /// Minimum on-screen width/height of a region.
    #[serde(default = "default_min_region_size")]
    pub min_region_size: f64,
    #[serde(default)]
    pub naming: PanelNaming,
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
    #[serde(default = "default_decode_timeout_secs")]
    pub decode_timeout_secs: u64,
    /// Kind of region created by pointer drawing (masking mode when `Mask`).
    #[serde(default)]
    pub draw_kind: RegionKind,
    #[serde(default)]
    pub detection: DetectionConfig,
}

fn default_min_region_size() -> f64 {
    DEFAULT_MIN_REGION_SIZE
}
fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}
fn default_decode_timeout_secs() -> u64 {
    DEFAULT_DECODE_TIMEOUT_SECS
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomConfig::default(),
            min_region_size: DEFAULT_MIN_REGION_SIZE,
            naming: PanelNaming::default(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            decode_timeout_secs: DEFAULT_DECODE_TIMEOUT_SECS,
            draw_kind: RegionKind::default(),
            detection: DetectionConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn decode_timeout(&self) -> Duration {
        Duration::from_secs(self.decode_timeout_secs)
    }

    /// Reject settings that would make the editor unusable.
    pub fn validate(&self) -> Result<()> {
        let z = &self.zoom;
        if !(z.min > 0.0 && z.min <= z.max && z.max.is_finite()) {
            return Err(PanelcutError::InvalidConfig(format!(
                "zoom range [{}, {}] must be positive and ordered",
                z.min, z.max
            )));
        }
        if !(z.step > 0.0) {
            return Err(PanelcutError::InvalidConfig(format!(
                "zoom step must be > 0, got {}",
                z.step
            )));
        }
        if !(self.min_region_size >= 0.0) {
            return Err(PanelcutError::InvalidConfig(format!(
                "min_region_size must be >= 0, got {}",
                self.min_region_size
            )));
        }
        if self.archive_name.trim().is_empty() {
            return Err(PanelcutError::InvalidConfig(
                "archive_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Zoom limits and behaviour of the viewport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    #[serde(default = "default_min_zoom")]
    pub min: f64,
    #[serde(default = "default_max_zoom")]
    pub max: f64,
    #[serde(default = "default_zoom_step")]
    pub step: f64,
    #[serde(default = "default_initial_zoom")]
    pub initial: f64,
    /// Padding kept free when fitting the image to its container.
    #[serde(default = "default_fit_padding")]
    pub fit_padding: f64,
}

fn default_min_zoom() -> f64 {
    DEFAULT_MIN_ZOOM
}
fn default_max_zoom() -> f64 {
    DEFAULT_MAX_ZOOM
}
fn default_zoom_step() -> f64 {
    DEFAULT_ZOOM_STEP
}
fn default_initial_zoom() -> f64 {
    DEFAULT_INITIAL_ZOOM
}
fn default_fit_padding() -> f64 {
    DEFAULT_FIT_PADDING
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
            step: DEFAULT_ZOOM_STEP,
            initial: DEFAULT_INITIAL_ZOOM,
            fit_padding: DEFAULT_FIT_PADDING,
        }
    }
}

/// Where and how to reach the panel detection service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_detection_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub params: DetectionParams,
}

fn default_endpoint() -> String {
    DEFAULT_DETECTION_ENDPOINT.to_string()
}
fn default_detection_timeout_secs() -> u64 {
    DEFAULT_DETECTION_TIMEOUT_SECS
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DETECTION_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_DETECTION_TIMEOUT_SECS,
            params: DetectionParams::default(),
        }
    }
}

impl DetectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Tuning parameters forwarded to the detection service as form fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Fallback binarization threshold (0-255).
    #[serde(default = "default_thresh")]
    pub thresh: u8,
    /// Median blur kernel size; values <= 1 disable blurring.
    #[serde(default = "default_blur")]
    pub blur: u32,
    /// Apply contrast enhancement before detection.
    #[serde(default)]
    pub enhance: bool,
    /// Treat the strip as light panels on a dark background.
    #[serde(default)]
    pub invert: bool,
}

fn default_thresh() -> u8 {
    DEFAULT_DETECTION_THRESH
}
fn default_blur() -> u32 {
    DEFAULT_DETECTION_BLUR
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            thresh: DEFAULT_DETECTION_THRESH,
            blur: DEFAULT_DETECTION_BLUR,
            enhance: false,
            invert: false,
        }
    }
}

impl fmt::Display for DetectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thresh {}, blur {}", self.thresh, self.blur)?;
        if self.enhance {
            write!(f, ", enhanced")?;
        }
        if self.invert {
            write!(f, ", inverted")?;
        }
        Ok(())
    }
}
