use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{DetectionConfig, DetectionParams};
use crate::error::{PanelcutError, Result};
use crate::geometry::ScreenRect;
use crate::region::RegionKind;
use crate::source::SourceImage;

/// One panel as reported by the detection service, in native image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedPanel {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Only present in hand-written region files; the service never sets it.
    #[serde(default, skip_serializing_if = "is_crop")]
    pub kind: RegionKind,
}

fn is_crop(kind: &RegionKind) -> bool {
    *kind == RegionKind::Crop
}

impl DetectedPanel {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            kind: RegionKind::Crop,
        }
    }

    /// Position on a canvas displayed at `zoom`.
    pub fn to_screen(&self, zoom: f64) -> ScreenRect {
        ScreenRect::new(self.left, self.top, self.width, self.height).scaled(zoom)
    }
}

/// Body of a detection response, also used as the regions file format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelList {
    #[serde(default)]
    pub panels: Vec<DetectedPanel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PanelList {
    /// Parse a response body. An `error` field or a missing `panels` list is
    /// a service failure.
    pub fn from_json(body: &str) -> Result<Vec<DetectedPanel>> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        if value.get("panels").is_none() && value.get("error").is_none() {
            return Err(PanelcutError::Detection(
                "response has neither `panels` nor `error`".into(),
            ));
        }
        let list: PanelList = serde_json::from_value(value)?;
        if let Some(err) = list.error {
            return Err(PanelcutError::Detection(err));
        }
        Ok(list.panels)
    }
}

/// Something that can suggest panel rectangles for an image.
pub trait PanelDetector {
    fn detect(&self, source: &SourceImage, params: &DetectionParams) -> Result<Vec<DetectedPanel>>;
}

/// Client for the external HTTP detection service.
pub struct HttpDetector {
    client: Client,
    endpoint: String,
}

impl HttpDetector {
    pub fn new(config: &DetectionConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PanelDetector for HttpDetector {
    fn detect(&self, source: &SourceImage, params: &DetectionParams) -> Result<Vec<DetectedPanel>> {
        let file = Part::bytes(source.bytes().to_vec())
            .file_name(source.name().to_string())
            .mime_str(source.mime_type())?;
        let form = Form::new()
            .part("file", file)
            .text("thresh", params.thresh.to_string())
            .text("blur", params.blur.to_string())
            .text("enhance", params.enhance.to_string())
            .text("invert", params.invert.to_string());

        info!(endpoint = %self.endpoint, source = source.name(), "Requesting panel detection");
        let response = self.client.post(&self.endpoint).multipart(form).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            warn!(%status, "Detection service returned an error status");
            let detail = PanelList::from_json(&body)
                .err()
                .map(|e| e.to_string())
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(PanelcutError::Detection(format!("HTTP {status}: {detail}")));
        }

        let panels = PanelList::from_json(&body)?;
        debug!(count = panels.len(), "Detection response parsed");
        Ok(panels)
    }
}
