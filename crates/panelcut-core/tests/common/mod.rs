#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Cursor;

use image::{Rgba, RgbaImage};

use panelcut_core::config::{DetectionParams, EditorConfig};
use panelcut_core::detect::{DetectedPanel, PanelDetector};
use panelcut_core::error::{PanelcutError, Result};
use panelcut_core::session::EditorSession;
use panelcut_core::source::SourceImage;

/// Pixel value encoding its own coordinates, so crops can be checked for
/// where they came from.
pub fn pattern_pixel(x: u32, y: u32) -> Rgba<u8> {
    Rgba([
        (x % 256) as u8,
        (y % 256) as u8,
        ((x / 256) as u8) | (((y / 256) as u8) << 4),
        255,
    ])
}

/// Build a `w` x `h` image filled with [`pattern_pixel`].
pub fn pattern_image(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, pattern_pixel)
}

/// Synthetic source image named `name`.
pub fn pattern_source(name: &str, w: u32, h: u32) -> SourceImage {
    SourceImage::from_pixels(name, pattern_image(w, h)).expect("valid source")
}

/// Session with a pattern image loaded at `zoom`.
pub fn session_with_image(w: u32, h: u32, zoom: f64) -> EditorSession {
    let mut session = EditorSession::new(EditorConfig::default()).expect("default config");
    session.load_image(pattern_source("strip.png", w, h));
    session.set_zoom(zoom).expect("zoom").expect("image loaded");
    session
}

/// Decode a PNG buffer.
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes)
        .expect("decode png")
        .to_rgba8()
}

/// Names of all entries in a zip archive, in archive order.
pub fn archive_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect()
}

/// Read one archive entry fully.
pub fn archive_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
    let mut file = archive.by_name(name).expect("entry exists");
    let mut out = Vec::new();
    file.read_to_end(&mut out).expect("read entry");
    out
}

/// Detector returning a queued response per call; repeats the last one
/// when the queue runs dry.
pub struct ScriptedDetector {
    responses: RefCell<VecDeque<Vec<DetectedPanel>>>,
    last: RefCell<Vec<DetectedPanel>>,
    pub calls: Cell<usize>,
}

impl ScriptedDetector {
    pub fn new(responses: Vec<Vec<DetectedPanel>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            last: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }

    /// Always answer with `panels`.
    pub fn fixed(panels: Vec<DetectedPanel>) -> Self {
        Self::new(vec![panels])
    }
}

impl PanelDetector for ScriptedDetector {
    fn detect(&self, _source: &SourceImage, _params: &DetectionParams) -> Result<Vec<DetectedPanel>> {
        self.calls.set(self.calls.get() + 1);
        if let Some(next) = self.responses.borrow_mut().pop_front() {
            *self.last.borrow_mut() = next;
        }
        Ok(self.last.borrow().clone())
    }
}

/// Detector that always fails, like an unreachable service.
pub struct FailingDetector;

impl PanelDetector for FailingDetector {
    fn detect(&self, _source: &SourceImage, _params: &DetectionParams) -> Result<Vec<DetectedPanel>> {
        Err(PanelcutError::Detection("service unavailable".into()))
    }
}

/// `count` full-width panels of height `h`, separated by `gap` pixels.
pub fn stacked_panels(count: usize, width: f64, h: f64, gap: f64) -> Vec<DetectedPanel> {
    (0..count)
        .map(|i| DetectedPanel::new(0.0, i as f64 * (h + gap), width, h))
        .collect()
}
