use tracing::debug;

use crate::config::ZoomConfig;
use crate::geometry::{PixelRect, ScreenRect};

/// Zoom and native-size state of the editor canvas.
///
/// `zoom` is on-screen pixels per native pixel. Until an image establishes
/// the native size every zoom operation is a no-op.
#[derive(Clone, Debug)]
pub struct ViewportState {
    zoom: f64,
    native_size: Option<(u32, u32)>,
    limits: ZoomConfig,
}

impl ViewportState {
    pub fn new(limits: ZoomConfig) -> Self {
        Self {
            zoom: limits.initial,
            native_size: None,
            limits,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn native_size(&self) -> Option<(u32, u32)> {
        self.native_size
    }

    pub fn limits(&self) -> &ZoomConfig {
        &self.limits
    }

    /// Displayed canvas size, `native * zoom`.
    pub fn canvas_size(&self) -> Option<(f64, f64)> {
        self.native_size
            .map(|(w, h)| (w as f64 * self.zoom, h as f64 * self.zoom))
    }

    /// Establish the native size of a freshly loaded image.
    pub(crate) fn attach(&mut self, width: u32, height: u32) {
        self.native_size = Some((width, height));
    }

    pub(crate) fn detach(&mut self) {
        self.native_size = None;
        self.zoom = self.limits.initial;
    }

    /// Clamp `factor` into the configured range and apply it.
    ///
    /// Returns the applied zoom, or `None` when no image is loaded.
    pub fn set_zoom(&mut self, factor: f64) -> Option<f64> {
        self.native_size?;
        if !factor.is_finite() {
            return None;
        }
        let limited = factor.clamp(self.limits.min, self.limits.max);
        debug!(requested = factor, applied = limited, "Zoom changed");
        self.zoom = limited;
        Some(limited)
    }

    /// Fit the whole image into a `container_w` x `container_h` box, keeping
    /// `padding` free.
    pub fn fit_to_container(
        &mut self,
        container_w: f64,
        container_h: f64,
        padding: f64,
    ) -> Option<f64> {
        let (nw, nh) = self.native_size?;
        let factor = ((container_w - padding) / nw as f64).min((container_h - padding) / nh as f64);
        self.set_zoom(factor)
    }

    pub fn zoom_in(&mut self) -> Option<f64> {
        self.set_zoom(self.zoom + self.limits.step)
    }

    pub fn zoom_out(&mut self) -> Option<f64> {
        self.set_zoom(self.zoom - self.limits.step)
    }

    /// Map an on-screen rectangle to native pixels.
    ///
    /// Each component is rounded independently so the output size depends
    /// only on the native footprint, not on the zoom it was drawn at. Any part
    /// left of or above the origin is cut off, shrinking the extent by the
    /// same amount.
    pub fn screen_to_native(&self, rect: &ScreenRect) -> PixelRect {
        let inv = 1.0 / self.zoom;
        let (x, width) = clip_origin(rect.left * inv, rect.extent_width() * inv);
        let (y, height) = clip_origin(rect.top * inv, rect.extent_height() * inv);
        PixelRect::new(x, y, width, height)
    }

    /// Map a native-pixel rectangle (e.g. a detection result) to the current
    /// on-screen space.
    pub fn native_to_screen(&self, rect: &PixelRect) -> ScreenRect {
        ScreenRect::new(
            rect.x as f64 * self.zoom,
            rect.y as f64 * self.zoom,
            rect.width as f64 * self.zoom,
            rect.height as f64 * self.zoom,
        )
    }
}

/// Round a native start and extent, dropping whatever falls below zero.
fn clip_origin(start: f64, extent: f64) -> (u32, u32) {
    let start = if start.is_finite() { start.round() } else { 0.0 };
    let extent = to_pixel(extent);
    if start < 0.0 {
        let cut = (-start).min(u32::MAX as f64) as u32;
        (0, extent.saturating_sub(cut))
    } else {
        (to_pixel(start), extent)
    }
}

fn to_pixel(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}
