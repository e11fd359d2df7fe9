use serde::{Deserialize, Serialize};

use crate::error::{PanelcutError, Result};

/// A point in on-screen (zoomed) canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in on-screen (zoomed) canvas coordinates.
///
/// `scale_x` / `scale_y` are the multipliers applied by resizing after
/// creation; the visible extent is always `width * scale_x` by
/// `height * scale_y`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Normalized rectangle spanning two corner points, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (b.x - a.x).abs(),
            (b.y - a.y).abs(),
        )
    }

    pub fn extent_width(&self) -> f64 {
        self.width * self.scale_x
    }

    pub fn extent_height(&self) -> f64 {
        self.height * self.scale_y
    }

    pub fn right(&self) -> f64 {
        self.left + self.extent_width()
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.extent_height()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// True when both visible extents reach `min_size`.
    pub fn meets_min_size(&self, min_size: f64) -> bool {
        let (w, h) = (self.extent_width(), self.extent_height());
        w.is_finite() && h.is_finite() && w >= min_size && h >= min_size && w > 0.0 && h > 0.0
    }

    /// Multiply position and base size by `ratio`, keeping scale multipliers.
    pub fn scaled(&self, ratio: f64) -> Self {
        Self {
            left: self.left * ratio,
            top: self.top * ratio,
            width: self.width * ratio,
            height: self.height * ratio,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
        }
    }
}

/// A rectangle in native image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Overlap of two rectangles, or `None` when they do not intersect.
    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Clip the rect to an image of `src_w` x `src_h` pixels.
    pub fn clamped(&self, src_w: u32, src_h: u32) -> Option<PixelRect> {
        self.intersect(&PixelRect::new(0, 0, src_w, src_h))
    }

    /// Check that the rect is non-empty and lies inside the source image.
    pub fn validated(&self, src_w: u32, src_h: u32) -> Result<PixelRect> {
        if self.is_empty() {
            return Err(PanelcutError::InvalidCrop(
                "crop width and height must be > 0".into(),
            ));
        }
        if self.right() > src_w || self.bottom() > src_h {
            return Err(PanelcutError::InvalidCrop(format!(
                "crop region ({},{} {}x{}) exceeds source dimensions ({src_w}x{src_h})",
                self.x, self.y, self.width, self.height
            )));
        }
        Ok(*self)
    }
}
