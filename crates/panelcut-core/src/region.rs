use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DELETE_CONTROL_OFFSET, DELETE_CONTROL_RADIUS, RESIZE_HANDLE_SIZE};
use crate::geometry::{Point, ScreenRect};

/// Stable identifier of a region within one registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a region is used for. Only crop regions are exported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    #[default]
    Crop,
    /// Painted white over the image, in the editor and in exported crops.
    Mask,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crop => write!(f, "crop"),
            Self::Mask => write!(f, "mask"),
        }
    }
}

/// Interactions a single region supports. Each region owns its own set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionControls {
    pub deletable: bool,
    pub movable: bool,
    pub resizable: bool,
}

impl Default for RegionControls {
    fn default() -> Self {
        Self {
            deletable: true,
            movable: true,
            resizable: true,
        }
    }
}

/// Part of a region hit by a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionHit {
    DeleteControl,
    ResizeHandle,
    Body,
}

/// A rectangle on the editor canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub kind: RegionKind,
    pub rect: ScreenRect,
    pub controls: RegionControls,
}

impl Region {
    pub(crate) fn new(id: RegionId, kind: RegionKind, rect: ScreenRect) -> Self {
        Self {
            id,
            kind,
            rect,
            controls: RegionControls::default(),
        }
    }

    pub fn is_crop(&self) -> bool {
        self.kind == RegionKind::Crop
    }

    /// Centre of the delete control, inset from the top-right corner.
    pub fn delete_control_center(&self) -> Point {
        Point::new(
            self.rect.right() - DELETE_CONTROL_OFFSET,
            self.rect.top + DELETE_CONTROL_OFFSET,
        )
    }

    /// Which part of this region (if any) lies under `p`.
    ///
    /// Controls the region does not support are never reported.
    pub fn hit(&self, p: Point) -> Option<RegionHit> {
        if self.controls.deletable {
            let c = self.delete_control_center();
            let (dx, dy) = (p.x - c.x, p.y - c.y);
            if dx * dx + dy * dy <= DELETE_CONTROL_RADIUS * DELETE_CONTROL_RADIUS {
                return Some(RegionHit::DeleteControl);
            }
        }
        if self.controls.resizable {
            let (r, b) = (self.rect.right(), self.rect.bottom());
            let half = RESIZE_HANDLE_SIZE / 2.0;
            if (p.x - r).abs() <= half && (p.y - b).abs() <= half {
                return Some(RegionHit::ResizeHandle);
            }
        }
        if self.rect.contains(p) {
            return Some(RegionHit::Body);
        }
        None
    }
}
