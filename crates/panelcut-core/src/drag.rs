use crate::geometry::{Point, ScreenRect};
use crate::region::{RegionId, RegionKind};

/// What a live pointer drag is doing.
#[derive(Clone, Debug, PartialEq)]
pub enum DragMode {
    /// Rubber-band drawing of a new region from `start`.
    Draw { kind: RegionKind, start: Point },
    /// Moving a region; `offset` is pointer minus the region's top-left.
    Move { id: RegionId, offset: Point },
    /// Corner resize of a region. The base size is fixed; only the scale
    /// multipliers change.
    Resize {
        id: RegionId,
        origin: Point,
        base_width: f64,
        base_height: f64,
    },
}

/// A single pointer drag, from press to release.
///
/// The session holds at most one of these. It is created on pointer-down,
/// fed pointer positions while it lives, and consumed on release or cancel,
/// so there is never more than one set of move/up handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    mode: DragMode,
    current: Point,
}

/// Effect of a drag update or release on the registry.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    /// Draw in progress or finished: the rectangle spanned so far.
    Rubber { kind: RegionKind, rect: ScreenRect },
    Moved { id: RegionId, left: f64, top: f64 },
    Resized { id: RegionId, scale_x: f64, scale_y: f64 },
}

impl DragSession {
    pub fn draw(kind: RegionKind, start: Point) -> Self {
        Self {
            mode: DragMode::Draw { kind, start },
            current: start,
        }
    }

    pub fn moving(id: RegionId, pointer: Point, rect: &ScreenRect) -> Self {
        Self {
            mode: DragMode::Move {
                id,
                offset: Point::new(pointer.x - rect.left, pointer.y - rect.top),
            },
            current: pointer,
        }
    }

    pub fn resizing(id: RegionId, pointer: Point, rect: &ScreenRect) -> Self {
        Self {
            mode: DragMode::Resize {
                id,
                origin: Point::new(rect.left, rect.top),
                base_width: rect.width,
                base_height: rect.height,
            },
            current: pointer,
        }
    }

    pub fn mode(&self) -> &DragMode {
        &self.mode
    }

    pub fn current(&self) -> Point {
        self.current
    }

    /// Feed a new pointer position and return the resulting change.
    pub fn update(&mut self, pointer: Point) -> DragOutcome {
        self.current = pointer;
        self.outcome()
    }

    /// Change implied by the current pointer position.
    pub fn outcome(&self) -> DragOutcome {
        let p = self.current;
        match self.mode {
            DragMode::Draw { kind, start } => DragOutcome::Rubber {
                kind,
                rect: ScreenRect::from_corners(start, p),
            },
            DragMode::Move { id, offset } => DragOutcome::Moved {
                id,
                left: p.x - offset.x,
                top: p.y - offset.y,
            },
            DragMode::Resize {
                id,
                origin,
                base_width,
                base_height,
            } => DragOutcome::Resized {
                id,
                scale_x: (p.x - origin.x).max(0.0) / base_width,
                scale_y: (p.y - origin.y).max(0.0) / base_height,
            },
        }
    }

    /// Finish the drag at `pointer`, consuming the session.
    pub fn end(mut self, pointer: Point) -> DragOutcome {
        self.update(pointer)
    }
}
