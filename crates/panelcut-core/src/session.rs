use image::RgbaImage;
use tracing::{debug, info};

use crate::archive::build_archive;
use crate::config::EditorConfig;
use crate::detect::{DetectedPanel, PanelDetector};
use crate::drag::{DragOutcome, DragSession};
use crate::error::{PanelcutError, Result};
use crate::extract::{extract_panels, ExtractedPanel};
use crate::geometry::{Point, ScreenRect};
use crate::region::{Region, RegionControls, RegionHit, RegionId, RegionKind};
use crate::registry::RegionRegistry;
use crate::render::render_view;
use crate::source::SourceImage;
use crate::viewport::ViewportState;

/// Proof of which image a detection request was issued for.
///
/// Taken before the (slow) request and handed back with its result, so a
/// response for an image that has since been replaced is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectionTicket {
    generation: u64,
}

/// What a pointer event did to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEffect {
    /// Nothing happened (no image, or the region refuses the interaction).
    Ignored,
    DragStarted,
    Created(RegionId),
    /// A drawn rectangle was below the minimum size and dropped.
    Discarded,
    Deleted(RegionId),
    Moved(RegionId),
    Resized(RegionId),
}

/// One editing session over one image at a time.
///
/// Owns the viewport, the regions, the loaded image and the preview gallery.
/// Every mutation recomputes the previews before returning, so the gallery
/// always matches the canvas.
pub struct EditorSession {
    config: EditorConfig,
    viewport: ViewportState,
    registry: RegionRegistry,
    source: Option<SourceImage>,
    previews: Vec<ExtractedPanel>,
    generation: u64,
    drag: Option<DragSession>,
    container: Option<(f64, f64)>,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            viewport: ViewportState::new(config.zoom.clone()),
            registry: RegionRegistry::new(config.min_region_size),
            config,
            source: None,
            previews: Vec::new(),
            generation: 0,
            drag: None,
            container: None,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Extracted crops in export order.
    pub fn previews(&self) -> &[ExtractedPanel] {
        &self.previews
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Remember the size of the box the canvas is shown in; used to fit
    /// newly loaded images.
    pub fn set_container(&mut self, width: f64, height: f64) {
        self.container = Some((width, height));
    }

    /// Replace the current image. All regions, previews and any live drag
    /// are discarded; outstanding detection tickets become stale.
    pub fn load_image(&mut self, source: SourceImage) {
        self.drag = None;
        self.registry.clear_all();
        self.previews.clear();
        self.generation += 1;

        self.viewport.detach();
        self.viewport.attach(source.width(), source.height());
        info!(
            name = source.name(),
            width = source.width(),
            height = source.height(),
            "Image loaded"
        );
        self.source = Some(source);

        let zoom = match self.container {
            Some((w, h)) => self
                .viewport
                .fit_to_container(w, h, self.config.zoom.fit_padding),
            None => self.viewport.set_zoom(self.config.zoom.initial),
        };
        debug!(?zoom, "Initial zoom");
    }

    /// Drop the image and everything drawn on it.
    pub fn clear_all(&mut self) {
        self.drag = None;
        self.registry.clear_all();
        self.previews.clear();
        self.source = None;
        self.viewport.detach();
        self.generation += 1;
    }

    fn refresh_previews(&mut self) -> Result<()> {
        self.previews = match &self.source {
            Some(source) => extract_panels(source, &self.viewport, &self.registry)?,
            None => Vec::new(),
        };
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Zoom
    // ---------------------------------------------------------------------

    /// Apply a zoom factor, rescaling regions so their native footprint does
    /// not move. `Ok(None)` when no image is loaded.
    pub fn set_zoom(&mut self, factor: f64) -> Result<Option<f64>> {
        let old = self.viewport.zoom();
        let Some(new) = self.viewport.set_zoom(factor) else {
            return Ok(None);
        };
        self.registry.rescale_all(new / old);
        self.refresh_previews()?;
        Ok(Some(new))
    }

    pub fn zoom_in(&mut self) -> Result<Option<f64>> {
        self.set_zoom(self.viewport.zoom() + self.config.zoom.step)
    }

    pub fn zoom_out(&mut self) -> Result<Option<f64>> {
        self.set_zoom(self.viewport.zoom() - self.config.zoom.step)
    }

    pub fn fit_to_container(
        &mut self,
        container_w: f64,
        container_h: f64,
        padding: f64,
    ) -> Result<Option<f64>> {
        let Some((nw, nh)) = self.viewport.native_size() else {
            return Ok(None);
        };
        let factor = ((container_w - padding) / nw as f64).min((container_h - padding) / nh as f64);
        self.set_zoom(factor)
    }

    // ---------------------------------------------------------------------
    // Regions
    // ---------------------------------------------------------------------

    /// Add a region in on-screen coordinates. Degenerate rectangles are
    /// dropped and `Ok(None)` returned.
    pub fn add_region(&mut self, rect: ScreenRect, kind: RegionKind) -> Result<Option<RegionId>> {
        let id = self.registry.add_region(rect, kind);
        if id.is_some() {
            self.refresh_previews()?;
        }
        Ok(id)
    }

    /// Add a region given in native image pixels (e.g. from a regions file).
    pub fn add_native_region(&mut self, panel: &DetectedPanel) -> Result<Option<RegionId>> {
        let rect = panel.to_screen(self.viewport.zoom());
        self.add_region(rect, panel.kind)
    }

    pub fn remove_region(&mut self, id: RegionId) -> Result<Region> {
        let removed = self.registry.remove_region(id)?;
        self.refresh_previews()?;
        Ok(removed)
    }

    /// Remove every region but keep the image.
    pub fn clear_regions(&mut self) -> Result<()> {
        self.drag = None;
        self.registry.clear_all();
        self.refresh_previews()
    }

    pub fn move_region(&mut self, id: RegionId, left: f64, top: f64) -> Result<()> {
        self.registry.move_region(id, left, top)?;
        self.refresh_previews()
    }

    pub fn resize_region(&mut self, id: RegionId, scale_x: f64, scale_y: f64) -> Result<bool> {
        let applied = self.registry.resize_region(id, scale_x, scale_y)?;
        if applied {
            self.refresh_previews()?;
        }
        Ok(applied)
    }

    /// Enable or disable the interactions of a single region.
    pub fn set_region_controls(&mut self, id: RegionId, controls: RegionControls) -> Result<()> {
        let region = self
            .registry
            .get_mut(id)
            .ok_or(PanelcutError::UnknownRegion(id))?;
        region.controls = controls;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Detection
    // ---------------------------------------------------------------------

    pub fn detection_ticket(&self) -> Result<DetectionTicket> {
        if self.source.is_none() {
            return Err(PanelcutError::NoImage);
        }
        Ok(DetectionTicket {
            generation: self.generation,
        })
    }

    /// Apply detection results (native pixels) issued under `ticket`.
    ///
    /// Existing crop regions are replaced, never appended to; mask regions
    /// are kept. Returns the ids of the new crop regions.
    pub fn apply_detection(
        &mut self,
        ticket: DetectionTicket,
        panels: &[DetectedPanel],
    ) -> Result<Vec<RegionId>> {
        if ticket.generation != self.generation || self.source.is_none() {
            return Err(PanelcutError::StaleDetection);
        }
        let zoom = self.viewport.zoom();
        let ids = self.registry.replace_detected_regions(
            panels
                .iter()
                .filter(|p| p.kind == RegionKind::Crop)
                .map(|p| p.to_screen(zoom)),
        );
        for mask in panels.iter().filter(|p| p.kind == RegionKind::Mask) {
            self.registry.add_region(mask.to_screen(zoom), RegionKind::Mask);
        }
        info!(
            received = panels.len(),
            applied = ids.len(),
            "Detection applied"
        );
        self.refresh_previews()?;
        Ok(ids)
    }

    /// Ask `detector` for panels on the current image and apply them.
    pub fn run_detection(&mut self, detector: &dyn PanelDetector) -> Result<Vec<RegionId>> {
        let ticket = self.detection_ticket()?;
        let source = self.source.as_ref().ok_or(PanelcutError::NoImage)?;
        let panels = detector.detect(source, &self.config.detection.params)?;
        self.apply_detection(ticket, &panels)
    }

    // ---------------------------------------------------------------------
    // Pointer interaction
    // ---------------------------------------------------------------------

    /// Pointer pressed at `p` (on-screen coordinates).
    ///
    /// A drag that is still live is torn down first.
    pub fn pointer_down(&mut self, p: Point) -> Result<PointerEffect> {
        if self.drag.take().is_some() {
            debug!("Discarding unfinished drag");
        }
        if self.source.is_none() {
            return Ok(PointerEffect::Ignored);
        }

        let Some((id, hit)) = self.registry.hit_test(p) else {
            self.drag = Some(DragSession::draw(self.config.draw_kind, p));
            return Ok(PointerEffect::DragStarted);
        };
        let Some((rect, movable)) = self
            .registry
            .get(id)
            .map(|r| (r.rect, r.controls.movable))
        else {
            return Ok(PointerEffect::Ignored);
        };

        match hit {
            RegionHit::DeleteControl => {
                self.remove_region(id)?;
                Ok(PointerEffect::Deleted(id))
            }
            RegionHit::ResizeHandle => {
                self.drag = Some(DragSession::resizing(id, p, &rect));
                Ok(PointerEffect::DragStarted)
            }
            RegionHit::Body if movable => {
                self.drag = Some(DragSession::moving(id, p, &rect));
                Ok(PointerEffect::DragStarted)
            }
            RegionHit::Body => Ok(PointerEffect::Ignored),
        }
    }

    /// Pointer moved while pressed. Nothing is committed until release.
    pub fn pointer_move(&mut self, p: Point) -> Option<DragOutcome> {
        self.drag.as_mut().map(|drag| drag.update(p))
    }

    /// Pointer released at `p`: commit the drag, if any.
    pub fn pointer_up(&mut self, p: Point) -> Result<PointerEffect> {
        let Some(drag) = self.drag.take() else {
            return Ok(PointerEffect::Ignored);
        };
        match drag.end(p) {
            DragOutcome::Rubber { kind, rect } => match self.add_region(rect, kind)? {
                Some(id) => Ok(PointerEffect::Created(id)),
                None => Ok(PointerEffect::Discarded),
            },
            DragOutcome::Moved { id, left, top } => {
                self.move_region(id, left, top)?;
                Ok(PointerEffect::Moved(id))
            }
            DragOutcome::Resized {
                id,
                scale_x,
                scale_y,
            } => {
                if self.resize_region(id, scale_x, scale_y)? {
                    Ok(PointerEffect::Resized(id))
                } else {
                    Ok(PointerEffect::Ignored)
                }
            }
        }
    }

    /// Abort the live drag without committing anything.
    pub fn pointer_cancel(&mut self) {
        self.drag = None;
    }

    // ---------------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------------

    /// The on-screen canvas with region overlays, or `None` without an image.
    pub fn render_view(&self) -> Option<RgbaImage> {
        let source = self.source.as_ref()?;
        Some(render_view(source, &self.viewport, &self.registry))
    }

    /// Build the archive of all current previews.
    pub fn export_archive(&self) -> Result<Vec<u8>> {
        build_archive(&self.previews, self.config.naming)
    }

    /// File name and PNG bytes of one panel (1-based), for single download.
    pub fn export_panel(&self, index: usize) -> Option<(String, &[u8])> {
        let panel = self.previews.get(index.checked_sub(1)?)?;
        Some((self.config.naming.file_name(index), panel.png.as_slice()))
    }
}
