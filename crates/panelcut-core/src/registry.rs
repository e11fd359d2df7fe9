use tracing::debug;

use crate::error::{PanelcutError, Result};
use crate::geometry::{Point, ScreenRect};
use crate::region::{Region, RegionHit, RegionId, RegionKind};

/// Owner of every region on the canvas.
///
/// Regions are kept in insertion order; later regions are drawn on top and
/// win hit tests. `revision` increases on every successful mutation.
#[derive(Clone, Debug)]
pub struct RegionRegistry {
    regions: Vec<Region>,
    next_id: u64,
    revision: u64,
    min_region_size: f64,
}

impl RegionRegistry {
    pub fn new(min_region_size: f64) -> Self {
        Self {
            regions: Vec::new(),
            next_id: 1,
            revision: 0,
            min_region_size,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn min_region_size(&self) -> f64 {
        self.min_region_size
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn insert(&mut self, rect: ScreenRect, kind: RegionKind) -> Option<RegionId> {
        if !rect.meets_min_size(self.min_region_size) {
            debug!(
                width = rect.extent_width(),
                height = rect.extent_height(),
                min = self.min_region_size,
                "Dropping degenerate region"
            );
            return None;
        }
        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.regions.push(Region::new(id, kind, rect));
        Some(id)
    }

    /// Add a region. Rectangles below the minimum size are dropped and
    /// `None` is returned.
    pub fn add_region(&mut self, rect: ScreenRect, kind: RegionKind) -> Option<RegionId> {
        let id = self.insert(rect, kind)?;
        self.touch();
        Some(id)
    }

    pub fn remove_region(&mut self, id: RegionId) -> Result<Region> {
        let pos = self
            .regions
            .iter()
            .position(|r| r.id == id)
            .ok_or(PanelcutError::UnknownRegion(id))?;
        let removed = self.regions.remove(pos);
        self.touch();
        Ok(removed)
    }

    /// Remove every region of every kind.
    pub fn clear_all(&mut self) {
        if self.regions.is_empty() {
            return;
        }
        self.regions.clear();
        self.touch();
    }

    /// Regions in insertion order, optionally restricted to one kind.
    pub fn list_regions(&self, kind: Option<RegionKind>) -> Vec<&Region> {
        self.regions
            .iter()
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Swap every crop region for `rects` in one step. Mask regions stay.
    ///
    /// Returns the ids of the inserted regions; degenerate rectangles are
    /// skipped.
    pub fn replace_detected_regions(
        &mut self,
        rects: impl IntoIterator<Item = ScreenRect>,
    ) -> Vec<RegionId> {
        let before = self.regions.len();
        self.regions.retain(|r| r.kind != RegionKind::Crop);
        let removed = before - self.regions.len();
        let ids: Vec<RegionId> = rects
            .into_iter()
            .filter_map(|rect| self.insert(rect, RegionKind::Crop))
            .collect();
        debug!(removed, inserted = ids.len(), "Replaced detected regions");
        self.touch();
        ids
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Mutable access. Bumps the revision since callers may change geometry.
    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        let pos = self.regions.iter().position(|r| r.id == id)?;
        self.touch();
        self.regions.get_mut(pos)
    }

    /// Move a region's top-left corner.
    pub fn move_region(&mut self, id: RegionId, left: f64, top: f64) -> Result<()> {
        let region = self.get_mut(id).ok_or(PanelcutError::UnknownRegion(id))?;
        region.rect.left = left;
        region.rect.top = top;
        Ok(())
    }

    /// Set a region's scale multipliers, as a corner-drag resize does.
    ///
    /// A resize that would shrink the region below the minimum size is
    /// ignored and `false` returned.
    pub fn resize_region(&mut self, id: RegionId, scale_x: f64, scale_y: f64) -> Result<bool> {
        let min = self.min_region_size;
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(PanelcutError::UnknownRegion(id))?;
        let mut candidate = region.rect;
        candidate.scale_x = scale_x;
        candidate.scale_y = scale_y;
        if !candidate.meets_min_size(min) {
            return Ok(false);
        }
        region.rect = candidate;
        self.touch();
        Ok(true)
    }

    /// Rescale every region by `ratio` (new zoom / old zoom) so each keeps
    /// its native footprint.
    pub fn rescale_all(&mut self, ratio: f64) {
        if self.regions.is_empty() || ratio == 1.0 {
            return;
        }
        for region in &mut self.regions {
            region.rect = region.rect.scaled(ratio);
        }
        self.touch();
    }

    /// Topmost region under `p` and the part of it that was hit.
    pub fn hit_test(&self, p: Point) -> Option<(RegionId, RegionHit)> {
        self.regions
            .iter()
            .rev()
            .find_map(|r| r.hit(p).map(|hit| (r.id, hit)))
    }
}
