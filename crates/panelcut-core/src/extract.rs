use std::io::Cursor;

use image::{imageops, ImageFormat, Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::consts::MASK_RGBA;
use crate::error::Result;
use crate::geometry::PixelRect;
use crate::ordering::order_for_export;
use crate::region::{Region, RegionId, RegionKind};
use crate::registry::RegionRegistry;
use crate::source::SourceImage;
use crate::viewport::ViewportState;

/// One crop region rendered at native resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedPanel {
    /// 1-based position in export order.
    pub index: usize,
    pub region_id: RegionId,
    /// Pixels of the source image this panel covers.
    pub native_rect: PixelRect,
    /// PNG-encoded panel.
    pub png: Vec<u8>,
}

impl ExtractedPanel {
    pub fn width(&self) -> u32 {
        self.native_rect.width
    }

    pub fn height(&self) -> u32 {
        self.native_rect.height
    }
}

/// Native pixel rectangle covered by `region`, clipped to the source.
///
/// `None` when the region lies entirely outside the image.
pub fn native_rect_for(
    region: &Region,
    viewport: &ViewportState,
    src_w: u32,
    src_h: u32,
) -> Option<PixelRect> {
    viewport.screen_to_native(&region.rect).clamped(src_w, src_h)
}

/// Copy `rect` out of the source and paint every overlapping mask white.
pub fn crop_native(source: &SourceImage, rect: &PixelRect, masks: &[PixelRect]) -> Result<RgbaImage> {
    let rect = rect.validated(source.width(), source.height())?;
    let mut out = imageops::crop_imm(source.pixels(), rect.x, rect.y, rect.width, rect.height)
        .to_image();

    for mask in masks {
        let Some(overlap) = mask.intersect(&rect) else {
            continue;
        };
        let (ox, oy) = (overlap.x - rect.x, overlap.y - rect.y);
        for y in oy..oy + overlap.height {
            for x in ox..ox + overlap.width {
                out.put_pixel(x, y, Rgba(MASK_RGBA));
            }
        }
    }
    Ok(out)
}

/// Encode an image as PNG with fixed encoder settings, so identical pixels
/// always give identical bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Extract every crop region of `registry` at native resolution, in export
/// order. Mask regions are applied to the crops they overlap.
pub fn extract_panels(
    source: &SourceImage,
    viewport: &ViewportState,
    registry: &RegionRegistry,
) -> Result<Vec<ExtractedPanel>> {
    let (src_w, src_h) = (source.width(), source.height());

    let masks: Vec<PixelRect> = registry
        .list_regions(Some(RegionKind::Mask))
        .into_iter()
        .filter_map(|r| native_rect_for(r, viewport, src_w, src_h))
        .collect();

    let crops = order_for_export(registry.list_regions(Some(RegionKind::Crop)));

    let rendered: Vec<Option<(RegionId, PixelRect, Vec<u8>)>> = crops
        .par_iter()
        .map(|region| -> Result<Option<(RegionId, PixelRect, Vec<u8>)>> {
            let Some(rect) = native_rect_for(region, viewport, src_w, src_h) else {
                warn!(region = %region.id, "Crop region lies outside the image, skipping");
                return Ok(None);
            };
            let img = crop_native(source, &rect, &masks)?;
            Ok(Some((region.id, rect, encode_png(&img)?)))
        })
        .collect::<Result<_>>()?;

    let panels: Vec<ExtractedPanel> = rendered
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(i, (region_id, native_rect, png))| ExtractedPanel {
            index: i + 1,
            region_id,
            native_rect,
            png,
        })
        .collect();

    debug!(
        count = panels.len(),
        masks = masks.len(),
        zoom = viewport.zoom(),
        "Extracted panels"
    );
    Ok(panels)
}
