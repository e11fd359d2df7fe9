use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

use crate::consts::{CROP_FILL_RGBA, CROP_STROKE_RGBA, MASK_RGBA, REGION_STROKE_WIDTH};
use crate::geometry::ScreenRect;
use crate::region::{Region, RegionKind};
use crate::registry::RegionRegistry;
use crate::source::SourceImage;
use crate::viewport::ViewportState;

/// Integer pixel bounds `(x0, y0, x1, y1)` of `rect` on a `w` x `h` canvas.
fn pixel_bounds(rect: &ScreenRect, w: u32, h: u32) -> Option<(u32, u32, u32, u32)> {
    let clamp = |v: f64, max: u32| v.round().clamp(0.0, max as f64) as u32;
    let x0 = clamp(rect.left, w);
    let y0 = clamp(rect.top, h);
    let x1 = clamp(rect.right(), w);
    let y1 = clamp(rect.bottom(), h);
    (x1 > x0 && y1 > y0).then_some((x0, y0, x1, y1))
}

fn draw_region(canvas: &mut RgbaImage, region: &Region) {
    let (w, h) = canvas.dimensions();
    let Some((x0, y0, x1, y1)) = pixel_bounds(&region.rect, w, h) else {
        return;
    };

    if region.kind == RegionKind::Mask {
        for y in y0..y1 {
            for x in x0..x1 {
                canvas.put_pixel(x, y, Rgba(MASK_RGBA));
            }
        }
        return;
    }

    let fill = Rgba(CROP_FILL_RGBA);
    let stroke = Rgba(CROP_STROKE_RGBA);
    let sw = REGION_STROKE_WIDTH;
    for y in y0..y1 {
        for x in x0..x1 {
            let on_border = x < x0 + sw || x + sw >= x1 || y < y0 + sw || y + sw >= y1;
            let px = canvas.get_pixel_mut(x, y);
            if on_border {
                *px = stroke;
            } else {
                px.blend(&fill);
            }
        }
    }
}

/// Compose the on-screen canvas: the image scaled to the current zoom with
/// every region drawn over it (masks opaque, crop regions tinted and
/// outlined).
pub fn render_view(
    source: &SourceImage,
    viewport: &ViewportState,
    registry: &RegionRegistry,
) -> RgbaImage {
    let zoom = viewport.zoom();
    let cw = ((source.width() as f64 * zoom).round() as u32).max(1);
    let ch = ((source.height() as f64 * zoom).round() as u32).max(1);
    let mut canvas = imageops::resize(source.pixels(), cw, ch, FilterType::Triangle);

    for region in registry.iter() {
        draw_region(&mut canvas, region);
    }
    canvas
}
