mod common;

use panelcut_core::config::EditorConfig;
use panelcut_core::consts::CROP_STROKE_RGBA;
use panelcut_core::detect::DetectedPanel;
use panelcut_core::drag::DragOutcome;
use panelcut_core::error::PanelcutError;
use panelcut_core::geometry::{PixelRect, Point, ScreenRect};
use panelcut_core::region::{RegionControls, RegionId, RegionKind};
use panelcut_core::session::PointerEffect;
use panelcut_core::EditorSession;

use common::{
    decode_png, pattern_pixel, pattern_source, session_with_image, stacked_panels,
    FailingDetector, ScriptedDetector,
};

fn session_with_region() -> (EditorSession, RegionId) {
    let mut session = session_with_image(1000, 1000, 1.0);
    let id = session
        .add_region(ScreenRect::new(100.0, 100.0, 200.0, 100.0), RegionKind::Crop)
        .unwrap()
        .unwrap();
    (session, id)
}

// ---------------------------------------------------------------------------
// Construction and image lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_invalid_config_rejected() {
    let mut config = EditorConfig::default();
    config.zoom.min = 5.0;
    config.zoom.max = 1.0;
    let err = EditorSession::new(config).err().unwrap();
    assert!(matches!(err, PanelcutError::InvalidConfig(_)), "got: {err}");
}

#[test]
fn test_load_image_clears_regions() {
    let (mut session, _) = session_with_region();
    assert_eq!(session.previews().len(), 1);
    session.load_image(pattern_source("next.png", 300, 300));
    assert!(session.registry().is_empty());
    assert!(session.previews().is_empty());
    assert_eq!(session.source().unwrap().name(), "next.png");
}

#[test]
fn test_clear_all_drops_image() {
    let (mut session, _) = session_with_region();
    session.clear_all();
    assert!(session.source().is_none());
    assert!(session.registry().is_empty());
    assert!(session.render_view().is_none());
    assert!(matches!(
        session.detection_ticket(),
        Err(PanelcutError::NoImage)
    ));
}

#[test]
fn test_clear_regions_keeps_image() {
    let (mut session, _) = session_with_region();
    session.clear_regions().unwrap();
    assert!(session.registry().is_empty());
    assert!(session.previews().is_empty());
    assert!(session.source().is_some());
}

#[test]
fn test_zoom_change_rescales_regions() {
    let (mut session, id) = session_with_region();
    session.set_zoom(0.5).unwrap();
    let rect = session.registry().get(id).unwrap().rect;
    assert_eq!(rect, ScreenRect::new(50.0, 50.0, 100.0, 50.0));
    assert_eq!(
        session.previews()[0].native_rect,
        PixelRect::new(100, 100, 200, 100)
    );
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[test]
fn test_detection_replaces_instead_of_appending() {
    let mut session = session_with_image(400, 2000, 0.5);
    let detector = ScriptedDetector::fixed(stacked_panels(3, 400.0, 300.0, 50.0));

    session.run_detection(&detector).unwrap();
    session.run_detection(&detector).unwrap();

    assert_eq!(detector.calls.get(), 2);
    assert_eq!(session.registry().list_regions(Some(RegionKind::Crop)).len(), 3);
    assert_eq!(session.previews().len(), 3);
}

#[test]
fn test_detection_coordinates_are_native() {
    let mut session = session_with_image(400, 2000, 0.5);
    let detector = ScriptedDetector::fixed(vec![DetectedPanel::new(40.0, 100.0, 200.0, 300.0)]);
    let ids = session.run_detection(&detector).unwrap();

    let rect = session.registry().get(ids[0]).unwrap().rect;
    assert_eq!(rect, ScreenRect::new(20.0, 50.0, 100.0, 150.0));
    assert_eq!(
        session.previews()[0].native_rect,
        PixelRect::new(40, 100, 200, 300)
    );
}

#[test]
fn test_detection_keeps_masks() {
    let mut session = session_with_image(400, 2000, 1.0);
    let mask = session
        .add_region(ScreenRect::new(0.0, 0.0, 50.0, 50.0), RegionKind::Mask)
        .unwrap()
        .unwrap();
    session
        .run_detection(&ScriptedDetector::fixed(stacked_panels(2, 400.0, 300.0, 50.0)))
        .unwrap();
    assert!(session.registry().get(mask).is_some());
    assert_eq!(session.previews().len(), 2);
}

#[test]
fn test_detection_empty_result_clears_crops() {
    let mut session = session_with_image(400, 2000, 1.0);
    let detector = ScriptedDetector::new(vec![stacked_panels(2, 400.0, 300.0, 50.0), Vec::new()]);
    session.run_detection(&detector).unwrap();
    assert_eq!(session.previews().len(), 2);
    session.run_detection(&detector).unwrap();
    assert!(session.previews().is_empty());
}

#[test]
fn test_detection_without_image_fails() {
    let mut session = EditorSession::new(EditorConfig::default()).unwrap();
    let detector = ScriptedDetector::fixed(Vec::new());
    let err = session.run_detection(&detector).unwrap_err();
    assert!(matches!(err, PanelcutError::NoImage), "got: {err}");
    assert_eq!(detector.calls.get(), 0);
}

#[test]
fn test_stale_detection_refused() {
    let mut session = session_with_image(400, 2000, 1.0);
    let ticket = session.detection_ticket().unwrap();
    session.load_image(pattern_source("other.png", 400, 2000));

    let err = session
        .apply_detection(ticket, &stacked_panels(2, 400.0, 300.0, 50.0))
        .unwrap_err();
    assert!(matches!(err, PanelcutError::StaleDetection), "got: {err}");
    assert!(session.registry().is_empty());
}

#[test]
fn test_failed_detection_leaves_session_usable() {
    let (mut session, id) = session_with_region();
    assert!(session.run_detection(&FailingDetector).is_err());
    assert!(session.registry().get(id).is_some());
    assert_eq!(session.previews().len(), 1);

    let ids = session
        .run_detection(&ScriptedDetector::fixed(stacked_panels(2, 400.0, 300.0, 50.0)))
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(session.previews().len(), 2);
}

#[test]
fn test_degenerate_detections_dropped() {
    let mut session = session_with_image(400, 2000, 0.5);
    let panels = vec![
        DetectedPanel::new(0.0, 0.0, 400.0, 300.0),
        // 8 native px tall becomes 4 on screen at zoom 0.5.
        DetectedPanel::new(0.0, 400.0, 400.0, 8.0),
    ];
    let ids = session
        .run_detection(&ScriptedDetector::fixed(panels))
        .unwrap();
    assert_eq!(ids.len(), 1);
}

// ---------------------------------------------------------------------------
// Pointer interaction
// ---------------------------------------------------------------------------

#[test]
fn test_draw_creates_region() {
    let mut session = session_with_image(1000, 1000, 1.0);
    assert_eq!(
        session.pointer_down(Point::new(500.0, 500.0)).unwrap(),
        PointerEffect::DragStarted
    );
    let live = session.pointer_move(Point::new(540.0, 520.0)).unwrap();
    assert_eq!(
        live,
        DragOutcome::Rubber {
            kind: RegionKind::Crop,
            rect: ScreenRect::new(500.0, 500.0, 40.0, 20.0),
        }
    );
    assert!(session.registry().is_empty(), "nothing committed mid-drag");

    let effect = session.pointer_up(Point::new(560.0, 540.0)).unwrap();
    let PointerEffect::Created(id) = effect else {
        panic!("expected a new region, got {effect:?}");
    };
    assert_eq!(
        session.registry().get(id).unwrap().rect,
        ScreenRect::new(500.0, 500.0, 60.0, 40.0)
    );
    assert_eq!(session.previews().len(), 1);
}

#[test]
fn test_draw_backwards_normalizes() {
    let mut session = session_with_image(1000, 1000, 1.0);
    session.pointer_down(Point::new(300.0, 300.0)).unwrap();
    let PointerEffect::Created(id) = session.pointer_up(Point::new(200.0, 250.0)).unwrap() else {
        panic!("expected a new region");
    };
    assert_eq!(
        session.registry().get(id).unwrap().rect,
        ScreenRect::new(200.0, 250.0, 100.0, 50.0)
    );
}

#[test]
fn test_tiny_draw_discarded() {
    let mut session = session_with_image(1000, 1000, 1.0);
    session.pointer_down(Point::new(500.0, 500.0)).unwrap();
    assert_eq!(
        session.pointer_up(Point::new(505.0, 505.0)).unwrap(),
        PointerEffect::Discarded
    );
    assert!(session.registry().is_empty());
    assert!(session.previews().is_empty());
}

#[test]
fn test_draw_uses_configured_kind() {
    let mut config = EditorConfig::default();
    config.draw_kind = RegionKind::Mask;
    let mut session = EditorSession::new(config).unwrap();
    session.load_image(pattern_source("strip.png", 500, 500));
    session.set_zoom(1.0).unwrap();

    session.pointer_down(Point::new(10.0, 10.0)).unwrap();
    let PointerEffect::Created(id) = session.pointer_up(Point::new(60.0, 60.0)).unwrap() else {
        panic!("expected a new region");
    };
    assert_eq!(session.registry().get(id).unwrap().kind, RegionKind::Mask);
    assert!(session.previews().is_empty());
}

#[test]
fn test_pointer_ignored_without_image() {
    let mut session = EditorSession::new(EditorConfig::default()).unwrap();
    assert_eq!(
        session.pointer_down(Point::new(10.0, 10.0)).unwrap(),
        PointerEffect::Ignored
    );
    assert_eq!(
        session.pointer_up(Point::new(50.0, 50.0)).unwrap(),
        PointerEffect::Ignored
    );
}

#[test]
fn test_delete_control_removes_region() {
    let (mut session, id) = session_with_region();
    assert_eq!(
        session.pointer_down(Point::new(284.0, 116.0)).unwrap(),
        PointerEffect::Deleted(id)
    );
    assert!(session.registry().is_empty());
    assert!(session.previews().is_empty());
    assert!(session.drag().is_none());
}

#[test]
fn test_body_drag_moves_region() {
    let (mut session, id) = session_with_region();
    session.pointer_down(Point::new(150.0, 150.0)).unwrap();
    session.pointer_move(Point::new(160.0, 170.0));
    assert_eq!(
        session.registry().get(id).unwrap().rect.left,
        100.0,
        "nothing committed mid-drag"
    );

    assert_eq!(
        session.pointer_up(Point::new(170.0, 180.0)).unwrap(),
        PointerEffect::Moved(id)
    );
    let rect = session.registry().get(id).unwrap().rect;
    assert_eq!((rect.left, rect.top), (120.0, 130.0));
    assert_eq!(
        session.previews()[0].native_rect,
        PixelRect::new(120, 130, 200, 100)
    );
}

#[test]
fn test_immovable_region_ignores_body_drag() {
    let (mut session, id) = session_with_region();
    session
        .set_region_controls(
            id,
            RegionControls {
                movable: false,
                ..RegionControls::default()
            },
        )
        .unwrap();
    assert_eq!(
        session.pointer_down(Point::new(150.0, 150.0)).unwrap(),
        PointerEffect::Ignored
    );
    assert!(session.drag().is_none());
    assert_eq!(session.registry().get(id).unwrap().rect.left, 100.0);
}

#[test]
fn test_undeletable_region_press_on_control_moves() {
    let (mut session, id) = session_with_region();
    session
        .set_region_controls(
            id,
            RegionControls {
                deletable: false,
                ..RegionControls::default()
            },
        )
        .unwrap();
    assert_eq!(
        session.pointer_down(Point::new(284.0, 116.0)).unwrap(),
        PointerEffect::DragStarted
    );
    assert_eq!(
        session.pointer_up(Point::new(284.0, 116.0)).unwrap(),
        PointerEffect::Moved(id)
    );
    assert_eq!(session.registry().len(), 1);
}

#[test]
fn test_corner_drag_resizes_region() {
    let (mut session, id) = session_with_region();
    session.pointer_down(Point::new(300.0, 200.0)).unwrap();
    assert_eq!(
        session.pointer_up(Point::new(400.0, 250.0)).unwrap(),
        PointerEffect::Resized(id)
    );
    let rect = session.registry().get(id).unwrap().rect;
    assert_eq!((rect.width, rect.height), (200.0, 100.0));
    assert_eq!((rect.scale_x, rect.scale_y), (1.5, 1.5));
    assert_eq!(
        session.previews()[0].native_rect,
        PixelRect::new(100, 100, 300, 150)
    );
}

#[test]
fn test_corner_drag_below_minimum_ignored() {
    let (mut session, id) = session_with_region();
    session.pointer_down(Point::new(300.0, 200.0)).unwrap();
    assert_eq!(
        session.pointer_up(Point::new(102.0, 102.0)).unwrap(),
        PointerEffect::Ignored
    );
    let rect = session.registry().get(id).unwrap().rect;
    assert_eq!((rect.scale_x, rect.scale_y), (1.0, 1.0));
}

#[test]
fn test_new_press_tears_down_live_drag() {
    let (mut session, id) = session_with_region();
    // Start drawing in empty space, then press on the region without release.
    session.pointer_down(Point::new(600.0, 600.0)).unwrap();
    session.pointer_move(Point::new(700.0, 700.0));
    session.pointer_down(Point::new(150.0, 150.0)).unwrap();

    assert_eq!(
        session.pointer_up(Point::new(160.0, 160.0)).unwrap(),
        PointerEffect::Moved(id)
    );
    assert_eq!(session.registry().len(), 1, "the abandoned draw created nothing");
}

#[test]
fn test_pointer_cancel_commits_nothing() {
    let (mut session, id) = session_with_region();
    session.pointer_down(Point::new(150.0, 150.0)).unwrap();
    session.pointer_move(Point::new(400.0, 400.0));
    session.pointer_cancel();
    assert!(session.drag().is_none());
    assert_eq!(session.registry().get(id).unwrap().rect.left, 100.0);
    assert_eq!(
        session.pointer_up(Point::new(400.0, 400.0)).unwrap(),
        PointerEffect::Ignored
    );
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn test_render_view_matches_canvas_size() {
    let mut session = session_with_image(400, 200, 0.5);
    session
        .add_region(ScreenRect::new(10.0, 10.0, 50.0, 50.0), RegionKind::Crop)
        .unwrap();
    let view = session.render_view().unwrap();
    assert_eq!(view.dimensions(), (200, 100));
}

#[test]
fn test_render_view_paints_masks_white() {
    let mut session = session_with_image(400, 200, 1.0);
    session
        .add_region(ScreenRect::new(10.0, 10.0, 50.0, 50.0), RegionKind::Mask)
        .unwrap();
    let view = session.render_view().unwrap();
    assert_eq!(view.get_pixel(30, 30).0, [255, 255, 255, 255]);
}

#[test]
fn test_crop_overlay_only_on_screen() {
    let mut session = session_with_image(400, 200, 1.0);
    session
        .add_region(ScreenRect::new(10.0, 10.0, 50.0, 50.0), RegionKind::Crop)
        .unwrap()
        .unwrap();

    let view = session.render_view().unwrap();
    assert_eq!(view.get_pixel(10, 10).0, CROP_STROKE_RGBA);

    let panel = decode_png(&session.previews()[0].png);
    assert_eq!(*panel.get_pixel(0, 0), pattern_pixel(10, 10));
}
