//! Viewport framing as seen by the rendering surface.
//!
//! Region targets are framed as given. Point-of-interest targets are
//! expanded into a square and shifted out from under the info panel when
//! the panel is visible and the viewer is wide enough to sit side by side.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{base_config, ready_viewer, viewer, viewer_with, Call, RecordingSurface};
use fixtures::{mixed_story, two_region_story, CanvasBuilder, ManifestBuilder};
use storyview::config::ViewerConfig;
use storyview::layout::{panel_x_correction, PanelOcclusion};
use storyview::Rect;
use test_case::test_case;

// ============================================================================
// DEFERRED FRAMING
// ============================================================================

#[test]
fn test_no_framing_before_image_ready() {
    let mut view = viewer(&two_region_story());
    view.next();
    assert!(view.surface().frames().is_empty());

    view.on_image_ready();
    // Only the latest request survives
    assert_eq!(
        view.surface().frames(),
        vec![&Call::FrameRegion(Rect::new(100.0, 200.0, 400.0, 300.0), true)]
    );
}

#[test]
fn test_title_frames_whole_image() {
    let view = ready_viewer(&two_region_story(), &base_config());
    assert_eq!(view.surface().frames(), vec![&Call::FrameWholeImage(true)]);
}

// ============================================================================
// REGIONS
// ============================================================================

#[test]
fn test_region_framed_unchanged_even_with_panel() {
    let mut view = ready_viewer(&two_region_story(), &base_config());
    view.go_to(1);
    assert_eq!(
        view.surface().last_frame(),
        Some(&Call::FrameRegion(
            Rect::new(2000.0, 1000.0, 600.0, 400.0),
            true
        ))
    );
}

#[test]
fn test_credits_hold_the_viewport() {
    let mut view = ready_viewer(&two_region_story(), &base_config());
    view.go_to(1);
    view.surface_mut().clear();
    view.go_to(2);
    assert!(view.surface().frames().is_empty());
}

#[test]
fn test_untargeted_annotation_frames_whole_image() {
    let json = ManifestBuilder::new()
        .label("Story")
        .canvas(CanvasBuilder::new(100, 100).untargeted("everything"))
        .build();
    let mut view = ready_viewer(&json, &base_config());
    view.surface_mut().clear();
    view.go_to(0);
    assert_eq!(view.surface().frames(), vec![&Call::FrameWholeImage(true)]);
}

#[test]
fn test_reduced_motion_disables_animation() {
    let config = ViewerConfig {
        prefers_reduced_motion: true,
        ..base_config()
    };
    let mut view = ready_viewer(&two_region_story(), &config);
    view.go_to(0);
    assert_eq!(
        view.surface().frames(),
        vec![
            &Call::FrameWholeImage(false),
            &Call::FrameRegion(Rect::new(100.0, 200.0, 400.0, 300.0), false)
        ]
    );
}

// ============================================================================
// POINTS OF INTEREST
// ============================================================================

/// Frame the point-of-interest slide of `mixed_story` and return its rect.
fn poi_frame(occlusion: PanelOcclusion, hide_panel: bool) -> Rect {
    let mut view = viewer_with(
        &mixed_story(),
        &base_config(),
        RecordingSurface::with_occlusion(occlusion),
    );
    view.on_image_ready();
    if hide_panel {
        view.toggle_info_panel();
    }
    view.go_to(1);
    match view.surface().last_frame() {
        Some(Call::FrameRegion(rect, _)) => *rect,
        other => panic!("expected a region frame, got {other:?}"),
    }
}

#[test_case(PanelOcclusion::new(300.0, 0.0, 1000.0), false => 822.0; "panel beside image")]
#[test_case(PanelOcclusion::new(280.0, 20.0, 1000.0), false => 822.0; "inset counts as panel")]
#[test_case(PanelOcclusion::new(300.0, 0.0, 1000.0), true => 950.0; "hidden panel")]
#[test_case(PanelOcclusion::new(300.0, 0.0, 600.0), false => 950.0; "narrow viewer stacks panel")]
#[test_case(PanelOcclusion::new(300.0, 0.0, 640.0), false => 822.0; "exactly side by side")]
fn test_poi_x(occlusion: PanelOcclusion, hide_panel: bool) -> f64 {
    poi_frame(occlusion, hide_panel).x
}

#[test]
fn test_poi_square_size_and_y_untouched() {
    let rect = poi_frame(PanelOcclusion::new(300.0, 0.0, 1000.0), false);
    assert_eq!(rect.y, 450.0);
    assert_eq!(rect.width, 100.0);
    assert_eq!(rect.height, 100.0);
}

#[test]
fn test_panel_geometry_measured_at_framing_time() {
    let mut view = ready_viewer(&mixed_story(), &base_config());
    view.surface_mut().occlusion = PanelOcclusion::new(500.0, 0.0, 1000.0);
    view.go_to(1);
    let expected = 950.0 - panel_x_correction(&PanelOcclusion::new(500.0, 0.0, 1000.0));
    assert_eq!(
        view.surface().last_frame(),
        Some(&Call::FrameRegion(
            Rect::new(expected, 450.0, 100.0, 100.0),
            true
        ))
    );
}

#[test]
fn test_custom_poi_region_size() {
    let config = ViewerConfig {
        point_of_interest_region_size: 400.0,
        ..base_config()
    };
    let mut view = viewer_with(
        &mixed_story(),
        &config,
        RecordingSurface::with_occlusion(PanelOcclusion::new(0.0, 0.0, 400.0)),
    );
    view.on_image_ready();
    view.go_to(1);
    assert_eq!(
        view.surface().last_frame(),
        Some(&Call::FrameRegion(
            Rect::new(800.0, 300.0, 400.0, 400.0),
            true
        ))
    );
}

// ============================================================================
// MARKER FOCUS
// ============================================================================

#[test]
fn test_focus_and_blur_marker() {
    let mut view = ready_viewer(&mixed_story(), &base_config());
    view.surface_mut().clear();

    view.focus_marker(1);
    view.blur_marker();
    assert_eq!(
        view.surface().frames(),
        vec![
            &Call::FrameRegion(Rect::new(950.0, 450.0, 100.0, 100.0), false),
            &Call::FrameWholeImage(false)
        ]
    );
    // Focus never navigates
    assert_eq!(view.slide_index(), -1);
}

#[test]
fn test_focus_on_region_annotation_does_nothing() {
    let mut view = ready_viewer(&mixed_story(), &base_config());
    view.surface_mut().clear();
    view.focus_marker(0);
    view.focus_marker(9);
    assert!(view.surface().frames().is_empty());
}
