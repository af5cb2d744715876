//! Pins, route and point-of-interest markers on the rendering surface.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{base_config, pins_config, ready_viewer, viewer_with, Call, RecordingSurface};
use fixtures::{mixed_story, two_canvas_story, two_region_story};
use storyview::overlay::{OverlayKind, Placement, PoiGraphic, DEFAULT_POI_SVG};
use storyview::Point;

// ============================================================================
// ATTACHMENT
// ============================================================================

#[test]
fn test_overlays_wait_for_image() {
    let view = viewer_with(&mixed_story(), &pins_config(true), RecordingSurface::new());
    assert!(view.surface().overlays.is_empty());
}

#[test]
fn test_pins_route_and_poi_attached_in_order() {
    let view = ready_viewer(&mixed_story(), &pins_config(true));
    assert_eq!(
        view.surface().overlay_ids(),
        vec![
            "storyview-0__route",
            "storyview-0__pin-0",
            "storyview-0__pin-1",
            "storyview-0__poi-1",
        ]
    );

    let pin = view.surface().overlay("storyview-0__pin-0").unwrap();
    assert_eq!(pin.kind, OverlayKind::Pin);
    assert_eq!(pin.placement, Placement::Center(Point::new(100.0, 100.0)));
    assert_eq!(pin.annotation, Some(0));

    let poi = view.surface().overlay("storyview-0__poi-1").unwrap();
    assert_eq!(poi.placement, Placement::Center(Point::new(1000.0, 500.0)));
    assert_eq!(poi.markup, DEFAULT_POI_SVG);
    assert!(poi.label.as_deref().unwrap().contains('2'));

    let route = view.surface().overlay("storyview-0__route").unwrap();
    assert!(route.markup.starts_with("<svg"));
    assert!(route.markup.contains("M 100 100 Q"));
}

#[test]
fn test_repeated_image_ready_does_not_duplicate_overlays() {
    let mut view = ready_viewer(&mixed_story(), &pins_config(true));
    view.go_to(1);
    view.on_image_ready();
    view.on_image_ready();

    let mut ids = view.surface().overlay_ids();
    assert_eq!(ids.len(), 4);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
    assert!(view.surface().overlay("storyview-0__poi-1").unwrap().active);
}

#[test]
fn test_route_requires_pins() {
    let config = storyview::config::ViewerConfig {
        enable_route: true,
        ..base_config()
    };
    let view = ready_viewer(&mixed_story(), &config);
    assert_eq!(view.surface().overlay_ids(), vec!["storyview-0__poi-1"]);
}

#[test]
fn test_pins_without_route() {
    let view = ready_viewer(&mixed_story(), &pins_config(false));
    assert!(!view
        .surface()
        .overlay_ids()
        .contains(&"storyview-0__route"));
    assert_eq!(view.surface().overlays.len(), 3);
}

#[test]
fn test_canvas_change_replaces_markers() {
    let mut view = ready_viewer(&two_canvas_story(), &pins_config(false));
    assert_eq!(view.surface().overlay_ids(), vec!["storyview-0__pin-0"]);
    let first = view.surface().overlays[0].placement;

    view.set_canvas_index(1);
    assert!(view.surface().overlays.is_empty());
    view.on_image_ready();
    assert_eq!(view.surface().overlay_ids(), vec!["storyview-0__pin-0"]);
    assert_ne!(view.surface().overlays[0].placement, first);
}

// ============================================================================
// ACTIVE STATE
// ============================================================================

#[test]
fn test_active_marker_follows_slide() {
    let mut view = ready_viewer(&mixed_story(), &pins_config(true));
    assert_eq!(view.active_marker(), None);

    view.go_to(1);
    assert_eq!(view.active_marker(), Some(1));
    assert_eq!(view.surface().active_flag("storyview-0__pin-1"), Some(true));
    assert_eq!(view.surface().active_flag("storyview-0__poi-1"), Some(true));

    view.go_to(0);
    assert_eq!(view.active_marker(), Some(0));
    assert_eq!(view.surface().active_flag("storyview-0__pin-0"), Some(true));
    assert_eq!(view.surface().active_flag("storyview-0__pin-1"), Some(false));
    assert_eq!(view.surface().active_flag("storyview-0__poi-1"), Some(false));
}

#[test]
fn test_at_most_one_annotation_active() {
    let mut view = ready_viewer(&mixed_story(), &pins_config(true));
    for index in [0, 1, 0, 2, -1, 1] {
        view.go_to(index);
        let active: Vec<_> = view
            .surface()
            .overlays
            .iter()
            .filter(|o| o.active)
            .filter_map(|o| o.annotation)
            .collect();
        assert!(active.iter().all(|&a| Some(a) == view.active_marker()));
    }
}

#[test]
fn test_credits_and_title_clear_active() {
    let mut view = ready_viewer(&mixed_story(), &pins_config(true));
    view.go_to(1);
    view.go_to(2);
    assert_eq!(view.active_marker(), None);
    assert!(view.surface().overlays.iter().all(|o| !o.active));
}

#[test]
fn test_activate_marker_navigates() {
    let mut view = ready_viewer(&mixed_story(), &pins_config(true));
    assert!(view.activate_marker(1));
    assert_eq!(view.slide_index(), 1);
    assert!(!view.activate_marker(7));
    assert_eq!(view.slide_index(), 1);
}

// ============================================================================
// PIN TOGGLE
// ============================================================================

#[test]
fn test_toggle_pins_keeps_poi_markers() {
    let mut view = ready_viewer(&mixed_story(), &pins_config(true));
    assert_eq!(view.pins_toggle_label(), "Hide pins");

    assert!(!view.toggle_pins());
    assert_eq!(view.surface().overlay_ids(), vec!["storyview-0__poi-1"]);
    assert!(!view.pins_visible());
    assert_eq!(view.pins_toggle_label(), "Show pins");

    assert!(view.toggle_pins());
    assert_eq!(view.surface().overlays.len(), 4);
}

#[test]
fn test_hidden_pins_get_current_state_when_shown() {
    let mut view = ready_viewer(&mixed_story(), &pins_config(false));
    view.toggle_pins();
    view.surface_mut().clear();

    view.go_to(1);
    assert_eq!(view.surface().active_flag("storyview-0__pin-1"), None);
    assert_eq!(view.surface().active_flag("storyview-0__poi-1"), Some(true));

    view.toggle_pins();
    assert!(view.surface().overlay("storyview-0__pin-1").unwrap().active);
    assert!(!view.surface().overlay("storyview-0__pin-0").unwrap().active);
}

#[test]
fn test_toggle_pins_disabled_is_noop() {
    let mut view = ready_viewer(&two_region_story(), &base_config());
    view.surface_mut().clear();
    assert!(!view.toggle_pins());
    assert!(view.surface().calls.is_empty());
}

// ============================================================================
// POINT-OF-INTEREST GRAPHIC
// ============================================================================

#[test]
fn test_custom_graphic_replaces_attached_markers() {
    let mut view = ready_viewer(&mixed_story(), &base_config());
    let graphic = PoiGraphic::resolve(
        Ok(r#"<svg viewBox="0 0 10 10"><circle r="5"/></svg>"#.to_string()),
        &storyview::markup::TagFilter,
        &storyview::markup::AllowList::default(),
    )
    .0
    .unwrap();
    view.surface_mut().clear();
    view.set_poi_graphic(graphic);

    assert_eq!(
        view.surface().calls,
        vec![
            Call::RemoveOverlay("storyview-0__poi-1".to_string()),
            Call::AddOverlay("storyview-0__poi-1".to_string()),
        ]
    );
    let poi = view.surface().overlay("storyview-0__poi-1").unwrap();
    assert!(poi.markup.contains("<circle"));
}
