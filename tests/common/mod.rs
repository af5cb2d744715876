//! Common test utilities: a recording surface and viewer helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use storyview::config::{ContainerRef, ValidConfig, ViewerConfig};
use storyview::instance::InstanceCounter;
use storyview::layout::PanelOcclusion;
use storyview::overlay::OverlayElement;
use storyview::parser::parse;
use storyview::{Point, Rect, RenderSurface, StoryView};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Recording Surface
// ============================================================================

/// One call made by the viewer on its surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    OpenImage(String),
    FrameRegion(Rect, bool),
    FrameWholeImage(bool),
    AddOverlay(String),
    RemoveOverlay(String),
    SetActive(String, bool),
    MouseNavigation(bool),
}

/// Surface that records every call and keeps the attached overlays.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
    pub overlays: Vec<OverlayElement>,
    pub occlusion: PanelOcclusion,
    pub center: Point,
}

impl RecordingSurface {
    /// Surface with a 300px panel in a 1000px viewer.
    pub fn new() -> Self {
        Self {
            occlusion: PanelOcclusion::new(300.0, 0.0, 1000.0),
            ..Self::default()
        }
    }

    pub fn with_occlusion(occlusion: PanelOcclusion) -> Self {
        Self {
            occlusion,
            ..Self::default()
        }
    }

    /// Forget the calls recorded so far.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn last_frame(&self) -> Option<&Call> {
        self.calls
            .iter()
            .rev()
            .find(|c| matches!(c, Call::FrameRegion(..) | Call::FrameWholeImage(_)))
    }

    pub fn frames(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::FrameRegion(..) | Call::FrameWholeImage(_)))
            .collect()
    }

    pub fn opened(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::OpenImage(source) => Some(source.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn overlay_ids(&self) -> Vec<&str> {
        self.overlays.iter().map(|o| o.id.as_str()).collect()
    }

    pub fn overlay(&self, id: &str) -> Option<&OverlayElement> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// Last active flag sent for an overlay id.
    pub fn active_flag(&self, id: &str) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::SetActive(target, active) if target == id => Some(*active),
            _ => None,
        })
    }
}

impl RenderSurface for RecordingSurface {
    fn open_image(&mut self, tile_source: &str) {
        self.calls.push(Call::OpenImage(tile_source.to_string()));
    }

    fn frame_region(&mut self, rect: Rect, animate: bool) {
        self.calls.push(Call::FrameRegion(rect, animate));
    }

    fn frame_whole_image(&mut self, animate: bool) {
        self.calls.push(Call::FrameWholeImage(animate));
    }

    fn viewport_center(&self) -> Point {
        self.center
    }

    fn add_marker_overlay(&mut self, element: &OverlayElement) {
        self.calls.push(Call::AddOverlay(element.id.clone()));
        self.overlays.push(element.clone());
    }

    fn remove_marker_overlay(&mut self, id: &str) {
        self.calls.push(Call::RemoveOverlay(id.to_string()));
        self.overlays.retain(|o| o.id != id);
    }

    fn set_marker_active(&mut self, id: &str, active: bool) {
        self.calls.push(Call::SetActive(id.to_string(), active));
        if let Some(overlay) = self.overlays.iter_mut().find(|o| o.id == id) {
            overlay.active = active;
        }
    }

    fn set_mouse_navigation(&mut self, enabled: bool) {
        self.calls.push(Call::MouseNavigation(enabled));
    }

    fn panel_occlusion(&self) -> PanelOcclusion {
        self.occlusion
    }
}

// ============================================================================
// Viewer Helpers
// ============================================================================

/// Config with a selector container and the given manifest URL.
pub fn base_config() -> ViewerConfig {
    ViewerConfig {
        container: Some(ContainerRef::Selector("#story".to_string())),
        manifest_url: Some("https://example.org/manifest.json".to_string()),
        ..ViewerConfig::default()
    }
}

pub fn valid(config: &ViewerConfig) -> ValidConfig {
    config.validate(true).expect("config should validate")
}

/// Viewer over `json` with default config and a fresh instance counter.
pub fn viewer(json: &str) -> StoryView<RecordingSurface> {
    viewer_with(json, &base_config(), RecordingSurface::new())
}

pub fn viewer_with(
    json: &str,
    config: &ViewerConfig,
    surface: RecordingSurface,
) -> StoryView<RecordingSurface> {
    let parsed = parse(json).expect("manifest should parse");
    let instance = InstanceCounter::new().allocate();
    StoryView::new(surface, parsed, &valid(config), instance)
}

/// Viewer that has already reported its image as loaded.
pub fn ready_viewer(json: &str, config: &ViewerConfig) -> StoryView<RecordingSurface> {
    let mut view = viewer_with(json, config, RecordingSurface::new());
    view.on_image_ready();
    view
}

/// Config with pins (and optionally the route) enabled.
pub fn pins_config(route: bool) -> ViewerConfig {
    ViewerConfig {
        enable_pins: true,
        enable_route: route,
        ..base_config()
    }
}
