//! Viewport state measured by the host for each framing decision.

use serde::{Deserialize, Serialize};

/// Horizontal space the info panel takes out of the viewer.
///
/// Measured by the host per animation frame and never stored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PanelOcclusion {
    /// Rendered width of the panel in pixels
    pub panel_width: f64,
    /// Spacing between the panel and the viewer edge in pixels
    #[serde(default)]
    pub inset: f64,
    /// Client width of the whole viewer in pixels
    pub viewer_width: f64,
}

impl PanelOcclusion {
    pub fn new(panel_width: f64, inset: f64, viewer_width: f64) -> Self {
        Self {
            panel_width,
            inset,
            viewer_width,
        }
    }

    /// Panel width including its inset.
    pub fn occluded_width(&self) -> f64 {
        self.panel_width + self.inset
    }
}

/// Everything framing needs beyond the slide itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    pub occlusion: PanelOcclusion,
    /// Whether the info panel is currently shown
    pub panel_visible: bool,
    /// Reduced-motion preference: jump instead of animating
    pub reduced_motion: bool,
}

impl FrameContext {
    pub fn animate(&self) -> bool {
        !self.reduced_motion
    }
}
