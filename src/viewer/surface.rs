//! The deep-zoom rendering surface the viewer drives.

use crate::layout::PanelOcclusion;
use crate::overlay::OverlayElement;
use crate::types::{Point, Rect};

/// Operations the viewer needs from a deep-zoom image surface.
///
/// All coordinates are image pixels; converting to the surface's own
/// coordinate system is the implementation's job. Unknown overlay ids must
/// be ignored.
pub trait RenderSurface {
    /// Start loading an image. Completion is reported through
    /// [`StoryView::on_image_ready`](super::StoryView::on_image_ready).
    fn open_image(&mut self, tile_source: &str);

    /// Fit a region into the viewport.
    fn frame_region(&mut self, rect: Rect, animate: bool);

    /// Reset pan and zoom.
    fn frame_whole_image(&mut self, animate: bool);

    fn viewport_center(&self) -> Point;

    fn add_marker_overlay(&mut self, element: &OverlayElement);

    fn remove_marker_overlay(&mut self, id: &str);

    fn set_marker_active(&mut self, id: &str, active: bool);

    /// Enable or disable mouse pan and zoom.
    fn set_mouse_navigation(&mut self, enabled: bool);

    /// Current panel geometry, measured at call time.
    fn panel_occlusion(&self) -> PanelOcclusion;
}
