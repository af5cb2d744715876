//! Viewport framing: which part of the image to show for a slide.
//!
//! Framing happens in two steps. [`intent_for_slide`] is computed during the
//! navigation transition and depends only on the slide. [`resolve`] turns
//! that intent into a concrete request once the host has measured the panel.

use serde::Serialize;

use super::viewport::{FrameContext, PanelOcclusion};
use crate::region::point_to_region;
use crate::slides::{SlideKind, Story};
use crate::types::{Rect, Target};

/// Below this viewer width the panel stacks instead of sitting beside the image.
pub const MIN_SIDE_BY_SIDE_WIDTH: f64 = 640.0;

/// Rendered width of a point-of-interest marker in pixels.
pub const MARKER_WIDTH: f64 = 44.0;

/// Slide-dependent framing decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FrameIntent {
    /// Reset pan and zoom to show the whole image
    WholeImage,
    /// Leave the viewport untouched
    Hold,
    /// Fit a region; `point_of_interest` regions are panel-corrected
    #[serde(rename_all = "camelCase")]
    Region {
        rect: Rect,
        point_of_interest: bool,
    },
}

/// Concrete instruction for the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FramingRequest {
    WholeImage { animate: bool },
    Region { rect: Rect, animate: bool },
    Hold,
}

/// Framing intent for the slide at `kind` on `canvas`.
pub fn intent_for_slide(story: &Story, canvas: usize, kind: SlideKind) -> FrameIntent {
    match kind {
        // Title only exists when the manifest has a label
        SlideKind::Title => FrameIntent::WholeImage,
        SlideKind::Credits => FrameIntent::Hold,
        SlideKind::Annotation(index) => story
            .annotation(canvas, index)
            .map_or(FrameIntent::WholeImage, |annotation| {
                intent_for_target(&annotation.target, story.options().poi_region_size)
            }),
    }
}

/// Framing intent for an annotation target.
///
/// Points are expanded into a square of side `poi_region_size` so they frame
/// like regions; targets without a region frame the whole image.
pub fn intent_for_target(target: &Target, poi_region_size: f64) -> FrameIntent {
    match *target {
        Target::Region(rect) => FrameIntent::Region {
            rect,
            point_of_interest: false,
        },
        Target::Point(point) => FrameIntent::Region {
            rect: point_to_region(point, poi_region_size),
            point_of_interest: true,
        },
        Target::None => FrameIntent::WholeImage,
    }
}

/// Resolve an intent against the current panel geometry.
pub fn resolve(intent: FrameIntent, ctx: &FrameContext) -> FramingRequest {
    let animate = ctx.animate();
    match intent {
        FrameIntent::WholeImage => FramingRequest::WholeImage { animate },
        FrameIntent::Hold => FramingRequest::Hold,
        FrameIntent::Region {
            rect,
            point_of_interest,
        } => {
            let rect = if point_of_interest
                && ctx.panel_visible
                && ctx.occlusion.viewer_width >= MIN_SIDE_BY_SIDE_WIDTH
            {
                offset_region_by_panel(rect, &ctx.occlusion)
            } else {
                rect
            };
            FramingRequest::Region { rect, animate }
        }
    }
}

/// Horizontal shift that centres a region in the space the panel leaves free.
///
/// ```text
/// overlap      = p - v/2
/// remaining    = v - p
/// x_correction = overlap + remaining/2 - m/2
/// ```
/// where `p` is the occluded width, `v` the viewer width and `m` the marker width.
pub fn panel_x_correction(panel: &PanelOcclusion) -> f64 {
    let occluded = panel.occluded_width();
    let viewer = panel.viewer_width;
    let overlap = occluded - viewer / 2.0;
    let remaining = viewer - occluded;
    overlap + remaining / 2.0 - MARKER_WIDTH / 2.0
}

/// Shift a region so it is not hidden behind the panel.
///
/// Works on raw image values before any coordinate conversion; only `x`
/// changes.
pub fn offset_region_by_panel(region: Rect, panel: &PanelOcclusion) -> Rect {
    region.with_x(region.x - panel_x_correction(panel))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn ctx(panel_visible: bool, viewer_width: f64) -> FrameContext {
        FrameContext {
            occlusion: PanelOcclusion::new(300.0, 0.0, viewer_width),
            panel_visible,
            reduced_motion: false,
        }
    }

    #[test]
    fn test_panel_correction_value() {
        let panel = PanelOcclusion::new(300.0, 0.0, 1000.0);
        // overlap -200, remaining 700, marker 22
        assert_eq!(panel_x_correction(&panel), 128.0);
        let r = offset_region_by_panel(Rect::new(500.0, 10.0, 100.0, 100.0), &panel);
        assert_eq!(r, Rect::new(372.0, 10.0, 100.0, 100.0));
    }

    #[test]
    fn test_panel_correction_includes_inset() {
        let panel = PanelOcclusion::new(280.0, 20.0, 1000.0);
        assert_eq!(panel_x_correction(&panel), 128.0);
    }

    #[test]
    fn test_region_targets_are_not_corrected() {
        let intent = intent_for_target(&Target::Region(Rect::new(1.0, 2.0, 3.0, 4.0)), 100.0);
        assert_eq!(
            resolve(intent, &ctx(true, 1000.0)),
            FramingRequest::Region {
                rect: Rect::new(1.0, 2.0, 3.0, 4.0),
                animate: true
            }
        );
    }

    #[test]
    fn test_point_corrected_only_when_panel_beside_image() {
        let intent = intent_for_target(&Target::Point(Point::new(1024.0, 1024.0)), 100.0);
        let expanded = Rect::new(974.0, 974.0, 100.0, 100.0);

        let FramingRequest::Region { rect, .. } = resolve(intent, &ctx(true, 1000.0)) else {
            panic!("expected region");
        };
        assert_eq!(rect, expanded.with_x(974.0 - 128.0));

        // Panel hidden
        let FramingRequest::Region { rect, .. } = resolve(intent, &ctx(false, 1000.0)) else {
            panic!("expected region");
        };
        assert_eq!(rect, expanded);

        // Narrow viewer
        let FramingRequest::Region { rect, .. } = resolve(intent, &ctx(true, 639.0)) else {
            panic!("expected region");
        };
        assert_eq!(rect, expanded);
    }

    #[test]
    fn test_reduced_motion_disables_animation() {
        let mut c = ctx(true, 1000.0);
        c.reduced_motion = true;
        assert_eq!(
            resolve(FrameIntent::WholeImage, &c),
            FramingRequest::WholeImage { animate: false }
        );
        assert_eq!(resolve(FrameIntent::Hold, &c), FramingRequest::Hold);
    }

    #[test]
    fn test_missing_target_frames_whole_image() {
        assert_eq!(intent_for_target(&Target::None, 100.0), FrameIntent::WholeImage);
    }
}
