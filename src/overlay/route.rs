//! Dashed route line connecting annotation centers in slide order.

use std::fmt::Write;

use serde::Serialize;

use crate::types::Point;

/// Perpendicular control point offset, as a fraction of the segment length.
const CURVE_FACTOR: f64 = 0.15;

/// Stroke width as a fraction of the shorter canvas side.
const STROKE_FACTOR: f64 = 0.003;

/// An SVG route spanning the whole canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePath {
    /// SVG path data in image coordinates
    pub data: String,
    pub width: f64,
    pub height: f64,
    pub stroke_width: f64,
    pub dash: f64,
    pub gap: f64,
}

impl RoutePath {
    /// Standalone `<svg>` markup, stretched over the canvas.
    pub fn to_svg(&self) -> String {
        format!(
            r#"<svg class="storyview__route" viewBox="0 0 {w} {h}" preserveAspectRatio="none"><path d="{d}" fill="none" stroke="currentColor" stroke-width="{s}" stroke-dasharray="{dash} {gap}" stroke-linecap="round"/></svg>"#,
            w = self.width,
            h = self.height,
            d = self.data,
            s = self.stroke_width,
            dash = self.dash,
            gap = self.gap,
        )
    }
}

/// Build the route through `points`.
///
/// Returns `None` with fewer than two points or unknown canvas dimensions.
/// Each segment is a quadratic curve whose control point sits off the
/// midpoint, alternating sides; identical consecutive points produce a
/// straight `L` segment.
pub fn build_route(points: &[Point], dimensions: Option<(f64, f64)>) -> Option<RoutePath> {
    let (width, height) = dimensions?;
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut data = format!("M {} {}", first.x, first.y);
    for (i, pair) in points.windows(2).enumerate() {
        let [p1, p2] = pair else { continue };
        let dist = p1.distance_to(p2);
        if dist <= 0.0 {
            let _ = write!(data, " L {} {}", p2.x, p2.y);
            continue;
        }
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        let amount = dist * CURVE_FACTOR * side;
        let control_x = (p1.x + p2.x) / 2.0 + (-dy / dist) * amount;
        let control_y = (p1.y + p2.y) / 2.0 + (dx / dist) * amount;
        let _ = write!(data, " Q {control_x} {control_y} {} {}", p2.x, p2.y);
    }

    let stroke_width = (width.min(height) * STROKE_FACTOR).round();
    Some(RoutePath {
        data,
        width,
        height,
        stroke_width,
        dash: stroke_width * 2.0,
        gap: (stroke_width * 1.5).round(),
    })
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

    #[test]
    fn test_needs_two_points_and_dimensions() {
        let p = Point::new(1.0, 1.0);
        assert!(build_route(&[p], Some((100.0, 100.0))).is_none());
        assert!(build_route(&[p, p], None).is_none());
        assert!(build_route(&[], Some((100.0, 100.0))).is_none());
    }

    #[test]
    fn test_alternating_curves() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(200.0, 0.0),
        ];
        let route = build_route(&points, Some((1000.0, 2000.0))).unwrap();
        // Horizontal segments: control points 15 above then below the midpoint
        assert_eq!(route.data, "M 0 0 Q 50 15 100 0 Q 150 -15 200 0");
    }

    #[test]
    fn test_identical_points_use_line() {
        let p = Point::new(10.0, 20.0);
        let route = build_route(&[p, p], Some((100.0, 100.0))).unwrap();
        assert_eq!(route.data, "M 10 20 L 10 20");
    }

    #[test]
    fn test_stroke_scales_with_canvas() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let route = build_route(&points, Some((4000.0, 3000.0))).unwrap();
        assert_eq!(route.stroke_width, 9.0);
        assert_eq!(route.dash, 18.0);
        assert_eq!(route.gap, 14.0);
        assert!(route.to_svg().contains(r#"stroke-dasharray="18 14""#));
        assert!(route.to_svg().contains(r#"viewBox="0 0 4000 3000""#));
    }
}
