//! Utilities for parsing media-fragment regions and point selectors.
//!
//! See <https://www.w3.org/TR/media-frags/#naming-space> for the `xywh` grammar.

use serde_json::Value;

use crate::types::{Point, Rect};

/// Marker separating a resource URL from its spatial fragment.
pub const XYWH_FRAGMENT: &str = "#xywh=";

/// Side length of the square framed around a point of interest.
pub const DEFAULT_POI_REGION_SIZE: f64 = 100.0;

/// Parse the region out of a target like `https://example.org/canvas/1#xywh=265,661,100,200`.
///
/// Returns `None` when the fragment marker is absent or any of the four fields
/// is not a number. Values are not clamped.
pub fn parse_region(raw: &str) -> Option<Rect> {
    let (_, xywh) = raw.split_once(XYWH_FRAGMENT)?;
    parse_xywh(xywh)
}

/// Parse a `FragmentSelector` value like `xywh=10,20,30,40`.
pub fn parse_fragment_selector(value: &str) -> Option<Rect> {
    let xywh = value.trim().strip_prefix("xywh=")?;
    parse_xywh(xywh)
}

/// Parse the `x,y,w,h` part of a fragment, with an optional `pixel:` unit.
fn parse_xywh(xywh: &str) -> Option<Rect> {
    if xywh.starts_with("percent:") {
        return None;
    }
    let xywh = xywh.strip_prefix("pixel:").unwrap_or(xywh);
    // Anything after another '#' or '&' belongs to a different fragment
    let xywh = xywh.split(['&', '#']).next().unwrap_or(xywh);

    let mut fields = xywh.split(',').map(|f| f.trim().parse::<f64>());
    let x = fields.next()?.ok()?;
    let y = fields.next()?.ok()?;
    let width = fields.next()?.ok()?;
    let height = fields.next()?.ok()?;
    if fields.next().is_some() {
        return None;
    }
    if ![x, y, width, height].iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(Rect::new(x, y, width, height))
}

/// Parse a structured `PointSelector` (`{"type": "PointSelector", "x": .., "y": ..}`).
pub fn parse_point(selector: &Value) -> Option<Point> {
    let kind = selector.get("type")?.as_str()?;
    if kind != "PointSelector" {
        return None;
    }
    let x = selector.get("x")?.as_f64()?;
    let y = selector.get("y")?.as_f64()?;
    Some(Point::new(x, y))
}

/// Expand a point into a square region of side `size` centered on it.
///
/// The origin is clamped at zero; there is no upper clamp.
pub fn point_to_region(point: Point, size: f64) -> Rect {
    let half = size / 2.0;
    Rect::new(
        (point.x - half).max(0.0),
        (point.y - half).max(0.0),
        size,
        size,
    )
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
    use serde_json::json;

    #[test]
    fn test_parse_region_center() {
        let rect = parse_region("https://example.org/canvas/1#xywh=265,661,100,200").unwrap();
        assert_eq!(rect, Rect::new(265.0, 661.0, 100.0, 200.0));
        assert_eq!(rect.center(), Point::new(315.0, 761.0));
    }

    #[test]
    fn test_parse_region_requires_marker() {
        assert_eq!(parse_region("265,661,100,200"), None);
        assert_eq!(parse_region(""), None);
    }

    #[test]
    fn test_parse_region_rejects_bad_fields() {
        assert_eq!(parse_region("#xywh=1,2,3"), None);
        assert_eq!(parse_region("#xywh=1,2,3,four"), None);
        assert_eq!(parse_region("#xywh=1,2,3,4,5"), None);
        assert_eq!(parse_region("#xywh=percent:10,10,50,50"), None);
    }

    #[test]
    fn test_parse_region_passes_negatives_through() {
        let rect = parse_region("#xywh=-10,-20,30.5,40").unwrap();
        assert_eq!(rect, Rect::new(-10.0, -20.0, 30.5, 40.0));
    }

    #[test]
    fn test_parse_region_pixel_unit() {
        let rect = parse_region("#xywh=pixel:1,2,3,4").unwrap();
        assert_eq!(rect, Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_parse_fragment_selector() {
        assert_eq!(
            parse_fragment_selector("xywh=10,20,30,40"),
            Some(Rect::new(10.0, 20.0, 30.0, 40.0))
        );
        assert_eq!(parse_fragment_selector("t=10,20"), None);
    }

    #[test]
    fn test_parse_point() {
        let selector = json!({"type": "PointSelector", "x": 1024, "y": 512.5});
        assert_eq!(parse_point(&selector), Some(Point::new(1024.0, 512.5)));
        assert_eq!(parse_point(&json!({"type": "PointSelector", "x": "1"})), None);
        assert_eq!(
            parse_point(&json!({"type": "FragmentSelector", "x": 1, "y": 2})),
            None
        );
    }

    #[test]
    fn test_point_to_region_keeps_center() {
        let rect = point_to_region(Point::new(1024.0, 1024.0), 100.0);
        assert_eq!(rect, Rect::new(974.0, 974.0, 100.0, 100.0));
        assert_eq!(rect.center(), Point::new(1024.0, 1024.0));
    }

    #[test]
    fn test_point_to_region_clamps_at_origin() {
        let rect = point_to_region(Point::new(10.0, 30.0), 100.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, 100.0);
    }
}
