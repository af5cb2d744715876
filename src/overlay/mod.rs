//! Marker overlays kept in sync with the active slide.
//!
//! Three layers sit on top of the image:
//! - a route line through annotation centers (behind everything else)
//! - pins at every annotation center
//! - point-of-interest markers at point targets
//!
//! Pins and the route share one visibility toggle. Point-of-interest markers
//! are always shown.

mod graphic;
mod markers;
mod route;

use serde::Serialize;

pub use graphic::{PoiGraphic, DEFAULT_POI_SVG};
pub use markers::{ActiveChange, Marker, MarkerKind, MarkerSet};
pub use route::{build_route, RoutePath};

use crate::instance::InstanceId;
use crate::types::{Annotation, Point, Rect};

/// Where an overlay element is anchored, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Placement {
    /// Centered on a point
    Center(Point),
    /// Stretched over a rectangle
    Bounds(Rect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayKind {
    Route,
    Pin,
    PointOfInterest,
}

impl From<MarkerKind> for OverlayKind {
    fn from(kind: MarkerKind) -> Self {
        match kind {
            MarkerKind::Pin => Self::Pin,
            MarkerKind::PointOfInterest => Self::PointOfInterest,
        }
    }
}

/// One element the rendering surface should attach to the image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayElement {
    pub id: String,
    pub kind: OverlayKind,
    /// Annotation the element navigates to when activated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<usize>,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Inner markup (sanitized SVG)
    pub markup: String,
    pub active: bool,
}

/// Overlay state for the current canvas.
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    pins_enabled: bool,
    route_enabled: bool,
    pins_visible: bool,
    markers: MarkerSet,
    route: Option<RoutePath>,
}

impl Overlays {
    pub fn new(pins_enabled: bool, route_enabled: bool) -> Self {
        Self {
            pins_enabled,
            route_enabled,
            pins_visible: true,
            ..Self::default()
        }
    }

    /// Rebuild every marker and the route for a new canvas.
    ///
    /// The active annotation is cleared; the next slide sets it again.
    pub fn rebuild(&mut self, annotations: &[Annotation], dimensions: Option<(f64, f64)>) {
        self.markers = MarkerSet::build(annotations, self.pins_enabled);
        self.route = if self.pins_enabled && self.route_enabled {
            let centers: Vec<Point> = annotations
                .iter()
                .filter_map(|a| a.target.center())
                .collect();
            build_route(&centers, dimensions)
        } else {
            None
        };
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn route(&self) -> Option<&RoutePath> {
        self.route.as_ref()
    }

    pub fn pins_enabled(&self) -> bool {
        self.pins_enabled
    }

    pub fn pins_visible(&self) -> bool {
        self.pins_visible
    }

    /// Flip pin and route visibility. Returns the new state.
    pub fn toggle_pins(&mut self) -> bool {
        self.pins_visible = !self.pins_visible;
        self.pins_visible
    }

    pub fn set_active(&mut self, index: Option<usize>) -> Vec<ActiveChange> {
        self.markers.set_active(index)
    }

    pub fn active(&self) -> Option<usize> {
        self.markers.active()
    }

    /// Elements to attach, route first so it sits behind the markers.
    ///
    /// Pins and the route are included only while visible.
    pub fn elements(&self, instance: InstanceId, graphic: &PoiGraphic) -> Vec<OverlayElement> {
        let mut elements = Vec::new();
        if self.pins_visible {
            elements.extend(self.toggled_elements(instance));
        }
        elements.extend(
            self.markers
                .of_kind(MarkerKind::PointOfInterest)
                .map(|m| marker_element(instance, m, graphic.markup())),
        );
        elements
    }

    /// Elements that follow the pin toggle.
    pub fn toggled_elements(&self, instance: InstanceId) -> Vec<OverlayElement> {
        let mut elements = Vec::new();
        if let Some(route) = &self.route {
            elements.push(OverlayElement {
                id: instance.element_id("route"),
                kind: OverlayKind::Route,
                annotation: None,
                placement: Placement::Bounds(Rect::new(0.0, 0.0, route.width, route.height)),
                label: None,
                markup: route.to_svg(),
                active: false,
            });
        }
        elements.extend(
            self.markers
                .of_kind(MarkerKind::Pin)
                .map(|m| marker_element(instance, m, "")),
        );
        elements
    }

    /// Ids of every element this canvas may have attached.
    pub fn element_ids(&self, instance: InstanceId) -> Vec<String> {
        let route = self.route.as_ref().map(|_| instance.element_id("route"));
        route
            .into_iter()
            .chain(
                self.markers
                    .markers()
                    .iter()
                    .map(|m| instance.element_id(&m.kind.part(m.index))),
            )
            .collect()
    }
}

fn marker_element(instance: InstanceId, marker: &Marker, markup: &str) -> OverlayElement {
    OverlayElement {
        id: instance.element_id(&marker.kind.part(marker.index)),
        kind: marker.kind.into(),
        annotation: Some(marker.index),
        placement: Placement::Center(marker.image_point),
        label: Some(marker.kind.label(marker.index)),
        markup: markup.to_string(),
        active: marker.active,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::instance::InstanceCounter;
    use crate::types::Target;

    fn annotations() -> Vec<Annotation> {
        [
            Target::Region(Rect::new(0.0, 0.0, 100.0, 100.0)),
            Target::Point(Point::new(300.0, 300.0)),
        ]
        .into_iter()
        .map(|target| Annotation {
            id: None,
            target,
            bodies: Vec::new(),
        })
        .collect()
    }

    #[test]
    fn test_elements_route_first() {
        let mut overlays = Overlays::new(true, true);
        overlays.rebuild(&annotations(), Some((1000.0, 1000.0)));
        let id = InstanceCounter::new().allocate();
        let graphic = PoiGraphic::builtin().unwrap();
        let kinds: Vec<_> = overlays
            .elements(id, &graphic)
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                OverlayKind::Route,
                OverlayKind::Pin,
                OverlayKind::Pin,
                OverlayKind::PointOfInterest
            ]
        );
    }

    #[test]
    fn test_hidden_pins_keep_poi() {
        let mut overlays = Overlays::new(true, true);
        overlays.rebuild(&annotations(), Some((1000.0, 1000.0)));
        assert!(!overlays.toggle_pins());
        let id = InstanceCounter::new().allocate();
        let elements = overlays.elements(id, &PoiGraphic::builtin().unwrap());
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].id, "storyview-0__poi-1");
        assert_eq!(elements[0].label.as_deref(), Some("Point of interest 2"));
    }

    #[test]
    fn test_route_requires_pins() {
        let mut overlays = Overlays::new(false, true);
        overlays.rebuild(&annotations(), Some((1000.0, 1000.0)));
        assert!(overlays.route().is_none());
        assert_eq!(overlays.markers().len(), 1);
    }

    #[test]
    fn test_element_ids_cover_everything() {
        let mut overlays = Overlays::new(true, true);
        overlays.rebuild(&annotations(), Some((1000.0, 1000.0)));
        let id = InstanceCounter::new().allocate();
        assert_eq!(
            overlays.element_ids(id),
            vec![
                "storyview-0__route",
                "storyview-0__pin-0",
                "storyview-0__pin-1",
                "storyview-0__poi-1"
            ]
        );
    }
}
