//! Pin and point-of-interest markers for one canvas.

use serde::Serialize;

use crate::types::{Annotation, Point};

/// Kind of marker drawn over the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    /// Map-style pin at every resolvable annotation center
    Pin,
    /// Button at a `PointSelector` target
    PointOfInterest,
}

impl MarkerKind {
    /// Element id suffix, e.g. `pin-3`.
    pub fn part(self, index: usize) -> String {
        match self {
            Self::Pin => format!("pin-{index}"),
            Self::PointOfInterest => format!("poi-{index}"),
        }
    }

    /// Accessible label; annotations are numbered from 1.
    pub fn label(self, index: usize) -> String {
        let number = index.saturating_add(1);
        match self {
            Self::Pin => format!("Go to annotation {number}"),
            Self::PointOfInterest => format!("Point of interest {number}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub kind: MarkerKind,
    /// Annotation index within the canvas
    pub index: usize,
    pub image_point: Point,
    pub active: bool,
}

/// A marker whose active flag changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveChange {
    pub kind: MarkerKind,
    pub index: usize,
    pub active: bool,
}

/// All markers of the current canvas.
///
/// Rebuilt wholesale on canvas change. At most one annotation is active at a
/// time; its pin and its point-of-interest marker share that state.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSet {
    markers: Vec<Marker>,
    active: Option<usize>,
}

impl MarkerSet {
    /// Build markers for a canvas.
    ///
    /// Pins are created only when `with_pins` is set; point-of-interest
    /// markers are always created for point targets.
    pub fn build(annotations: &[Annotation], with_pins: bool) -> Self {
        let mut markers = Vec::new();
        if with_pins {
            markers.extend(annotations.iter().enumerate().filter_map(|(index, a)| {
                a.target.center().map(|image_point| Marker {
                    kind: MarkerKind::Pin,
                    index,
                    image_point,
                    active: false,
                })
            }));
        }
        markers.extend(annotations.iter().enumerate().filter_map(|(index, a)| {
            a.target.as_point().map(|image_point| Marker {
                kind: MarkerKind::PointOfInterest,
                index,
                image_point,
                active: false,
            })
        }));
        Self {
            markers,
            active: None,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn of_kind(&self, kind: MarkerKind) -> impl Iterator<Item = &Marker> + '_ {
        self.markers.iter().filter(move |m| m.kind == kind)
    }

    pub fn has_marker(&self, index: usize) -> bool {
        self.markers.iter().any(|m| m.index == index)
    }

    /// Annotation index whose markers are active.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Make the markers of `index` active and every other marker inactive.
    ///
    /// An index without markers clears the active state. Returns only the
    /// markers whose flag actually changed.
    pub fn set_active(&mut self, index: Option<usize>) -> Vec<ActiveChange> {
        let index = index.filter(|&i| self.has_marker(i));
        self.active = index;
        let mut changes = Vec::new();
        for marker in &mut self.markers {
            let active = Some(marker.index) == index;
            if marker.active != active {
                marker.active = active;
                changes.push(ActiveChange {
                    kind: marker.kind,
                    index: marker.index,
                    active,
                });
            }
        }
        changes
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
    use crate::types::{Rect, Target};

    fn annotation(target: Target) -> Annotation {
        Annotation {
            id: None,
            target,
            bodies: Vec::new(),
        }
    }

    fn sample() -> Vec<Annotation> {
        vec![
            annotation(Target::Region(Rect::new(0.0, 0.0, 10.0, 20.0))),
            annotation(Target::Point(Point::new(50.0, 60.0))),
            annotation(Target::None),
        ]
    }

    #[test]
    fn test_build_with_pins() {
        let set = MarkerSet::build(&sample(), true);
        let pins: Vec<_> = set.of_kind(MarkerKind::Pin).collect();
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].image_point, Point::new(5.0, 10.0));
        assert_eq!(pins[1].image_point, Point::new(50.0, 60.0));
        assert_eq!(set.of_kind(MarkerKind::PointOfInterest).count(), 1);
    }

    #[test]
    fn test_build_without_pins_keeps_poi() {
        let set = MarkerSet::build(&sample(), false);
        assert_eq!(set.len(), 1);
        assert_eq!(set.markers()[0].kind, MarkerKind::PointOfInterest);
        assert_eq!(set.markers()[0].index, 1);
    }

    #[test]
    fn test_set_active_is_exclusive() {
        let mut set = MarkerSet::build(&sample(), true);
        let changes = set.set_active(Some(1));
        assert_eq!(changes.len(), 2);
        assert_eq!(set.active(), Some(1));

        let changes = set.set_active(Some(0));
        assert_eq!(set.markers().iter().filter(|m| m.active).count(), 1);
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn test_set_active_without_marker_clears() {
        let mut set = MarkerSet::build(&sample(), true);
        set.set_active(Some(0));
        set.set_active(Some(2));
        assert_eq!(set.active(), None);
        assert!(set.markers().iter().all(|m| !m.active));
    }

    #[test]
    fn test_labels_are_one_based() {
        assert_eq!(MarkerKind::Pin.label(0), "Go to annotation 1");
        assert_eq!(MarkerKind::PointOfInterest.part(4), "poi-4");
    }
}
