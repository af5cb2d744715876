//! Slide model: the ordered, bounded sequence of slides for each canvas.
//!
//! A canvas with `n` annotations yields, in order:
//! - a title slide at index `-1` (only when the manifest has a label)
//! - annotation slides at `0..n`
//! - a credits slide at index `n` (only when configured)

use serde::Serialize;

use crate::region::DEFAULT_POI_REGION_SIZE;
use crate::types::{Annotation, Canvas, Manifest};

/// Options that shape the slide sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideOptions {
    pub show_credit_slide: bool,
    /// Side of the square framed around a point of interest
    pub poi_region_size: f64,
}

impl Default for SlideOptions {
    fn default() -> Self {
        Self {
            show_credit_slide: true,
            poi_region_size: DEFAULT_POI_REGION_SIZE,
        }
    }
}

/// Inclusive range of navigable slide indices.
///
/// `ceiling < floor` only for a canvas with no annotations, no credits and
/// no label; such a canvas has nothing to navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub floor: i32,
    pub ceiling: i32,
}

impl Bounds {
    pub fn new(has_label: bool, annotation_count: usize, show_credit_slide: bool) -> Self {
        let count = i32::try_from(annotation_count).unwrap_or(i32::MAX - 1);
        Self {
            floor: if has_label { -1 } else { 0 },
            ceiling: if show_credit_slide { count } else { count - 1 },
        }
    }

    pub fn contains(&self, index: i32) -> bool {
        index >= self.floor && index <= self.ceiling
    }

    pub fn is_empty(&self) -> bool {
        self.ceiling < self.floor
    }
}

/// Which kind of slide sits at an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum SlideKind {
    Title,
    Annotation(usize),
    Credits,
}

/// A manifest prepared for navigation.
#[derive(Debug, Clone)]
pub struct Story {
    manifest: Manifest,
    options: SlideOptions,
}

impl Story {
    pub fn new(manifest: Manifest, options: SlideOptions) -> Self {
        Self { manifest, options }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn options(&self) -> &SlideOptions {
        &self.options
    }

    pub fn has_label(&self) -> bool {
        self.manifest.has_label()
    }

    pub fn canvas_count(&self) -> usize {
        self.manifest.canvases.len()
    }

    pub fn canvas(&self, canvas: usize) -> Option<&Canvas> {
        self.manifest.canvases.get(canvas)
    }

    /// Annotations of a canvas; empty for an unknown canvas.
    pub fn annotations(&self, canvas: usize) -> &[Annotation] {
        self.canvas(canvas)
            .map(|c| c.annotations.as_slice())
            .unwrap_or_default()
    }

    pub fn annotation(&self, canvas: usize, index: usize) -> Option<&Annotation> {
        self.annotations(canvas).get(index)
    }

    pub fn bounds(&self, canvas: usize) -> Bounds {
        Bounds::new(
            self.has_label(),
            self.annotations(canvas).len(),
            self.options.show_credit_slide,
        )
    }

    /// Slide at `index` of `canvas`, or `None` when out of bounds.
    pub fn slide_at(&self, canvas: usize, index: i32) -> Option<SlideKind> {
        let bounds = self.bounds(canvas);
        if !bounds.contains(index) {
            return None;
        }
        if self.has_label() && index == bounds.floor {
            return Some(SlideKind::Title);
        }
        if self.options.show_credit_slide && index == bounds.ceiling {
            return Some(SlideKind::Credits);
        }
        usize::try_from(index).ok().map(SlideKind::Annotation)
    }

    /// Every slide of a canvas in navigation order.
    pub fn slides(&self, canvas: usize) -> Vec<(i32, SlideKind)> {
        let bounds = self.bounds(canvas);
        (bounds.floor..=bounds.ceiling)
            .filter_map(|i| self.slide_at(canvas, i).map(|kind| (i, kind)))
            .collect()
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
    use crate::types::Target;

    fn story(label: &str, annotations: usize, credits: bool) -> Story {
        let canvas = Canvas {
            annotations: (0..annotations)
                .map(|_| Annotation {
                    id: None,
                    target: Target::None,
                    bodies: Vec::new(),
                })
                .collect(),
            ..Canvas::default()
        };
        let manifest = Manifest {
            label: label.to_string(),
            canvases: vec![canvas],
            ..Manifest::default()
        };
        Story::new(
            manifest,
            SlideOptions {
                show_credit_slide: credits,
                ..SlideOptions::default()
            },
        )
    }

    #[test]
    fn test_bounds_with_label_and_credits() {
        let s = story("Title", 2, true);
        assert_eq!(s.bounds(0), Bounds { floor: -1, ceiling: 2 });
        assert_eq!(
            s.slides(0).into_iter().map(|(_, k)| k).collect::<Vec<_>>(),
            vec![
                SlideKind::Title,
                SlideKind::Annotation(0),
                SlideKind::Annotation(1),
                SlideKind::Credits
            ]
        );
    }

    #[test]
    fn test_bounds_without_label_or_credits() {
        let s = story("", 3, false);
        assert_eq!(s.bounds(0), Bounds { floor: 0, ceiling: 2 });
        assert_eq!(s.slide_at(0, 0), Some(SlideKind::Annotation(0)));
        assert_eq!(s.slide_at(0, -1), None);
        assert_eq!(s.slide_at(0, 3), None);
    }

    #[test]
    fn test_degenerate_canvas_only_title() {
        let s = story("Title", 0, false);
        let bounds = s.bounds(0);
        assert_eq!(bounds, Bounds { floor: -1, ceiling: -1 });
        assert_eq!(s.slides(0), vec![(-1, SlideKind::Title)]);
    }

    #[test]
    fn test_degenerate_canvas_nothing_navigable() {
        let s = story("", 0, false);
        assert!(s.bounds(0).is_empty());
        assert!(s.slides(0).is_empty());
    }

    #[test]
    fn test_credits_only() {
        let s = story("", 0, true);
        assert_eq!(s.slides(0), vec![(0, SlideKind::Credits)]);
    }

    #[test]
    fn test_unknown_canvas_has_no_annotations() {
        let s = story("Title", 2, true);
        assert!(s.annotations(5).is_empty());
        assert_eq!(s.bounds(5), Bounds { floor: -1, ceiling: 0 });
    }
}
