//! Serializable summary of a story: every canvas, slide, target and marker.

use serde::Serialize;

use crate::layout::{intent_for_slide, FrameIntent};
use crate::overlay::{build_route, Marker, MarkerSet};
use crate::parser::ParsedManifest;
use crate::slides::{Bounds, SlideKind, SlideOptions, Story};
use crate::status::StatusCode;
use crate::types::Point;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    pub label: String,
    pub canvases: Vec<CanvasOutline>,
    pub statuses: Vec<StatusCode>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasOutline {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_service: Option<String>,
    pub bounds: Bounds,
    pub slides: Vec<SlideOutline>,
    pub markers: Vec<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideOutline {
    /// Slide index within the canvas (-1 for the title)
    pub position: i32,
    #[serde(flatten)]
    pub kind: SlideKind,
    pub frame: FrameIntent,
}

impl Outline {
    /// Outline with pins and route computed for every canvas.
    pub fn new(parsed: ParsedManifest, options: SlideOptions) -> Self {
        let statuses = parsed.statuses;
        let story = Story::new(parsed.manifest, options);
        let canvases = (0..story.canvas_count())
            .map(|index| canvas_outline(&story, index))
            .collect();
        Self {
            label: story.manifest().label.clone(),
            canvases,
            statuses,
        }
    }
}

fn canvas_outline(story: &Story, index: usize) -> CanvasOutline {
    let annotations = story.annotations(index);
    let canvas = story.canvas(index);
    let centers: Vec<Point> = annotations
        .iter()
        .filter_map(|a| a.target.center())
        .collect();
    CanvasOutline {
        index,
        image_service: canvas.and_then(|c| c.image_service.clone()),
        bounds: story.bounds(index),
        slides: story
            .slides(index)
            .into_iter()
            .map(|(position, kind)| SlideOutline {
                position,
                kind,
                frame: intent_for_slide(story, index, kind),
            })
            .collect(),
        markers: MarkerSet::build(annotations, true).markers().to_vec(),
        route: build_route(&centers, canvas.and_then(|c| c.dimensions())).map(|r| r.data),
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
    use crate::parser::parse;

    #[test]
    fn test_outline_serializes() {
        let json = r#"{
            "@context": "http://iiif.io/api/presentation/3/context.json",
            "label": {"en": ["Story"]},
            "items": [{
                "id": "c1", "type": "Canvas", "width": 1000, "height": 800,
                "annotations": [{"type": "AnnotationPage", "items": [
                    {"type": "Annotation", "target": "c1#xywh=0,0,100,100",
                     "body": {"type": "TextualBody", "value": "hi"}}
                ]}]
            }]
        }"#;
        let outline = Outline::new(parse(json).unwrap(), SlideOptions::default());
        assert_eq!(outline.canvases.len(), 1);
        let canvas = &outline.canvases[0];
        assert_eq!(canvas.slides.len(), 3);
        assert_eq!(canvas.markers.len(), 1);

        let value = serde_json::to_value(&outline).unwrap();
        assert_eq!(value["canvases"][0]["slides"][0]["kind"], "title");
        assert_eq!(value["canvases"][0]["slides"][1]["kind"], "annotation");
        assert_eq!(value["canvases"][0]["slides"][1]["index"], 0);
        assert_eq!(value["canvases"][0]["slides"][0]["position"], -1);
    }
}
