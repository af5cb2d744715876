//! Manifest parsing tests: versions, targets, bodies and statuses.
//!
//! These go through `storyview::parser::parse` with manifests built by the
//! fixtures, and check the reduced `Manifest` shape the slides consume.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use fixtures::{two_region_story, unlabelled_story, CanvasBuilder, ManifestBuilder, V2_CONTEXT};
use serde_json::json;
use storyview::parser::parse;
use storyview::{AnnotationBody, PresentationVersion, Rect, StatusCode, Target, TextFormat};
use test_case::test_case;

// ============================================================================
// FATAL ERRORS
// ============================================================================

#[test_case("not json" => StatusCode::ManifestErr; "invalid json")]
#[test_case("[]" => StatusCode::BadManifest; "array document")]
#[test_case(r#"{"items": []}"# => StatusCode::BadManifest; "no canvases")]
#[test_case(r#"{"label": "x"}"# => StatusCode::BadManifest; "no items")]
fn test_fatal_manifest_errors(json: &str) -> StatusCode {
    parse(json).unwrap_err().status_code()
}

// ============================================================================
// ADVISORY STATUSES
// ============================================================================

#[test]
fn test_labelled_v3_manifest_has_no_statuses() {
    let parsed = parse(&two_region_story()).unwrap();
    assert!(parsed.statuses.is_empty());
    assert_eq!(parsed.manifest.version, PresentationVersion::V3);
    assert_eq!(parsed.manifest.label, "Harbour at dusk");
}

#[test]
fn test_missing_label_is_advisory() {
    let parsed = parse(&unlabelled_story()).unwrap();
    assert_eq!(parsed.statuses, vec![StatusCode::NoLabel]);
    assert!(!parsed.manifest.has_label());
    assert_eq!(parsed.manifest.canvases[0].annotations.len(), 3);
}

#[test]
fn test_unknown_context_is_advisory() {
    let json = ManifestBuilder::new()
        .context("https://example.org/context.json")
        .label("Story")
        .canvas(CanvasBuilder::new(10, 10))
        .build();
    let parsed = parse(&json).unwrap();
    assert!(parsed.statuses.contains(&StatusCode::UnknVersion));
    assert_eq!(parsed.manifest.version, PresentationVersion::Unknown);
}

#[test]
fn test_external_annotation_pages_are_dropped() {
    let json = ManifestBuilder::new()
        .label("Story")
        .canvas(
            CanvasBuilder::new(100, 100)
                .region(0, 0, 10, 10, "embedded")
                .external_page("https://example.org/annotations/page-2.json"),
        )
        .build();
    let parsed = parse(&json).unwrap();
    assert_eq!(parsed.statuses, vec![StatusCode::NoExtAnno]);
    assert_eq!(parsed.manifest.canvases[0].annotations.len(), 1);
}

// ============================================================================
// CANVASES
// ============================================================================

#[test]
fn test_canvas_dimensions_and_service() {
    let parsed = parse(&two_region_story()).unwrap();
    let canvas = &parsed.manifest.canvases[0];
    assert_eq!(canvas.dimensions(), Some((4000.0, 3000.0)));
    assert_eq!(
        canvas.image_service.as_deref(),
        Some("https://example.org/iiif/image/info.json")
    );
}

#[test]
fn test_canvas_without_service_falls_back_to_image_id() {
    let json = ManifestBuilder::new()
        .label("Story")
        .canvas(CanvasBuilder::new(100, 100).no_service())
        .build();
    let parsed = parse(&json).unwrap();
    assert!(parsed.manifest.canvases[0].image_service.is_some());
}

#[test]
fn test_presentation_2_manifest() {
    let json = json!({
        "@context": V2_CONTEXT,
        "@id": "https://example.org/manifest.json",
        "@type": "sc:Manifest",
        "label": "Old story",
        "attribution": "Museum",
        "sequences": [{"canvases": [{
            "@id": "https://example.org/canvas/1",
            "width": 100,
            "height": 50,
            "images": [{"resource": {
                "@id": "https://example.org/image/full/full/0/default.jpg",
                "service": {"@id": "https://example.org/image"}
            }}]
        }]}]
    })
    .to_string();
    let parsed = parse(&json).unwrap();
    let manifest = &parsed.manifest;
    assert_eq!(manifest.version, PresentationVersion::V2);
    assert_eq!(manifest.label, "Old story");
    assert_eq!(manifest.required_statement.value, "Museum");
    assert_eq!(
        manifest.canvases[0].image_service.as_deref(),
        Some("https://example.org/image/info.json")
    );
}

// ============================================================================
// TARGETS AND BODIES
// ============================================================================

#[test]
fn test_annotation_targets() {
    let json = ManifestBuilder::new()
        .label("Story")
        .canvas(
            CanvasBuilder::new(1000, 1000)
                .region(265, 661, 100, 200, "region")
                .point(40, 50, "<p>point</p>")
                .untargeted("whole"),
        )
        .build();
    let parsed = parse(&json).unwrap();
    let targets: Vec<Target> = parsed.manifest.canvases[0]
        .annotations
        .iter()
        .map(|a| a.target)
        .collect();
    assert_eq!(
        targets,
        vec![
            Target::Region(Rect::new(265.0, 661.0, 100.0, 200.0)),
            Target::Point(storyview::Point::new(40.0, 50.0)),
            Target::None,
        ]
    );
}

#[test]
fn test_annotation_bodies_keep_order() {
    let json = ManifestBuilder::new()
        .label("Story")
        .canvas(CanvasBuilder::new(100, 100).annotation(json!({
            "type": "Annotation",
            "target": "https://example.org/canvas/1#xywh=0,0,1,1",
            "body": [
                {"type": "TextualBody", "value": "<b>first</b>", "format": "text/html"},
                {"id": "https://example.org/audio.mp3", "type": "Sound", "format": "audio/mpeg"},
                {"type": "Video", "id": "https://example.org/clip.mp4"}
            ]
        })))
        .build();
    let parsed = parse(&json).unwrap();
    let bodies = &parsed.manifest.canvases[0].annotations[0].bodies;
    assert_eq!(bodies.len(), 2);
    assert!(matches!(
        &bodies[0],
        AnnotationBody::Text { format: TextFormat::Html, value, .. } if value == "<b>first</b>"
    ));
    assert!(matches!(
        &bodies[1],
        AnnotationBody::Audio { url, .. } if url == "https://example.org/audio.mp3"
    ));
}
