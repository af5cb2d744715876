//! Test fixtures for generating IIIF manifests in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{ManifestBuilder, CanvasBuilder};
//!
//! let json = ManifestBuilder::new()
//!     .label("My story")
//!     .canvas(CanvasBuilder::new(1000, 800).region(0, 0, 100, 100, "First"))
//!     .build();
//!
//! let parsed = storyview::parser::parse(&json).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use serde_json::{json, Value};

pub const V3_CONTEXT: &str = "http://iiif.io/api/presentation/3/context.json";
pub const V2_CONTEXT: &str = "http://iiif.io/api/presentation/2/context.json";

// ============================================================================
// Canvas Builder
// ============================================================================

/// Builder for one canvas with its painting image and annotations.
#[derive(Debug, Clone)]
pub struct CanvasBuilder {
    id: String,
    width: u32,
    height: u32,
    service: Option<String>,
    annotations: Vec<Value>,
    external_pages: Vec<String>,
}

impl CanvasBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: "https://example.org/canvas/1".to_string(),
            width,
            height,
            service: Some("https://example.org/iiif/image".to_string()),
            annotations: Vec::new(),
            external_pages: Vec::new(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn service(mut self, service: &str) -> Self {
        self.service = Some(service.to_string());
        self
    }

    pub fn no_service(mut self) -> Self {
        self.service = None;
        self
    }

    /// Annotation targeting an `xywh` region with a plain text body.
    pub fn region(mut self, x: u32, y: u32, w: u32, h: u32, text: &str) -> Self {
        let target = format!("{}#xywh={x},{y},{w},{h}", self.id);
        self.annotations.push(json!({
            "type": "Annotation",
            "motivation": "commenting",
            "target": target,
            "body": {"type": "TextualBody", "value": text}
        }));
        self
    }

    /// Annotation targeting a point with an HTML body.
    pub fn point(mut self, x: u32, y: u32, html: &str) -> Self {
        self.annotations.push(json!({
            "type": "Annotation",
            "motivation": "commenting",
            "target": {
                "type": "SpecificResource",
                "source": self.id,
                "selector": {"type": "PointSelector", "x": x, "y": y}
            },
            "body": {"type": "TextualBody", "format": "text/html", "value": html}
        }));
        self
    }

    /// Annotation targeting the whole canvas.
    pub fn untargeted(mut self, text: &str) -> Self {
        self.annotations.push(json!({
            "type": "Annotation",
            "target": self.id,
            "body": {"type": "TextualBody", "value": text}
        }));
        self
    }

    pub fn annotation(mut self, annotation: Value) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Annotation page referenced by URL only.
    pub fn external_page(mut self, url: &str) -> Self {
        self.external_pages.push(url.to_string());
        self
    }

    pub fn build(&self) -> Value {
        let mut body = json!({
            "id": "https://example.org/iiif/image/full/max/0/default.jpg",
            "type": "Image",
            "format": "image/jpeg"
        });
        if let Some(service) = &self.service {
            body["service"] = json!([{"id": service, "type": "ImageService3"}]);
        }

        let mut pages = vec![json!({"type": "AnnotationPage", "items": self.annotations})];
        pages.extend(
            self.external_pages
                .iter()
                .map(|url| json!({"id": url, "type": "AnnotationPage"})),
        );

        json!({
            "id": self.id,
            "type": "Canvas",
            "width": self.width,
            "height": self.height,
            "items": [{
                "type": "AnnotationPage",
                "items": [{"type": "Annotation", "motivation": "painting", "body": body, "target": self.id}]
            }],
            "annotations": pages
        })
    }
}

// ============================================================================
// Manifest Builder
// ============================================================================

/// Builder for a Presentation 3 manifest.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    context: String,
    label: Option<String>,
    summary: Option<String>,
    required_statement: Option<(String, String)>,
    canvases: Vec<CanvasBuilder>,
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            context: V3_CONTEXT.to_string(),
            label: None,
            summary: None,
            required_statement: None,
            canvases: Vec::new(),
        }
    }

    pub fn context(mut self, context: &str) -> Self {
        self.context = context.to_string();
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn required_statement(mut self, label: &str, value: &str) -> Self {
        self.required_statement = Some((label.to_string(), value.to_string()));
        self
    }

    pub fn canvas(mut self, canvas: CanvasBuilder) -> Self {
        self.canvases.push(canvas);
        self
    }

    pub fn to_value(&self) -> Value {
        let mut manifest = json!({
            "@context": self.context,
            "id": "https://example.org/manifest.json",
            "type": "Manifest",
            "items": self.canvases.iter().map(CanvasBuilder::build).collect::<Vec<_>>()
        });
        if let Some(label) = &self.label {
            manifest["label"] = json!({"en": [label]});
        }
        if let Some(summary) = &self.summary {
            manifest["summary"] = json!({"en": [summary]});
        }
        if let Some((label, value)) = &self.required_statement {
            manifest["requiredStatement"] = json!({
                "label": {"en": [label]},
                "value": {"en": [value]}
            });
        }
        manifest
    }

    pub fn build(&self) -> String {
        self.to_value().to_string()
    }
}

// ============================================================================
// Ready-made stories
// ============================================================================

/// Labelled manifest with one canvas and two region annotations.
pub fn two_region_story() -> String {
    ManifestBuilder::new()
        .label("Harbour at dusk")
        .canvas(
            CanvasBuilder::new(4000, 3000)
                .region(100, 200, 400, 300, "The lighthouse")
                .region(2000, 1000, 600, 400, "The fishing fleet"),
        )
        .build()
}

/// Unlabelled manifest with one canvas and three region annotations.
pub fn unlabelled_story() -> String {
    ManifestBuilder::new()
        .canvas(
            CanvasBuilder::new(1000, 1000)
                .region(0, 0, 10, 10, "one")
                .region(10, 10, 10, 10, "two")
                .region(20, 20, 10, 10, "three"),
        )
        .build()
}

/// Labelled manifest mixing a region and a point of interest.
pub fn mixed_story() -> String {
    ManifestBuilder::new()
        .label("Mixed")
        .canvas(
            CanvasBuilder::new(2000, 1000)
                .region(0, 0, 200, 200, "Region")
                .point(1000, 500, "<p>Point</p>"),
        )
        .build()
}

/// Two labelled canvases with one region annotation each.
pub fn two_canvas_story() -> String {
    ManifestBuilder::new()
        .label("Diptych")
        .canvas(
            CanvasBuilder::new(1000, 1000)
                .id("https://example.org/canvas/1")
                .service("https://example.org/iiif/left")
                .region(0, 0, 100, 100, "left"),
        )
        .canvas(
            CanvasBuilder::new(1000, 1000)
                .id("https://example.org/canvas/2")
                .service("https://example.org/iiif/right")
                .region(500, 500, 100, 100, "right"),
        )
        .build()
}
