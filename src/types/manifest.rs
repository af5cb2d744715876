use serde::{Deserialize, Serialize};

use super::Target;

/// IIIF Presentation API version, from the manifest `@context`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PresentationVersion {
    V2,
    #[default]
    V3,
    Unknown,
}

/// Attribution shown on the title slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequiredStatement {
    pub label: String,
    pub value: String,
}

impl RequiredStatement {
    pub fn is_empty(&self) -> bool {
        self.label.is_empty() && self.value.is_empty()
    }
}

/// A parsed manifest, reduced to what the viewer needs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: PresentationVersion,
    /// Empty when the manifest has no label (no title slide)
    pub label: String,
    pub summary: String,
    pub required_statement: RequiredStatement,
    pub canvases: Vec<Canvas>,
}

impl Manifest {
    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }
}

/// One canvas: an image plus its embedded annotations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Tile source for the deep-zoom surface (`.../info.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_service: Option<String>,
    /// Annotations of every embedded page, in document order
    pub annotations: Vec<Annotation>,
}

impl Canvas {
    /// Canvas dimensions when both are known and positive.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
            _ => None,
        }
    }
}

/// A single annotation: where it points and what it says.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub target: Target,
    pub bodies: Vec<AnnotationBody>,
}

/// Text format of a textual body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// Content of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AnnotationBody {
    Text {
        value: String,
        format: TextFormat,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Audio {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
}
