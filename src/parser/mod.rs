//! Main manifest parser
//!
//! Reduces IIIF Presentation 3 JSON (with a minimal Presentation 2 fallback)
//! to the plain [`Manifest`] shape the slide model consumes. Fatal problems
//! are returned as errors; advisory ones are returned alongside the manifest.

mod annotations;

use serde_json::Value;

use crate::error::{Result, StoryviewError};
use crate::status::StatusCode;
use crate::types::{Canvas, Manifest, PresentationVersion, RequiredStatement};

pub use annotations::{parse_annotation, parse_body, parse_target};

const PRESENTATION_3_CONTEXT: &str = "http://iiif.io/api/presentation/3/context.json";
const PRESENTATION_2_CONTEXT: &str = "http://iiif.io/api/presentation/2/context.json";

/// A manifest together with the advisory statuses raised while reading it.
#[derive(Debug, Clone)]
pub struct ParsedManifest {
    pub manifest: Manifest,
    pub statuses: Vec<StatusCode>,
}

/// Parse manifest JSON text.
///
/// # Errors
/// `ManifestLoad` if the text is not JSON, `BadManifest` if it has no canvases.
pub fn parse(json: &str) -> Result<ParsedManifest> {
    let value: Value = serde_json::from_str(json)?;
    parse_value(&value)
}

/// Parse an already-decoded manifest document.
///
/// # Errors
/// `BadManifest` if the document has no canvases.
pub fn parse_value(value: &Value) -> Result<ParsedManifest> {
    if !value.is_object() {
        return Err(StoryviewError::BadManifest);
    }

    let mut statuses = Vec::new();
    let version = presentation_version(value);

    let canvas_values = canvas_values(value, version);
    // A manifest must have at least one canvas; anything else is "not a manifest"
    if canvas_values.is_empty() {
        return Err(StoryviewError::BadManifest);
    }

    if version != PresentationVersion::V3 {
        statuses.push(StatusCode::UnknVersion);
    }

    let label = value.get("label").and_then(language_value).unwrap_or_default();
    // The title slide depends on a label; its absence is advisory
    if label.is_empty() {
        statuses.push(StatusCode::NoLabel);
    }

    let summary = value
        .get("summary")
        .or_else(|| value.get("description"))
        .and_then(language_value)
        .unwrap_or_default();

    let required_statement = required_statement(value);

    let canvases = canvas_values
        .iter()
        .map(|canvas| parse_canvas(canvas, &mut statuses))
        .collect::<Vec<_>>();

    tracing::debug!(
        "parsed manifest: {} canvas(es), {} annotation(s) on the first",
        canvases.len(),
        canvases.first().map_or(0, |c| c.annotations.len())
    );

    Ok(ParsedManifest {
        manifest: Manifest {
            version,
            label,
            summary,
            required_statement,
            canvases,
        },
        statuses,
    })
}

/// Detect the Presentation API version from `@context` (string or array).
fn presentation_version(value: &Value) -> PresentationVersion {
    let mentions = |context: &str| match value.get("@context") {
        Some(Value::String(s)) => s == context,
        Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(context)),
        _ => false,
    };
    if mentions(PRESENTATION_3_CONTEXT) {
        PresentationVersion::V3
    } else if mentions(PRESENTATION_2_CONTEXT) {
        PresentationVersion::V2
    } else {
        PresentationVersion::Unknown
    }
}

/// Canvas objects: `items` (v3) or `sequences[0].canvases` (v2).
fn canvas_values(value: &Value, version: PresentationVersion) -> Vec<&Value> {
    let v3 = value
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|v| v.is_object()).collect::<Vec<_>>())
        .unwrap_or_default();
    if !v3.is_empty() || version == PresentationVersion::V3 {
        return v3;
    }

    value
        .get("sequences")
        .and_then(Value::as_array)
        .and_then(|sequences| sequences.first())
        .and_then(|sequence| sequence.get("canvases"))
        .and_then(Value::as_array)
        .map(|canvases| canvases.iter().filter(|v| v.is_object()).collect())
        .unwrap_or_default()
}

fn required_statement(value: &Value) -> RequiredStatement {
    if let Some(statement) = value.get("requiredStatement") {
        return RequiredStatement {
            label: statement
                .get("label")
                .and_then(language_value)
                .unwrap_or_default(),
            value: statement
                .get("value")
                .and_then(language_value)
                .unwrap_or_default(),
        };
    }
    // Presentation 2 carried the same information as a bare attribution
    RequiredStatement {
        label: String::new(),
        value: value
            .get("attribution")
            .and_then(language_value)
            .unwrap_or_default(),
    }
}

fn parse_canvas(canvas: &Value, statuses: &mut Vec<StatusCode>) -> Canvas {
    let annotations = canvas
        .get("annotations")
        .and_then(Value::as_array)
        .map(|pages| annotations::parse_pages(pages, statuses))
        .unwrap_or_default();

    Canvas {
        id: string_id(canvas),
        width: canvas.get("width").and_then(Value::as_f64),
        height: canvas.get("height").and_then(Value::as_f64),
        image_service: image_service(canvas).map(|id| expand_service_id(&id)),
        annotations,
    }
}

/// Find the image service of the first painting annotation.
fn image_service(canvas: &Value) -> Option<String> {
    // v3: items[0].items[0].body
    let v3_body = canvas
        .get("items")
        .and_then(Value::as_array)
        .and_then(|pages| pages.first())
        .and_then(|page| page.get("items"))
        .and_then(Value::as_array)
        .and_then(|annos| annos.first())
        .and_then(|anno| anno.get("body"));
    // v2: images[0].resource
    let v2_resource = canvas
        .get("images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .and_then(|image| image.get("resource"));

    let resource = v3_body.or(v2_resource)?;
    let resource = match resource {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let service = match resource.get("service") {
        Some(Value::Array(services)) => services.first(),
        Some(service @ Value::Object(_)) => Some(service),
        _ => None,
    };

    service.and_then(string_id).or_else(|| string_id(resource))
}

/// `id` (v3) or `@id` (v2) of a resource.
pub(crate) fn string_id(value: &Value) -> Option<String> {
    value
        .get("id")
        .or_else(|| value.get("@id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Expand an image service id into its `info.json` URL.
///
/// A trailing slash and/or an existing `info.json` are replaced, so the result
/// always ends in exactly one `/info.json`.
pub fn expand_service_id(service_id: &str) -> String {
    let base = service_id.strip_suffix("info.json").unwrap_or(service_id);
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{base}/info.json")
}

/// Read a IIIF language map, a plain string, or a v2 `@value` list.
///
/// Prefers `en`, then `none`, then the first language present. Multiple
/// values for one language are joined with newlines.
pub fn language_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(v) = map.get("@value") {
                return v.as_str().map(str::to_string);
            }
            let values = map
                .get("en")
                .or_else(|| map.get("none"))
                .or_else(|| map.values().next())?;
            match values {
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"),
                Value::String(s) => s.clone(),
                _ => return None,
            }
        }
        Value::Array(items) => return items.iter().find_map(language_value),
        _ => return None,
    };
    Some(text)
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
    fn test_expand_service_id() {
        assert_eq!(
            expand_service_id("https://example.org/iiif/img"),
            "https://example.org/iiif/img/info.json"
        );
        assert_eq!(
            expand_service_id("https://example.org/iiif/img/"),
            "https://example.org/iiif/img/info.json"
        );
        assert_eq!(
            expand_service_id("https://example.org/iiif/img/info.json"),
            "https://example.org/iiif/img/info.json"
        );
    }

    #[test]
    fn test_language_value_preference() {
        assert_eq!(
            language_value(&json!({"fr": ["Bonjour"], "en": ["Hello"]})).as_deref(),
            Some("Hello")
        );
        assert_eq!(
            language_value(&json!({"none": ["Untitled"]})).as_deref(),
            Some("Untitled")
        );
        assert_eq!(language_value(&json!("plain")).as_deref(), Some("plain"));
        assert_eq!(
            language_value(&json!([{"@value": "v2", "@language": "en"}])).as_deref(),
            Some("v2")
        );
        assert_eq!(language_value(&json!(42)), None);
    }

    #[test]
    fn test_not_an_object_is_bad_manifest() {
        let err = parse_value(&json!(["nope"])).unwrap_err();
        assert!(matches!(err, StoryviewError::BadManifest));
    }

    #[test]
    fn test_invalid_json_is_load_error() {
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, StoryviewError::ManifestLoad(_)));
        assert_eq!(err.status_code(), StatusCode::ManifestErr);
    }

    #[test]
    fn test_v2_canvases_and_attribution() {
        let doc = json!({
            "@context": PRESENTATION_2_CONTEXT,
            "label": "Old manifest",
            "attribution": "Some museum",
            "sequences": [{
                "canvases": [{
                    "@id": "https://example.org/canvas/1",
                    "width": 2000,
                    "height": 1000,
                    "images": [{"resource": {"service": {"@id": "https://example.org/iiif/img"}}}]
                }]
            }]
        });
        let parsed = parse_value(&doc).unwrap();
        assert_eq!(parsed.statuses, vec![StatusCode::UnknVersion]);
        assert_eq!(parsed.manifest.version, PresentationVersion::V2);
        assert_eq!(parsed.manifest.required_statement.value, "Some museum");
        let canvas = &parsed.manifest.canvases[0];
        assert_eq!(canvas.dimensions(), Some((2000.0, 1000.0)));
        assert_eq!(
            canvas.image_service.as_deref(),
            Some("https://example.org/iiif/img/info.json")
        );
    }
}
