//! Annotation page, annotation, body and target parsing.

use serde_json::Value;

use crate::region::{parse_fragment_selector, parse_point, parse_region};
use crate::status::StatusCode;
use crate::types::{Annotation, AnnotationBody, Target, TextFormat};

use super::string_id;

/// Collect the annotations of every embedded page, in order.
///
/// Pages that reference their items externally are dropped with a
/// `no-ext-anno` status; they are never fetched.
pub(crate) fn parse_pages(pages: &[Value], statuses: &mut Vec<StatusCode>) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    for page in pages {
        let Some(items) = page.get("items").and_then(Value::as_array) else {
            tracing::debug!(
                "dropping external annotation page {}",
                string_id(page).unwrap_or_default()
            );
            statuses.push(StatusCode::NoExtAnno);
            continue;
        };
        annotations.extend(items.iter().filter_map(parse_annotation));
    }
    annotations
}

/// Parse a single annotation. Non-objects yield `None`.
pub fn parse_annotation(value: &Value) -> Option<Annotation> {
    if !value.is_object() {
        return None;
    }

    let bodies = match value.get("body") {
        Some(Value::Array(items)) => items.iter().filter_map(parse_body).collect(),
        Some(body) => parse_body(body).into_iter().collect(),
        None => Vec::new(),
    };

    Some(Annotation {
        id: string_id(value),
        target: value.get("target").map(parse_target).unwrap_or_default(),
        bodies,
    })
}

/// Resolve a target into the [`Target`] union.
///
/// Accepts a fragment URL string, a `SpecificResource` with a `PointSelector`
/// or `FragmentSelector` (or a list of selectors), or an object whose
/// `source`/`id` carries an `xywh` fragment.
pub fn parse_target(value: &Value) -> Target {
    match value {
        Value::String(raw) => parse_region(raw).map_or(Target::None, Target::Region),
        Value::Object(_) => {
            if let Some(target) = value.get("selector").and_then(parse_selector) {
                return target;
            }
            value
                .get("source")
                .and_then(|source| match source {
                    Value::String(s) => Some(s.as_str()),
                    other => other.get("id").and_then(Value::as_str),
                })
                .or_else(|| value.get("id").and_then(Value::as_str))
                .and_then(parse_region)
                .map_or(Target::None, Target::Region)
        }
        Value::Array(items) => items
            .iter()
            .map(parse_target)
            .find(|t| *t != Target::None)
            .unwrap_or_default(),
        _ => Target::None,
    }
}

fn parse_selector(selector: &Value) -> Option<Target> {
    if let Value::Array(selectors) = selector {
        return selectors.iter().find_map(parse_selector);
    }
    match selector.get("type").and_then(Value::as_str)? {
        "PointSelector" => parse_point(selector).map(Target::Point),
        "FragmentSelector" => selector
            .get("value")
            .and_then(Value::as_str)
            .and_then(parse_fragment_selector)
            .map(Target::Region),
        _ => None,
    }
}

/// Parse a body into text or audio. Unsupported body types yield `None`.
pub fn parse_body(body: &Value) -> Option<AnnotationBody> {
    let kind = body
        .get("type")
        .or_else(|| body.get("@type"))
        .and_then(Value::as_str)
        .unwrap_or("TextualBody")
        .to_ascii_lowercase();
    let format = body.get("format").and_then(Value::as_str);

    match kind.as_str() {
        "textualbody" | "cnt:contentastext" => Some(AnnotationBody::Text {
            value: body
                .get("value")
                .or_else(|| body.get("chars"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            format: match format {
                Some("text/html") => TextFormat::Html,
                _ => TextFormat::Plain,
            },
            language: body
                .get("language")
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        "sound" | "audio" => Some(AnnotationBody::Audio {
            url: string_id(body)?,
            format: format.map(str::to_string),
        }),
        other => {
            tracing::debug!("skipping unsupported annotation body type {other}");
            None
        }
    }
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
    use crate::types::{Point, Rect};
    use serde_json::json;

    #[test]
    fn test_target_string_fragment() {
        let t = parse_target(&json!("https://example.org/canvas/1#xywh=1,2,3,4"));
        assert_eq!(t, Target::Region(Rect::new(1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_target_without_fragment() {
        assert_eq!(
            parse_target(&json!("https://example.org/canvas/1")),
            Target::None
        );
    }

    #[test]
    fn test_target_point_selector() {
        let t = parse_target(&json!({
            "type": "SpecificResource",
            "source": "https://example.org/canvas/1",
            "selector": {"type": "PointSelector", "x": 1024, "y": 768}
        }));
        assert_eq!(t, Target::Point(Point::new(1024.0, 768.0)));
    }

    #[test]
    fn test_target_fragment_selector() {
        let t = parse_target(&json!({
            "type": "SpecificResource",
            "source": {"id": "https://example.org/canvas/1", "type": "Canvas"},
            "selector": [{"type": "FragmentSelector", "value": "xywh=5,6,7,8"}]
        }));
        assert_eq!(t, Target::Region(Rect::new(5.0, 6.0, 7.0, 8.0)));
    }

    #[test]
    fn test_body_textual_formats() {
        let plain = parse_body(&json!({"type": "TextualBody", "value": "a\nb"})).unwrap();
        assert_eq!(
            plain,
            AnnotationBody::Text {
                value: "a\nb".to_string(),
                format: TextFormat::Plain,
                language: None
            }
        );
        let html = parse_body(&json!({
            "type": "TextualBody", "value": "<p>x</p>", "format": "text/html", "language": "en"
        }))
        .unwrap();
        assert!(matches!(
            html,
            AnnotationBody::Text { format: TextFormat::Html, .. }
        ));
    }

    #[test]
    fn test_body_sound() {
        let audio = parse_body(&json!({
            "id": "https://example.org/audio.mp3", "type": "Sound", "format": "audio/mpeg"
        }))
        .unwrap();
        assert_eq!(
            audio,
            AnnotationBody::Audio {
                url: "https://example.org/audio.mp3".to_string(),
                format: Some("audio/mpeg".to_string())
            }
        );
        assert_eq!(parse_body(&json!({"type": "Sound"})), None);
        assert_eq!(parse_body(&json!({"type": "Video", "id": "x"})), None);
    }

    #[test]
    fn test_external_pages_dropped_with_status() {
        let pages = vec![
            json!({"id": "https://example.org/page/ext", "type": "AnnotationPage"}),
            json!({"type": "AnnotationPage", "items": [
                {"type": "Annotation", "body": {"type": "TextualBody", "value": "one"}, "target": "c#xywh=0,0,1,1"}
            ]}),
        ];
        let mut statuses = Vec::new();
        let annotations = parse_pages(&pages, &mut statuses);
        assert_eq!(annotations.len(), 1);
        assert_eq!(statuses, vec![StatusCode::NoExtAnno]);
    }
}
