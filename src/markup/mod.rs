//! Panel markup for every slide kind.
//!
//! Every manifest-derived string is sanitized piecewise before it is wrapped
//! in the fixed section markup, so the allow-list never has to admit the
//! wrapper elements.

mod sanitize;

use serde::Serialize;

pub use sanitize::{html_escape, AllowList, Sanitizer, TagFilter};

use crate::slides::{SlideKind, Story};
use crate::types::{Annotation, AnnotationBody, Manifest, TextFormat};

const SECTION_OPEN: &str = r#"<div class="storyview__text-section">"#;

const CREDITS_MARKUP: &str = concat!(
    r#"<div class="storyview__text-section">"#,
    "<p>This story is presented with storyview, an open source viewer for annotated IIIF images.</p>",
    "<p>Images and annotations are provided by the publisher of the manifest.</p>",
    "</div>"
);

/// Rendered panel text plus the kind of slide it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelContent {
    pub kind: SlideKind,
    pub html: String,
}

/// Replace every line break (`\r\n`, `\r`, `\n`) with `<br/>`.
pub fn nl2br(text: &str) -> String {
    text.replace("\r\n", "<br/>")
        .replace('\r', "<br/>")
        .replace('\n', "<br/>")
}

/// IIIF convention: a string that starts with `<` and ends with `>` is HTML.
pub fn looks_like_html(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('<') && text.ends_with('>')
}

fn html_or_text(text: &str) -> String {
    if looks_like_html(text) {
        text.to_string()
    } else {
        nl2br(text)
    }
}

/// Title slide: label, summary and required statement.
pub fn title_markup(manifest: &Manifest, sanitizer: &dyn Sanitizer, allow: &AllowList) -> String {
    // The label is always plain text
    let label = sanitizer.sanitize(&nl2br(&manifest.label), allow);
    let summary = sanitizer.sanitize(&html_or_text(&manifest.summary), allow);

    let statement = &manifest.required_statement;
    let mut raw_statement = String::new();
    if !statement.label.is_empty() {
        raw_statement.push_str(&format!("<strong>{}:</strong> ", statement.label));
    }
    if !statement.value.is_empty() {
        raw_statement.push_str(&html_or_text(&statement.value));
    }
    let statement = sanitizer.sanitize(&raw_statement, allow);

    format!(
        r#"<h1 class="storyview__title storyview__text-section">{label}</h1>{SECTION_OPEN}{summary}</div>{SECTION_OPEN}{statement}</div>"#
    )
}

/// Annotation slide: one section per body, in order.
pub fn annotation_markup(
    annotation: &Annotation,
    sanitizer: &dyn Sanitizer,
    allow: &AllowList,
) -> String {
    let mut markup = String::new();
    for body in &annotation.bodies {
        markup.push_str(SECTION_OPEN);
        match body {
            AnnotationBody::Text { value, format, .. } => {
                let value = match format {
                    TextFormat::Plain => nl2br(value),
                    TextFormat::Html => value.clone(),
                };
                markup.push_str(&sanitizer.sanitize(&value, allow));
            }
            AnnotationBody::Audio { url, .. } => {
                markup.push_str(&format!(
                    r#"<audio controls src="{}">Your browser does not support the audio element.</audio>"#,
                    html_escape(url)
                ));
            }
        }
        markup.push_str("</div>");
    }
    markup
}

/// Fixed closing slide.
pub fn credits_markup() -> &'static str {
    CREDITS_MARKUP
}

/// Panel content for the slide `kind` of `canvas`.
pub fn panel_content(
    story: &Story,
    canvas: usize,
    kind: SlideKind,
    sanitizer: &dyn Sanitizer,
    allow: &AllowList,
) -> PanelContent {
    let html = match kind {
        SlideKind::Title => title_markup(story.manifest(), sanitizer, allow),
        SlideKind::Credits => credits_markup().to_string(),
        SlideKind::Annotation(index) => story
            .annotation(canvas, index)
            .map(|a| annotation_markup(a, sanitizer, allow))
            .unwrap_or_default(),
    };
    PanelContent { kind, html }
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
    use crate::types::{RequiredStatement, Target};

    fn allow() -> AllowList {
        AllowList::default()
    }

    #[test]
    fn test_nl2br_all_line_endings() {
        assert_eq!(nl2br("a\r\nb\rc\nd"), "a<br/>b<br/>c<br/>d");
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<p>x</p>"));
        assert!(!looks_like_html("a <b>c</b>"));
        assert!(!looks_like_html("<"));
    }

    #[test]
    fn test_title_markup() {
        let manifest = Manifest {
            label: "My\nStory".to_string(),
            summary: "<p>About <em>this</em></p>".to_string(),
            required_statement: RequiredStatement {
                label: "Attribution".to_string(),
                value: "Museum".to_string(),
            },
            ..Manifest::default()
        };
        let html = title_markup(&manifest, &TagFilter, &allow());
        assert!(html.starts_with(r#"<h1 class="storyview__title storyview__text-section">My<br/>Story</h1>"#));
        assert!(html.contains("<p>About <em>this</em></p>"));
        assert!(html.contains("<strong>Attribution:</strong> Museum"));
    }

    #[test]
    fn test_title_without_statement_has_empty_section() {
        let manifest = Manifest {
            label: "L".to_string(),
            ..Manifest::default()
        };
        let html = title_markup(&manifest, &TagFilter, &allow());
        assert!(html.ends_with(r#"<div class="storyview__text-section"></div>"#));
    }

    #[test]
    fn test_annotation_bodies_in_order() {
        let annotation = Annotation {
            id: None,
            target: Target::None,
            bodies: vec![
                AnnotationBody::Text {
                    value: "one\ntwo".to_string(),
                    format: TextFormat::Plain,
                    language: None,
                },
                AnnotationBody::Audio {
                    url: "https://example.org/a.mp3".to_string(),
                    format: None,
                },
                AnnotationBody::Text {
                    value: "<p onclick=\"x()\">html</p><script>bad()</script>".to_string(),
                    format: TextFormat::Html,
                    language: None,
                },
            ],
        };
        let html = annotation_markup(&annotation, &TagFilter, &allow());
        assert_eq!(
            html,
            concat!(
                r#"<div class="storyview__text-section">one<br/>two</div>"#,
                r#"<div class="storyview__text-section"><audio controls src="https://example.org/a.mp3">Your browser does not support the audio element.</audio></div>"#,
                r#"<div class="storyview__text-section"><p>html</p></div>"#,
            )
        );
    }

    #[test]
    fn test_credits_is_fixed() {
        assert!(credits_markup().starts_with(SECTION_OPEN));
    }
}
