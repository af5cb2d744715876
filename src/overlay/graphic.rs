//! Graphic drawn inside point-of-interest markers.

use crate::error::{Result, StoryviewError};
use crate::markup::{AllowList, Sanitizer};
use crate::status::StatusCode;

/// Built-in marker graphic.
pub const DEFAULT_POI_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 44 44" width="44" height="44">"#,
    r#"<circle cx="22" cy="22" r="20" fill="currentColor" stroke="white" stroke-width="3"/>"#,
    r#"<circle cx="22" cy="22" r="6" fill="white"/>"#,
    "</svg>"
);

/// Sanitized SVG markup for point-of-interest markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiGraphic {
    markup: String,
    custom: bool,
}

impl PoiGraphic {
    /// The built-in graphic.
    pub fn builtin() -> Result<Self> {
        svg_root(DEFAULT_POI_SVG)
            .map(|markup| Self {
                markup: markup.to_string(),
                custom: false,
            })
            .ok_or(StoryviewError::DefaultGraphic)
    }

    /// Resolve a configured graphic from the outcome of fetching it.
    ///
    /// A failed fetch falls back to the built-in graphic with `poi-svg-err`;
    /// content without an `<svg>` root also falls back, with
    /// `poi-svg-invalid`. Both statuses are advisory.
    pub fn resolve(
        fetched: std::result::Result<String, String>,
        sanitizer: &dyn Sanitizer,
        allow: &AllowList,
    ) -> (Result<Self>, Option<StatusCode>) {
        let text = match fetched {
            Ok(text) => text,
            Err(reason) => {
                tracing::debug!("poi graphic fetch failed: {reason}");
                return (Self::builtin(), Some(StatusCode::PoiSvgErr));
            }
        };
        let clean = sanitizer.sanitize(&text, allow);
        match svg_root(&clean) {
            Some(markup) => (
                Ok(Self {
                    markup: markup.to_string(),
                    custom: true,
                }),
                None,
            ),
            None => (Self::builtin(), Some(StatusCode::PoiSvgInvalid)),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }
}

/// The first `<svg>...</svg>` element of some markup.
fn svg_root(markup: &str) -> Option<&str> {
    let lower = markup.to_ascii_lowercase();
    let start = lower.find("<svg")?;
    let end = lower.rfind("</svg>")?.checked_add("</svg>".len())?;
    if end <= start {
        return None;
    }
    markup.get(start..end)
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
    use crate::markup::TagFilter;

    #[test]
    fn test_builtin_is_svg() {
        let graphic = PoiGraphic::builtin().unwrap();
        assert!(graphic.markup().starts_with("<svg"));
        assert!(!graphic.is_custom());
    }

    #[test]
    fn test_custom_graphic_is_sanitized() {
        let fetched = Ok(r#"<?xml version="1.0"?><svg viewBox="0 0 1 1" onload="x()"><path d="M0 0"/></svg>"#.to_string());
        let (graphic, status) = PoiGraphic::resolve(fetched, &TagFilter, &AllowList::default());
        let graphic = graphic.unwrap();
        assert!(graphic.is_custom());
        assert_eq!(graphic.markup(), r#"<svg viewBox="0 0 1 1"><path d="M0 0"/></svg>"#);
        assert_eq!(status, None);
    }

    #[test]
    fn test_fetch_failure_falls_back() {
        let (graphic, status) =
            PoiGraphic::resolve(Err("404".to_string()), &TagFilter, &AllowList::default());
        assert!(!graphic.unwrap().is_custom());
        assert_eq!(status, Some(StatusCode::PoiSvgErr));
    }

    #[test]
    fn test_non_svg_content_is_invalid() {
        let (graphic, status) = PoiGraphic::resolve(
            Ok("<html><body>nope</body></html>".to_string()),
            &TagFilter,
            &AllowList::default(),
        );
        assert!(!graphic.unwrap().is_custom());
        assert_eq!(status, Some(StatusCode::PoiSvgInvalid));
    }
}
