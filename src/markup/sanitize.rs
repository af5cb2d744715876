//! HTML sanitization seam.
//!
//! Manifest text is untrusted. All of it passes through a [`Sanitizer`]
//! before reaching the panel. In the browser the host's DOMPurify does the
//! work; natively [`TagFilter`] applies the same allow-list.

use serde::Serialize;

/// Tags and attributes permitted in panel markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowList {
    #[serde(rename = "ALLOWED_TAGS")]
    pub tags: Vec<String>,
    #[serde(rename = "ALLOWED_ATTR")]
    pub attributes: Vec<String>,
    /// SVG presentation attributes
    #[serde(rename = "ADD_ATTR")]
    pub extra_attributes: Vec<String>,
}

const TAGS: &[&str] = &[
    "a", "b", "br", "em", "i", "p", "small", "span", "strong", "sub", "sup", "img",
    // SVG
    "svg", "path", "circle", "rect", "line", "polyline", "polygon", "ellipse", "defs", "mask",
    "g", "use", "text", "tspan",
];

const ATTRIBUTES: &[&str] = &["href", "src", "alt", "class", "id"];

const EXTRA_ATTRIBUTES: &[&str] = &[
    "viewBox",
    "xmlns",
    "width",
    "height",
    "x",
    "y",
    "cx",
    "cy",
    "r",
    "rx",
    "ry",
    "fill",
    "stroke",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "d",
    "points",
    "transform",
    "xlink:href",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            tags: owned(TAGS),
            attributes: owned(ATTRIBUTES),
            extra_attributes: owned(EXTRA_ATTRIBUTES),
        }
    }
}

impl AllowList {
    pub fn allows_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(name))
    }

    pub fn allows_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .chain(&self.extra_attributes)
            .any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// Turns untrusted markup into markup safe for insertion.
pub trait Sanitizer {
    fn sanitize(&self, markup: &str, allow: &AllowList) -> String;
}

/// Escape text for HTML content or a double-quoted attribute.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Elements removed together with their content.
const DROP_CONTENT: &[&str] = &["script", "style", "iframe", "object", "template"];

/// Attributes carrying URLs, checked for script and data schemes.
const URL_ATTRIBUTES: &[&str] = &["href", "src", "xlink:href"];

/// Native allow-list sanitizer.
///
/// Keeps allowed tags with their allowed attributes, unwraps disallowed tags
/// (their text survives), removes scripting elements with their content and
/// drops comments, event handlers, `javascript:` URLs and `data:` URLs
/// outside image sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagFilter;

impl Sanitizer for TagFilter {
    fn sanitize(&self, markup: &str, allow: &AllowList) -> String {
        let mut out = String::with_capacity(markup.len());
        let mut dropping: Option<String> = None;
        let mut rest = markup;

        while let Some((text, after)) = rest.split_once('<') {
            if dropping.is_none() {
                out.push_str(text);
            }
            if let Some(comment) = after.strip_prefix("!--") {
                rest = comment.split_once("-->").map_or("", |(_, tail)| tail);
                continue;
            }
            let Some((tag, tail)) = after.split_once('>') else {
                // Unterminated tag: the rest is text
                if dropping.is_none() {
                    out.push_str("&lt;");
                    out.push_str(&html_escape(after));
                }
                return out;
            };
            rest = tail;

            let parsed = Tag::parse(tag);
            let name = parsed.name.to_ascii_lowercase();
            if let Some(open) = &dropping {
                if parsed.closing && *open == name {
                    dropping = None;
                }
                continue;
            }
            if DROP_CONTENT.contains(&name.as_str()) {
                if !parsed.closing && !parsed.self_closing {
                    dropping = Some(name);
                }
                continue;
            }
            if name.is_empty() || !allow.allows_tag(&name) {
                continue;
            }
            parsed.write_to(&mut out, allow);
        }

        if dropping.is_none() {
            out.push_str(rest);
        }
        out
    }
}

/// A tag split into its parts.
struct Tag<'a> {
    name: &'a str,
    closing: bool,
    self_closing: bool,
    attributes: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> Tag<'a> {
    fn parse(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        let (closing, body) = match trimmed.strip_prefix('/') {
            Some(body) => (true, body),
            None => (false, trimmed),
        };
        let (self_closing, body) = match body.strip_suffix('/') {
            Some(body) => (true, body),
            None => (false, body),
        };
        let name_end = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
            .unwrap_or(body.len());
        let (name, attrs) = body.split_at(name_end);
        Self {
            name,
            closing,
            self_closing,
            attributes: parse_attributes(attrs),
        }
    }

    fn write_to(&self, out: &mut String, allow: &AllowList) {
        let name = self.name.to_ascii_lowercase();
        if self.closing {
            out.push_str("</");
            out.push_str(&name);
            out.push('>');
            return;
        }
        out.push('<');
        out.push_str(&name);
        for (attr, value) in &self.attributes {
            if !attribute_is_safe(&name, attr, *value, allow) {
                continue;
            }
            out.push(' ');
            out.push_str(attr);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&html_escape(value));
                out.push('"');
            }
        }
        if self.self_closing {
            out.push('/');
        }
        out.push('>');
    }
}

fn attribute_is_safe(tag: &str, name: &str, value: Option<&str>, allow: &AllowList) -> bool {
    if name.len() > 2 && name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on")) {
        return false;
    }
    if !allow.allows_attribute(name) {
        return false;
    }
    let is_url = URL_ATTRIBUTES.iter().any(|u| u.eq_ignore_ascii_case(name));
    let Some(value) = value.filter(|_| is_url) else {
        return true;
    };
    let scheme = url_scheme(value);
    match scheme.as_str() {
        "javascript" | "vbscript" => false,
        // Inline data is only inert as an image source
        "data" => tag == "img" && name.eq_ignore_ascii_case("src"),
        _ => true,
    }
}

/// Lowercased scheme of a URL, ignoring whitespace and control characters
/// browsers skip; empty for relative URLs.
fn url_scheme(value: &str) -> String {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.split_once(':') {
        Some((scheme, _)) if !scheme.contains(['/', '?', '#']) => scheme.to_owned(),
        _ => String::new(),
    }
}

/// Parse `name="value" name='value' name=value name` sequences.
fn parse_attributes(mut input: &str) -> Vec<(&str, Option<&str>)> {
    let mut attributes = Vec::new();
    loop {
        input = input.trim_start();
        if input.is_empty() {
            return attributes;
        }
        let name_end = input
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(input.len());
        let (name, tail) = input.split_at(name_end);
        let tail = tail.trim_start();

        let Some(value_part) = tail.strip_prefix('=') else {
            attributes.push((name, None));
            input = tail;
            continue;
        };

        let value_part = value_part.trim_start();
        let (value, remaining) = match value_part.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = value_part.get(1..).unwrap_or("");
                inner.split_once(quote).unwrap_or((inner, ""))
            }
            _ => {
                let end = value_part
                    .find(char::is_whitespace)
                    .unwrap_or(value_part.len());
                value_part.split_at(end)
            }
        };
        if !name.is_empty() {
            attributes.push((name, Some(value)));
        }
        input = remaining;
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

    fn clean(markup: &str) -> String {
        TagFilter.sanitize(markup, &AllowList::default())
    }

    #[test]
    fn test_keeps_allowed_markup() {
        assert_eq!(
            clean(r#"<p>Hello <strong>world</strong><br/></p>"#),
            "<p>Hello <strong>world</strong><br/></p>"
        );
        assert_eq!(
            clean(r#"<a href="https://example.org" target="_blank">x</a>"#),
            r#"<a href="https://example.org">x</a>"#
        );
    }

    #[test]
    fn test_unwraps_disallowed_tags() {
        assert_eq!(clean("<div><h2>Heading</h2></div>"), "Heading");
    }

    #[test]
    fn test_removes_scripts_and_handlers() {
        assert_eq!(clean("a<script>alert(1)</script>b"), "ab");
        assert_eq!(clean(r#"<img src="x.png" onerror="alert(1)">"#), r#"<img src="x.png">"#);
        assert_eq!(clean(r#"<a href=" javascript:alert(1)">x</a>"#), "<a>x</a>");
        assert_eq!(clean("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn test_data_urls_only_on_image_sources() {
        assert_eq!(
            clean(r#"<a href="data:text/html,<script>alert(1)</script>">x</a>"#),
            "<a>x</a>"
        );
        assert_eq!(clean(r#"<a href=" DATA:text/html;base64,PHA+">x</a>"#), "<a>x</a>");
        assert_eq!(
            clean(r#"<img src="data:image/png;base64,iVBOR" alt="dot">"#),
            r#"<img src="data:image/png;base64,iVBOR" alt="dot">"#
        );
        assert_eq!(
            clean(r#"<a href="/notes/data:1">x</a>"#),
            r#"<a href="/notes/data:1">x</a>"#
        );
    }

    #[test]
    fn test_svg_attributes() {
        assert_eq!(
            clean(r#"<svg viewBox="0 0 10 10" xmlns="http://www.w3.org/2000/svg"><circle cx=5 cy='5' r="4"/></svg>"#),
            r#"<svg viewBox="0 0 10 10" xmlns="http://www.w3.org/2000/svg"><circle cx="5" cy="5" r="4"/></svg>"#
        );
    }

    #[test]
    fn test_unterminated_tag_is_escaped() {
        assert_eq!(clean("1 <2"), "1 &lt;2");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
