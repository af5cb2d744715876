//! Machine-readable status codes and the per-instance status set.
//!
//! Every condition the viewer can report has a stable kebab-case code and a
//! severity. Hosts read the accumulated set (the wasm layer mirrors it into
//! the container's `data-status` attribute).

use serde::Serialize;

/// Severity of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

/// Every status the viewer can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCode {
    BadConfig,
    ManifestErr,
    BadManifest,
    BadContainer,
    UnknVersion,
    NoLabel,
    NoExtAnno,
    PoiSvgErr,
    PoiSvgInvalid,
    PoiSvgDefaultErr,
}

impl StatusCode {
    /// Stable code string, e.g. `"no-ext-anno"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadConfig => "bad-config",
            Self::ManifestErr => "manifest-err",
            Self::BadManifest => "bad-manifest",
            Self::BadContainer => "bad-container",
            Self::UnknVersion => "unkn-version",
            Self::NoLabel => "no-label",
            Self::NoExtAnno => "no-ext-anno",
            Self::PoiSvgErr => "poi-svg-err",
            Self::PoiSvgInvalid => "poi-svg-invalid",
            Self::PoiSvgDefaultErr => "poi-svg-default-err",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::UnknVersion | Self::NoLabel | Self::NoExtAnno | Self::PoiSvgErr => {
                Severity::Warn
            }
            Self::BadConfig
            | Self::ManifestErr
            | Self::BadManifest
            | Self::BadContainer
            | Self::PoiSvgInvalid
            | Self::PoiSvgDefaultErr => Severity::Error,
        }
    }

    /// User-facing log message.
    pub fn message(self) -> &'static str {
        match self {
            Self::BadConfig => "Missing required config",
            Self::ManifestErr => "Encountered a problem loading the manifest",
            Self::BadManifest => "Could not parse the manifest",
            Self::BadContainer => "Container element not found",
            Self::UnknVersion => "Unsupported IIIF Presentation API version detected",
            Self::NoLabel => {
                "Manifest doesn't contain a label. This is required by the IIIF Presentation API"
            }
            Self::NoExtAnno => "External annotationPages are not supported",
            Self::PoiSvgErr => "Failed to load custom POI SVG",
            Self::PoiSvgInvalid => "Fetched content is not a valid SVG",
            Self::PoiSvgDefaultErr => "Failed to parse default POI SVG",
        }
    }

    /// True for codes that abort initialization.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::BadConfig | Self::ManifestErr | Self::BadManifest | Self::BadContainer
        )
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered, de-duplicated set of recorded statuses.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct StatusSet {
    codes: Vec<StatusCode>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status and log it at its severity.
    ///
    /// Recording the same code twice logs twice but stores it once.
    pub fn record(&mut self, code: StatusCode) {
        match code.severity() {
            Severity::Warn => tracing::warn!("storyview: {}", code.message()),
            Severity::Error => tracing::error!("storyview: {}", code.message()),
        }
        if !self.codes.contains(&code) {
            self.codes.push(code);
        }
    }

    pub fn extend(&mut self, codes: impl IntoIterator<Item = StatusCode>) {
        for code in codes {
            self.record(code);
        }
    }

    /// Codes of both sets in recording order. Nothing is logged.
    pub fn union(&self, other: &StatusSet) -> StatusSet {
        let mut codes = self.codes.clone();
        for code in other.iter() {
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        StatusSet { codes }
    }

    pub fn contains(&self, code: StatusCode) -> bool {
        self.codes.contains(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = StatusCode> + '_ {
        self.codes.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Comma-joined codes, the format of the `data-status` attribute.
    pub fn to_attribute(&self) -> String {
        self.codes
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(",")
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

    #[test]
    fn test_record_deduplicates() {
        let mut set = StatusSet::new();
        set.record(StatusCode::NoExtAnno);
        set.record(StatusCode::NoLabel);
        set.record(StatusCode::NoExtAnno);
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_attribute(), "no-ext-anno,no-label");
    }

    #[test]
    fn test_fatal_codes_are_errors() {
        for code in [
            StatusCode::BadConfig,
            StatusCode::ManifestErr,
            StatusCode::BadManifest,
            StatusCode::BadContainer,
        ] {
            assert!(code.is_fatal());
            assert_eq!(code.severity(), Severity::Error);
        }
        assert!(!StatusCode::PoiSvgErr.is_fatal());
        assert_eq!(StatusCode::PoiSvgErr.severity(), Severity::Warn);
    }

    #[test]
    fn test_serializes_as_code_strings() {
        let mut set = StatusSet::new();
        set.record(StatusCode::UnknVersion);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["unkn-version"]"#);
    }
}
