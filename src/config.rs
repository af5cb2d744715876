//! Viewer configuration.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoryviewError};
use crate::region::DEFAULT_POI_REGION_SIZE;
use crate::slides::SlideOptions;

/// How the container was given: a CSS selector or an element.
///
/// Elements are opaque here; the bindings resolve them from the raw object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ContainerRef {
    Selector(String),
    Element(ElementMarker),
}

/// Placeholder for a non-string container value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementMarker;

impl<'de> Deserialize<'de> for ElementMarker {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer).map(|_| ElementMarker)
    }
}

/// Options accepted by the viewer constructor (camelCase keys).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub container: Option<ContainerRef>,
    pub manifest_url: Option<String>,
    pub show_credit_slide: bool,
    pub disable_pan_and_zoom: bool,
    pub point_of_interest_svg_url: Option<String>,
    pub enable_pins: bool,
    pub enable_route: bool,
    pub point_of_interest_region_size: f64,
    pub prefers_reduced_motion: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            container: None,
            manifest_url: None,
            show_credit_slide: true,
            disable_pan_and_zoom: false,
            point_of_interest_svg_url: None,
            enable_pins: false,
            enable_route: false,
            point_of_interest_region_size: DEFAULT_POI_REGION_SIZE,
            prefers_reduced_motion: false,
        }
    }
}

/// A configuration that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidConfig {
    pub manifest_url: String,
    pub show_credit_slide: bool,
    pub disable_pan_and_zoom: bool,
    pub point_of_interest_svg_url: Option<String>,
    pub enable_pins: bool,
    pub enable_route: bool,
    pub point_of_interest_region_size: f64,
    pub prefers_reduced_motion: bool,
}

impl ValidConfig {
    pub fn slide_options(&self) -> SlideOptions {
        SlideOptions {
            show_credit_slide: self.show_credit_slide,
            poi_region_size: self.point_of_interest_region_size,
        }
    }
}

impl ViewerConfig {
    /// Selector string when the container was given as one.
    pub fn selector(&self) -> Option<&str> {
        match &self.container {
            Some(ContainerRef::Selector(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Check required options.
    ///
    /// The container is checked first: `container_found` is the host's
    /// answer to whether the container resolved to an element.
    ///
    /// # Errors
    /// `ContainerNotFound` for a missing or unresolved container,
    /// `MissingConfig` for a missing manifest URL and `Config` for an
    /// unusable region size.
    pub fn validate(&self, container_found: bool) -> Result<ValidConfig> {
        if self.container.is_none() || !container_found {
            return Err(StoryviewError::ContainerNotFound);
        }
        let manifest_url = match self.manifest_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => return Err(StoryviewError::MissingConfig),
        };
        let size = self.point_of_interest_region_size;
        if !size.is_finite() || size <= 0.0 {
            return Err(StoryviewError::Config(format!(
                "pointOfInterestRegionSize must be positive, got {size}"
            )));
        }
        Ok(ValidConfig {
            manifest_url,
            show_credit_slide: self.show_credit_slide,
            disable_pan_and_zoom: self.disable_pan_and_zoom,
            point_of_interest_svg_url: self
                .point_of_interest_svg_url
                .clone()
                .filter(|u| !u.trim().is_empty()),
            enable_pins: self.enable_pins,
            enable_route: self.enable_route,
            point_of_interest_region_size: size,
            prefers_reduced_motion: self.prefers_reduced_motion,
        })
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
    use crate::status::StatusCode;

    fn config(json: &str) -> ViewerConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let c = config(r##"{"container": "#viewer", "manifestUrl": "m.json"}"##);
        assert_eq!(c.selector(), Some("#viewer"));
        let valid = c.validate(true).unwrap();
        assert!(valid.show_credit_slide);
        assert!(!valid.enable_pins);
        assert!(!valid.enable_route);
        assert_eq!(valid.point_of_interest_region_size, 100.0);
    }

    #[test]
    fn test_container_checked_before_manifest_url() {
        let err = config("{}").validate(true).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BadContainer);

        let err = config(r##"{"container": "#missing", "manifestUrl": "m.json"}"##)
            .validate(false)
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BadContainer);

        let err = config(r##"{"container": "#viewer"}"##).validate(true).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BadConfig);
    }

    #[test]
    fn test_non_string_container() {
        let c = config(r#"{"container": {"nodeType": 1}, "manifestUrl": "m.json"}"#);
        assert_eq!(c.selector(), None);
        assert!(c.validate(true).is_ok());
    }

    #[test]
    fn test_rejects_bad_region_size() {
        let c = config(
            r##"{"container": "#v", "manifestUrl": "m.json", "pointOfInterestRegionSize": 0}"##,
        );
        assert!(matches!(c.validate(true), Err(StoryviewError::Config(_))));
    }
}
