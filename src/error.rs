//! Structured error types for storyview.
//!
//! Only fatal conditions are errors. Advisory conditions are collected in a
//! [`StatusSet`](crate::status::StatusSet) and never surface through `Result`.

use crate::status::StatusCode;

/// All fatal errors that abort viewer construction or manifest loading.
#[derive(Debug, thiserror::Error)]
pub enum StoryviewError {
    /// Container selector missing, or no element matches it.
    #[error("storyview: Container element not found")]
    ContainerNotFound,

    /// Manifest URL (or another required option) missing.
    #[error("storyview: Missing required config")]
    MissingConfig,

    /// Manifest could not be retrieved or is not readable JSON.
    #[error("storyview: Encountered a problem loading the manifest ({0})")]
    ManifestLoad(String),

    /// JSON was read but does not describe a manifest with canvases.
    #[error("storyview: Could not parse the manifest")]
    BadManifest,

    /// Built-in point-of-interest graphic is unusable.
    #[error("storyview: Failed to parse default POI SVG")]
    DefaultGraphic,

    /// Invalid configuration object passed from JavaScript.
    #[error("storyview: Invalid config: {0}")]
    Config(String),
}

impl StoryviewError {
    /// Status code recorded for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ContainerNotFound => StatusCode::BadContainer,
            Self::MissingConfig | Self::Config(_) => StatusCode::BadConfig,
            Self::ManifestLoad(_) => StatusCode::ManifestErr,
            Self::BadManifest => StatusCode::BadManifest,
            Self::DefaultGraphic => StatusCode::PoiSvgDefaultErr,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoryviewError>;

impl From<serde_json::Error> for StoryviewError {
    fn from(e: serde_json::Error) -> Self {
        Self::ManifestLoad(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<StoryviewError> for wasm_bindgen::JsValue {
    fn from(e: StoryviewError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}
