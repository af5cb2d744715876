//! storyview - slide navigation and viewport framing for IIIF stories
//!
//! Turns a IIIF manifest into a guided story over a deep-zoom image:
//! - Title, annotation and credits slides with bounded navigation
//! - Viewport framing for regions and points of interest
//! - Panel-aware framing when the info panel covers part of the image
//! - Pins, route line and point-of-interest markers kept in sync
//! - Sanitized panel markup for every slide
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { StoryViewer } from 'storyview';
//! await init();
//! const viewer = new StoryViewer(
//!   { container: '#story', manifestUrl: 'manifest.json', enablePins: true },
//!   surface, // openImage, frameRegion, frameWholeImage, ...
//! );
//! await viewer.load();
//! viewer.next();
//! ```

// Manifest modules
pub mod error;
pub mod parser;
pub mod region;
pub mod status;
pub mod types;

// Story modules
pub mod config;
pub mod instance;
pub mod layout;
pub mod markup;
pub mod navigation;
pub mod outline;
pub mod overlay;
pub mod slides;
pub mod viewer;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use error::{Result, StoryviewError};
pub use slides::{Bounds, SlideKind, SlideOptions, Story};
pub use status::{StatusCode, StatusSet};
pub use types::*;
pub use viewer::{BoundsState, RenderSurface, StoryView};

#[cfg(target_arch = "wasm32")]
pub use viewer::StoryViewer;

/// Parse a IIIF manifest and return its slide outline as a `JsValue`
///
/// The outline lists, per canvas, the bounds, every slide with its framing,
/// the markers and the route, plus the advisory statuses.
///
/// # Errors
/// Returns an error if the manifest is not JSON or has no canvases.
#[wasm_bindgen]
pub fn outline_manifest(json: &str) -> std::result::Result<JsValue, JsValue> {
    let parsed = parser::parse(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let outline = outline::Outline::new(parsed, SlideOptions::default());

    // Flattened slide kinds serialize as maps; keep them plain objects
    outline
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
