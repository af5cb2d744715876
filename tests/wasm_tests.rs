//! Browser tests for the JavaScript entry points.
//!
//! Run with: wasm-pack test --headless --firefox
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod fixtures;

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(value: &JsValue, key: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

#[wasm_bindgen_test]
fn test_outline_manifest() {
    let outline = storyview::outline_manifest(&fixtures::mixed_story()).unwrap();
    assert_eq!(get(&outline, "label").as_string().as_deref(), Some("Mixed"));

    let canvases = js_sys::Array::from(&get(&outline, "canvases"));
    assert_eq!(canvases.length(), 1);
    let slides = js_sys::Array::from(&get(&canvases.get(0), "slides"));
    assert_eq!(slides.length(), 4);
    assert_eq!(
        get(&slides.get(0), "kind").as_string().as_deref(),
        Some("title")
    );
}

#[wasm_bindgen_test]
fn test_outline_manifest_rejects_invalid_json() {
    assert!(storyview::outline_manifest("{").is_err());
}

fn missing_container_config() -> JsValue {
    let config = js_sys::Object::new();
    Reflect::set(
        &config,
        &"container".into(),
        &"#storyview-test-missing".into(),
    )
    .unwrap();
    Reflect::set(&config, &"manifestUrl".into(), &"manifest.json".into()).unwrap();
    config.into()
}

#[wasm_bindgen_test]
fn test_viewer_requires_container() {
    let error =
        storyview::StoryViewer::new(missing_container_config(), JsValue::UNDEFINED).unwrap_err();
    let message = error
        .as_string()
        .or_else(|| get(&error, "message").as_string())
        .unwrap_or_default();
    assert!(message.contains("Container element not found"));
}

#[wasm_bindgen_test]
fn test_constructing_viewers_repeatedly_keeps_logging() {
    // Every construction installs the console subscriber if none exists yet
    for _ in 0..3 {
        assert!(
            storyview::StoryViewer::new(missing_container_config(), JsValue::UNDEFINED).is_err()
        );
    }
}

#[wasm_bindgen_test]
fn test_version() {
    assert_eq!(storyview::version(), env!("CARGO_PKG_VERSION"));
}
