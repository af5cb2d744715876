//! JavaScript entry point (wasm32 only).
//!
//! `StoryViewer` validates its config synchronously, then `load()` fetches the
//! manifest and builds a [`StoryView`] over a JavaScript surface object. The
//! surface object is duck-typed: it must provide the camelCase methods of
//! [`RenderSurface`] (`openImage`, `frameRegion`, `frameWholeImage`,
//! `viewportCenter`, `addMarkerOverlay`, `removeMarkerOverlay`,
//! `setMarkerActive`, `setMouseNavigation`, `panelOcclusion`).
//!
//! Surface methods run while the viewer is borrowed; they must not call back
//! into the viewer synchronously (report image load with `onImageReady` from
//! the surface's own event handler).

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{HtmlElement, Response};

use super::{RenderSurface, StoryView};
use crate::config::{ValidConfig, ViewerConfig};
use crate::error::StoryviewError;
use crate::instance::{InstanceCounter, InstanceId};
use crate::layout::PanelOcclusion;
use crate::markup::{AllowList, Sanitizer, TagFilter};
use crate::navigation::NextAction;
use crate::overlay::{OverlayElement, PoiGraphic};
use crate::parser;
use crate::status::StatusSet;
use crate::types::{Point, Rect};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Sanitizer backed by the page's `DOMPurify`, falling back to [`TagFilter`].
struct DomPurify;

impl DomPurify {
    /// The global `DOMPurify` object and its `sanitize` function.
    fn lookup() -> Option<(JsValue, Function)> {
        let purify = Reflect::get(&js_sys::global(), &JsValue::from_str("DOMPurify")).ok()?;
        if purify.is_undefined() || purify.is_null() {
            return None;
        }
        let sanitize = Reflect::get(&purify, &JsValue::from_str("sanitize"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some((purify, sanitize))
    }
}

impl Sanitizer for DomPurify {
    fn sanitize(&self, markup: &str, allow: &AllowList) -> String {
        let Some((purify, sanitize)) = Self::lookup() else {
            return TagFilter.sanitize(markup, allow);
        };
        let clean = serde_wasm_bindgen::to_value(allow)
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|config| sanitize.call2(&purify, &JsValue::from_str(markup), &config));
        match clean.map(|v| v.as_string()) {
            Ok(Some(clean)) => clean,
            Ok(None) => TagFilter.sanitize(markup, allow),
            Err(e) => {
                tracing::warn!("storyview: DOMPurify failed: {e:?}");
                TagFilter.sanitize(markup, allow)
            }
        }
    }
}

// ============================================================================
// JavaScript surface
// ============================================================================

/// Adapter calling methods on a JavaScript surface object.
struct JsSurface {
    target: JsValue,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<Rect> for JsRect {
    fn from(r: Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

impl JsSurface {
    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.target, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Option<JsValue> {
        let Some(f) = self.method(name) else {
            tracing::warn!("storyview: surface has no `{name}` method");
            return None;
        };
        let array: js_sys::Array = args.iter().collect();
        match f.apply(&self.target, &array) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("storyview: surface `{name}` failed: {e:?}");
                None
            }
        }
    }

    fn to_js<T: Serialize>(value: &T) -> JsValue {
        serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
    }
}

impl RenderSurface for JsSurface {
    fn open_image(&mut self, tile_source: &str) {
        self.call("openImage", &[JsValue::from_str(tile_source)]);
    }

    fn frame_region(&mut self, rect: Rect, animate: bool) {
        self.call(
            "frameRegion",
            &[Self::to_js(&JsRect::from(rect)), JsValue::from_bool(animate)],
        );
    }

    fn frame_whole_image(&mut self, animate: bool) {
        self.call("frameWholeImage", &[JsValue::from_bool(animate)]);
    }

    fn viewport_center(&self) -> Point {
        self.call("viewportCenter", &[])
            .and_then(|v| serde_wasm_bindgen::from_value(v).ok())
            .unwrap_or_default()
    }

    fn add_marker_overlay(&mut self, element: &OverlayElement) {
        self.call("addMarkerOverlay", &[Self::to_js(element)]);
    }

    fn remove_marker_overlay(&mut self, id: &str) {
        self.call("removeMarkerOverlay", &[JsValue::from_str(id)]);
    }

    fn set_marker_active(&mut self, id: &str, active: bool) {
        self.call(
            "setMarkerActive",
            &[JsValue::from_str(id), JsValue::from_bool(active)],
        );
    }

    fn set_mouse_navigation(&mut self, enabled: bool) {
        self.call("setMouseNavigation", &[JsValue::from_bool(enabled)]);
    }

    fn panel_occlusion(&self) -> PanelOcclusion {
        self.call("panelOcclusion", &[])
            .and_then(|v| serde_wasm_bindgen::from_value(v).ok())
            .unwrap_or_default()
    }
}

// ============================================================================
// Host helpers
// ============================================================================

/// Resolve `config.container`: a selector string or an `HTMLElement`.
fn resolve_container(raw_config: &JsValue) -> Option<HtmlElement> {
    let value = Reflect::get(raw_config, &JsValue::from_str("container")).ok()?;
    if let Some(selector) = value.as_string() {
        return web_sys::window()?
            .document()?
            .query_selector(&selector)
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok();
    }
    value.dyn_into::<HtmlElement>().ok()
}

fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
        .is_some_and(|m| m.matches())
}

fn mirror_status(container: &HtmlElement, statuses: &StatusSet) {
    if let Err(e) = container.set_attribute("data-status", &statuses.to_attribute()) {
        tracing::warn!("storyview: could not set data-status: {e:?}");
    }
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or("no window")?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("fetch error: {e:?}"))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| "response is not a Response".to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    let text = JsFuture::from(response.text().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("text error: {e:?}"))?;
    text.as_string().ok_or_else(|| "body is not text".to_string())
}

// ============================================================================
// Exported viewer
// ============================================================================

struct Shared {
    view: Option<StoryView<JsSurface>>,
    /// Statuses recorded before a view exists
    early: StatusSet,
}

impl Shared {
    fn statuses(&self) -> StatusSet {
        match &self.view {
            Some(view) => self.early.union(view.status()),
            None => self.early.clone(),
        }
    }
}

/// Story viewer bound to a container element and a JavaScript surface.
#[wasm_bindgen]
pub struct StoryViewer {
    state: Rc<RefCell<Shared>>,
    container: HtmlElement,
    config: ValidConfig,
    instance: InstanceId,
    surface: JsValue,
}

impl StoryViewer {
    fn with_view<R>(&self, f: impl FnOnce(&mut StoryView<JsSurface>) -> R) -> Option<R> {
        self.state.borrow_mut().view.as_mut().map(f)
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(value)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }
}

#[wasm_bindgen]
impl StoryViewer {
    /// Validate the config and reserve an instance id.
    ///
    /// Throws `Container element not found` or `Missing required config`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, surface: JsValue) -> Result<StoryViewer, JsValue> {
        console_error_panic_hook::set_once();
        // A second viewer on the page finds the subscriber already installed
        let _ = tracing_wasm::try_set_as_global_default();

        let container = resolve_container(&config);
        let fail = |error: StoryviewError| -> JsValue {
            let mut statuses = StatusSet::new();
            statuses.record(error.status_code());
            if let Some(container) = &container {
                mirror_status(container, &statuses);
            }
            error.into()
        };

        let parsed: ViewerConfig = match serde_wasm_bindgen::from_value(config) {
            Ok(parsed) => parsed,
            Err(e) if container.is_none() => {
                tracing::debug!("config: {e}");
                return Err(fail(StoryviewError::ContainerNotFound));
            }
            Err(e) => return Err(fail(StoryviewError::Config(e.to_string()))),
        };
        let mut valid = parsed.validate(container.is_some()).map_err(fail)?;
        valid.prefers_reduced_motion |= prefers_reduced_motion();

        let Some(container) = container else {
            return Err(StoryviewError::ContainerNotFound.into());
        };
        let instance = InstanceCounter::global().allocate();

        Ok(StoryViewer {
            state: Rc::new(RefCell::new(Shared {
                view: None,
                early: StatusSet::new(),
            })),
            container,
            config: valid,
            instance,
            surface,
        })
    }

    /// Fetch the manifest and build the viewer. Resolves once the first
    /// canvas has been opened.
    pub fn load(&self) -> Promise {
        let state = Rc::clone(&self.state);
        let container = self.container.clone();
        let config = self.config.clone();
        let instance = self.instance;
        let surface = self.surface.clone();

        future_to_promise(async move {
            let fatal = |error: StoryviewError| -> JsValue {
                let mut s = state.borrow_mut();
                s.early.record(error.status_code());
                mirror_status(&container, &s.statuses());
                error.into()
            };

            let text = fetch_text(&config.manifest_url)
                .await
                .map_err(|reason| fatal(StoryviewError::ManifestLoad(reason)))?;
            let parsed = parser::parse(&text).map_err(&fatal)?;

            let graphic = match &config.point_of_interest_svg_url {
                Some(url) => Some(PoiGraphic::resolve(
                    fetch_text(url).await,
                    &DomPurify,
                    &AllowList::default(),
                )),
                None => None,
            };

            let mut view = StoryView::with_sanitizer(
                JsSurface { target: surface },
                parsed,
                &config,
                instance,
                Box::new(DomPurify),
            );
            if let Some((resolved, status)) = graphic {
                if let Some(code) = status {
                    view.record_status(code);
                }
                match resolved {
                    Ok(graphic) => view.set_poi_graphic(graphic),
                    Err(e) => view.record_status(e.status_code()),
                }
            }

            if let Err(e) = container.class_list().add_1("storyview") {
                tracing::warn!("storyview: could not style container: {e:?}");
            }
            let mut s = state.borrow_mut();
            s.view = Some(view);
            mirror_status(&container, &s.statuses());
            Ok::<JsValue, JsValue>(JsValue::UNDEFINED)
        })
    }

    /// Id of an element of this instance, e.g. `element_id("next")`.
    pub fn element_id(&self, part: &str) -> String {
        self.instance.element_id(part)
    }

    pub fn is_loaded(&self) -> bool {
        self.state.borrow().view.is_some()
    }

    pub fn go_to(&self, index: i32) -> bool {
        self.with_view(|v| v.go_to(index)).unwrap_or(false)
    }

    pub fn next(&self) -> bool {
        self.with_view(StoryView::next).unwrap_or(false)
    }

    pub fn previous(&self) -> bool {
        self.with_view(StoryView::previous).unwrap_or(false)
    }

    pub fn set_canvas_index(&self, index: usize) -> bool {
        self.with_view(|v| v.set_canvas_index(index))
            .unwrap_or(false)
    }

    pub fn toggle_info_panel(&self) -> bool {
        self.with_view(StoryView::toggle_info_panel)
            .unwrap_or(false)
    }

    pub fn toggle_pins(&self) -> bool {
        self.with_view(StoryView::toggle_pins).unwrap_or(false)
    }

    /// Call from the surface's image-open handler.
    pub fn on_image_ready(&self) {
        let _ = self.with_view(StoryView::on_image_ready);
        if let Err(e) = self.container.set_attribute("data-loaded", "true") {
            tracing::warn!("storyview: could not set data-loaded: {e:?}");
        }
    }

    pub fn activate_marker(&self, index: usize) -> bool {
        self.with_view(|v| v.activate_marker(index))
            .unwrap_or(false)
    }

    pub fn focus_marker(&self, index: usize) {
        let _ = self.with_view(|v| v.focus_marker(index));
    }

    pub fn blur_marker(&self) {
        let _ = self.with_view(StoryView::blur_marker);
    }

    /// `{ kind, html }` for the current slide, or `null`.
    pub fn content(&self) -> Result<JsValue, JsValue> {
        let s = self.state.borrow();
        let content = s.view.as_ref().and_then(|v| v.content());
        Self::to_js(&content)
    }

    /// `{ floor, ceiling, atFloor, atCeiling }`, or `null` before load.
    pub fn bounds(&self) -> Result<JsValue, JsValue> {
        let s = self.state.borrow();
        Self::to_js(&s.view.as_ref().map(StoryView::bounds))
    }

    /// `{ previousDisabled, next }` plus the button labels.
    pub fn controls(&self) -> Result<JsValue, JsValue> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Controls {
            previous_disabled: bool,
            next: NextAction,
            previous_label: &'static str,
            next_label: &'static str,
            info_toggle_label: &'static str,
            pins_toggle_label: &'static str,
        }

        let s = self.state.borrow();
        let controls = s.view.as_ref().map(|v| {
            let state = v.controls();
            Controls {
                previous_disabled: state.previous_disabled,
                next: state.next,
                previous_label: state.previous_label(),
                next_label: state.next_label(),
                info_toggle_label: v.info_toggle_label(),
                pins_toggle_label: v.pins_toggle_label(),
            }
        });
        Self::to_js(&controls)
    }

    pub fn active_marker(&self) -> Option<usize> {
        self.state
            .borrow()
            .view
            .as_ref()
            .and_then(StoryView::active_marker)
    }

    pub fn canvas_index(&self) -> usize {
        self.state
            .borrow()
            .view
            .as_ref()
            .map_or(0, StoryView::canvas_index)
    }

    pub fn slide_index(&self) -> i32 {
        self.state
            .borrow()
            .view
            .as_ref()
            .map_or(0, StoryView::slide_index)
    }

    /// Comma-separated status codes (same as `data-status`).
    pub fn status(&self) -> String {
        self.state.borrow().statuses().to_attribute()
    }
}

impl std::fmt::Debug for StoryViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryViewer")
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}
