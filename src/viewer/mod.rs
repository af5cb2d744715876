//! `StoryView` - the stateful viewer that drives a rendering surface.
//!
//! This module ties the pure pieces together:
//! - navigation transitions produce effects
//! - effects are applied here to the panel content, controls, markers and
//!   the [`RenderSurface`]
//! - framing is resolved against the panel geometry at the moment it runs
//!
//! The JavaScript entry point (`StoryViewer`) lives in `bindings` and wraps a
//! `StoryView` over a JavaScript surface object.

#[cfg(target_arch = "wasm32")]
mod bindings;
mod surface;

use serde::Serialize;

#[cfg(target_arch = "wasm32")]
pub use bindings::StoryViewer;
pub use surface::RenderSurface;

use crate::config::ValidConfig;
use crate::instance::InstanceId;
use crate::layout::{resolve, FrameContext, FrameIntent, FramingRequest};
use crate::markup::{panel_content, AllowList, PanelContent, Sanitizer, TagFilter};
use crate::navigation::{self, ControlState, Cursor, Effect, NavEvent};
use crate::overlay::{MarkerKind, OverlayKind, Overlays, PoiGraphic};
use crate::parser::ParsedManifest;
use crate::region::point_to_region;
use crate::slides::{Bounds, Story};
use crate::status::{StatusCode, StatusSet};
use crate::types::Point;

/// Navigable range of the current canvas plus where the cursor sits in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsState {
    pub floor: i32,
    pub ceiling: i32,
    pub at_floor: bool,
    pub at_ceiling: bool,
}

impl BoundsState {
    fn new(bounds: Bounds, index: i32) -> Self {
        Self {
            floor: bounds.floor,
            ceiling: bounds.ceiling,
            at_floor: index == bounds.floor,
            at_ceiling: index == bounds.ceiling,
        }
    }
}

/// Behaviour switches taken from the validated configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub enable_pins: bool,
    pub enable_route: bool,
    pub disable_pan_and_zoom: bool,
    pub reduced_motion: bool,
}

impl From<&ValidConfig> for ViewSettings {
    fn from(config: &ValidConfig) -> Self {
        Self {
            enable_pins: config.enable_pins,
            enable_route: config.enable_route,
            disable_pan_and_zoom: config.disable_pan_and_zoom,
            reduced_motion: config.prefers_reduced_motion,
        }
    }
}

/// One story viewer instance over a rendering surface.
pub struct StoryView<S: RenderSurface> {
    surface: S,
    story: Story,
    instance: InstanceId,
    settings: ViewSettings,
    cursor: Cursor,
    statuses: StatusSet,
    overlays: Overlays,
    graphic: Option<PoiGraphic>,
    sanitizer: Box<dyn Sanitizer>,
    allow: AllowList,
    content: Option<PanelContent>,
    controls: ControlState,
    panel_visible: bool,
    image_ready: bool,
    /// Framing requested before the image finished opening
    pending_frame: Option<FrameIntent>,
}

impl<S: RenderSurface> StoryView<S> {
    /// Build a viewer over a loaded manifest and open its first canvas.
    ///
    /// Manifest statuses are recorded and logged here.
    pub fn new(
        surface: S,
        parsed: ParsedManifest,
        config: &ValidConfig,
        instance: InstanceId,
    ) -> Self {
        Self::with_sanitizer(surface, parsed, config, instance, Box::new(TagFilter))
    }

    /// Like [`StoryView::new`] with a custom sanitizer.
    pub fn with_sanitizer(
        mut surface: S,
        parsed: ParsedManifest,
        config: &ValidConfig,
        instance: InstanceId,
        sanitizer: Box<dyn Sanitizer>,
    ) -> Self {
        let mut statuses = StatusSet::new();
        statuses.extend(parsed.statuses);

        let settings = ViewSettings::from(config);
        surface.set_mouse_navigation(!settings.disable_pan_and_zoom);

        let graphic = match PoiGraphic::builtin() {
            Ok(graphic) => Some(graphic),
            Err(e) => {
                statuses.record(e.status_code());
                None
            }
        };

        let story = Story::new(parsed.manifest, config.slide_options());
        let start = navigation::initial(&story);
        let mut view = Self {
            surface,
            controls: ControlState::at(story.bounds(0), start.cursor.slide),
            story,
            instance,
            settings,
            cursor: start.cursor,
            statuses,
            overlays: Overlays::new(settings.enable_pins, settings.enable_route),
            graphic,
            sanitizer,
            allow: AllowList::default(),
            content: None,
            panel_visible: true,
            image_ready: false,
            pending_frame: None,
        };
        view.apply(start.effects);
        view
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Go to a slide of the current canvas. Returns false for a no-op.
    pub fn go_to(&mut self, index: i32) -> bool {
        self.dispatch(NavEvent::GoTo(index))
    }

    pub fn next(&mut self) -> bool {
        self.dispatch(NavEvent::Next)
    }

    pub fn previous(&mut self) -> bool {
        self.dispatch(NavEvent::Previous)
    }

    pub fn set_canvas_index(&mut self, canvas: usize) -> bool {
        self.dispatch(NavEvent::SetCanvas(canvas))
    }

    fn dispatch(&mut self, event: NavEvent) -> bool {
        match navigation::transition(&self.story, self.cursor, event) {
            Some(next) => {
                self.cursor = next.cursor;
                self.apply(next.effects);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            tracing::debug!(instance = %self.instance, "{effect:?}");
            match effect {
                Effect::OpenCanvas(canvas) => self.open_canvas(canvas),
                Effect::RenderPanel(kind) => {
                    self.content = Some(panel_content(
                        &self.story,
                        self.cursor.canvas,
                        kind,
                        self.sanitizer.as_ref(),
                        &self.allow,
                    ));
                }
                Effect::UpdateControls(controls) => self.controls = controls,
                Effect::SetActiveMarker(index) => self.set_active_marker(index),
                Effect::Reframe(intent) => {
                    if self.image_ready {
                        self.frame(intent);
                    } else {
                        self.pending_frame = Some(intent);
                    }
                }
            }
        }
    }

    fn open_canvas(&mut self, canvas: usize) {
        self.detach_overlays();
        self.image_ready = false;
        self.pending_frame = None;
        self.content = None;

        let Some(target) = self.story.canvas(canvas) else {
            return;
        };
        self.overlays.rebuild(&target.annotations, target.dimensions());
        match &target.image_service {
            Some(source) => self.surface.open_image(source),
            None => tracing::warn!(canvas, "canvas has no image service"),
        }
    }

    fn detach_overlays(&mut self) {
        for id in self.overlays.element_ids(self.instance) {
            self.surface.remove_marker_overlay(&id);
        }
    }

    fn set_active_marker(&mut self, index: Option<usize>) {
        let changes = self.overlays.set_active(index);
        if !self.image_ready {
            return;
        }
        for change in changes {
            if change.kind == MarkerKind::Pin && !self.overlays.pins_visible() {
                continue;
            }
            let id = self.instance.element_id(&change.kind.part(change.index));
            self.surface.set_marker_active(&id, change.active);
        }
    }

    fn frame_context(&self) -> FrameContext {
        FrameContext {
            occlusion: self.surface.panel_occlusion(),
            panel_visible: self.panel_visible,
            reduced_motion: self.settings.reduced_motion,
        }
    }

    fn frame(&mut self, intent: FrameIntent) {
        match resolve(intent, &self.frame_context()) {
            FramingRequest::WholeImage { animate } => self.surface.frame_whole_image(animate),
            FramingRequest::Region { rect, animate } => self.surface.frame_region(rect, animate),
            FramingRequest::Hold => {}
        }
    }

    // ========================================================================
    // Surface events
    // ========================================================================

    /// The image opened by the last canvas change finished loading.
    ///
    /// Attaches the overlays of the canvas and applies framing that was
    /// requested while the image was loading.
    pub fn on_image_ready(&mut self) {
        self.image_ready = true;
        // Surfaces may report the same image more than once
        self.detach_overlays();
        if let Some(graphic) = &self.graphic {
            for element in self.overlays.elements(self.instance, graphic) {
                self.surface.add_marker_overlay(&element);
            }
        }
        if let Some(intent) = self.pending_frame.take() {
            self.frame(intent);
        }
    }

    /// A marker was clicked or activated from the keyboard.
    pub fn activate_marker(&mut self, index: usize) -> bool {
        match i32::try_from(index) {
            Ok(slide) => self.go_to(slide),
            Err(_) => false,
        }
    }

    /// A point-of-interest marker received focus: bring it into view.
    pub fn focus_marker(&mut self, index: usize) {
        let point = self
            .story
            .annotation(self.cursor.canvas, index)
            .and_then(|a| a.target.as_point());
        if let Some(point) = point {
            let region = point_to_region(point, self.story.options().poi_region_size);
            self.surface.frame_region(region, false);
        }
    }

    /// A point-of-interest marker lost focus.
    pub fn blur_marker(&mut self) {
        self.surface.frame_whole_image(false);
    }

    // ========================================================================
    // Toggles
    // ========================================================================

    /// Show or hide the info panel. Returns the new visibility.
    pub fn toggle_info_panel(&mut self) -> bool {
        self.panel_visible = !self.panel_visible;
        self.panel_visible
    }

    /// Show or hide pins and the route. Returns the new visibility.
    ///
    /// Does nothing when pins are disabled.
    pub fn toggle_pins(&mut self) -> bool {
        if !self.overlays.pins_enabled() {
            return false;
        }
        let visible = self.overlays.toggle_pins();
        if self.image_ready {
            for element in self.overlays.toggled_elements(self.instance) {
                if visible {
                    self.surface.add_marker_overlay(&element);
                } else {
                    self.surface.remove_marker_overlay(&element.id);
                }
            }
        }
        visible
    }

    /// Custom graphic for point-of-interest markers.
    ///
    /// Markers already attached are replaced.
    pub fn set_poi_graphic(&mut self, graphic: PoiGraphic) {
        let markers: Vec<_> = self
            .overlays
            .elements(self.instance, &graphic)
            .into_iter()
            .filter(|e| e.kind == OverlayKind::PointOfInterest)
            .collect();
        self.graphic = Some(graphic);
        if !self.image_ready {
            return;
        }
        for element in markers {
            self.surface.remove_marker_overlay(&element.id);
            self.surface.add_marker_overlay(&element);
        }
    }

    pub fn record_status(&mut self, code: StatusCode) {
        self.statuses.record(code);
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn canvas_index(&self) -> usize {
        self.cursor.canvas
    }

    pub fn slide_index(&self) -> i32 {
        self.cursor.slide
    }

    /// Sanitized panel markup of the current slide.
    pub fn content(&self) -> Option<&PanelContent> {
        self.content.as_ref()
    }

    pub fn bounds(&self) -> BoundsState {
        BoundsState::new(self.story.bounds(self.cursor.canvas), self.cursor.slide)
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    pub fn active_marker(&self) -> Option<usize> {
        self.overlays.active()
    }

    pub fn status(&self) -> &StatusSet {
        &self.statuses
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn pins_visible(&self) -> bool {
        self.overlays.pins_enabled() && self.overlays.pins_visible()
    }

    /// Accessible label of the info panel toggle.
    pub fn info_toggle_label(&self) -> &'static str {
        if self.panel_visible {
            "Hide annotations"
        } else {
            "Show annotations"
        }
    }

    /// Accessible label of the pins toggle.
    pub fn pins_toggle_label(&self) -> &'static str {
        if self.overlays.pins_visible() {
            "Hide pins"
        } else {
            "Show pins"
        }
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn viewport_center(&self) -> Point {
        self.surface.viewport_center()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
