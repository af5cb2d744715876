//! Navigation state machine.
//!
//! The machine is pure: [`transition`] takes the current [`Cursor`] and an
//! input event and returns the next cursor plus the list of [`Effect`]s the
//! caller must apply (panel render, controls, marker state, reframe). Events
//! that would leave `[floor, ceiling]` return `None` and change nothing.

use serde::Serialize;

use crate::layout::{intent_for_slide, FrameIntent};
use crate::slides::{Bounds, SlideKind, Story};

/// Current position: canvas and slide index within that canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub canvas: usize,
    pub slide: i32,
}

/// Input events accepted by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    GoTo(i32),
    Next,
    Previous,
    SetCanvas(usize),
}

/// What the "next" control does from the current slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NextAction {
    Advance,
    Restart,
    /// Nothing on this canvas to move to
    Disabled,
}

/// Enablement and labelling of the previous/next controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlState {
    pub previous_disabled: bool,
    pub next: NextAction,
}

impl ControlState {
    /// Controls at `index`. Both are disabled on a canvas with no slides.
    pub fn at(bounds: Bounds, index: i32) -> Self {
        if bounds.is_empty() {
            return Self {
                previous_disabled: true,
                next: NextAction::Disabled,
            };
        }
        Self {
            previous_disabled: index == bounds.floor,
            next: if index == bounds.ceiling {
                NextAction::Restart
            } else {
                NextAction::Advance
            },
        }
    }

    pub fn previous_label(&self) -> &'static str {
        "Previous"
    }

    pub fn next_label(&self) -> &'static str {
        match self.next {
            NextAction::Advance | NextAction::Disabled => "Next",
            NextAction::Restart => "Restart",
        }
    }
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Load the canvas image and rebuild its markers
    OpenCanvas(usize),
    /// Re-render the text panel for this slide
    RenderPanel(SlideKind),
    UpdateControls(ControlState),
    /// Annotation index whose marker becomes active, or none
    SetActiveMarker(Option<usize>),
    Reframe(FrameIntent),
}

/// Result of an accepted event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub cursor: Cursor,
    pub effects: Vec<Effect>,
}

/// Starting state: first canvas at its floor.
///
/// For a canvas with nothing navigable only `OpenCanvas` and the disabled
/// controls are emitted.
pub fn initial(story: &Story) -> Transition {
    let bounds = story.bounds(0);
    let cursor = Cursor {
        canvas: 0,
        slide: bounds.floor,
    };
    let mut effects = vec![Effect::OpenCanvas(0)];
    effects.extend(
        enter(story, cursor)
            .unwrap_or_else(|| vec![Effect::UpdateControls(ControlState::at(bounds, cursor.slide))]),
    );
    Transition { cursor, effects }
}

/// Apply an event to a cursor.
///
/// Returns `None` for out-of-range requests; these are expected input
/// (repeated clicks at either end) and are not errors.
pub fn transition(story: &Story, cursor: Cursor, event: NavEvent) -> Option<Transition> {
    let outcome = match event {
        NavEvent::GoTo(index) => go_to(story, cursor.canvas, index),
        NavEvent::Previous => go_to(story, cursor.canvas, cursor.slide.checked_sub(1)?),
        NavEvent::Next => {
            let bounds = story.bounds(cursor.canvas);
            if !bounds.is_empty() && cursor.slide == bounds.ceiling {
                // Restart: wrap to the next canvas (or the same one) at its floor
                let canvas = (cursor.canvas + 1) % story.canvas_count().max(1);
                change_canvas(story, cursor, canvas)
            } else {
                go_to(story, cursor.canvas, cursor.slide.checked_add(1)?)
            }
        }
        NavEvent::SetCanvas(canvas) => {
            if canvas >= story.canvas_count() {
                None
            } else {
                change_canvas(story, cursor, canvas)
            }
        }
    };

    if outcome.is_none() {
        tracing::trace!(?event, ?cursor, "ignored navigation event");
    }
    outcome
}

fn go_to(story: &Story, canvas: usize, index: i32) -> Option<Transition> {
    let cursor = Cursor {
        canvas,
        slide: index,
    };
    let effects = enter(story, cursor)?;
    Some(Transition { cursor, effects })
}

fn change_canvas(story: &Story, from: Cursor, canvas: usize) -> Option<Transition> {
    let cursor = Cursor {
        canvas,
        slide: story.bounds(canvas).floor,
    };
    let mut effects = Vec::new();
    if canvas != from.canvas {
        effects.push(Effect::OpenCanvas(canvas));
    }
    match enter(story, cursor) {
        Some(slide_effects) => effects.extend(slide_effects),
        None if canvas != from.canvas => {
            effects.push(Effect::UpdateControls(ControlState::at(
                story.bounds(canvas),
                cursor.slide,
            )));
            effects.push(Effect::SetActiveMarker(None));
            effects.push(Effect::Reframe(FrameIntent::WholeImage));
        }
        None => return None,
    }
    Some(Transition { cursor, effects })
}

/// Effects of arriving at a slide, or `None` when the index is out of bounds.
fn enter(story: &Story, cursor: Cursor) -> Option<Vec<Effect>> {
    let kind = story.slide_at(cursor.canvas, cursor.slide)?;
    let bounds = story.bounds(cursor.canvas);
    let active_marker = match kind {
        SlideKind::Annotation(index) => Some(index),
        SlideKind::Title | SlideKind::Credits => None,
    };

    Some(vec![
        Effect::RenderPanel(kind),
        Effect::UpdateControls(ControlState::at(bounds, cursor.slide)),
        Effect::SetActiveMarker(active_marker),
        Effect::Reframe(intent_for_slide(story, cursor.canvas, kind)),
    ])
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
    use crate::slides::SlideOptions;
    use crate::types::{Annotation, Canvas, Manifest, Rect, Target};

    fn story(label: &str, per_canvas: &[usize], credits: bool) -> Story {
        let canvases = per_canvas
            .iter()
            .map(|&n| Canvas {
                annotations: (0..n)
                    .map(|i| Annotation {
                        id: None,
                        target: Target::Region(Rect::new(i as f64 * 10.0, 0.0, 10.0, 10.0)),
                        bodies: Vec::new(),
                    })
                    .collect(),
                ..Canvas::default()
            })
            .collect();
        Story::new(
            Manifest {
                label: label.to_string(),
                canvases,
                ..Manifest::default()
            },
            SlideOptions {
                show_credit_slide: credits,
                ..SlideOptions::default()
            },
        )
    }

    fn controls(t: &Transition) -> ControlState {
        t.effects
            .iter()
            .find_map(|e| match e {
                Effect::UpdateControls(c) => Some(*c),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_initial_at_floor() {
        let s = story("Title", &[2], true);
        let t = initial(&s);
        assert_eq!(t.cursor, Cursor { canvas: 0, slide: -1 });
        assert_eq!(t.effects[0], Effect::OpenCanvas(0));
        assert_eq!(t.effects[1], Effect::RenderPanel(SlideKind::Title));
        assert!(controls(&t).previous_disabled);
        assert!(t
            .effects
            .contains(&Effect::Reframe(FrameIntent::WholeImage)));
    }

    #[test]
    fn test_out_of_range_is_none() {
        let s = story("Title", &[2], true);
        let c = initial(&s).cursor;
        assert!(transition(&s, c, NavEvent::GoTo(-2)).is_none());
        assert!(transition(&s, c, NavEvent::GoTo(3)).is_none());
        assert!(transition(&s, c, NavEvent::Previous).is_none());
        assert!(transition(&s, c, NavEvent::SetCanvas(1)).is_none());
    }

    #[test]
    fn test_ceiling_shows_restart_and_wraps() {
        let s = story("Title", &[2], true);
        let mut c = initial(&s).cursor;
        for expected in [0, 1, 2] {
            let t = transition(&s, c, NavEvent::Next).unwrap();
            assert_eq!(t.cursor.slide, expected);
            c = t.cursor;
        }
        let at_ceiling = transition(&s, c, NavEvent::GoTo(2)).unwrap();
        assert_eq!(controls(&at_ceiling).next, NextAction::Restart);
        assert!(!controls(&at_ceiling).previous_disabled);
        assert_eq!(at_ceiling.effects[0], Effect::RenderPanel(SlideKind::Credits));
        assert!(at_ceiling
            .effects
            .contains(&Effect::Reframe(FrameIntent::Hold)));

        let wrapped = transition(&s, c, NavEvent::Next).unwrap();
        assert_eq!(wrapped.cursor, Cursor { canvas: 0, slide: -1 });
        assert!(controls(&wrapped).previous_disabled);
        // Same canvas: no reload
        assert!(!wrapped.effects.contains(&Effect::OpenCanvas(0)));
    }

    #[test]
    fn test_next_at_ceiling_moves_to_next_canvas() {
        let s = story("", &[1, 3], false);
        let c = Cursor { canvas: 0, slide: 0 };
        let t = transition(&s, c, NavEvent::Next).unwrap();
        assert_eq!(t.cursor, Cursor { canvas: 1, slide: 0 });
        assert_eq!(t.effects[0], Effect::OpenCanvas(1));

        let last = Cursor { canvas: 1, slide: 2 };
        let t = transition(&s, last, NavEvent::Next).unwrap();
        assert_eq!(t.cursor, Cursor { canvas: 0, slide: 0 });
    }

    #[test]
    fn test_set_canvas_resets_to_floor() {
        let s = story("Title", &[2, 2], true);
        let c = Cursor { canvas: 0, slide: 1 };
        let t = transition(&s, c, NavEvent::SetCanvas(1)).unwrap();
        assert_eq!(t.cursor, Cursor { canvas: 1, slide: -1 });
    }

    #[test]
    fn test_active_marker_per_slide_kind() {
        let s = story("Title", &[2], true);
        let c = initial(&s).cursor;
        let t = transition(&s, c, NavEvent::GoTo(1)).unwrap();
        assert!(t.effects.contains(&Effect::SetActiveMarker(Some(1))));
        let t = transition(&s, c, NavEvent::GoTo(2)).unwrap();
        assert!(t.effects.contains(&Effect::SetActiveMarker(None)));
    }

    #[test]
    fn test_degenerate_canvas_has_no_moves() {
        let s = story("", &[0], false);
        let t = initial(&s);
        assert_eq!(t.effects[0], Effect::OpenCanvas(0));
        assert_eq!(
            controls(&t),
            ControlState {
                previous_disabled: true,
                next: NextAction::Disabled
            }
        );
        assert!(!t.effects.iter().any(|e| matches!(e, Effect::RenderPanel(_))));
        assert!(transition(&s, t.cursor, NavEvent::Next).is_none());
        assert!(transition(&s, t.cursor, NavEvent::Previous).is_none());
    }

    #[test]
    fn test_moving_onto_empty_canvas_disables_controls() {
        let s = story("", &[2, 0], false);
        let at_ceiling = Cursor { canvas: 0, slide: 1 };
        let t = transition(&s, at_ceiling, NavEvent::Next).unwrap();
        assert_eq!(t.cursor, Cursor { canvas: 1, slide: 0 });
        assert_eq!(t.effects[0], Effect::OpenCanvas(1));
        let c = controls(&t);
        assert!(c.previous_disabled);
        assert_eq!(c.next, NextAction::Disabled);
        assert_eq!(c.next_label(), "Next");
    }
}
