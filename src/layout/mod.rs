//! Layout engine for viewport framing.
//!
//! This module handles:
//! - Deciding what each slide frames (whole image, hold, or a region)
//! - Expanding points of interest into regions
//! - Compensating for the info panel that covers part of the viewer

mod framing;
mod viewport;

pub use framing::{
    intent_for_slide, intent_for_target, offset_region_by_panel, panel_x_correction, resolve,
    FrameIntent, FramingRequest, MARKER_WIDTH, MIN_SIDE_BY_SIDE_WIDTH,
};
pub use viewport::{FrameContext, PanelOcclusion};
