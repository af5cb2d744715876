//! Data types for the story viewer.

mod geometry;
mod manifest;
mod target;

pub use geometry::*;
pub use manifest::*;
pub use target::*;
