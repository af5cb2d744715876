use serde::{Deserialize, Serialize};

use super::{Point, Rect};

/// What an annotation points at, resolved once when the manifest is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Target {
    /// A rectangular `xywh` region
    Region(Rect),
    /// A `PointSelector` point of interest
    Point(Point),
    /// Nothing resolvable; framed as the whole image
    #[default]
    None,
}

impl Target {
    /// Center used for pins and the route: centroid for regions, the point itself for points.
    pub fn center(&self) -> Option<Point> {
        match self {
            Self::Region(rect) => Some(rect.center()),
            Self::Point(point) => Some(*point),
            Self::None => None,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Self::Point(_))
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(point) => Some(*point),
            Self::Region(_) | Self::None => None,
        }
    }
}
