use serde::{Deserialize, Serialize};

use super::geometry::{Rect, ScreenPoint};
use super::scene::PointHandle;
use super::types::{PointKey, SeriesKind};

/// Snapshot of one visible, non-null point for the current render.
///
/// `handle` is only usable until the next render; `key` survives renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRef {
    pub key: PointKey,
    pub handle: PointHandle,
    pub series_name: String,
    pub series_kind: SeriesKind,
    pub series_index: usize,
    pub x: f64,
    pub y: f64,
    pub plot: ScreenPoint,
}

/// All visible points sharing one position, with their enclosing rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub x: f64,
    pub points: Vec<PointRef>,
    pub rect: Rect,
}

impl Group {
    /// Same position and the same points by key, ignoring handles and geometry
    /// re-issued by a render.
    #[must_use]
    pub fn same_members(&self, other: &Self) -> bool {
        self.x == other.x
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(left, right)| left.key == right.key)
    }

    #[must_use]
    pub fn contains(&self, key: &PointKey) -> bool {
        self.points.iter().any(|point| &point.key == key)
    }

    #[must_use]
    pub fn index_of(&self, key: &PointKey) -> Option<usize> {
        self.points.iter().position(|point| &point.key == key)
    }
}
