mod geometry;
mod group;
mod scene;
mod types;

pub use geometry::{Rect, ScreenPoint, distance_to_band};
pub use group::{Group, PointRef};
pub use scene::{
    ElementHandle, PlotArea, PointHandle, PointNode, ReferenceLineNode, Scene, SeriesHandle,
    SeriesNode,
};
pub use types::{EmphasisState, PointKey, SeriesKind, ValueRange, point_key, series_key};
