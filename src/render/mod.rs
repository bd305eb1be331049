mod emphasis_gate;
mod memory_engine;
mod primitives;

pub use emphasis_gate::EmphasisGate;
pub use memory_engine::{MemoryEngine, MemoryPoint, MemorySeries};
pub use primitives::{Color, ShapeHandle, ShapePrimitive, Stroke};

use crate::core::{ElementHandle, EmphasisState, PointHandle, Rect, Scene, SeriesHandle};
use crate::error::ChartResult;

/// Contract of the external retained-mode engine that owns the scene graph.
///
/// The coordinator only writes through the emphasis setters, the visibility
/// toggles and the shape primitives below. Everything reachable through
/// `scene()` is a snapshot valid until the next render callback.
///
/// Once a gate has been installed, implementations must drop every emphasis
/// change (their own default hover/selection behavior included) that arrives
/// while `EmphasisGate::is_authorized` is `false`.
pub trait RenderingEngine {
    fn scene(&self) -> &Scene;

    fn install_emphasis_gate(&mut self, gate: EmphasisGate);

    fn set_series_emphasis(&mut self, series: SeriesHandle, state: EmphasisState);

    fn set_point_emphasis(&mut self, point: PointHandle, state: EmphasisState);

    fn set_reference_line_emphasis(&mut self, line: ElementHandle, state: EmphasisState);

    fn set_series_visible(&mut self, series: SeriesHandle, visible: bool);

    fn set_point_visible(&mut self, point: PointHandle, visible: bool);

    fn draw(&mut self, primitive: ShapePrimitive) -> ChartResult<ShapeHandle>;

    fn destroy_shape(&mut self, handle: ShapeHandle);

    /// Engine-computed screen anchor for a point kind (e.g. a pie segment centroid).
    fn exact_point_anchor(&self, _point: PointHandle) -> Option<Rect> {
        None
    }
}
