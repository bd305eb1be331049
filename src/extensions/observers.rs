use serde::{Deserialize, Serialize};

use crate::core::PointKey;
use crate::interaction::{Announcement, FocusState, LegendItem, TooltipState};

/// Event stream exposed to host views (tooltip, legend, live region).
///
/// State events carry the new state and are only emitted when it changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoordinatorEvent {
    Rendered { generation: u64 },
    TooltipChanged(TooltipState),
    FocusChanged(FocusState),
    LegendChanged(Vec<LegendItem>),
    /// Host must write the announcement onto the focus anchor and re-attach it.
    AnchorUpdated(Announcement),
    PointHighlighted { point: PointKey },
    GroupHighlighted { x: f64 },
    HighlightCleared,
    VisibilityRequested { visible_ids: Vec<String> },
}

/// Subscriber interface for the reactive coordinator surface.
///
/// Observers read state through events and cannot mutate coordinator
/// internals directly.
pub trait CoordinatorObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &CoordinatorEvent);
}
