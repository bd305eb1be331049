mod timer;

pub use timer::{CancelableTimer, Clock, ManualClock, Millis, SystemClock};

use serde::{Deserialize, Serialize};

use crate::core::{Group, PointKey, PointRef};

/// Keys understood by keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Space,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WritingDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Single source of truth for keyboard navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FocusState {
    #[default]
    Chart,
    Group {
        group: Group,
    },
    Point {
        point: PointRef,
        group: Group,
    },
}

impl FocusState {
    #[must_use]
    pub fn group(&self) -> Option<&Group> {
        match self {
            Self::Chart => None,
            Self::Group { group } | Self::Point { group, .. } => Some(group),
        }
    }

    #[must_use]
    pub fn point(&self) -> Option<&PointRef> {
        match self {
            Self::Point { point, .. } => Some(point),
            _ => None,
        }
    }

    /// Whether both states focus the same target by key.
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Chart, Self::Chart) => true,
            (Self::Group { group: left }, Self::Group { group: right }) => {
                left.same_members(right)
            }
            (
                Self::Point {
                    point: left_point,
                    group: left_group,
                },
                Self::Point {
                    point: right_point,
                    group: right_group,
                },
            ) => left_point.key == right_point.key && left_group.same_members(right_group),
            _ => false,
        }
    }
}

/// The one tooltip of a chart instance.
///
/// After a hide or dismiss the last target is kept with `visible == false`
/// so a later click on the same spot can pin it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TooltipState {
    pub visible: bool,
    pub pinned: bool,
    pub point: Option<PointRef>,
    pub group: Option<Group>,
}

impl TooltipState {
    /// Whether the tooltip currently targets `point` (or the bare group at `x`).
    #[must_use]
    pub fn targets(&self, point: Option<&PointKey>, x: f64) -> bool {
        let Some(group) = &self.group else {
            return false;
        };
        let same_point = match (&self.point, point) {
            (Some(current), Some(key)) => &current.key == key,
            (None, None) => true,
            _ => false,
        };
        same_point && group.x == x
    }

    #[must_use]
    pub fn has_target(&self) -> bool {
        self.group.is_some()
    }

    /// Equal visibility, pin and target by key. Handle refreshes from a
    /// render do not count as a change.
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        let same_point = match (&self.point, &other.point) {
            (Some(left), Some(right)) => left.key == right.key,
            (None, None) => true,
            _ => false,
        };
        let same_group = match (&self.group, &other.group) {
            (Some(left), Some(right)) => left.same_members(right),
            (None, None) => true,
            _ => false,
        };
        self.visible == other.visible && self.pinned == other.pinned && same_point && same_group
    }
}

/// ARIA role written onto the focused anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorRole {
    Application,
    Group,
    Button,
}

/// Accessible description the host writes onto the focus anchor before
/// removing and re-attaching it so screen readers announce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub role: AnchorRole,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    Line,
    Dashed,
    Square,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendMarker {
    pub shape: MarkerShape,
    pub color: Option<String>,
}

/// Derived legend row. Never the source of truth for visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendItem {
    pub id: String,
    pub name: String,
    pub marker: LegendMarker,
    pub visible: bool,
    pub highlighted: bool,
}
