use crate::interaction::{NavKey, WritingDirection};

/// What a key press means once orientation and writing direction are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NavIntent {
    /// Next/previous along the position axis (or series).
    AlongNext,
    AlongPrev,
    /// Next/previous across the position axis (within a group).
    AcrossNext,
    AcrossPrev,
    First,
    Last,
    PageBack,
    PageForward,
    Activate,
    Escape,
}

/// Which arrow plays which role for one chart orientation.
#[derive(Debug, Clone, Copy)]
struct ArrowLayout {
    along_next: NavKey,
    along_prev: NavKey,
    across_next: NavKey,
}

const UPRIGHT: ArrowLayout = ArrowLayout {
    along_next: NavKey::ArrowRight,
    along_prev: NavKey::ArrowLeft,
    across_next: NavKey::ArrowDown,
};

const INVERTED: ArrowLayout = ArrowLayout {
    along_next: NavKey::ArrowDown,
    along_prev: NavKey::ArrowUp,
    across_next: NavKey::ArrowRight,
};

fn resolve_with_layout(key: NavKey, layout: ArrowLayout) -> NavIntent {
    match key {
        NavKey::Home => NavIntent::First,
        NavKey::End => NavIntent::Last,
        NavKey::PageUp => NavIntent::PageBack,
        NavKey::PageDown => NavIntent::PageForward,
        NavKey::Escape => NavIntent::Escape,
        NavKey::Enter | NavKey::Space => NavIntent::Activate,
        arrow if arrow == layout.along_next => NavIntent::AlongNext,
        arrow if arrow == layout.along_prev => NavIntent::AlongPrev,
        arrow if arrow == layout.across_next => NavIntent::AcrossNext,
        _ => NavIntent::AcrossPrev,
    }
}

/// Maps a key for cartesian charts.
///
/// Positions run left to right (top to bottom when inverted) and group
/// points run top to bottom (left to right when inverted). Under RTL the
/// horizontal arrows trade places before mapping; traversal order itself
/// is unchanged.
pub(super) fn resolve_cartesian_key(
    key: NavKey,
    inverted: bool,
    direction: WritingDirection,
) -> NavIntent {
    let key = match (direction, key) {
        (WritingDirection::Rtl, NavKey::ArrowLeft) => NavKey::ArrowRight,
        (WritingDirection::Rtl, NavKey::ArrowRight) => NavKey::ArrowLeft,
        _ => key,
    };
    resolve_with_layout(key, if inverted { INVERTED } else { UPRIGHT })
}

/// Maps a key for pie-like charts, where every arrow cycles segments.
/// Segment cycling is never mirrored.
pub(super) fn resolve_radial_key(key: NavKey) -> NavIntent {
    match resolve_with_layout(key, UPRIGHT) {
        NavIntent::AcrossNext => NavIntent::AlongNext,
        NavIntent::AcrossPrev => NavIntent::AlongPrev,
        intent => intent,
    }
}

/// One step with wrap-around. `len` must be non-zero.
pub(super) fn step_circular(index: usize, len: usize, forward: bool) -> usize {
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

/// `step` positions forward or back, clamped to `[0, len)`.
pub(super) fn step_clamped(index: usize, len: usize, step: usize, forward: bool) -> usize {
    if forward {
        index.saturating_add(step).min(len.saturating_sub(1))
    } else {
        index.saturating_sub(step)
    }
}

/// Page jump: `ratio` of `len`, floored, never less than one position.
pub(super) fn page_size(len: usize, ratio: f64) -> usize {
    let size = (len as f64 * ratio).floor();
    if size.is_finite() && size >= 1.0 {
        size as usize
    } else {
        1
    }
}
