use serde::{Deserialize, Serialize};

/// Pixel position relative to the chart surface origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle in surface pixels. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Zero-sized rectangle sitting on `point`.
    #[must_use]
    pub fn at_point(point: ScreenPoint) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    #[must_use]
    pub fn left(self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn contains(self, point: ScreenPoint) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Smallest rectangle enclosing both `self` and `point`.
    #[must_use]
    pub fn expand_to(self, point: ScreenPoint) -> Self {
        let left = self.left().min(point.x);
        let top = self.top().min(point.y);
        let right = self.right().max(point.x);
        let bottom = self.bottom().max(point.y);
        Self::new(left, top, right - left, bottom - top)
    }

    /// Bounding rectangle of `points`, or `None` when the iterator is empty.
    pub fn enclosing(points: impl IntoIterator<Item = ScreenPoint>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::at_point(first), Self::expand_to))
    }
}

/// Distance from `value` to the closed band `[start, end]`; zero inside the band.
#[must_use]
pub fn distance_to_band(value: f64, start: f64, end: f64) -> f64 {
    if value < start {
        start - value
    } else if value > end {
        value - end
    } else {
        0.0
    }
}
