use serde::{Deserialize, Serialize};

/// Rendering kind of a series as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Line,
    Spline,
    Area,
    AreaSpline,
    Column,
    Scatter,
    Pie,
    Donut,
    ErrorRange,
    XThreshold,
    YThreshold,
}

impl SeriesKind {
    /// Kinds that expose exactly one point per position (radial charts).
    #[must_use]
    pub const fn is_single_value_per_position(self) -> bool {
        matches!(self, Self::Pie | Self::Donut)
    }

    #[must_use]
    pub const fn is_column(self) -> bool {
        matches!(self, Self::Column)
    }

    #[must_use]
    pub const fn is_threshold(self) -> bool {
        matches!(self, Self::XThreshold | Self::YThreshold)
    }

    /// Kinds whose points take part in groups and keyboard navigation.
    #[must_use]
    pub const fn is_navigable(self) -> bool {
        !matches!(self, Self::ErrorRange | Self::XThreshold | Self::YThreshold)
    }
}

/// Two-tone emphasis applied to series, points and reference lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EmphasisState {
    #[default]
    Normal,
    Inactive,
}

/// Low/high pair carried by error-range points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low: low.min(high),
            high: low.max(high),
        }
    }
}

/// Stable identity of a point across renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointKey {
    pub series: String,
    pub point: String,
}

impl PointKey {
    #[must_use]
    pub fn new(series: impl Into<String>, point: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            point: point.into(),
        }
    }
}

/// Key for a series: explicit id, falling back to the display name.
#[must_use]
pub fn series_key(id: Option<&str>, name: &str) -> String {
    id.unwrap_or(name).to_owned()
}

/// Key for a point: explicit id, then name, then a `x:y` placeholder.
#[must_use]
pub fn point_key(id: Option<&str>, name: Option<&str>, x: f64, y: Option<f64>) -> String {
    match (id, name) {
        (Some(id), _) => id.to_owned(),
        (None, Some(name)) => name.to_owned(),
        (None, None) => match y {
            Some(y) => format!("{x}:{y}"),
            None => format!("{x}:null"),
        },
    }
}
