use serde::{Deserialize, Serialize};

use crate::core::{Rect, ScreenPoint};
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
}

impl Stroke {
    #[must_use]
    pub const fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Owned handle to an ad hoc shape drawn by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeHandle(u64);

impl ShapeHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Draw command for an ad hoc overlay shape in surface pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapePrimitive {
    Rect {
        rect: Rect,
        corner_radius: f64,
        stroke: Stroke,
    },
    Path {
        points: Vec<ScreenPoint>,
        stroke: Stroke,
    },
    Circle {
        center: ScreenPoint,
        radius: f64,
        stroke: Stroke,
    },
}

impl ShapePrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Rect {
                rect,
                corner_radius,
                stroke,
            } => {
                if !rect.x.is_finite()
                    || !rect.y.is_finite()
                    || !rect.width.is_finite()
                    || !rect.height.is_finite()
                {
                    return Err(ChartError::InvalidData(
                        "rect geometry must be finite".to_owned(),
                    ));
                }
                if !corner_radius.is_finite() || *corner_radius < 0.0 {
                    return Err(ChartError::InvalidData(
                        "rect corner radius must be finite and >= 0".to_owned(),
                    ));
                }
                stroke.validate()
            }
            Self::Path { points, stroke } => {
                if points.len() < 2 {
                    return Err(ChartError::InvalidData(
                        "path needs at least two points".to_owned(),
                    ));
                }
                if points.iter().any(|point| !point.is_finite()) {
                    return Err(ChartError::InvalidData(
                        "path coordinates must be finite".to_owned(),
                    ));
                }
                stroke.validate()
            }
            Self::Circle {
                center,
                radius,
                stroke,
            } => {
                if !center.is_finite() {
                    return Err(ChartError::InvalidData(
                        "circle center must be finite".to_owned(),
                    ));
                }
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(ChartError::InvalidData(
                        "circle radius must be finite and > 0".to_owned(),
                    ));
                }
                stroke.validate()
            }
        }
    }
}
