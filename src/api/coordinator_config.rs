use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::interaction::{Millis, WritingDirection};

/// Public coordinator configuration.
///
/// This type is serializable so host applications can persist/load
/// interaction tuning without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Delay before a point/group leave hides hover state.
    #[serde(default = "default_leave_debounce_ms")]
    pub leave_debounce_ms: Millis,
    /// Window after a pinned-tooltip dismissal during which clicks are ignored.
    #[serde(default = "default_dismiss_cooldown_ms")]
    pub dismiss_cooldown_ms: Millis,
    /// Page-Up/Page-Down jump as a share of the distinct positions (floored, at least 1).
    #[serde(default = "default_page_size_ratio")]
    pub page_size_ratio: f64,
    #[serde(default)]
    pub writing_direction: WritingDirection,
    #[serde(default = "default_true")]
    pub keyboard_navigation: bool,
    /// Accessible label announced when focus sits on the chart itself.
    #[serde(default)]
    pub chart_label: Option<String>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            leave_debounce_ms: default_leave_debounce_ms(),
            dismiss_cooldown_ms: default_dismiss_cooldown_ms(),
            page_size_ratio: default_page_size_ratio(),
            writing_direction: WritingDirection::default(),
            keyboard_navigation: true,
            chart_label: None,
        }
    }
}

impl CoordinatorConfig {
    #[must_use]
    pub fn with_writing_direction(mut self, direction: WritingDirection) -> Self {
        self.writing_direction = direction;
        self
    }

    #[must_use]
    pub fn with_page_size_ratio(mut self, ratio: f64) -> Self {
        self.page_size_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_chart_label(mut self, label: impl Into<String>) -> Self {
        self.chart_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_keyboard_navigation(mut self, enabled: bool) -> Self {
        self.keyboard_navigation = enabled;
        self
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))
    }
}

fn default_leave_debounce_ms() -> Millis {
    300
}

fn default_dismiss_cooldown_ms() -> Millis {
    250
}

fn default_page_size_ratio() -> f64 {
    0.05
}

fn default_true() -> bool {
    true
}
