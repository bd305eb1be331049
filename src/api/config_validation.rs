use crate::error::{ChartError, ChartResult};

use super::CoordinatorConfig;

pub(super) fn validate_coordinator_config(config: &CoordinatorConfig) -> ChartResult<()> {
    if !config.page_size_ratio.is_finite()
        || config.page_size_ratio <= 0.0
        || config.page_size_ratio > 1.0
    {
        return Err(ChartError::InvalidConfig(
            "page_size_ratio must be finite and in (0, 1]".to_owned(),
        ));
    }
    if config
        .chart_label
        .as_deref()
        .is_some_and(|label| label.trim().is_empty())
    {
        return Err(ChartError::InvalidConfig(
            "chart_label must not be blank when provided".to_owned(),
        ));
    }
    Ok(())
}
