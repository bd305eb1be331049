use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    /// An accessor or handler ran before the engine delivered its first render.
    #[error("scene has not been rendered yet: `{operation}` requires a completed render callback")]
    SceneNotRendered { operation: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
