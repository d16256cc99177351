use thiserror::Error;

/// Reasons a prediction request is refused before any computation runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("Invalid {outcome} coefficient: {value} (must be a finite number > 0)")]
    InvalidCoefficient { outcome: &'static str, value: f64 },

    #[error("Missing match context: {0}")]
    MissingMatchContext(&'static str),
}
