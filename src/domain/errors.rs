use thiserror::Error;

/// Errors raised while validating a user profile or deriving features from it
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("income must be positive for feature derivation, got {income}")]
    NonPositiveIncome { income: f64 },

    #[error("invalid risk profile '{value}' (expected low, medium or high)")]
    InvalidRiskProfile { value: String },
}

/// Errors raised by the trained-artifact adapters during a prediction cycle
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact unavailable: {reason}")]
    ArtifactUnavailable { reason: String },

    #[error("feature columns do not match the trained artifact: {detail}")]
    SchemaMismatch { detail: String },

    #[error("model evaluation failed: {reason}")]
    Evaluation { reason: String },

    #[error("model produced an unknown action label: {label}")]
    UnknownAction { label: String },
}

/// Any failure inside one prediction cycle. Never escapes the orchestrator;
/// it is converted into the fail-open fallback result instead.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
