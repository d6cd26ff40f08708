//! Error types for HabitLens

use thiserror::Error;

/// Errors that can occur during analytics computation
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Failed to parse payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Feature shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Invalid usage session: {0}")]
    InvalidSession(String),

    #[error("Model inference error: {0}")]
    InferenceError(String),

    #[error("Model training error: {0}")]
    TrainingError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
