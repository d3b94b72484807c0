//! Error types for the ts-estimators library.

use thiserror::Error;

/// Result type alias for estimator operations.
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Errors that can occur while fitting or applying an estimator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Two series that must share a time index do not.
    #[error("time index mismatch: {0}")]
    IndexMismatch(String),

    /// Estimator has not been fitted yet.
    #[error("estimator must be fitted before use")]
    NotFitted,

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Frequency inference failed.
    #[error("could not infer frequency: {0}")]
    FrequencyInference(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Fit strategy name not recognised.
    #[error("unknown fit strategy: {0:?} (expected \"minimal\" or \"full\")")]
    UnknownFitStrategy(String),

    /// The estimator does not support the requested operation.
    #[error("unsupported capability: {0}")]
    UnsupportedCapability(String),

    /// No forecasting horizon passed to either fit or predict.
    #[error("forecasting horizon must be passed to fit or predict")]
    HorizonRequired,

    /// A compositor has no forecaster registered for the detected category.
    #[error("no forecaster provided for series of category {0:?}")]
    NoForecasterForCategory(String),

    /// Configuration could not be parsed or merged.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error reported by an external model, hub or trainer.
    #[error("model error: {0}")]
    Model(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl From<serde_json::Error> for EstimatorError {
    fn from(err: serde_json::Error) -> Self {
        EstimatorError::Config(err.to_string())
    }
}
