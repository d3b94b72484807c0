//! Accuracy metrics for forecast evaluation.

use crate::error::{EstimatorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named accuracy metric, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Mean Absolute Error
    Mae,
    /// Mean Squared Error
    Mse,
    /// Root Mean Squared Error
    Rmse,
    /// Mean Absolute Percentage Error
    Mape,
    /// Symmetric Mean Absolute Percentage Error
    Smape,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Mae => "mae",
            Metric::Mse => "mse",
            Metric::Rmse => "rmse",
            Metric::Mape => "mape",
            Metric::Smape => "smape",
        }
    }

    /// Evaluate the metric; NaN pairs are skipped.
    pub fn evaluate(&self, actual: &[f64], predicted: &[f64]) -> Result<f64> {
        let (actual, predicted) = paired_observed(actual, predicted)?;
        let value = match self {
            Metric::Mae => mae(&actual, &predicted),
            Metric::Mse => mse(&actual, &predicted),
            Metric::Rmse => rmse(&actual, &predicted),
            Metric::Mape => mape(&actual, &predicted).ok_or_else(|| {
                EstimatorError::ComputationError(
                    "MAPE is undefined when actual values contain zeros".to_string(),
                )
            })?,
            Metric::Smape => smape(&actual, &predicted),
        };
        Ok(value)
    }
}

/// Evaluate several metrics, keyed by metric name.
pub fn compute_metrics(
    metrics: &[Metric],
    actual: &[f64],
    predicted: &[f64],
) -> Result<BTreeMap<String, f64>> {
    metrics
        .iter()
        .map(|m| Ok((m.name().to_string(), m.evaluate(actual, predicted)?)))
        .collect()
}

fn paired_observed(actual: &[f64], predicted: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if actual.len() != predicted.len() {
        return Err(EstimatorError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    let (a, p): (Vec<f64>, Vec<f64>) = actual
        .iter()
        .zip(predicted)
        .filter(|(a, p)| !a.is_nan() && !p.is_nan())
        .map(|(&a, &p)| (a, p))
        .unzip();
    if a.is_empty() {
        return Err(EstimatorError::EmptyData);
    }
    Ok((a, p))
}

/// Calculate MAE between two slices.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Calculate MSE between two slices.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

/// Calculate RMSE between two slices.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Calculate MAPE in percent; `None` if any actual value is zero.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() != predicted.len() || actual.is_empty() || actual.contains(&0.0) {
        return None;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum();
    Some(100.0 * sum / actual.len() as f64)
}

/// Calculate SMAPE in percent.
pub fn smape(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| {
            let denom = a.abs() + p.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        })
        .sum::<f64>()
        * 100.0
        / actual.len() as f64
}
