//! Box-Cox power transformation.
//!
//! Transforms strictly positive data to be more normally distributed.

use crate::base::{FitState, Transformer};
use crate::core::TimeSeries;
use crate::error::{EstimatorError, Result};
use tracing::debug;

/// Apply Box-Cox transformation with a given lambda.
///
/// For lambda != 0: y = (x^lambda - 1) / lambda
/// For lambda == 0: y = ln(x)
///
/// Non-positive values map to NaN.
pub fn boxcox(series: &[f64], lambda: f64) -> Vec<f64> {
    series
        .iter()
        .map(|&x| {
            if x <= 0.0 {
                f64::NAN
            } else if lambda.abs() < 1e-10 {
                x.ln()
            } else {
                (x.powf(lambda) - 1.0) / lambda
            }
        })
        .collect()
}

/// Inverse Box-Cox transformation.
///
/// For lambda != 0: x = (lambda * y + 1)^(1/lambda)
/// For lambda == 0: x = exp(y)
pub fn inv_boxcox(transformed: &[f64], lambda: f64) -> Vec<f64> {
    transformed
        .iter()
        .map(|&y| {
            if lambda.abs() < 1e-10 {
                y.exp()
            } else {
                let val = lambda * y + 1.0;
                if val <= 0.0 {
                    f64::NAN
                } else {
                    val.powf(1.0 / lambda)
                }
            }
        })
        .collect()
}

/// Find the Box-Cox lambda in [-2, 2] maximising the profile log-likelihood.
///
/// Coarse grid search at 0.01 followed by a finer pass around the best value.
pub fn boxcox_lambda(series: &[f64]) -> f64 {
    let positive: Vec<f64> = series.iter().copied().filter(|&x| x > 0.0).collect();

    if positive.is_empty() {
        return 1.0;
    }

    let mut best_lambda = 1.0;
    let mut best_llf = f64::NEG_INFINITY;

    for i in -200..=200 {
        let lambda = i as f64 / 100.0;
        let llf = boxcox_llf(&positive, lambda);

        if llf > best_llf {
            best_llf = llf;
            best_lambda = lambda;
        }
    }

    let start = (best_lambda - 0.1).max(-2.0);
    let end = (best_lambda + 0.1).min(2.0);

    for i in 0..=100 {
        let lambda = start + (end - start) * i as f64 / 100.0;
        let llf = boxcox_llf(&positive, lambda);

        if llf > best_llf {
            best_llf = llf;
            best_lambda = lambda;
        }
    }

    best_lambda
}

/// Log-likelihood of the transformed data under normality, constants dropped.
fn boxcox_llf(series: &[f64], lambda: f64) -> f64 {
    let n = series.len();
    if n < 2 {
        return f64::NEG_INFINITY;
    }

    let transformed = boxcox(series, lambda);
    if transformed.iter().any(|x| x.is_nan()) {
        return f64::NEG_INFINITY;
    }

    let mean = transformed.iter().sum::<f64>() / n as f64;
    let variance = transformed.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    if variance <= 0.0 {
        return f64::NEG_INFINITY;
    }

    let log_sum: f64 = series.iter().map(|x| x.ln()).sum();
    -0.5 * n as f64 * variance.ln() + (lambda - 1.0) * log_sum
}

/// Check if data is suitable for Box-Cox transformation (all positive).
pub fn is_boxcox_suitable(series: &[f64]) -> bool {
    !series.is_empty() && series.iter().all(|&x| x > 0.0)
}

/// Box-Cox transformer with a fixed or estimated lambda per column.
#[derive(Debug, Clone, Default)]
pub struct BoxCoxTransformer {
    /// Fixed lambda; `None` estimates one per column in fit.
    lambda: Option<f64>,
    state: FitState<Vec<f64>>,
}

impl BoxCoxTransformer {
    /// Estimate lambda by maximum likelihood.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed lambda.
    pub fn with_lambda(lambda: f64) -> Self {
        Self {
            lambda: Some(lambda),
            state: FitState::Unfitted,
        }
    }

    /// Lambdas resolved in fit, one per column.
    pub fn fitted_lambdas(&self) -> Option<&[f64]> {
        self.state.as_option().map(|v| v.as_slice())
    }

    fn lambdas_for(&self, x: &TimeSeries) -> Result<&[f64]> {
        let lambdas = self.state.get()?;
        if lambdas.len() != x.dimensions() {
            return Err(EstimatorError::DimensionMismatch {
                expected: lambdas.len(),
                got: x.dimensions(),
            });
        }
        Ok(lambdas)
    }
}

impl Transformer for BoxCoxTransformer {
    fn fit(&mut self, x: &TimeSeries) -> Result<()> {
        if x.is_empty() || x.dimensions() == 0 {
            return Err(EstimatorError::EmptyData);
        }
        if let Some(lambda) = self.lambda {
            if !lambda.is_finite() {
                return Err(EstimatorError::InvalidParameter(format!(
                    "expected `lambda` to be finite, but found {lambda}"
                )));
            }
        }
        let mut lambdas = Vec::with_capacity(x.dimensions());
        for column in x.columns() {
            if !is_boxcox_suitable(column) {
                return Err(EstimatorError::InvalidParameter(
                    "Box-Cox transformation requires strictly positive data".to_string(),
                ));
            }
            lambdas.push(self.lambda.unwrap_or_else(|| boxcox_lambda(column)));
        }
        debug!(?lambdas, "fitted Box-Cox transformer");
        self.state.set(lambdas);
        Ok(())
    }

    fn transform(&self, x: &TimeSeries) -> Result<TimeSeries> {
        let lambdas = self.lambdas_for(x)?;
        let values = x
            .columns()
            .iter()
            .zip(lambdas)
            .map(|(col, &l)| boxcox(col, l))
            .collect();
        x.with_values(values)
    }

    fn inverse_transform(&self, x: &TimeSeries) -> Result<TimeSeries> {
        let lambdas = self.lambdas_for(x)?;
        let values = x
            .columns()
            .iter()
            .zip(lambdas)
            .map(|(col, &l)| inv_boxcox(col, l))
            .collect();
        x.with_values(values)
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn is_fitted(&self) -> bool {
        self.state.is_fitted()
    }

    fn name(&self) -> &str {
        "BoxCoxTransformer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn boxcox_lambda_1() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = boxcox(&series, 1.0);

        for (i, &x) in series.iter().enumerate() {
            assert_relative_eq!(result[i], x - 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn boxcox_lambda_0() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = boxcox(&series, 0.0);

        for (i, &x) in series.iter().enumerate() {
            assert_relative_eq!(result[i], x.ln(), epsilon = 1e-10);
        }
    }

    #[test]
    fn boxcox_negative_values() {
        let result = boxcox(&[-1.0, 0.0, 1.0], 1.0);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(!result[2].is_nan());
    }

    #[test]
    fn boxcox_lambda_exponential_data() {
        // Exponential growth wants a log transform.
        let series: Vec<f64> = (1..=10).map(|i| (i as f64).exp()).collect();
        let lambda = boxcox_lambda(&series);
        assert!(lambda.abs() < 0.5, "expected lambda near 0, got {lambda}");
    }

    #[test]
    fn transformer_round_trip_with_estimated_lambda() {
        let x = TimeSeries::from_values(vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0]);
        let mut t = BoxCoxTransformer::new();
        let fitted = t.fit_transform(&x).unwrap();
        let back = t.inverse_transform(&fitted).unwrap();
        for (a, b) in x.primary_values().iter().zip(back.primary_values()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
        let lambda = t.fitted_lambdas().unwrap()[0];
        assert!((-2.0..=2.0).contains(&lambda));
    }

    #[test]
    fn transformer_with_fixed_lambda() {
        let x = TimeSeries::from_values(vec![1.0, 2.0, 3.0]);
        let mut t = BoxCoxTransformer::with_lambda(2.0);
        let out = t.fit_transform(&x).unwrap();
        assert_eq!(out.primary_values(), &[0.0, 1.5, 4.0]);
    }

    #[test]
    fn transformer_rejects_non_positive_data() {
        let x = TimeSeries::from_values(vec![0.0, 1.0]);
        assert!(matches!(
            BoxCoxTransformer::new().fit(&x),
            Err(EstimatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn is_suitable_checks() {
        assert!(is_boxcox_suitable(&[1.0, 2.0, 3.0]));
        assert!(!is_boxcox_suitable(&[0.0, 1.0]));
        assert!(!is_boxcox_suitable(&[]));
    }
}
