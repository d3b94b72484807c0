//! Natural log transformation.

use crate::base::{FitState, Transformer};
use crate::core::TimeSeries;
use crate::error::{EstimatorError, Result};

/// `ln(x + offset)` with inverse `exp(x) - offset`.
#[derive(Debug, Clone)]
pub struct LogTransformer {
    offset: f64,
    /// Column count seen in fit.
    state: FitState<usize>,
}

impl Default for LogTransformer {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl LogTransformer {
    pub fn new(offset: f64) -> Self {
        Self {
            offset,
            state: FitState::Unfitted,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    fn check_columns(&self, x: &TimeSeries) -> Result<()> {
        let columns = *self.state.get()?;
        if columns != x.dimensions() {
            return Err(EstimatorError::DimensionMismatch {
                expected: columns,
                got: x.dimensions(),
            });
        }
        Ok(())
    }
}

impl Transformer for LogTransformer {
    fn fit(&mut self, x: &TimeSeries) -> Result<()> {
        if !self.offset.is_finite() {
            return Err(EstimatorError::InvalidParameter(format!(
                "expected `offset` to be finite, but found {}",
                self.offset
            )));
        }
        if x.is_empty() || x.dimensions() == 0 {
            return Err(EstimatorError::EmptyData);
        }
        self.state.set(x.dimensions());
        Ok(())
    }

    fn transform(&self, x: &TimeSeries) -> Result<TimeSeries> {
        self.check_columns(x)?;
        let offset = self.offset;
        Ok(x.map_values(|_, v| (v + offset).ln()))
    }

    fn inverse_transform(&self, x: &TimeSeries) -> Result<TimeSeries> {
        self.check_columns(x)?;
        let offset = self.offset;
        Ok(x.map_values(|_, v| v.exp() - offset))
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn is_fitted(&self) -> bool {
        self.state.is_fitted()
    }

    fn name(&self) -> &str {
        "LogTransformer"
    }
}
