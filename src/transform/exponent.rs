//! Exponent (power) transformation.
//!
//! Raises a series to a user-provided power after shifting it by an offset.
//! With the automatic offset, columns containing negative values are shifted
//! by the magnitude of their most negative value, so fractional powers stay
//! in the real domain.
//!
//! For an input `Z` the transform is `(Z + offset)^power` and the inverse is
//! `Z^(1/power) - offset`.

use crate::base::{FitState, Transformer};
use crate::core::TimeSeries;
use crate::error::{EstimatorError, Result};
use tracing::debug;

/// Offset added before exponentiation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Offset {
    /// `|min|` per column when the column has negative values, else 0.
    #[default]
    Auto,
    /// Fixed offset applied to every column.
    Value(f64),
}

impl From<f64> for Offset {
    fn from(value: f64) -> Self {
        Offset::Value(value)
    }
}

/// Raise a series to `power` after adding an offset.
#[derive(Debug, Clone)]
pub struct ExponentTransformer {
    power: f64,
    offset: Offset,
    /// Per-column offsets resolved in fit.
    state: FitState<Vec<f64>>,
}

impl Default for ExponentTransformer {
    fn default() -> Self {
        Self::new(0.5, Offset::Auto)
    }
}

impl ExponentTransformer {
    pub fn new(power: f64, offset: impl Into<Offset>) -> Self {
        Self {
            power,
            offset: offset.into(),
            state: FitState::Unfitted,
        }
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    /// User supplied offset setting.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Offsets resolved in fit, one per column.
    pub fn fitted_offsets(&self) -> Option<&[f64]> {
        self.state.as_option().map(|v| v.as_slice())
    }

    fn resolve_offsets(&self, x: &TimeSeries) -> Result<Vec<f64>> {
        match self.offset {
            Offset::Auto => Ok(x
                .column_min()
                .into_iter()
                .map(|min| match min {
                    Some(m) if m < 0.0 => m.abs(),
                    _ => 0.0,
                })
                .collect()),
            Offset::Value(v) if v.is_finite() => Ok(vec![v; x.dimensions()]),
            Offset::Value(v) => Err(EstimatorError::InvalidParameter(format!(
                "expected `offset` to be a finite number, but found {v}"
            ))),
        }
    }

    fn check_columns(&self, x: &TimeSeries) -> Result<&[f64]> {
        let offsets = self.state.get()?;
        if offsets.len() != x.dimensions() {
            return Err(EstimatorError::DimensionMismatch {
                expected: offsets.len(),
                got: x.dimensions(),
            });
        }
        Ok(offsets)
    }
}

impl Transformer for ExponentTransformer {
    fn fit(&mut self, x: &TimeSeries) -> Result<()> {
        if !self.power.is_finite() {
            return Err(EstimatorError::InvalidParameter(format!(
                "expected `power` to be a finite real number, but found {}",
                self.power
            )));
        }
        if x.is_empty() || x.dimensions() == 0 {
            return Err(EstimatorError::EmptyData);
        }

        let offsets = self.resolve_offsets(x)?;
        debug!(power = self.power, ?offsets, "fitted exponent transformer");
        self.state.set(offsets);
        Ok(())
    }

    fn transform(&self, x: &TimeSeries) -> Result<TimeSeries> {
        let offsets = self.check_columns(x)?;
        let power = self.power;
        Ok(x.map_values(|c, v| (v + offsets[c]).powf(power)))
    }

    fn inverse_transform(&self, x: &TimeSeries) -> Result<TimeSeries> {
        let offsets = self.check_columns(x)?;
        if self.power == 0.0 {
            return Err(EstimatorError::InvalidParameter(
                "inverse transform is undefined for `power` = 0".to_string(),
            ));
        }
        let inv = 1.0 / self.power;
        Ok(x.map_values(|c, v| v.powf(inv) - offsets[c]))
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn is_fitted(&self) -> bool {
        self.state.is_fitted()
    }

    fn name(&self) -> &str {
        "ExponentTransformer"
    }
}

/// Square root transformation: [`ExponentTransformer`] with `power = 0.5`.
#[derive(Debug, Clone, Default)]
pub struct SqrtTransformer {
    inner: ExponentTransformer,
}

impl SqrtTransformer {
    pub fn new(offset: impl Into<Offset>) -> Self {
        Self {
            inner: ExponentTransformer::new(0.5, offset),
        }
    }

    pub fn offset(&self) -> Offset {
        self.inner.offset()
    }

    pub fn fitted_offsets(&self) -> Option<&[f64]> {
        self.inner.fitted_offsets()
    }
}

impl Transformer for SqrtTransformer {
    fn fit(&mut self, x: &TimeSeries) -> Result<()> {
        self.inner.fit(x)
    }

    fn transform(&self, x: &TimeSeries) -> Result<TimeSeries> {
        self.inner.transform(x)
    }

    fn inverse_transform(&self, x: &TimeSeries) -> Result<TimeSeries> {
        self.inner.inverse_transform(x)
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn is_fitted(&self) -> bool {
        self.inner.is_fitted()
    }

    fn name(&self) -> &str {
        "SqrtTransformer"
    }
}
