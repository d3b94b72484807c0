//! Series-to-series transformer interface.

use crate::core::TimeSeries;
use crate::error::{EstimatorError, Result};

/// Common interface for series-to-series transformers.
///
/// Outputs keep the input's time index and shape.
pub trait Transformer {
    /// Fit the transformer to the data.
    fn fit(&mut self, x: &TimeSeries) -> Result<()>;

    /// Transform data with the fitted state.
    fn transform(&self, x: &TimeSeries) -> Result<TimeSeries>;

    /// Fit, then transform the same data.
    fn fit_transform(&mut self, x: &TimeSeries) -> Result<TimeSeries> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Undo the transformation.
    fn inverse_transform(&self, x: &TimeSeries) -> Result<TimeSeries> {
        let _ = x;
        Err(EstimatorError::UnsupportedCapability(format!(
            "{} has no inverse transform",
            self.name()
        )))
    }

    /// Whether `inverse_transform` is implemented.
    fn has_inverse(&self) -> bool {
        false
    }

    fn is_fitted(&self) -> bool;

    fn name(&self) -> &str;
}
