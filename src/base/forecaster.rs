//! Forecaster trait defining the common interface for all forecasting models.

use crate::core::{ForecastingHorizon, TimePoint, TimeSeries};
use crate::error::{EstimatorError, Result};
use crate::utils::validation::check_equal_time_index;

/// What a forecaster supports beyond plain out-of-sample point forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForecasterCapabilities {
    /// Predictions at or before the cutoff.
    pub insample: bool,
    /// Uses exogenous data `X`.
    pub exogenous: bool,
    /// Needs the horizon already in `fit`.
    pub requires_fh_in_fit: bool,
    /// Supports incremental `update`.
    pub update: bool,
}

/// Common interface for all forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the target series `y` with optional exogenous `x`.
    fn fit(
        &mut self,
        y: &TimeSeries,
        x: Option<&TimeSeries>,
        fh: Option<&ForecastingHorizon>,
    ) -> Result<()>;

    /// Forecast at `fh`, or at the horizon passed to `fit`.
    ///
    /// The result is indexed at the absolute horizon points.
    fn predict(
        &self,
        fh: Option<&ForecastingHorizon>,
        x: Option<&TimeSeries>,
    ) -> Result<TimeSeries>;

    /// Feed new observations that continue the fitted series.
    fn update(&mut self, y: &TimeSeries, x: Option<&TimeSeries>) -> Result<()> {
        let _ = (y, x);
        Err(EstimatorError::UnsupportedCapability(format!(
            "{} does not support update",
            self.name()
        )))
    }

    fn capabilities(&self) -> ForecasterCapabilities {
        ForecasterCapabilities::default()
    }

    /// Last index point seen in fit or update.
    fn cutoff(&self) -> Option<TimePoint>;

    fn name(&self) -> &str;

    fn is_fitted(&self) -> bool {
        self.cutoff().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
pub type BoxedForecaster = Box<dyn Forecaster>;

/// Training data and horizon remembered by a fitted forecaster.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastContext {
    pub y: TimeSeries,
    pub x: Option<TimeSeries>,
    pub fh: Option<ForecastingHorizon>,
}

impl ForecastContext {
    /// Validate inputs shared by all forecasters and capture them.
    pub fn new(
        y: &TimeSeries,
        x: Option<&TimeSeries>,
        fh: Option<&ForecastingHorizon>,
    ) -> Result<Self> {
        if y.is_empty() {
            return Err(EstimatorError::EmptyData);
        }
        if let Some(x) = x {
            check_equal_time_index(&[y, x])?;
        }
        Ok(Self {
            y: y.clone(),
            x: x.cloned(),
            fh: fh.cloned(),
        })
    }

    pub fn cutoff(&self) -> Result<TimePoint> {
        self.y.cutoff().ok_or(EstimatorError::EmptyData)
    }

    /// The horizon to predict: the argument, else the one from fit.
    pub fn resolve_fh<'a>(
        &'a self,
        fh: Option<&'a ForecastingHorizon>,
    ) -> Result<&'a ForecastingHorizon> {
        fh.or(self.fh.as_ref()).ok_or(EstimatorError::HorizonRequired)
    }

    /// Append new observations to the remembered data.
    pub fn extend(&mut self, y: &TimeSeries, x: Option<&TimeSeries>) -> Result<()> {
        let new_y = self.y.append(y)?;
        let new_x = match (&self.x, x) {
            (Some(old), Some(new)) => Some(old.append(new)?),
            (None, None) => None,
            _ => {
                return Err(EstimatorError::InvalidParameter(
                    "exogenous data must be passed consistently in fit and update".to_string(),
                ))
            }
        };
        self.y = new_y;
        self.x = new_x;
        Ok(())
    }

    /// Index `values` (steps `1..=values.len()` after the cutoff) and select
    /// the steps of `fh`.
    pub fn select_horizon(&self, fh: &ForecastingHorizon, values: &[f64]) -> Result<TimeSeries> {
        let cutoff = self.cutoff()?;
        let mut selected = Vec::with_capacity(fh.len());
        for &step in fh.steps() {
            let value = usize::try_from(step - 1)
                .ok()
                .and_then(|i| values.get(i))
                .ok_or(EstimatorError::IndexOutOfBounds {
                    index: step.max(0) as usize,
                    size: values.len(),
                })?;
            selected.push(*value);
        }
        let index = fh.to_index(&cutoff, self.y.effective_frequency())?;
        let mut out = TimeSeries::new(index, vec![selected])?;
        if let Some(name) = self.y.name() {
            out.set_name(name);
        }
        if let Some(freq) = self.y.frequency() {
            out.set_frequency(freq);
        }
        Ok(out)
    }
}
