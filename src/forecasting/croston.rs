//! Croston's method for intermittent demand forecasting.
//!
//! Croston's method separately smooths demand sizes and inter-demand
//! intervals with simple exponential smoothing, then forecasts their ratio
//! as a flat line.

use crate::base::{FitState, ForecastContext, Forecaster, ForecasterCapabilities};
use crate::core::{ForecastingHorizon, TimePoint, TimeSeries};
use crate::error::{EstimatorError, Result};
use crate::utils::check_horizon_out_of_sample;

#[derive(Debug, Clone)]
struct CrostonFit {
    context: ForecastContext,
    demand_level: f64,
    interval_level: f64,
}

/// Croston's method.
#[derive(Debug, Clone)]
pub struct Croston {
    /// Smoothing parameter in (0, 1].
    alpha: f64,
    state: FitState<CrostonFit>,
}

impl Default for Croston {
    fn default() -> Self {
        Self::new()
    }
}

impl Croston {
    /// Create a new Croston model with default alpha (0.1).
    pub fn new() -> Self {
        Self {
            alpha: 0.1,
            state: FitState::Unfitted,
        }
    }

    /// Create Croston model with specified alpha.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Smoothed demand size.
    pub fn demand_level(&self) -> Option<f64> {
        self.state.as_option().map(|f| f.demand_level)
    }

    /// Smoothed inter-demand interval.
    pub fn interval_level(&self) -> Option<f64> {
        self.state.as_option().map(|f| f.interval_level)
    }

    /// Demand sizes and the periods elapsed before each, counting the first
    /// demand from one period before the series starts.
    fn extract_demands(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut demands = Vec::new();
        let mut intervals = Vec::new();
        let mut last_demand_idx: i64 = -1;

        for (i, &v) in values.iter().enumerate() {
            if v != 0.0 && !v.is_nan() {
                demands.push(v);
                intervals.push((i as i64 - last_demand_idx) as f64);
                last_demand_idx = i as i64;
            }
        }

        (demands, intervals)
    }

    /// Fit SES to a sequence and return the final level.
    fn fit_ses(values: &[f64], alpha: f64) -> f64 {
        let mut level = values[0];
        for &v in values.iter().skip(1) {
            level = alpha * v + (1.0 - alpha) * level;
        }
        level
    }

    fn estimate(&self, context: ForecastContext) -> Result<CrostonFit> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(EstimatorError::InvalidParameter(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if context.y.dimensions() != 1 {
            return Err(EstimatorError::DimensionMismatch {
                expected: 1,
                got: context.y.dimensions(),
            });
        }

        let (demands, intervals) = Self::extract_demands(context.y.primary_values());
        if demands.is_empty() {
            return Err(EstimatorError::InsufficientData { needed: 1, got: 0 });
        }

        Ok(CrostonFit {
            demand_level: Self::fit_ses(&demands, self.alpha),
            interval_level: Self::fit_ses(&intervals, self.alpha),
            context,
        })
    }
}

impl Forecaster for Croston {
    fn fit(
        &mut self,
        y: &TimeSeries,
        x: Option<&TimeSeries>,
        fh: Option<&ForecastingHorizon>,
    ) -> Result<()> {
        let fitted = self.estimate(ForecastContext::new(y, x, fh)?)?;
        self.state.set(fitted);
        Ok(())
    }

    fn predict(
        &self,
        fh: Option<&ForecastingHorizon>,
        _x: Option<&TimeSeries>,
    ) -> Result<TimeSeries> {
        let fitted = self.state.get()?;
        let fh = fitted.context.resolve_fh(fh)?;
        check_horizon_out_of_sample(fh, self.name())?;

        // Croston produces flat forecasts
        let forecast_value = fitted.demand_level / fitted.interval_level;
        let values = vec![forecast_value; fh.max_step() as usize];
        fitted.context.select_horizon(fh, &values)
    }

    fn update(&mut self, y: &TimeSeries, x: Option<&TimeSeries>) -> Result<()> {
        let mut context = self.state.get()?.context.clone();
        context.extend(y, x)?;
        let fitted = self.estimate(context)?;
        self.state.set(fitted);
        Ok(())
    }

    fn capabilities(&self) -> ForecasterCapabilities {
        ForecasterCapabilities {
            update: true,
            ..Default::default()
        }
    }

    fn cutoff(&self) -> Option<TimePoint> {
        self.state.as_option().and_then(|f| f.context.y.cutoff())
    }

    fn name(&self) -> &str {
        "Croston"
    }
}
