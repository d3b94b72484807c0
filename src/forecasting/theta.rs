//! Theta forecasting method.
//!
//! The Theta method (Assimakopoulos and Nikolopoulos, 2000) is simple
//! exponential smoothing with a drift of half the slope of a linear trend
//! fitted to the series, in the form given by Hyndman and Billah (2003):
//!
//! `y(h) = level + b/2 * (h - 1 + (1 - (1 - alpha)^n) / alpha)`
//!
//! When the series is seasonal at period `sp` (tested on the autocorrelation
//! at lag `sp`) it is first divided by multiplicative seasonal factors from
//! a classical decomposition, and the forecasts are multiplied back.

use crate::base::{FitState, ForecastContext, Forecaster, ForecasterCapabilities};
use crate::core::{ForecastingHorizon, TimePoint, TimeSeries};
use crate::error::{EstimatorError, Result};
use crate::utils::{
    check_horizon_out_of_sample, check_no_missing_values, golden_section, polyfit,
    GoldenSectionConfig,
};
use tracing::debug;

/// Two-sided 90% standard normal quantile used by the seasonality test.
const SEASONALITY_Z: f64 = 1.644_853_626_951_472_2;

/// Bounds of the smoothing level when it is estimated.
const ALPHA_BOUNDS: (f64, f64) = (0.0001, 0.9999);

#[derive(Debug, Clone)]
struct ThetaFit {
    context: ForecastContext,
    alpha: f64,
    level: f64,
    /// Half the slope of the linear trend.
    drift: f64,
    /// Factor of position `i` (from the training start) is `factors[i % sp]`.
    seasonal_factors: Option<Vec<f64>>,
}

/// Theta forecaster.
#[derive(Debug, Clone)]
pub struct ThetaForecaster {
    sp: usize,
    deseasonalize: bool,
    smoothing_level: Option<f64>,
    initial_level: Option<f64>,
    state: FitState<ThetaFit>,
}

impl Default for ThetaForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl ThetaForecaster {
    /// Non-seasonal Theta with an estimated smoothing level.
    pub fn new() -> Self {
        Self {
            sp: 1,
            deseasonalize: true,
            smoothing_level: None,
            initial_level: None,
            state: FitState::Unfitted,
        }
    }

    /// Seasonal period; `1` disables seasonal adjustment.
    pub fn with_sp(mut self, sp: usize) -> Self {
        self.sp = sp;
        self
    }

    /// Whether to test for and remove seasonality.
    pub fn with_deseasonalize(mut self, deseasonalize: bool) -> Self {
        self.deseasonalize = deseasonalize;
        self
    }

    /// Fixed smoothing level instead of minimising the in-sample squared
    /// one-step errors.
    pub fn with_smoothing_level(mut self, alpha: f64) -> Self {
        self.smoothing_level = Some(alpha);
        self
    }

    /// Level before the first observation; defaults to the first
    /// (deseasonalised) observation.
    pub fn with_initial_level(mut self, level: f64) -> Self {
        self.initial_level = Some(level);
        self
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Smoothing level in use after fit.
    pub fn alpha(&self) -> Option<f64> {
        self.state.as_option().map(|f| f.alpha)
    }

    /// Drift per step: half the slope of the linear trend.
    pub fn drift(&self) -> Option<f64> {
        self.state.as_option().map(|f| f.drift)
    }

    /// Seasonal factors, when the fitted series was found seasonal.
    pub fn seasonal_factors(&self) -> Option<&[f64]> {
        self.state
            .as_option()
            .and_then(|f| f.seasonal_factors.as_deref())
    }

    fn estimate(&self, context: ForecastContext) -> Result<ThetaFit> {
        if self.sp == 0 {
            return Err(EstimatorError::InvalidParameter(
                "sp must be at least 1".to_string(),
            ));
        }
        if let Some(alpha) = self.smoothing_level {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(EstimatorError::InvalidParameter(format!(
                    "smoothing_level must be in (0, 1], got {alpha}"
                )));
            }
        }
        let y = &context.y;
        if y.dimensions() != 1 {
            return Err(EstimatorError::DimensionMismatch {
                expected: 1,
                got: y.dimensions(),
            });
        }
        check_no_missing_values(y)?;
        let values = y.primary_values();
        let n = values.len();
        if n < 2 {
            return Err(EstimatorError::InsufficientData { needed: 2, got: n });
        }

        let seasonal_factors = if self.deseasonalize && self.sp > 1 {
            if n < 2 * self.sp {
                return Err(EstimatorError::InsufficientData {
                    needed: 2 * self.sp,
                    got: n,
                });
            }
            if is_seasonal(values, self.sp) {
                Some(multiplicative_factors(values, self.sp)?)
            } else {
                None
            }
        } else {
            None
        };
        let adjusted: Vec<f64> = match &seasonal_factors {
            Some(factors) => values
                .iter()
                .enumerate()
                .map(|(i, v)| v / factors[i % self.sp])
                .collect(),
            None => values.to_vec(),
        };

        let positions: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let drift = polyfit(&positions, &adjusted, 1, true)?.slope() / 2.0;

        let initial = self.initial_level.unwrap_or(adjusted[0]);
        let alpha = match self.smoothing_level {
            Some(alpha) => alpha,
            None => golden_section(
                |a| ses_sse(&adjusted, a, initial),
                ALPHA_BOUNDS.0,
                ALPHA_BOUNDS.1,
                GoldenSectionConfig::default(),
            ),
        };
        let level = adjusted
            .iter()
            .fold(initial, |level, v| alpha * v + (1.0 - alpha) * level);

        debug!(
            alpha,
            level,
            drift,
            seasonal = seasonal_factors.is_some(),
            "fitted Theta"
        );
        Ok(ThetaFit {
            context,
            alpha,
            level,
            drift,
            seasonal_factors,
        })
    }
}

/// Sum of squared one-step errors of SES started at `initial`.
fn ses_sse(values: &[f64], alpha: f64, initial: f64) -> f64 {
    let mut level = initial;
    let mut sse = 0.0;
    for &v in values {
        let error = v - level;
        sse += error * error;
        level = alpha * v + (1.0 - alpha) * level;
    }
    sse
}

/// Sample autocorrelations at lags `0..=max_lag`.
fn acf(values: &[f64], max_lag: usize) -> Vec<f64> {
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let denom: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (0..=max_lag.min(n.saturating_sub(1)))
        .map(|k| {
            if denom == 0.0 {
                return 0.0;
            }
            values
                .iter()
                .zip(&values[k..])
                .map(|(a, b)| (a - mean) * (b - mean))
                .sum::<f64>()
                / denom
        })
        .collect()
}

/// 90% autocorrelation test at lag `sp` with Bartlett's standard error.
fn is_seasonal(values: &[f64], sp: usize) -> bool {
    let coefs = acf(values, sp);
    let Some(&at_sp) = coefs.get(sp) else {
        return false;
    };
    let variance = 1.0 + coefs[1..sp].iter().map(|c| 2.0 * c * c).sum::<f64>();
    let limit = SEASONALITY_Z / (values.len() as f64).sqrt() * variance.sqrt();
    at_sp.abs() > limit
}

/// Seasonal factors of a classical multiplicative decomposition, normalised
/// to mean one.
fn multiplicative_factors(values: &[f64], sp: usize) -> Result<Vec<f64>> {
    if values.iter().any(|&v| v <= 0.0) {
        return Err(EstimatorError::InvalidParameter(
            "multiplicative seasonal adjustment needs strictly positive values".to_string(),
        ));
    }
    let n = values.len();
    let half = sp / 2;
    let mut sums = vec![0.0; sp];
    let mut counts = vec![0usize; sp];
    for i in half..n - half {
        // Centred moving average; even periods weight both ends by one half.
        let trend = if sp % 2 == 0 {
            (0.5 * values[i - half]
                + 0.5 * values[i + half]
                + values[i - half + 1..i + half].iter().sum::<f64>())
                / sp as f64
        } else {
            values[i - half..=i + half].iter().sum::<f64>() / sp as f64
        };
        sums[i % sp] += values[i] / trend;
        counts[i % sp] += 1;
    }
    let mut factors: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| if c > 0 { s / c as f64 } else { 1.0 })
        .collect();
    let mean = factors.iter().sum::<f64>() / sp as f64;
    factors.iter_mut().for_each(|f| *f /= mean);
    Ok(factors)
}

impl Forecaster for ThetaForecaster {
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

        let n = fitted.context.y.len();
        let alpha = fitted.alpha;
        let smoothing_term = (1.0 - (1.0 - alpha).powi(n as i32)) / alpha;
        let values: Vec<f64> = (1..=fh.max_step())
            .map(|h| {
                let forecast = fitted.level + fitted.drift * (h as f64 - 1.0 + smoothing_term);
                match &fitted.seasonal_factors {
                    Some(factors) => forecast * factors[(n - 1 + h as usize) % factors.len()],
                    None => forecast,
                }
            })
            .collect();
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
        "ThetaForecaster"
    }
}
