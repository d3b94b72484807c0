//! Polynomial trend forecasting.

use crate::base::{FitState, ForecastContext, Forecaster, ForecasterCapabilities};
use crate::core::{ForecastingHorizon, TimePoint, TimeSeries};
use crate::error::{EstimatorError, Result};
use crate::utils::{check_horizon_out_of_sample, check_no_missing_values, polyfit, Polynomial};

#[derive(Debug, Clone)]
struct TrendFit {
    context: ForecastContext,
    polynomial: Polynomial,
    /// Positions are divided by this before evaluating the polynomial.
    scale: f64,
}

/// Forecasts by extrapolating a least-squares polynomial in time.
///
/// Time is the position of an observation in the training series, so the
/// first observation sits at 0 and step `h` at `n - 1 + h`.
#[derive(Debug, Clone)]
pub struct PolynomialTrendForecaster {
    degree: usize,
    with_intercept: bool,
    state: FitState<TrendFit>,
}

impl Default for PolynomialTrendForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl PolynomialTrendForecaster {
    /// Linear trend with intercept.
    pub fn new() -> Self {
        Self {
            degree: 1,
            with_intercept: true,
            state: FitState::Unfitted,
        }
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    pub fn with_intercept(mut self, with_intercept: bool) -> Self {
        self.with_intercept = with_intercept;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Coefficients in increasing power of the time position.
    pub fn coefficients(&self) -> Option<Vec<f64>> {
        let fit = self.state.as_option()?;
        let first_power = if self.with_intercept { 0 } else { 1 };
        Some(
            fit.polynomial
                .coefficients()
                .iter()
                .enumerate()
                .map(|(i, c)| c / fit.scale.powi((i + first_power) as i32))
                .collect(),
        )
    }

    fn estimate(&self, context: ForecastContext) -> Result<TrendFit> {
        let y = &context.y;
        if y.dimensions() != 1 {
            return Err(EstimatorError::DimensionMismatch {
                expected: 1,
                got: y.dimensions(),
            });
        }
        check_no_missing_values(y)?;
        let n = y.len();
        let scale = n.saturating_sub(1).max(1) as f64;
        let positions: Vec<f64> = (0..n).map(|i| i as f64 / scale).collect();
        let polynomial = polyfit(&positions, y.primary_values(), self.degree, self.with_intercept)?;
        Ok(TrendFit {
            context,
            polynomial,
            scale,
        })
    }
}

impl Forecaster for PolynomialTrendForecaster {
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

        let last = (fitted.context.y.len() - 1) as f64;
        let values: Vec<f64> = (1..=fh.max_step())
            .map(|h| fitted.polynomial.evaluate((last + h as f64) / fitted.scale))
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
        "PolynomialTrendForecaster"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeIndex;
    use approx::assert_relative_eq;

    #[test]
    fn linear_trend_is_extrapolated() {
        let y = TimeSeries::from_values((0..10).map(|t| 4.0 + 1.5 * t as f64).collect());
        let mut model = PolynomialTrendForecaster::new();
        model.fit(&y, None, None).unwrap();

        let coefs = model.coefficients().unwrap();
        assert_relative_eq!(coefs[0], 4.0, epsilon = 1e-9);
        assert_relative_eq!(coefs[1], 1.5, epsilon = 1e-9);

        let fh = ForecastingHorizon::new(vec![1, 5]).unwrap();
        let pred = model.predict(Some(&fh), None).unwrap();
        assert_eq!(pred.index(), &TimeIndex::Integer(vec![10, 14]));
        assert_relative_eq!(pred.primary_values()[0], 19.0, epsilon = 1e-9);
        assert_relative_eq!(pred.primary_values()[1], 25.0, epsilon = 1e-9);
    }

    #[test]
    fn quadratic_trend() {
        let y = TimeSeries::from_values((0..12).map(|t| (t * t) as f64 - 3.0 * t as f64).collect());
        let mut model = PolynomialTrendForecaster::new().with_degree(2);
        let fh = ForecastingHorizon::up_to(2).unwrap();
        model.fit(&y, None, Some(&fh)).unwrap();
        let pred = model.predict(None, None).unwrap();
        assert_relative_eq!(pred.primary_values()[0], 144.0 - 36.0, epsilon = 1e-6);
        assert_relative_eq!(pred.primary_values()[1], 169.0 - 39.0, epsilon = 1e-6);
    }

    #[test]
    fn trend_without_intercept_passes_through_origin() {
        let y = TimeSeries::from_values(vec![0.0, 2.0, 4.0, 6.0]);
        let mut model = PolynomialTrendForecaster::new().with_intercept(false);
        model.fit(&y, None, None).unwrap();
        assert_eq!(model.coefficients().unwrap().len(), 1);
        let fh = ForecastingHorizon::up_to(1).unwrap();
        assert_relative_eq!(
            model.predict(Some(&fh), None).unwrap().primary_values()[0],
            8.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn update_extends_the_fit() {
        let mut model = PolynomialTrendForecaster::new();
        model
            .fit(&TimeSeries::from_values(vec![1.0, 2.0, 3.0]), None, None)
            .unwrap();
        let new = TimeSeries::new(TimeIndex::range_from(3, 2), vec![vec![4.0, 5.0]]).unwrap();
        model.update(&new, None).unwrap();
        assert_eq!(model.cutoff(), Some(TimePoint::Integer(4)));
        let fh = ForecastingHorizon::up_to(1).unwrap();
        assert_relative_eq!(
            model.predict(Some(&fh), None).unwrap().primary_values()[0],
            6.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn too_short_for_degree_fails() {
        let y = TimeSeries::from_values(vec![1.0, 2.0]);
        assert!(matches!(
            PolynomialTrendForecaster::new().with_degree(2).fit(&y, None, None),
            Err(EstimatorError::InsufficientData { needed: 3, got: 2 })
        ));
    }
}
