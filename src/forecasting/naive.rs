//! Naive forecasting strategies.
//!
//! `Last` repeats the last observed value, `Mean` the mean of the training
//! data and `Drift` extrapolates the line through the first and last
//! observations.

use crate::base::{FitState, ForecastContext, Forecaster, ForecasterCapabilities};
use crate::core::{ForecastingHorizon, TimePoint, TimeSeries};
use crate::error::{EstimatorError, Result};
use crate::utils::check_horizon_out_of_sample;

/// Strategy used by [`NaiveForecaster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NaiveStrategy {
    #[default]
    Last,
    Mean,
    Drift,
}

#[derive(Debug, Clone)]
struct NaiveFit {
    context: ForecastContext,
    level: f64,
    slope: f64,
}

/// Naive forecaster.
#[derive(Debug, Clone, Default)]
pub struct NaiveForecaster {
    strategy: NaiveStrategy,
    state: FitState<NaiveFit>,
}

impl NaiveForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: NaiveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> NaiveStrategy {
        self.strategy
    }

    fn estimate(&self, context: ForecastContext) -> Result<NaiveFit> {
        let y = &context.y;
        if y.dimensions() != 1 {
            return Err(EstimatorError::DimensionMismatch {
                expected: 1,
                got: y.dimensions(),
            });
        }
        let observed: Vec<f64> = y
            .primary_values()
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();
        let last = *observed.last().ok_or(EstimatorError::MissingValues)?;

        let (level, slope) = match self.strategy {
            NaiveStrategy::Last => (last, 0.0),
            NaiveStrategy::Mean => (observed.iter().sum::<f64>() / observed.len() as f64, 0.0),
            NaiveStrategy::Drift => {
                let slope = if observed.len() > 1 {
                    (last - observed[0]) / (observed.len() - 1) as f64
                } else {
                    0.0
                };
                (last, slope)
            }
        };

        Ok(NaiveFit {
            context,
            level,
            slope,
        })
    }
}

impl Forecaster for NaiveForecaster {
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

        let values: Vec<f64> = (1..=fh.max_step())
            .map(|h| fitted.level + fitted.slope * h as f64)
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
        "NaiveForecaster"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeIndex;
    use approx::assert_relative_eq;

    fn series() -> TimeSeries {
        TimeSeries::from_values(vec![1.0, 2.0, 3.0, 4.0, 5.0])
    }

    #[test]
    fn naive_repeats_last_value() {
        let mut model = NaiveForecaster::new();
        model.fit(&series(), None, None).unwrap();

        let fh = ForecastingHorizon::up_to(3).unwrap();
        let forecast = model.predict(Some(&fh), None).unwrap();
        assert_eq!(forecast.primary_values(), &[5.0, 5.0, 5.0]);
        assert_eq!(forecast.index(), &TimeIndex::Integer(vec![5, 6, 7]));
    }

    #[test]
    fn mean_strategy() {
        let mut model = NaiveForecaster::new().with_strategy(NaiveStrategy::Mean);
        model.fit(&series(), None, None).unwrap();
        let fh = ForecastingHorizon::new(vec![2]).unwrap();
        let forecast = model.predict(Some(&fh), None).unwrap();
        assert_relative_eq!(forecast.primary_values()[0], 3.0);
    }

    #[test]
    fn drift_strategy_extrapolates() {
        let y = TimeSeries::from_values(vec![2.0, 4.0, 6.0]);
        let mut model = NaiveForecaster::new().with_strategy(NaiveStrategy::Drift);
        let fh = ForecastingHorizon::new(vec![1, 3]).unwrap();
        model.fit(&y, None, Some(&fh)).unwrap();
        let forecast = model.predict(None, None).unwrap();
        assert_eq!(forecast.primary_values(), &[8.0, 12.0]);
    }

    #[test]
    fn last_skips_trailing_missing_values() {
        let y = TimeSeries::from_values(vec![1.0, 7.0, f64::NAN]);
        let mut model = NaiveForecaster::new();
        model.fit(&y, None, None).unwrap();
        let fh = ForecastingHorizon::up_to(1).unwrap();
        assert_eq!(model.predict(Some(&fh), None).unwrap().primary_values(), &[7.0]);
    }

    #[test]
    fn update_moves_cutoff() {
        let mut model = NaiveForecaster::new();
        model.fit(&series(), None, None).unwrap();
        let new = TimeSeries::new(TimeIndex::range_from(5, 1), vec![vec![9.0]]).unwrap();
        model.update(&new, None).unwrap();

        assert_eq!(model.cutoff(), Some(TimePoint::Integer(5)));
        let fh = ForecastingHorizon::up_to(1).unwrap();
        let forecast = model.predict(Some(&fh), None).unwrap();
        assert_eq!(forecast.primary_values(), &[9.0]);
        assert_eq!(forecast.index(), &TimeIndex::Integer(vec![6]));
    }

    #[test]
    fn predict_requires_fit_and_horizon() {
        let model = NaiveForecaster::new();
        assert!(!model.is_fitted());
        assert_eq!(model.predict(None, None), Err(EstimatorError::NotFitted));

        let mut model = NaiveForecaster::new();
        model.fit(&series(), None, None).unwrap();
        assert_eq!(model.predict(None, None), Err(EstimatorError::HorizonRequired));
    }

    #[test]
    fn in_sample_horizon_is_rejected() {
        let mut model = NaiveForecaster::new();
        model.fit(&series(), None, None).unwrap();
        let fh = ForecastingHorizon::new(vec![0, 1]).unwrap();
        assert!(matches!(
            model.predict(Some(&fh), None),
            Err(EstimatorError::UnsupportedCapability(_))
        ));
    }

    #[test]
    fn empty_series_fails() {
        let mut model = NaiveForecaster::new();
        assert_eq!(
            model.fit(&TimeSeries::from_values(vec![]), None, None),
            Err(EstimatorError::EmptyData)
        );
    }
}
