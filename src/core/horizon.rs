//! Forecasting horizon: the steps ahead of the cutoff to predict.

use super::index::{TimeIndex, TimePoint};
use crate::error::{EstimatorError, Result};
use chrono::Duration;

/// Largest absolute step a horizon may hold. Forecasters materialise every
/// step up to the furthest one.
pub const MAX_HORIZON_STEP: i64 = 1_000_000;

/// Relative forecasting horizon.
///
/// Steps are counted from the cutoff (the last point seen in fit); step 1 is
/// the first out-of-sample period, step 0 the cutoff itself and negative
/// steps lie in the training window. Steps are kept sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastingHorizon {
    steps: Vec<i64>,
}

impl ForecastingHorizon {
    /// Create a horizon from relative steps.
    pub fn new(steps: impl IntoIterator<Item = i64>) -> Result<Self> {
        let mut steps: Vec<i64> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(EstimatorError::InvalidParameter(
                "forecasting horizon must not be empty".to_string(),
            ));
        }
        if let Some(&step) = steps.iter().find(|s| s.unsigned_abs() > MAX_HORIZON_STEP as u64) {
            return Err(EstimatorError::InvalidParameter(format!(
                "horizon step {step} exceeds the limit of {MAX_HORIZON_STEP}"
            )));
        }
        steps.sort_unstable();
        steps.dedup();
        Ok(Self { steps })
    }

    /// Horizon `1..=n`.
    pub fn up_to(n: usize) -> Result<Self> {
        let n = i64::try_from(n)
            .ok()
            .filter(|&n| n <= MAX_HORIZON_STEP)
            .ok_or_else(|| {
                EstimatorError::InvalidParameter(format!(
                    "horizon of {n} steps exceeds the limit of {MAX_HORIZON_STEP}"
                ))
            })?;
        Self::new(1..=n)
    }

    /// Build a relative horizon from absolute points, given the cutoff.
    pub fn from_absolute(
        points: &[TimePoint],
        cutoff: &TimePoint,
        frequency: Option<Duration>,
    ) -> Result<Self> {
        let steps = points
            .iter()
            .map(|p| relative_step(p, cutoff, frequency))
            .collect::<Result<Vec<_>>>()?;
        Self::new(steps)
    }

    pub fn steps(&self) -> &[i64] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Largest step ahead.
    pub fn max_step(&self) -> i64 {
        self.steps.last().copied().unwrap_or(0)
    }

    /// Smallest step ahead.
    pub fn min_step(&self) -> i64 {
        self.steps.first().copied().unwrap_or(0)
    }

    /// True when every step lies strictly after the cutoff.
    pub fn is_out_of_sample(&self) -> bool {
        self.min_step() > 0
    }

    /// Absolute index points of this horizon.
    pub fn to_absolute(
        &self,
        cutoff: &TimePoint,
        frequency: Option<Duration>,
    ) -> Result<Vec<TimePoint>> {
        self.steps
            .iter()
            .map(|&s| cutoff.shift(s, frequency))
            .collect()
    }

    /// Absolute index of this horizon.
    pub fn to_index(&self, cutoff: &TimePoint, frequency: Option<Duration>) -> Result<TimeIndex> {
        TimeIndex::from_points(&self.to_absolute(cutoff, frequency)?)
    }
}

fn relative_step(
    point: &TimePoint,
    cutoff: &TimePoint,
    frequency: Option<Duration>,
) -> Result<i64> {
    match (point, cutoff) {
        (TimePoint::Integer(p), TimePoint::Integer(c)) => Ok(p - c),
        (TimePoint::Timestamp(p), TimePoint::Timestamp(c)) => {
            let freq = frequency
                .filter(|f| f.num_seconds() > 0)
                .ok_or_else(|| {
                    EstimatorError::FrequencyInference(
                        "datetime horizon needs a positive frequency".to_string(),
                    )
                })?;
            let delta = (*p - *c).num_seconds();
            if delta % freq.num_seconds() != 0 {
                return Err(EstimatorError::InvalidParameter(format!(
                    "{point} is not on the series frequency grid"
                )));
            }
            Ok(delta / freq.num_seconds())
        }
        _ => Err(EstimatorError::IndexMismatch(
            "horizon and cutoff use different index kinds".to_string(),
        )),
    }
}
