//! Input validation helpers.

use crate::core::{ForecastingHorizon, TimeSeries};
use crate::error::{EstimatorError, Result};

/// Check that all series share the same time index.
///
/// Fewer than two series always pass.
pub fn check_equal_time_index(series: &[&TimeSeries]) -> Result<()> {
    let Some((first, rest)) = series.split_first() else {
        return Ok(());
    };
    for (i, other) in rest.iter().enumerate() {
        if other.index() != first.index() {
            return Err(EstimatorError::IndexMismatch(format!(
                "series {} does not share the index of series 0 (lengths {} and {})",
                i + 1,
                other.len(),
                first.len()
            )));
        }
    }
    Ok(())
}

/// Fail with [`EstimatorError::MissingValues`] when NaN or Inf is present.
pub fn check_no_missing_values(series: &TimeSeries) -> Result<()> {
    if series.has_missing_values() {
        Err(EstimatorError::MissingValues)
    } else {
        Ok(())
    }
}

/// Fail with [`EstimatorError::UnsupportedCapability`] when `fh` contains a
/// step at or before the cutoff.
pub fn check_horizon_out_of_sample(fh: &ForecastingHorizon, estimator: &str) -> Result<()> {
    if fh.is_out_of_sample() {
        Ok(())
    } else {
        Err(EstimatorError::UnsupportedCapability(format!(
            "{estimator} does not support in-sample predictions (smallest step {})",
            fh.min_step()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeIndex;

    #[test]
    fn identical_indexes_pass() {
        let a = TimeSeries::from_values(vec![1.0, 2.0, 3.0]);
        let b = TimeSeries::from_values(vec![9.0, 8.0, 7.0]);
        assert!(check_equal_time_index(&[&a, &b]).is_ok());
        assert!(check_equal_time_index(&[&a]).is_ok());
        assert!(check_equal_time_index(&[]).is_ok());
    }

    #[test]
    fn shifted_index_fails() {
        let a = TimeSeries::from_values(vec![1.0, 2.0]);
        let b = TimeSeries::new(TimeIndex::range_from(1, 2), vec![vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            check_equal_time_index(&[&a, &b]),
            Err(EstimatorError::IndexMismatch(_))
        ));
    }

    #[test]
    fn different_lengths_fail() {
        let a = TimeSeries::from_values(vec![1.0, 2.0]);
        let b = TimeSeries::from_values(vec![1.0, 2.0, 3.0]);
        assert!(check_equal_time_index(&[&a, &b]).is_err());
    }

    #[test]
    fn missing_values_detected() {
        let ts = TimeSeries::from_values(vec![1.0, f64::NAN]);
        assert_eq!(check_no_missing_values(&ts), Err(EstimatorError::MissingValues));
    }

    #[test]
    fn in_sample_steps_are_unsupported() {
        let fh = ForecastingHorizon::new(vec![0, 1]).unwrap();
        assert!(matches!(
            check_horizon_out_of_sample(&fh, "Test"),
            Err(EstimatorError::UnsupportedCapability(_))
        ));
        let fh = ForecastingHorizon::up_to(3).unwrap();
        assert!(check_horizon_out_of_sample(&fh, "Test").is_ok());
    }
}
