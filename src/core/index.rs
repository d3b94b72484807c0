//! Time index types shared by series, horizons and forecasts.

use crate::error::{EstimatorError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;

/// A single point on a time index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimePoint {
    /// Integer (range-like) position.
    Integer(i64),
    /// Calendar timestamp.
    Timestamp(DateTime<Utc>),
}

impl TimePoint {
    /// Shift this point by `steps` periods.
    ///
    /// Integer points move by `steps`; timestamps need a frequency.
    pub fn shift(&self, steps: i64, frequency: Option<Duration>) -> Result<TimePoint> {
        match self {
            TimePoint::Integer(i) => Ok(TimePoint::Integer(i + steps)),
            TimePoint::Timestamp(t) => {
                let freq = frequency.ok_or_else(|| {
                    EstimatorError::FrequencyInference(
                        "datetime index has no frequency".to_string(),
                    )
                })?;
                let offset = freq.checked_mul(steps as i32).ok_or_else(|| {
                    EstimatorError::ComputationError("time offset overflow".to_string())
                })?;
                Ok(TimePoint::Timestamp(*t + offset))
            }
        }
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePoint::Integer(i) => write!(f, "{i}"),
            TimePoint::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

/// Strictly increasing index of a time series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeIndex {
    /// Integer positions, `0..n` by default.
    Integer(Vec<i64>),
    /// UTC timestamps.
    Datetime(Vec<DateTime<Utc>>),
}

impl Default for TimeIndex {
    fn default() -> Self {
        TimeIndex::Integer(Vec::new())
    }
}

impl TimeIndex {
    /// Default integer index `0..len`.
    pub fn range(len: usize) -> Self {
        TimeIndex::Integer((0..len as i64).collect())
    }

    /// Integer index starting at `start`.
    pub fn range_from(start: i64, len: usize) -> Self {
        TimeIndex::Integer((start..start + len as i64).collect())
    }

    /// Validate that the index is strictly increasing.
    pub fn validate(&self) -> Result<()> {
        let increasing = match self {
            TimeIndex::Integer(v) => v.windows(2).all(|w| w[1] > w[0]),
            TimeIndex::Datetime(v) => v.windows(2).all(|w| w[1] > w[0]),
        };
        if increasing {
            Ok(())
        } else {
            Err(EstimatorError::IndexMismatch(
                "index values must be strictly increasing".to_string(),
            ))
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TimeIndex::Integer(v) => v.len(),
            TimeIndex::Datetime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, TimeIndex::Datetime(_))
    }

    /// Point at `position`.
    pub fn get(&self, position: usize) -> Option<TimePoint> {
        match self {
            TimeIndex::Integer(v) => v.get(position).map(|&i| TimePoint::Integer(i)),
            TimeIndex::Datetime(v) => v.get(position).map(|&t| TimePoint::Timestamp(t)),
        }
    }

    /// Last point of the index.
    pub fn last(&self) -> Option<TimePoint> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Position of `point`, if present.
    pub fn position(&self, point: &TimePoint) -> Option<usize> {
        match (self, point) {
            (TimeIndex::Integer(v), TimePoint::Integer(i)) => v.binary_search(i).ok(),
            (TimeIndex::Datetime(v), TimePoint::Timestamp(t)) => v.binary_search(t).ok(),
            _ => None,
        }
    }

    /// Sub-index `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> TimeIndex {
        match self {
            TimeIndex::Integer(v) => TimeIndex::Integer(v[start..end].to_vec()),
            TimeIndex::Datetime(v) => TimeIndex::Datetime(v[start..end].to_vec()),
        }
    }

    /// Build an index of the same kind from points.
    pub fn from_points(points: &[TimePoint]) -> Result<TimeIndex> {
        let index = match points.first() {
            None | Some(TimePoint::Integer(_)) => TimeIndex::Integer(
                points
                    .iter()
                    .map(|p| match p {
                        TimePoint::Integer(i) => Ok(*i),
                        TimePoint::Timestamp(_) => Err(mixed_points()),
                    })
                    .collect::<Result<_>>()?,
            ),
            Some(TimePoint::Timestamp(_)) => TimeIndex::Datetime(
                points
                    .iter()
                    .map(|p| match p {
                        TimePoint::Timestamp(t) => Ok(*t),
                        TimePoint::Integer(_) => Err(mixed_points()),
                    })
                    .collect::<Result<_>>()?,
            ),
        };
        index.validate()?;
        Ok(index)
    }

    /// Append `other` after this index; both must be of the same kind and
    /// `other` must start after the last point.
    pub fn concat(&self, other: &TimeIndex) -> Result<TimeIndex> {
        let joined = match (self, other) {
            (TimeIndex::Integer(a), TimeIndex::Integer(b)) => {
                TimeIndex::Integer(a.iter().chain(b).copied().collect())
            }
            (TimeIndex::Datetime(a), TimeIndex::Datetime(b)) => {
                TimeIndex::Datetime(a.iter().chain(b).copied().collect())
            }
            _ => return Err(mixed_points()),
        };
        joined.validate()?;
        Ok(joined)
    }

    /// Infer a regular spacing from a datetime index.
    ///
    /// The modal spacing must account for at least `tolerance` of all gaps.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Duration> {
        let timestamps = match self {
            TimeIndex::Datetime(v) => v,
            TimeIndex::Integer(_) => {
                return Err(EstimatorError::FrequencyInference(
                    "integer index has no calendar frequency".to_string(),
                ))
            }
        };
        if timestamps.len() < 2 {
            return Err(EstimatorError::InsufficientData {
                needed: 2,
                got: timestamps.len(),
            });
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        let (modal_diff, modal_count) = counts
            .iter()
            .max_by_key(|(&diff, &count)| (count, std::cmp::Reverse(diff)))
            .map(|(&diff, &count)| (diff, count))
            .ok_or_else(|| EstimatorError::FrequencyInference("empty spacing data".to_string()))?;

        let total: usize = counts.values().sum();
        if (modal_count as f64 / total as f64) < tolerance {
            return Err(EstimatorError::FrequencyInference(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Duration::seconds(modal_diff))
    }
}

fn mixed_points() -> EstimatorError {
    EstimatorError::IndexMismatch("cannot mix integer and datetime index points".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn daily(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    #[test]
    fn range_index_is_zero_based() {
        let index = TimeIndex::range(3);
        assert_eq!(index, TimeIndex::Integer(vec![0, 1, 2]));
        assert_eq!(index.last(), Some(TimePoint::Integer(2)));
    }

    #[test]
    fn validate_rejects_non_increasing() {
        assert!(TimeIndex::Integer(vec![0, 2, 1]).validate().is_err());
        assert!(TimeIndex::Integer(vec![0, 1, 1]).validate().is_err());
        assert!(TimeIndex::Integer(vec![-3, 0, 7]).validate().is_ok());
    }

    #[test]
    fn shift_integer_and_timestamp_points() {
        assert_eq!(
            TimePoint::Integer(9).shift(3, None).unwrap(),
            TimePoint::Integer(12)
        );

        let ts = daily(1)[0];
        let shifted = TimePoint::Timestamp(ts)
            .shift(2, Some(Duration::days(1)))
            .unwrap();
        assert_eq!(shifted, TimePoint::Timestamp(ts + Duration::days(2)));

        assert!(TimePoint::Timestamp(ts).shift(1, None).is_err());
    }

    #[test]
    fn position_finds_points() {
        let index = TimeIndex::Datetime(daily(5));
        let p = index.get(3).unwrap();
        assert_eq!(index.position(&p), Some(3));
        assert_eq!(index.position(&TimePoint::Integer(3)), None);
    }

    #[test]
    fn concat_requires_matching_kind_and_order() {
        let a = TimeIndex::range(3);
        let b = TimeIndex::range_from(3, 2);
        assert_eq!(a.concat(&b).unwrap(), TimeIndex::range(5));
        assert!(b.concat(&a).is_err());
        assert!(a.concat(&TimeIndex::Datetime(daily(2))).is_err());
    }

    #[test]
    fn infers_daily_frequency() {
        let index = TimeIndex::Datetime(daily(10));
        assert_eq!(index.infer_frequency(0.5).unwrap(), Duration::days(1));
        assert!(TimeIndex::range(10).infer_frequency(0.5).is_err());
    }

    #[test]
    fn from_points_round_trips() {
        let points = vec![TimePoint::Integer(4), TimePoint::Integer(5)];
        assert_eq!(
            TimeIndex::from_points(&points).unwrap(),
            TimeIndex::Integer(vec![4, 5])
        );
        let mixed = vec![TimePoint::Integer(4), TimePoint::Timestamp(daily(1)[0])];
        assert!(TimeIndex::from_points(&mixed).is_err());
    }
}
