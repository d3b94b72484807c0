//! TimeSeries data structure for representing temporal data.

use super::index::{TimeIndex, TimePoint};
use crate::error::{EstimatorError, Result};
use chrono::{DateTime, Duration, Utc};

/// Layout of multivariate data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueLayout {
    /// Each inner vector is a column (column-major).
    #[default]
    Column,
    /// Each inner vector is an observation across columns (row-major).
    Row,
}

/// A time series: an index plus one or more value columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    index: TimeIndex,
    /// Values stored in column-major format: values[column][observation]
    values: Vec<Vec<f64>>,
    labels: Vec<String>,
    name: Option<String>,
    frequency: Option<Duration>,
}

/// Builder for constructing TimeSeries.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    index: Option<TimeIndex>,
    values: Vec<Vec<f64>>,
    layout: ValueLayout,
    labels: Vec<String>,
    name: Option<String>,
    frequency: Option<Duration>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(mut self, index: TimeIndex) -> Self {
        self.index = Some(index);
        self
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.index = Some(TimeIndex::Datetime(timestamps));
        self
    }

    /// Set univariate values.
    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = vec![values];
        self.layout = ValueLayout::Column;
        self
    }

    /// Set multivariate values with specified layout.
    pub fn multivariate_values(mut self, values: Vec<Vec<f64>>, layout: ValueLayout) -> Self {
        self.values = values;
        self.layout = layout;
        self
    }

    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn frequency(mut self, freq: Duration) -> Self {
        self.frequency = Some(freq);
        self
    }

    /// Build the series. Without an explicit index a `0..n` index is used.
    pub fn build(self) -> Result<TimeSeries> {
        let columns = to_columns(self.values, self.layout)?;
        let n = columns.first().map(|c| c.len()).unwrap_or(0);
        let index = self.index.unwrap_or_else(|| TimeIndex::range(n));
        let mut ts = TimeSeries::new(index, columns)?;
        ts.set_labels(self.labels)?;
        ts.name = self.name;
        ts.frequency = self.frequency;
        Ok(ts)
    }
}

fn to_columns(values: Vec<Vec<f64>>, layout: ValueLayout) -> Result<Vec<Vec<f64>>> {
    match layout {
        ValueLayout::Column => Ok(values),
        ValueLayout::Row => {
            let dims = values.first().map(|r| r.len()).unwrap_or(0);
            for row in &values {
                if row.len() != dims {
                    return Err(EstimatorError::DimensionMismatch {
                        expected: dims,
                        got: row.len(),
                    });
                }
            }
            Ok((0..dims)
                .map(|d| values.iter().map(|row| row[d]).collect())
                .collect())
        }
    }
}

impl TimeSeries {
    /// Create a series from an index and column-major values.
    pub fn new(index: TimeIndex, values: Vec<Vec<f64>>) -> Result<Self> {
        index.validate()?;
        for column in &values {
            if column.len() != index.len() {
                return Err(EstimatorError::DimensionMismatch {
                    expected: index.len(),
                    got: column.len(),
                });
            }
        }
        Ok(Self {
            index,
            values,
            labels: Vec::new(),
            name: None,
            frequency: None,
        })
    }

    /// Create a univariate series over a datetime index.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        Self::new(TimeIndex::Datetime(timestamps), vec![values])
    }

    /// Create a univariate series over the default `0..n` integer index.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            index: TimeIndex::range(values.len()),
            values: vec![values],
            labels: Vec::new(),
            name: None,
            frequency: None,
        }
    }

    /// Create a multivariate series from rows (observation-major).
    pub fn from_rows(index: TimeIndex, rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.len() != index.len() {
            return Err(EstimatorError::DimensionMismatch {
                expected: index.len(),
                got: rows.len(),
            });
        }
        Self::new(index, to_columns(rows, ValueLayout::Row)?)
    }

    /// Copy with new values on the same index, keeping labels, name and frequency.
    pub fn with_values(&self, values: Vec<Vec<f64>>) -> Result<TimeSeries> {
        if values.len() != self.dimensions() {
            return Err(EstimatorError::DimensionMismatch {
                expected: self.dimensions(),
                got: values.len(),
            });
        }
        let mut ts = TimeSeries::new(self.index.clone(), values)?;
        ts.labels = self.labels.clone();
        ts.name = self.name.clone();
        ts.frequency = self.frequency;
        Ok(ts)
    }

    /// Apply `f(column_index, value)` elementwise, keeping the index.
    pub fn map_values<F>(&self, f: F) -> TimeSeries
    where
        F: Fn(usize, f64) -> f64,
    {
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(c, col)| col.iter().map(|&v| f(c, v)).collect())
            .collect();
        TimeSeries {
            index: self.index.clone(),
            values,
            labels: self.labels.clone(),
            name: self.name.clone(),
            frequency: self.frequency,
        }
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the number of columns (1 for univariate).
    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    pub fn is_multivariate(&self) -> bool {
        self.values.len() > 1
    }

    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    /// Last index point, the cutoff after fitting on this series.
    pub fn cutoff(&self) -> Option<TimePoint> {
        self.index.last()
    }

    /// Get values for a specific column.
    pub fn values(&self, column: usize) -> Result<&[f64]> {
        self.values
            .get(column)
            .map(|v| v.as_slice())
            .ok_or(EstimatorError::IndexOutOfBounds {
                index: column,
                size: self.values.len(),
            })
    }

    /// Get primary (first column) values.
    pub fn primary_values(&self) -> &[f64] {
        self.values.first().map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Get all values organized by column.
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Get a row (observation at index across all columns).
    pub fn row(&self, index: usize) -> Result<Vec<f64>> {
        if index >= self.len() {
            return Err(EstimatorError::IndexOutOfBounds {
                index,
                size: self.len(),
            });
        }
        Ok(self.values.iter().map(|col| col[index]).collect())
    }

    /// All observations as rows.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.len())
            .map(|i| self.values.iter().map(|col| col[i]).collect())
            .collect()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Set column labels.
    pub fn set_labels(&mut self, labels: Vec<String>) -> Result<()> {
        if !labels.is_empty() && labels.len() != self.dimensions() {
            return Err(EstimatorError::DimensionMismatch {
                expected: self.dimensions(),
                got: labels.len(),
            });
        }
        self.labels = labels;
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Frequency set explicitly on the series.
    pub fn frequency(&self) -> Option<Duration> {
        self.frequency
    }

    pub fn set_frequency(&mut self, freq: Duration) {
        self.frequency = Some(freq);
    }

    /// Explicit frequency, or the one inferred from a datetime index.
    ///
    /// Integer indexes have no calendar frequency and yield `None`.
    pub fn effective_frequency(&self) -> Option<Duration> {
        self.frequency
            .or_else(|| self.index.infer_frequency(0.5).ok())
    }

    /// Extract a slice `[start, end)` of the time series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end {
            return Err(EstimatorError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(EstimatorError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }

        Ok(TimeSeries {
            index: self.index.slice(start, end),
            values: self
                .values
                .iter()
                .map(|col| col[start..end].to_vec())
                .collect(),
            labels: self.labels.clone(),
            name: self.name.clone(),
            frequency: self.frequency,
        })
    }

    /// Append observations from `other`, which must continue this index.
    pub fn append(&self, other: &TimeSeries) -> Result<TimeSeries> {
        if other.dimensions() != self.dimensions() {
            return Err(EstimatorError::DimensionMismatch {
                expected: self.dimensions(),
                got: other.dimensions(),
            });
        }
        let index = self.index.concat(&other.index)?;
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| a.iter().chain(b).copied().collect())
            .collect();
        Ok(TimeSeries {
            index,
            values,
            labels: self.labels.clone(),
            name: self.name.clone(),
            frequency: self.frequency.or(other.frequency),
        })
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values
            .iter()
            .any(|col| col.iter().any(|v| v.is_nan() || v.is_infinite()))
    }

    /// Column-wise minimum ignoring NaN; `None` for an all-NaN column.
    pub fn column_min(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|col| {
                col.iter()
                    .copied()
                    .filter(|v| !v.is_nan())
                    .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.min(v))))
            })
            .collect()
    }
}
