//! Sliding-window training examples for sequence models.

use crate::core::TimeSeries;
use crate::error::{EstimatorError, Result};
use std::iter::FusedIterator;

/// One training example: a history window followed by a target window.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingWindow {
    /// `y[i..i + w]`
    pub past_values: Vec<f64>,
    /// `X[i..i + w]`, or `w` empty rows without exogenous data.
    pub past_time_features: Vec<Vec<f64>>,
    /// `X[i + w..i + w + h]`, or `h` empty rows without exogenous data.
    pub future_time_features: Vec<Vec<f64>>,
    /// `true` where `past_values` is not NaN.
    pub past_observed_mask: Vec<bool>,
    /// `y[i + w..i + w + h]`
    pub future_values: Vec<f64>,
}

/// All windows of `window_length + horizon` consecutive observations.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedDataset {
    y: Vec<f64>,
    /// Exogenous rows aligned with `y`.
    x: Option<Vec<Vec<f64>>>,
    window_length: usize,
    horizon: usize,
}

impl WindowedDataset {
    /// Create a dataset from target values and optional exogenous rows.
    pub fn new(
        y: Vec<f64>,
        x: Option<Vec<Vec<f64>>>,
        window_length: usize,
        horizon: usize,
    ) -> Result<Self> {
        if let Some(rows) = &x {
            if rows.len() != y.len() {
                return Err(EstimatorError::DimensionMismatch {
                    expected: y.len(),
                    got: rows.len(),
                });
            }
        }
        Ok(Self {
            y,
            x,
            window_length,
            horizon,
        })
    }

    /// Dataset over the first column of `y` and the rows of `x`.
    pub fn from_series(
        y: &TimeSeries,
        x: Option<&TimeSeries>,
        window_length: usize,
        horizon: usize,
    ) -> Result<Self> {
        Self::new(
            y.primary_values().to_vec(),
            x.map(|x| x.rows()),
            window_length,
            horizon,
        )
    }

    /// Split into `[0, at)` and `[at, n)` with the same window sizes.
    pub fn split_at(&self, at: usize) -> Result<(WindowedDataset, WindowedDataset)> {
        if at > self.y.len() {
            return Err(EstimatorError::IndexOutOfBounds {
                index: at,
                size: self.y.len(),
            });
        }
        let (y_head, y_tail) = self.y.split_at(at);
        let (x_head, x_tail) = match &self.x {
            Some(rows) => {
                let (a, b) = rows.split_at(at);
                (Some(a.to_vec()), Some(b.to_vec()))
            }
            None => (None, None),
        };
        Ok((
            Self::new(y_head.to_vec(), x_head, self.window_length, self.horizon)?,
            Self::new(y_tail.to_vec(), x_tail, self.window_length, self.horizon)?,
        ))
    }

    /// Number of windows: `max(n - window_length - horizon + 1, 0)`.
    pub fn len(&self) -> usize {
        (self.y.len() + 1).saturating_sub(self.window_length + self.horizon)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of observations the windows are cut from.
    pub fn num_observations(&self) -> usize {
        self.y.len()
    }

    /// Exogenous columns per row; 0 without exogenous data.
    pub fn num_features(&self) -> usize {
        self.x
            .as_ref()
            .and_then(|rows| rows.first())
            .map_or(0, |row| row.len())
    }

    /// Window starting at observation `i`.
    pub fn get(&self, i: usize) -> Option<TrainingWindow> {
        if i >= self.len() {
            return None;
        }
        let w = self.window_length;
        let h = self.horizon;
        let past_values = self.y[i..i + w].to_vec();
        let (past_time_features, future_time_features) = match &self.x {
            Some(rows) => (rows[i..i + w].to_vec(), rows[i + w..i + w + h].to_vec()),
            None => (vec![Vec::new(); w], vec![Vec::new(); h]),
        };
        Some(TrainingWindow {
            past_observed_mask: past_values.iter().map(|v| !v.is_nan()).collect(),
            past_values,
            past_time_features,
            future_time_features,
            future_values: self.y[i + w..i + w + h].to_vec(),
        })
    }

    /// Iterate over all windows from the start.
    pub fn iter(&self) -> Windows<'_> {
        Windows {
            dataset: self,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for &'a WindowedDataset {
    type Item = TrainingWindow;
    type IntoIter = Windows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the windows of a [`WindowedDataset`].
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    dataset: &'a WindowedDataset,
    next: usize,
}

impl Iterator for Windows<'_> {
    type Item = TrainingWindow;

    fn next(&mut self) -> Option<Self::Item> {
        let window = self.dataset.get(self.next)?;
        self.next += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}

impl FusedIterator for Windows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn length_formula() {
        let ds = WindowedDataset::new(values(10), None, 4, 2).unwrap();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.iter().len(), 5);

        let ds = WindowedDataset::new(values(5), None, 4, 2).unwrap();
        assert_eq!(ds.len(), 0);
        assert!(ds.is_empty());
        assert!(ds.get(0).is_none());
    }

    #[test]
    fn windows_without_exogenous_have_empty_rows() {
        let ds = WindowedDataset::new(values(10), None, 4, 2).unwrap();
        let w = ds.get(1).unwrap();
        assert_eq!(w.past_values, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(w.future_values, vec![5.0, 6.0]);
        assert_eq!(w.past_time_features.len(), 4);
        assert_eq!(w.future_time_features.len(), 2);
        assert!(w.past_time_features.iter().all(|r| r.is_empty()));
        assert_eq!(ds.num_features(), 0);
    }

    #[test]
    fn windows_slice_exogenous_rows() {
        let rows: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64 * 10.0, 1.0]).collect();
        let ds = WindowedDataset::new(values(8), Some(rows), 3, 2).unwrap();
        let w = ds.get(2).unwrap();
        assert_eq!(w.past_time_features[0], vec![20.0, 1.0]);
        assert_eq!(w.future_time_features, vec![vec![50.0, 1.0], vec![60.0, 1.0]]);
        assert_eq!(ds.num_features(), 2);
    }

    #[test]
    fn observed_mask_marks_nan() {
        let ds = WindowedDataset::new(vec![1.0, f64::NAN, 3.0, 4.0], None, 3, 1).unwrap();
        assert_eq!(ds.get(0).unwrap().past_observed_mask, vec![true, false, true]);
    }

    #[test]
    fn iteration_is_restartable() {
        let ds = WindowedDataset::new(values(7), None, 2, 1).unwrap();
        let first: Vec<_> = ds.iter().map(|w| w.future_values[0]).collect();
        let second: Vec<_> = (&ds).into_iter().map(|w| w.future_values[0]).collect();
        assert_eq!(first, vec![2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(first, second);
    }

    #[test]
    fn split_keeps_window_sizes() {
        let ds = WindowedDataset::new(values(10), None, 2, 1).unwrap();
        let (train, eval) = ds.split_at(8).unwrap();
        assert_eq!(train.len(), 6);
        assert_eq!(eval.len(), 0);
        assert_eq!(eval.num_observations(), 2);
        assert!(ds.split_at(11).is_err());
    }

    #[test]
    fn exogenous_rows_must_align() {
        assert!(WindowedDataset::new(values(3), Some(vec![vec![1.0]; 2]), 1, 1).is_err());
    }
}
