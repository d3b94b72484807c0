//! Panel data: a collection of equal-length series instances.

use crate::error::{EstimatorError, Result};

/// Collection of univariate series instances of equal length.
///
/// Used as classifier input; instance `i` pairs with label `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    instances: Vec<Vec<f64>>,
    series_length: usize,
}

impl Panel {
    /// Create a panel, validating that all instances share one length.
    pub fn new(instances: Vec<Vec<f64>>) -> Result<Self> {
        let series_length = instances.first().map(|s| s.len()).unwrap_or(0);
        for instance in &instances {
            if instance.len() != series_length {
                return Err(EstimatorError::DimensionMismatch {
                    expected: series_length,
                    got: instance.len(),
                });
            }
        }
        Ok(Self {
            instances,
            series_length,
        })
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Length of every instance.
    pub fn series_length(&self) -> usize {
        self.series_length
    }

    pub fn instance(&self, i: usize) -> Option<&[f64]> {
        self.instances.get(i).map(|s| s.as_slice())
    }

    pub fn instances(&self) -> &[Vec<f64>] {
        &self.instances
    }

    /// Panel of the selected instances, in the given order.
    pub fn select(&self, indices: &[usize]) -> Result<Panel> {
        let instances = indices
            .iter()
            .map(|&i| {
                self.instances
                    .get(i)
                    .cloned()
                    .ok_or(EstimatorError::IndexOutOfBounds {
                        index: i,
                        size: self.instances.len(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Panel {
            instances,
            series_length: self.series_length,
        })
    }
}
