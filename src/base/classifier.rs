//! Time series classifier interface.

use crate::core::Panel;
use crate::error::{EstimatorError, Result};

/// Common interface for panel classifiers.
pub trait Classifier {
    /// Fit on a panel with one label per instance.
    fn fit(&mut self, x: &Panel, y: &[String]) -> Result<()>;

    /// Class probabilities, one row per instance, columns ordered as
    /// [`Classifier::classes`].
    fn predict_proba(&self, x: &Panel) -> Result<Vec<Vec<f64>>>;

    /// Most probable class per instance; ties go to the first class.
    fn predict(&self, x: &Panel) -> Result<Vec<String>> {
        let classes = self.classes();
        self.predict_proba(x)?
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold(None, |best: Option<(usize, f64)>, (i, &p)| match best {
                        Some((_, bp)) if bp >= p => best,
                        _ => Some((i, p)),
                    })
                    .and_then(|(i, _)| classes.get(i).cloned())
                    .ok_or(EstimatorError::NotFitted)
            })
            .collect()
    }

    /// Sorted distinct class labels seen in fit.
    fn classes(&self) -> &[String];

    fn is_fitted(&self) -> bool;

    fn name(&self) -> &str;
}

/// Validate classifier training input and return the sorted class labels.
pub(crate) fn check_classifier_input(x: &Panel, y: &[String]) -> Result<Vec<String>> {
    if x.is_empty() {
        return Err(EstimatorError::EmptyData);
    }
    if x.len() != y.len() {
        return Err(EstimatorError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    let mut classes = y.to_vec();
    classes.sort();
    classes.dedup();
    Ok(classes)
}
