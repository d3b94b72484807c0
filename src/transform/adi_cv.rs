//! ADI/CV² demand-pattern classification.
//!
//! Classifies a series by its average demand interval (ADI) and the squared
//! coefficient of variation (CV²) of its non-zero values into one of four
//! demand patterns, following Syntetos and Boylan:
//!
//! | | CV² <= t₂ | CV² > t₂ |
//! |---|---|---|
//! | ADI <= t₁ | smooth | erratic |
//! | ADI > t₁ | intermittent | lumpy |

use crate::base::FitState;
use crate::core::TimeSeries;
use crate::error::{EstimatorError, Result};
use std::fmt;
use tracing::debug;

/// Default ADI threshold (t₁).
pub const DEFAULT_ADI_THRESHOLD: f64 = 1.32;
/// Default CV² threshold (t₂).
pub const DEFAULT_CV_THRESHOLD: f64 = 0.49;

/// Anything that maps a series to a category name.
pub trait Categorizer {
    /// Category of `y`.
    fn categorize(&mut self, y: &TimeSeries) -> Result<String>;

    fn name(&self) -> &str;
}

/// Demand pattern of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemandClass {
    Smooth,
    Erratic,
    Intermittent,
    Lumpy,
}

impl DemandClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandClass::Smooth => "smooth",
            DemandClass::Erratic => "erratic",
            DemandClass::Intermittent => "intermittent",
            DemandClass::Lumpy => "lumpy",
        }
    }
}

impl fmt::Display for DemandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features computed by [`AdiCvTransformer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdiCvFeatures {
    pub adi: f64,
    pub cv2: f64,
    pub class: DemandClass,
}

/// Series-to-primitives transformer producing ADI, CV² and the demand class.
#[derive(Debug, Clone)]
pub struct AdiCvTransformer {
    adi_threshold: f64,
    cv_threshold: f64,
    state: FitState<AdiCvFeatures>,
}

impl Default for AdiCvTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl AdiCvTransformer {
    pub fn new() -> Self {
        Self {
            adi_threshold: DEFAULT_ADI_THRESHOLD,
            cv_threshold: DEFAULT_CV_THRESHOLD,
            state: FitState::Unfitted,
        }
    }

    pub fn with_adi_threshold(mut self, threshold: f64) -> Self {
        self.adi_threshold = threshold;
        self
    }

    pub fn with_cv_threshold(mut self, threshold: f64) -> Self {
        self.cv_threshold = threshold;
        self
    }

    pub fn adi_threshold(&self) -> f64 {
        self.adi_threshold
    }

    pub fn cv_threshold(&self) -> f64 {
        self.cv_threshold
    }

    /// Compute the features of the first column of `y`.
    pub fn fit(&mut self, y: &TimeSeries) -> Result<&AdiCvFeatures> {
        let features = adi_cv(y.primary_values(), self.adi_threshold, self.cv_threshold)?;
        debug!(
            adi = features.adi,
            cv2 = features.cv2,
            class = %features.class,
            "computed ADI/CV features"
        );
        self.state.set(features);
        self.state.get()
    }

    /// Features from the last fit.
    pub fn features(&self) -> Result<&AdiCvFeatures> {
        self.state.get()
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_fitted()
    }
}

impl Categorizer for AdiCvTransformer {
    fn categorize(&mut self, y: &TimeSeries) -> Result<String> {
        Ok(self.fit(y)?.class.as_str().to_string())
    }

    fn name(&self) -> &str {
        "AdiCvTransformer"
    }
}

/// ADI, CV² and demand class of `values`. NaN values are skipped.
pub fn adi_cv(values: &[f64], adi_threshold: f64, cv_threshold: f64) -> Result<AdiCvFeatures> {
    let observed: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if observed.is_empty() {
        return Err(EstimatorError::EmptyData);
    }
    let nonzero: Vec<f64> = observed.iter().copied().filter(|&v| v != 0.0).collect();
    if nonzero.is_empty() {
        return Err(EstimatorError::InsufficientData { needed: 1, got: 0 });
    }

    let adi = observed.len() as f64 / nonzero.len() as f64;

    let n = nonzero.len() as f64;
    let mean = nonzero.iter().sum::<f64>() / n;
    let variance = nonzero.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let cv2 = if mean == 0.0 {
        f64::INFINITY
    } else {
        variance / (mean * mean)
    };

    let class = match (adi <= adi_threshold, cv2 <= cv_threshold) {
        (true, true) => DemandClass::Smooth,
        (true, false) => DemandClass::Erratic,
        (false, true) => DemandClass::Intermittent,
        (false, false) => DemandClass::Lumpy,
    };

    Ok(AdiCvFeatures { adi, cv2, class })
}
