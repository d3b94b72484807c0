//! # ts-estimators
//!
//! Time series estimators with a shared fit/predict/transform lifecycle.
//!
//! Provides power, Box-Cox and log transformers, demand categorisation,
//! naive, Croston and pretrained-model forecasters, a category-driven
//! forecaster compositor and dictionary-based (BOSS family) classifiers,
//! along with time-index validation and reference classifier outputs.

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::type_complexity)]

pub mod base;
pub mod classification;
pub mod core;
pub mod error;
pub mod forecasting;
pub mod transform;
pub mod utils;

pub use error::{EstimatorError, Result};

pub mod prelude {
    pub use crate::base::{Classifier, FitState, ForecastContext, Forecaster, Transformer};
    pub use crate::core::{ForecastingHorizon, Panel, TimeIndex, TimePoint, TimeSeries};
    pub use crate::error::{EstimatorError, Result};
    pub use crate::utils::check_equal_time_index;
}
