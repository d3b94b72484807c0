//! Forecasters.
//!
//! All forecasters implement [`crate::base::Forecaster`]: `fit` on a target
//! series with optional exogenous data and horizon, then `predict` at a
//! [`crate::core::ForecastingHorizon`] relative to the cutoff.

pub mod compose;
mod croston;
mod naive;
pub mod pretrained;
mod theta;
mod trend;

pub use compose::CategoryCompositor;
pub use croston::Croston;
pub use naive::{NaiveForecaster, NaiveStrategy};
pub use pretrained::{PretrainedForecaster, PretrainedForecasterConfig};
pub use theta::ThetaForecaster;
pub use trend::PolynomialTrendForecaster;
