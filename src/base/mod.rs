//! Estimator lifecycle and capability traits.
//!
//! Every estimator moves from unfitted to fitted through `fit`; fitted
//! attributes live inside a [`FitState`] and are replaced on refit. The
//! traits below describe what an estimator can do once fitted.

mod classifier;
mod forecaster;
mod state;
mod transformer;

pub use classifier::Classifier;
pub(crate) use classifier::check_classifier_input;
pub use forecaster::{BoxedForecaster, ForecastContext, Forecaster, ForecasterCapabilities};
pub use state::FitState;
pub use transformer::Transformer;
