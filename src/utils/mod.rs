//! Utility functions shared by estimators.

pub mod metrics;
pub mod optimization;
pub mod regression;
pub mod validation;

pub use metrics::{compute_metrics, mae, mape, mse, rmse, smape, Metric};
pub use optimization::{golden_section, GoldenSectionConfig};
pub use regression::{polyfit, Polynomial};
pub use validation::{check_equal_time_index, check_horizon_out_of_sample, check_no_missing_values};
