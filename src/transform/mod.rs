//! Data transformations for time series.
//!
//! Series-to-series transformers implement [`crate::base::Transformer`];
//! [`AdiCvTransformer`] reduces a series to demand-pattern features.
//!
//! # Example
//!
//! ```
//! use ts_estimators::base::Transformer;
//! use ts_estimators::core::TimeSeries;
//! use ts_estimators::transform::{ExponentTransformer, Offset};
//!
//! let y = TimeSeries::from_values(vec![-4.0, 0.0, 5.0]);
//! let mut t = ExponentTransformer::new(0.5, Offset::Auto);
//! let z = t.fit_transform(&y).unwrap();
//! assert_eq!(z.primary_values(), &[0.0, 2.0, 3.0]);
//! ```

pub mod adi_cv;
pub mod boxcox;
pub mod exponent;
pub mod log;

pub use adi_cv::{adi_cv, AdiCvFeatures, AdiCvTransformer, Categorizer, DemandClass};
pub use boxcox::{boxcox, boxcox_lambda, inv_boxcox, is_boxcox_suitable, BoxCoxTransformer};
pub use exponent::{ExponentTransformer, Offset, SqrtTransformer};
pub use log::LogTransformer;
