//! Core data structures for time series estimators.

mod horizon;
mod index;
mod panel;
mod time_series;

pub use horizon::{ForecastingHorizon, MAX_HORIZON_STEP};
pub use index::{TimeIndex, TimePoint};
pub use panel::Panel;
pub use time_series::{TimeSeries, TimeSeriesBuilder, ValueLayout};
