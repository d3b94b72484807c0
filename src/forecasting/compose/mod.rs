//! Forecasters built from other forecasters.

mod category;

pub use category::CategoryCompositor;
