//! Time series classification.

pub mod dictionary_based;
pub mod expected_outputs;

pub use dictionary_based::{BOSSEnsemble, ContractableBOSS, IndividualBOSS, SFA};
