//! Dictionary-based classifiers.
//!
//! Series are turned into bags of SFA words and compared by word counts.

mod boss;
mod cboss;
mod sfa;

pub use boss::{boss_distance, BOSSEnsemble, IndividualBOSS};
pub use cboss::ContractableBOSS;
pub use sfa::{Bag, BinningMethod, SFA};
