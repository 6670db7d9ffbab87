//! Confidence measures for a finished search.
//!
//! Includes the Z-score separation of the winner from competing hypotheses
//! and the quadrant spread of the winning alignment.

mod consistency;
mod zscore;

pub use consistency::local_consistency;
pub use zscore::z_score;
