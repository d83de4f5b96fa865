//! Baseline and restorable policies for the navigation scenario.

pub mod goal_seeking;
pub mod linear;
#[cfg(feature = "nn")]
pub mod network;
pub mod random;

pub use goal_seeking::GoalSeekingPolicy;
pub use linear::{LinearCheckpoint, LinearLayerRecord, LinearPolicy};
#[cfg(feature = "nn")]
pub use network::MlpPolicy;
pub use random::RandomPolicy;
