//! Episode rollouts against black-box environments and policies.
//!
//! The [`EpisodeRoller`] drives one episode, applying an optional
//! [`Injector`](crate::injection::Injector) at the observation or action
//! point and collecting whatever [`CollectionConfig`] asks for.

pub mod collection;
pub mod error;
pub mod metrics;
pub mod roller;
pub mod traits;


pub use collection::{CollectionConfig, EpisodeResult};
pub use error::RolloutError;
pub use metrics::{MetricAccumulator, MetricKey};
pub use roller::{run_episode, ActionCallback, EpisodeRoller, EpisodeRollerBuilder};
pub use traits::{AgentTuple, CollaboratorError, Environment, Policy, StepInfo, Transition};
