//! Built-in heterogeneous navigation scenario.
//!
//! A small continuous-control [`Environment`](crate::rollout::Environment)
//! whose agents differ in maximum speed, so per-agent control bounds matter
//! for action-noise clamping.

pub mod agent;
pub mod config;
pub mod navigation;
pub mod types;

pub use agent::AgentState;
pub use config::{ScenarioConfig, DEFAULT_SPEEDS};
pub use navigation::{NavigationEnvironment, NavigationFrame};
pub use types::{AgentKind, Position};
