//! Collaborator interfaces: the stepping environment and the policy.
//!
//! Both are treated as black boxes. Their errors are carried unchanged as
//! [`CollaboratorError`] and surface to the caller of the evaluator.

use super::metrics::MetricKey;

/// Error type returned by environments, policies and checkpoint restorers.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Per-agent tuple of observations or actions: one vector per agent.
pub type AgentTuple = Vec<Vec<f64>>;

/// Auxiliary per-step information reported by the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Scalar metrics for this step, keyed by (scope, name).
    pub metrics: Vec<(MetricKey, f64)>,
}

impl StepInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a metric for this step.
    pub fn with_metric(
        mut self,
        scope: impl Into<String>,
        name: impl Into<String>,
        value: f64,
    ) -> Self {
        self.metrics.push((MetricKey::new(scope, name), value));
        self
    }
}

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Per-agent observations after the step.
    pub observations: AgentTuple,
    /// Reward for this step (shared across agents).
    pub reward: f64,
    /// Whether the episode is over, by natural end or by step budget.
    pub done: bool,
    /// Auxiliary information.
    pub info: StepInfo,
}

/// A multi-agent stepping environment with a single vectorized instance.
///
/// # Lifecycle
///
/// 1. [`Environment::reset`] returns the initial observation tuple.
/// 2. [`Environment::step`] is called with one action per agent until the
///    returned [`Transition`] reports `done`.
///
/// The environment alone decides when an episode ends, including step-budget
/// exhaustion.
pub trait Environment {
    /// Type of a rendered frame.
    type Frame;

    /// Starts a new episode and returns the initial per-agent observations.
    fn reset(&mut self) -> Result<AgentTuple, CollaboratorError>;

    /// Advances the environment with one action per agent.
    fn step(&mut self, actions: &[Vec<f64>]) -> Result<Transition, CollaboratorError>;

    /// Renders the current state. Environments without rendering return `None`.
    fn render(&mut self) -> Result<Option<Self::Frame>, CollaboratorError> {
        Ok(None)
    }

    /// Number of agent slots in observation and action tuples.
    fn n_agents(&self) -> usize;

    /// Per-agent control range limit: agent `i` accepts actions in
    /// `[-bounds[i], bounds[i]]`.
    fn control_bounds(&self) -> Vec<f64>;
}

/// A trained policy that maps an observation tuple to an action tuple.
pub trait Policy {
    /// Computes one action per agent for a single observation tuple.
    fn compute_actions(
        &mut self,
        observations: &[Vec<f64>],
    ) -> Result<AgentTuple, CollaboratorError>;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn compute_actions(
        &mut self,
        observations: &[Vec<f64>],
    ) -> Result<AgentTuple, CollaboratorError> {
        (**self).compute_actions(observations)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
