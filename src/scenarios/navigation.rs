//! Heterogeneous multi-agent navigation.
//!
//! Each agent starts at a random point and must reach its own random goal.
//! The shared reward is the summed progress toward goals plus an arrival
//! bonus, minus a small time penalty. The episode ends when every agent has
//! arrived or the step budget runs out.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::agent::AgentState;
use super::config::ScenarioConfig;
use super::types::Position;
use crate::checkpoint::{BuildEnvironment, EnvConfig};
use crate::rollout::{AgentTuple, CollaboratorError, Environment, StepInfo, Transition};

/// Snapshot of the arena, returned by [`Environment::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFrame {
    pub t: u32,
    pub positions: Vec<Position>,
    pub goals: Vec<Position>,
}

/// The navigation environment.
///
/// # Lifecycle
///
/// 1. Build with [`NavigationEnvironment::new`] or [`BuildEnvironment::build`].
/// 2. [`reset`](Environment::reset) places agents and goals; each reset
///    advances the episode seed.
/// 3. [`step`](Environment::step) with one velocity per agent until `done`.
#[derive(Debug)]
pub struct NavigationEnvironment {
    pub config: ScenarioConfig,
    pub max_steps: u32,
    pub agents: Vec<AgentState>,
    pub t: u32,
    rng: StdRng,
    seed: u64,
}

impl NavigationEnvironment {
    /// Creates an environment.
    ///
    /// # Arguments
    ///
    /// * `config` - Arena, agent and reward parameters
    /// * `max_steps` - Step budget per episode
    /// * `seed` - Seed of the first episode
    pub fn new(config: ScenarioConfig, max_steps: u32, seed: u64) -> Self {
        Self {
            config,
            max_steps,
            agents: Vec::new(),
            t: 0,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    fn random_position(&mut self) -> Position {
        Position::new(
            self.rng.gen_range(0.0..=self.config.world_width),
            self.rng.gen_range(0.0..=self.config.world_height),
        )
    }

    fn observations(&self) -> AgentTuple {
        self.agents
            .iter()
            .map(|a| a.features(&self.config))
            .collect()
    }
}

impl Environment for NavigationEnvironment {
    type Frame = NavigationFrame;

    fn reset(&mut self) -> Result<AgentTuple, CollaboratorError> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.seed += 1;
        self.t = 0;
        let mut agents = Vec::with_capacity(self.config.agents.len());
        for kind in self.config.agents.clone() {
            let start = self.random_position();
            let goal = self.random_position();
            agents.push(AgentState::new(start, goal, kind));
        }
        self.agents = agents;
        Ok(self.observations())
    }

    fn step(&mut self, actions: &[Vec<f64>]) -> Result<Transition, CollaboratorError> {
        if actions.len() != self.agents.len() {
            return Err(format!(
                "expected {} actions, got {}",
                self.agents.len(),
                actions.len()
            )
            .into());
        }

        let mut reward = 0.0;
        let mut info = StepInfo::new();
        for (i, (agent, action)) in self.agents.iter_mut().zip(actions).enumerate() {
            let was_arrived = agent.arrived;
            let progress = agent.step(action, &self.config);
            reward += self.config.progress_coef * progress;
            let arrived_now = agent.arrived && !was_arrived;
            if arrived_now {
                reward += self.config.arrival_bonus;
            }
            let scope = format!("agent_{i}");
            info = info
                .with_metric(scope.as_str(), "progress", progress)
                .with_metric(scope, "arrivals", if arrived_now { 1.0 } else { 0.0 });
        }

        let all_arrived = self.agents.iter().all(|a| a.arrived);
        if !all_arrived {
            reward -= self.config.time_penalty;
        }
        self.t += 1;

        Ok(Transition {
            observations: self.observations(),
            reward,
            done: all_arrived || self.t >= self.max_steps,
            info,
        })
    }

    fn render(&mut self) -> Result<Option<NavigationFrame>, CollaboratorError> {
        Ok(Some(NavigationFrame {
            t: self.t,
            positions: self.agents.iter().map(|a| a.position).collect(),
            goals: self.agents.iter().map(|a| a.goal).collect(),
        }))
    }

    fn n_agents(&self) -> usize {
        self.config.agents.len()
    }

    fn control_bounds(&self) -> Vec<f64> {
        self.config.control_bounds()
    }
}

impl BuildEnvironment for NavigationEnvironment {
    fn build(config: &EnvConfig, seed: u64) -> Result<Self, CollaboratorError> {
        if !config.continuous_actions {
            return Err("navigation needs continuous actions".into());
        }
        let scenario = ScenarioConfig::from_value(&config.scenario_config)?;
        Ok(Self::new(scenario, config.max_steps, seed))
    }
}
