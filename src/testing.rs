//! Test doubles for rollout and evaluation tests.

use crate::checkpoint::{BuildEnvironment, Checkpoint, EnvConfig, RestorePolicy, TrainerConfig};
use crate::rollout::{AgentTuple, CollaboratorError, Environment, Policy, StepInfo, Transition};

/// Deterministic environment that ends after `horizon` steps.
///
/// Every observation entry equals the current step index, each step pays a
/// reward of `1 - action_penalty * sum(|a|)`, and `render` returns the step
/// index.
#[derive(Debug)]
pub struct CountdownEnv {
    pub n_agents: usize,
    pub obs_dim: usize,
    pub horizon: u32,
    pub action_penalty: f64,
    pub bounds: Vec<f64>,
    pub fail_at: Option<u32>,
    pub t: u32,
    pub received_actions: Vec<AgentTuple>,
    pub raw_observations: Vec<AgentTuple>,
}

impl CountdownEnv {
    pub fn new(n_agents: usize, horizon: u32) -> Self {
        Self {
            n_agents,
            obs_dim: 2,
            horizon,
            action_penalty: 0.0,
            bounds: vec![1.0; n_agents],
            fail_at: None,
            t: 0,
            received_actions: Vec::new(),
            raw_observations: Vec::new(),
        }
    }

    fn observe(&mut self) -> AgentTuple {
        let obs = vec![vec![self.t as f64; self.obs_dim]; self.n_agents];
        self.raw_observations.push(obs.clone());
        obs
    }
}

impl Environment for CountdownEnv {
    type Frame = u32;

    fn reset(&mut self) -> Result<AgentTuple, CollaboratorError> {
        self.t = 0;
        self.received_actions.clear();
        self.raw_observations.clear();
        Ok(self.observe())
    }

    fn step(&mut self, actions: &[Vec<f64>]) -> Result<Transition, CollaboratorError> {
        if self.fail_at == Some(self.t) {
            return Err(format!("simulated failure at step {}", self.t).into());
        }
        let effort: f64 = actions.iter().flatten().map(|a| a.abs()).sum();
        self.received_actions.push(actions.to_vec());
        self.t += 1;
        let done = self.t >= self.horizon;
        let observations = if done {
            vec![vec![self.t as f64; self.obs_dim]; self.n_agents]
        } else {
            self.observe()
        };
        Ok(Transition {
            observations,
            reward: 1.0 - self.action_penalty * effort,
            done,
            info: StepInfo::new().with_metric("agent_0", "step", self.t as f64),
        })
    }

    fn render(&mut self) -> Result<Option<u32>, CollaboratorError> {
        Ok(Some(self.t))
    }

    fn n_agents(&self) -> usize {
        self.n_agents
    }

    fn control_bounds(&self) -> Vec<f64> {
        self.bounds.clone()
    }
}

impl BuildEnvironment for CountdownEnv {
    fn build(config: &EnvConfig, _seed: u64) -> Result<Self, CollaboratorError> {
        let n_agents = config.scenario_config["n_agents"]
            .as_u64()
            .ok_or("scenario_config.n_agents missing")?;
        Ok(Self::new(n_agents as usize, config.max_steps))
    }
}

/// Trainer configuration for a countdown scenario.
pub fn trainer_config(n_agents: usize, max_steps: u32) -> TrainerConfig {
    serde_json::from_value(serde_json::json!({
        "env": "countdown",
        "env_config": {
            "scenario_name": "Countdown",
            "max_steps": max_steps,
            "scenario_config": {"n_agents": n_agents}
        }
    }))
    .unwrap()
}

/// Returns a constant action for every agent.
#[derive(Debug)]
pub struct ConstantPolicy {
    pub value: f64,
    pub dim: usize,
}

impl Policy for ConstantPolicy {
    fn compute_actions(
        &mut self,
        observations: &[Vec<f64>],
    ) -> Result<AgentTuple, CollaboratorError> {
        Ok(vec![vec![self.value; self.dim]; observations.len()])
    }

    fn name(&self) -> &str {
        "constant"
    }
}

impl RestorePolicy for ConstantPolicy {
    fn restore(checkpoint: &Checkpoint) -> Result<Self, CollaboratorError> {
        let raw = checkpoint.read_weights()?;
        let value = String::from_utf8(raw)?.trim().parse::<f64>()?;
        Ok(Self { value, dim: 2 })
    }
}

/// Fails on every call.
#[derive(Debug)]
pub struct FailingPolicy;

impl Policy for FailingPolicy {
    fn compute_actions(
        &mut self,
        _observations: &[Vec<f64>],
    ) -> Result<AgentTuple, CollaboratorError> {
        Err("policy unavailable".into())
    }

    fn name(&self) -> &str {
        "failing"
    }
}
