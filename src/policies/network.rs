//! MLP policy using tch-rs (PyTorch bindings).
//!
//! Only available with the `nn` feature.

use tch::{nn, nn::Module, Device, Kind, Tensor};

use crate::checkpoint::{Checkpoint, RestorePolicy};
use crate::rollout::{AgentTuple, CollaboratorError, Policy};
use crate::scenarios::ScenarioConfig;

/// Deterministic MLP actor emitting the mean of a bounded Gaussian.
///
/// Architecture: `obs_dim → 128 → 64 → action_dim` with ReLU activations
/// and `tanh` output. Weights are shared across agents.
pub struct MlpPolicy {
    vs: nn::VarStore,
    net: nn::Sequential,
    obs_dim: usize,
    action_dim: usize,
}

impl MlpPolicy {
    /// Creates a randomly initialized network.
    pub fn new(obs_dim: usize, action_dim: usize, device: Device) -> Self {
        let vs = nn::VarStore::new(device);
        let p = &vs.root();
        let net = nn::seq()
            .add(nn::linear(p / "l1", obs_dim as i64, 128, Default::default()))
            .add_fn(|x| x.relu())
            .add(nn::linear(p / "l2", 128, 64, Default::default()))
            .add_fn(|x| x.relu())
            .add(nn::linear(
                p / "l3",
                64,
                action_dim as i64,
                Default::default(),
            ))
            .add_fn(|x| x.tanh());
        Self {
            vs,
            net,
            obs_dim,
            action_dim,
        }
    }

    pub fn var_store(&self) -> &nn::VarStore {
        &self.vs
    }

    pub fn var_store_mut(&mut self) -> &mut nn::VarStore {
        &mut self.vs
    }
}

impl Policy for MlpPolicy {
    fn compute_actions(
        &mut self,
        observations: &[Vec<f64>],
    ) -> Result<AgentTuple, CollaboratorError> {
        let n_agents = observations.len();
        if n_agents == 0 {
            return Ok(Vec::new());
        }
        if let Some(obs) = observations.iter().find(|o| o.len() != self.obs_dim) {
            return Err(format!(
                "observation has {} features, network expects {}",
                obs.len(),
                self.obs_dim
            )
            .into());
        }
        let flat: Vec<f64> = observations.iter().flatten().copied().collect();
        let input = Tensor::from_slice(&flat)
            .reshape([n_agents as i64, self.obs_dim as i64])
            .to_kind(Kind::Float)
            .to_device(self.vs.device());
        let output = tch::no_grad(|| self.net.forward(&input))
            .to_kind(Kind::Double)
            .to_device(Device::Cpu)
            .flatten(0, -1);
        let values = Vec::<f64>::try_from(&output)?;
        Ok(values
            .chunks(self.action_dim)
            .map(<[f64]>::to_vec)
            .collect())
    }

    fn name(&self) -> &str {
        "mlp"
    }
}

impl RestorePolicy for MlpPolicy {
    /// Loads a `VarStore` saved at the checkpoint path.
    fn restore(checkpoint: &Checkpoint) -> Result<Self, CollaboratorError> {
        let mut policy = Self::new(
            ScenarioConfig::OBSERVATION_DIM,
            ScenarioConfig::ACTION_DIM,
            Device::cuda_if_available(),
        );
        policy.vs.load(checkpoint.path())?;
        Ok(policy)
    }
}
