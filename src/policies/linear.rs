//! Linear policy restored from a JSON checkpoint.
//!
//! Checkpoint payload:
//!
//! ```json
//! {
//!   "squash": true,
//!   "layers": [
//!     {"weights": [[0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
//!                  [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]],
//!      "bias": [0.0, 0.0]}
//!   ]
//! }
//! ```
//!
//! A heterogeneous model has one layer per agent; a homogeneous model shares
//! a single layer.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::checkpoint::{Checkpoint, RestorePolicy};
use crate::rollout::{AgentTuple, CollaboratorError, Policy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearLayerRecord {
    /// Row-major `[action_dim][observation_dim]` matrix.
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearCheckpoint {
    /// Whether outputs pass through `tanh`.
    #[serde(default)]
    pub squash: bool,
    pub layers: Vec<LinearLayerRecord>,
}

#[derive(Debug, Clone)]
struct LinearLayer {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl LinearLayer {
    fn from_record(record: LinearLayerRecord) -> Result<Self, CollaboratorError> {
        let rows = record.weights.len();
        let cols = record.weights.first().map_or(0, Vec::len);
        if record.weights.iter().any(|row| row.len() != cols) {
            return Err("linear weights are ragged".into());
        }
        if record.bias.len() != rows {
            return Err(format!("bias has {} entries, expected {rows}", record.bias.len()).into());
        }
        let flat = record.weights.into_iter().flatten().collect();
        Ok(Self {
            weights: Array2::from_shape_vec((rows, cols), flat)?,
            bias: Array1::from(record.bias),
        })
    }

    fn forward(&self, obs: ArrayView1<'_, f64>) -> Result<Array1<f64>, CollaboratorError> {
        if obs.len() != self.weights.ncols() {
            return Err(format!(
                "observation has {} features, layer expects {}",
                obs.len(),
                self.weights.ncols()
            )
            .into());
        }
        Ok(self.weights.dot(&obs) + &self.bias)
    }
}

/// Per-agent affine map `a = W · o + b`, optionally squashed by `tanh`.
#[derive(Debug, Clone)]
pub struct LinearPolicy {
    layers: Vec<LinearLayer>,
    heterogeneous: bool,
    squash: bool,
}

impl LinearPolicy {
    /// Builds a policy from a decoded checkpoint.
    ///
    /// # Arguments
    ///
    /// * `checkpoint` - Layers and output squashing
    /// * `heterogeneous` - Whether each agent has its own layer
    pub fn from_checkpoint(
        checkpoint: LinearCheckpoint,
        heterogeneous: bool,
    ) -> Result<Self, CollaboratorError> {
        if checkpoint.layers.is_empty() {
            return Err("linear checkpoint has no layers".into());
        }
        if !heterogeneous && checkpoint.layers.len() != 1 {
            return Err(format!(
                "homogeneous model needs one shared layer, got {}",
                checkpoint.layers.len()
            )
            .into());
        }
        let layers = checkpoint
            .layers
            .into_iter()
            .map(LinearLayer::from_record)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            layers,
            heterogeneous,
            squash: checkpoint.squash,
        })
    }

    fn layer(&self, agent: usize) -> Result<&LinearLayer, CollaboratorError> {
        let index = if self.heterogeneous { agent } else { 0 };
        self.layers
            .get(index)
            .ok_or_else(|| format!("no layer for agent {agent}").into())
    }
}

impl Policy for LinearPolicy {
    fn compute_actions(
        &mut self,
        observations: &[Vec<f64>],
    ) -> Result<AgentTuple, CollaboratorError> {
        observations
            .iter()
            .enumerate()
            .map(|(i, obs)| -> Result<Vec<f64>, CollaboratorError> {
                let mut action = self.layer(i)?.forward(ArrayView1::from(obs.as_slice()))?;
                if self.squash {
                    action.mapv_inplace(f64::tanh);
                }
                Ok(action.to_vec())
            })
            .collect()
    }

    fn name(&self) -> &str {
        "linear"
    }
}

impl RestorePolicy for LinearPolicy {
    fn restore(checkpoint: &Checkpoint) -> Result<Self, CollaboratorError> {
        let payload: LinearCheckpoint = serde_json::from_slice(&checkpoint.read_weights()?)?;
        let heterogeneous = checkpoint.config().model.custom_model_config.heterogeneous;
        Self::from_checkpoint(payload, heterogeneous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(scale: f64) -> LinearLayerRecord {
        LinearLayerRecord {
            weights: vec![vec![scale, 0.0], vec![0.0, scale]],
            bias: vec![0.5, -0.5],
        }
    }

    #[test]
    fn shared_layer_applies_to_all_agents() {
        let checkpoint = LinearCheckpoint {
            squash: false,
            layers: vec![record(2.0)],
        };
        let mut policy = LinearPolicy::from_checkpoint(checkpoint, false).unwrap();
        let actions = policy
            .compute_actions(&[vec![1.0, 1.0], vec![0.0, 1.0]])
            .unwrap();
        assert_eq!(actions, vec![vec![2.5, 1.5], vec![0.5, 1.5]]);
    }

    #[test]
    fn heterogeneous_layers_are_per_agent() {
        let checkpoint = LinearCheckpoint {
            squash: false,
            layers: vec![record(1.0), record(-1.0)],
        };
        let mut policy = LinearPolicy::from_checkpoint(checkpoint, true).unwrap();
        let actions = policy
            .compute_actions(&[vec![1.0, 1.0], vec![1.0, 1.0]])
            .unwrap();
        assert_eq!(actions[0], vec![1.5, 0.5]);
        assert_eq!(actions[1], vec![-0.5, -1.5]);
        assert!(policy.compute_actions(&vec![vec![0.0; 2]; 3]).is_err());
    }

    #[test]
    fn squash_bounds_outputs() {
        let checkpoint = LinearCheckpoint {
            squash: true,
            layers: vec![record(100.0)],
        };
        let mut policy = LinearPolicy::from_checkpoint(checkpoint, false).unwrap();
        let actions = policy.compute_actions(&[vec![1.0, -1.0]]).unwrap();
        assert!(actions[0].iter().all(|a| a.abs() <= 1.0));
    }

    #[test]
    fn malformed_layers_are_rejected() {
        let ragged = LinearCheckpoint {
            squash: false,
            layers: vec![LinearLayerRecord {
                weights: vec![vec![1.0, 0.0], vec![1.0]],
                bias: vec![0.0, 0.0],
            }],
        };
        assert!(LinearPolicy::from_checkpoint(ragged, false).is_err());
        let shared = LinearCheckpoint {
            squash: false,
            layers: vec![record(1.0), record(1.0)],
        };
        assert!(LinearPolicy::from_checkpoint(shared, false).is_err());
    }

    #[test]
    fn wrong_observation_length_is_an_error() {
        let checkpoint = LinearCheckpoint {
            squash: false,
            layers: vec![record(1.0)],
        };
        let mut policy = LinearPolicy::from_checkpoint(checkpoint, false).unwrap();
        assert!(policy.compute_actions(&[vec![1.0; 3]]).is_err());
    }
}
