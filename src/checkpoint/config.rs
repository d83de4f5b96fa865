//! Trainer configuration stored next to a checkpoint.

use serde::{Deserialize, Serialize};

/// Environment section of the trainer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Scenario identifier, also used as the figure title.
    pub scenario_name: String,
    /// Step budget per episode.
    pub max_steps: u32,
    /// Number of vectorized environment copies.
    #[serde(default = "default_num_envs")]
    pub num_envs: u32,
    #[serde(default = "default_true")]
    pub continuous_actions: bool,
    /// Scenario-specific parameters, passed through untouched.
    #[serde(default)]
    pub scenario_config: serde_json::Value,
}

/// Options of the custom policy model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomModelConfig {
    /// Whether agents have individual (heterogeneous) parameters.
    #[serde(default)]
    pub heterogeneous: bool,
    /// Whether agents share observations (GIPPO) or act independently (IPPO).
    #[serde(default)]
    pub share_observations: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub custom_model_config: CustomModelConfig,
}

/// Configuration a trained policy was produced with.
///
/// Read from `params.json` in the directory holding the checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Registered environment name.
    pub env: String,
    #[serde(default)]
    pub seed: u64,
    pub env_config: EnvConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub in_evaluation: bool,
    #[serde(default)]
    pub num_workers: u32,
    #[serde(default)]
    pub num_gpus: u32,
    #[serde(default = "default_num_envs")]
    pub num_envs_per_worker: u32,
}

impl TrainerConfig {
    /// Overrides for single-process evaluation: one environment copy, no
    /// remote workers, no GPUs.
    pub fn for_evaluation(mut self) -> Self {
        self.env_config.num_envs = 1;
        self.in_evaluation = true;
        self.num_workers = 0;
        self.num_gpus = 0;
        self.num_envs_per_worker = 1;
        self
    }

    /// Display and file names for the model and the scenario.
    pub fn model_name(&self) -> ModelName {
        let custom = &self.model.custom_model_config;
        let model_title = format!(
            "{}{}",
            if custom.heterogeneous { "Het" } else { "" },
            if custom.share_observations {
                "GIPPO"
            } else {
                "IPPO"
            }
        );
        let env_title = self.env_config.scenario_name.clone();
        ModelName {
            model_name: file_safe(&model_title),
            model_title,
            env_name: file_safe(&env_title),
            env_title,
        }
    }
}

/// Titles (for figures) and names (for files) derived from a
/// [`TrainerConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    pub model_title: String,
    pub model_name: String,
    pub env_title: String,
    pub env_name: String,
}

fn file_safe(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

fn default_num_envs() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TrainerConfig {
        serde_json::from_str(
            r#"{
                "env": "navigation",
                "seed": 3,
                "num_workers": 4,
                "env_config": {
                    "scenario_name": "Het Navigation",
                    "max_steps": 100,
                    "num_envs": 32,
                    "scenario_config": {"n_agents": 2}
                },
                "model": {
                    "custom_model_config": {"heterogeneous": true, "share_observations": true}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_with_defaults() {
        let cfg = sample();
        assert_eq!(cfg.env_config.max_steps, 100);
        assert!(cfg.env_config.continuous_actions);
        assert!(!cfg.in_evaluation);
        assert_eq!(cfg.env_config.scenario_config["n_agents"], 2);
    }

    #[test]
    fn evaluation_overrides() {
        let cfg = sample().for_evaluation();
        assert_eq!(cfg.env_config.num_envs, 1);
        assert_eq!(cfg.num_workers, 0);
        assert!(cfg.in_evaluation);
    }

    #[test]
    fn model_names() {
        let name = sample().model_name();
        assert_eq!(name.model_title, "HetGIPPO");
        assert_eq!(name.model_name, "hetgippo");
        assert_eq!(name.env_title, "Het Navigation");
        assert_eq!(name.env_name, "het_navigation");
    }

    #[test]
    fn homogeneous_independent_model_is_ippo() {
        let mut cfg = sample();
        cfg.model.custom_model_config = CustomModelConfig::default();
        assert_eq!(cfg.model_name().model_title, "IPPO");
    }
}
