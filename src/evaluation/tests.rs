//! Batch evaluator test suite.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::*;
use crate::checkpoint::{CheckpointError, PARAMS_FILE};
use crate::injection::{InjectMode, InjectionSpec};
use crate::rollout::{CollectionConfig, Environment};
use crate::testing::{trainer_config, ConstantPolicy, CountdownEnv};

type Handle = PolicyHandle<ConstantPolicy, CountdownEnv>;

fn handle(n_agents: usize, horizon: u32, max_steps: u32) -> Handle {
    PolicyHandle::new(
        ConstantPolicy {
            value: 0.5,
            dim: 2,
        },
        CountdownEnv::new(n_agents, horizon),
        trainer_config(n_agents, max_steps),
    )
}

fn write_run(dir: &Path, weights: &str) -> PathBuf {
    let params = serde_json::to_string(&trainer_config(2, 6)).unwrap();
    fs::write(dir.join(PARAMS_FILE), params).unwrap();
    let ckpt = dir.join("checkpoint-1");
    fs::write(&ckpt, weights).unwrap();
    ckpt
}

mod loading {
    use super::*;

    #[test]
    fn load_restores_policy_and_environment() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = write_run(dir.path(), "0.25");
        let handle: Handle = PolicyHandle::load(&ckpt).unwrap();
        assert_eq!(handle.policy().value, 0.25);
        assert_eq!(handle.env().n_agents, 2);
        assert_eq!(handle.max_steps(), 6);
        assert_eq!(handle.config().env_config.num_envs, 1);
        assert!(handle.config().in_evaluation);
        assert_eq!(handle.name().env_title, "Countdown");
    }

    #[test]
    fn load_with_applies_update() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = write_run(dir.path(), "0.25");
        let handle: Handle = PolicyHandle::load_with(&ckpt, |mut c| {
            c.env_config.max_steps = 3;
            c
        })
        .unwrap();
        assert_eq!(handle.env().horizon, 3);
    }

    #[test]
    fn restore_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = write_run(dir.path(), "not a number");
        let err = Handle::load(&ckpt).unwrap_err();
        assert!(matches!(err, CheckpointError::Restore { .. }));
    }
}

mod batches {
    use super::*;

    #[test]
    fn zero_episodes_is_rejected() {
        let mut evaluator = BatchEvaluator::new(0, 1);
        let mut h = handle(2, 3, 3);
        assert!(matches!(
            evaluator.rollout_episodes(&mut h, None),
            Err(EvaluationError::NoEpisodes)
        ));
    }

    #[test]
    fn rollout_returns_one_reward_per_episode() {
        let mut evaluator = BatchEvaluator::new(4, 1);
        let mut h = handle(2, 3, 3);
        let batch = evaluator.rollout_episodes(&mut h, None).unwrap();
        assert_eq!(batch.rewards(), vec![3.0; 4]);
        assert!(batch.best_frames.is_none());
        assert_eq!(batch.best_episode, Some(0));
    }

    #[test]
    fn best_frames_belong_to_best_episode() {
        let spec = InjectionSpec::new(InjectMode::ActionNoise, [0, 1], 0.5).unwrap();
        let mut evaluator = BatchEvaluator::new(6, 9).with_collection(CollectionConfig::all());
        let mut h = handle(2, 4, 4);
        h.parts_mut().1.action_penalty = 1.0;
        let batch = evaluator.rollout_episodes(&mut h, Some(&spec)).unwrap();
        let rewards = batch.rewards();
        let best = batch.best_episode.unwrap();
        assert!(rewards.iter().all(|r| *r <= rewards[best]));
        assert_eq!(batch.best_frames.unwrap(), vec![0, 1, 2, 3, 4]);
        assert!(batch.episodes.iter().all(|e| e.frames.is_none()));
    }

    #[test]
    fn observation_noise_end_to_end() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [0], 0.1).unwrap();
        let mut evaluator =
            BatchEvaluator::new(5, 3).with_collection(CollectionConfig::trajectories());
        let mut h = handle(2, 8, 8);
        assert_eq!(h.env().control_bounds(), vec![1.0, 1.0]);
        let batch = evaluator.rollout_episodes(&mut h, Some(&spec)).unwrap();
        assert_eq!(batch.episodes.len(), 5);
        for episode in &batch.episodes {
            let logged = episode.observations.as_ref().unwrap();
            assert_eq!(logged.len(), episode.steps as usize);
            for (step, obs) in logged.iter().enumerate() {
                let raw = step as f64;
                assert!(obs[0].iter().all(|o| (o - raw).abs() <= 0.1));
                assert!(obs[1].iter().all(|o| *o == raw));
            }
        }
    }

    #[test]
    fn evaluate_runs_baseline_and_injection() {
        let spec = InjectionSpec::new(InjectMode::ActionNoise, [1], 1.0).unwrap();
        let mut evaluator = BatchEvaluator::new(3, 5);
        let mut handles = vec![handle(2, 5, 5), handle(2, 5, 5)];
        for h in &mut handles {
            h.parts_mut().1.action_penalty = 0.1;
        }
        let results = evaluator.evaluate(&mut handles, Some(&spec), true).unwrap();
        assert_eq!(results.len(), 2);
        for result in &results {
            let baseline = result.baseline.as_ref().unwrap();
            let injected = result.injected.as_ref().unwrap();
            assert_eq!(baseline.len(), 3);
            assert_eq!(injected.len(), 3);
            // 2 agents x 2 dims x |0.5| x 0.1 penalty over 5 steps
            assert!(baseline.iter().all(|r| (r - 4.0).abs() < 1e-9));
            assert!(result.retention().is_some());
        }
    }

    #[test]
    fn evaluate_without_baseline() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [0], 0.2).unwrap();
        let mut evaluator = BatchEvaluator::new(2, 5);
        let mut handles = vec![handle(2, 4, 4)];
        let results = evaluator.evaluate(&mut handles, Some(&spec), false).unwrap();
        assert!(results[0].baseline.is_none());
        assert_eq!(results[0].injected.as_deref(), Some(&[4.0, 4.0][..]));
        assert!(results[0].retention().is_none());
    }

    #[test]
    fn seeded_evaluators_agree() {
        let spec = InjectionSpec::new(InjectMode::ActionNoise, [0], 0.3).unwrap();
        let run = || {
            let mut evaluator = BatchEvaluator::new(3, 42);
            let mut h = handle(2, 5, 5);
            h.parts_mut().1.action_penalty = 1.0;
            evaluator.rollout_episodes(&mut h, Some(&spec)).unwrap().rewards()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn too_many_targets_propagates() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [0, 1, 2], 0.1).unwrap();
        let mut evaluator = BatchEvaluator::new(2, 5);
        let mut h = handle(2, 4, 4);
        let err = evaluator.rollout_episodes(&mut h, Some(&spec)).unwrap_err();
        assert!(matches!(err, EvaluationError::Rollout(_)));
    }
}

mod sweeps {
    use super::*;

    #[test]
    fn tensor_shape_follows_policies_magnitudes_episodes() {
        let grid = SweepGrid::linspace(0.0, 1.0, 4).unwrap();
        let mut evaluator = BatchEvaluator::new(3, 11);
        let mut handles = vec![handle(2, 5, 5), handle(2, 5, 5)];
        let targets = BTreeSet::from([0]);
        let results = evaluator
            .sweep(&mut handles, &grid, InjectMode::ActionNoise, &targets)
            .unwrap();
        assert_eq!(results.rewards.dim(), (2, 4, 3));
        assert_eq!(results.ended_early.dim(), (2, 4, 3));
        assert_eq!(results.magnitudes, grid.magnitudes());
        assert_eq!(results.models.len(), 2);
        assert_eq!(results.n_episodes(), 3);
        assert_eq!(results.policy_rewards(1).dim(), (4, 3));
    }

    #[test]
    fn zero_magnitude_matches_baseline() {
        let grid = SweepGrid::from_magnitudes(vec![0.0, 1.5]).unwrap();
        let mut evaluator = BatchEvaluator::new(2, 11);
        let mut handles = vec![handle(2, 5, 5)];
        handles[0].parts_mut().1.action_penalty = 0.1;
        let targets = BTreeSet::from([0, 1]);
        let results = evaluator
            .sweep(&mut handles, &grid, InjectMode::ActionNoise, &targets)
            .unwrap();
        for e in 0..2 {
            assert!((results.rewards[[0, 0, e]] - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn early_termination_is_flagged() {
        let grid = SweepGrid::linspace(0.0, 0.5, 2).unwrap();
        let mut evaluator = BatchEvaluator::new(2, 11);
        let mut handles = vec![handle(2, 3, 10), handle(2, 10, 10)];
        let targets = BTreeSet::from([1]);
        let results = evaluator
            .sweep(&mut handles, &grid, InjectMode::ObservationNoise, &targets)
            .unwrap();
        assert!(results.ended_early.index_axis(ndarray::Axis(0), 0).iter().all(|f| *f));
        assert!(results.ended_early.index_axis(ndarray::Axis(0), 1).iter().all(|f| !*f));
    }
}
