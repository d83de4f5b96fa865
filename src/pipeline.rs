//! End-to-end runs: load checkpoints, evaluate, summarize, draw.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::checkpoint::{BuildEnvironment, RestorePolicy};
use crate::config::ResilienceConfig;
use crate::error::{ConfigError, Result};
use crate::evaluation::{PolicyEvaluation, PolicyHandle, SweepResults};
use crate::injection::InjectionSpec;
use crate::plot::{self, PlotError};
use crate::rollout::{Environment, Policy};
use crate::stats::{RewardSummary, SweepStatistics};

type Drawn = std::result::Result<Option<PathBuf>, PlotError>;

/// Outcome of [`evaluate_resilience`].
#[derive(Debug, Clone)]
pub struct ResilienceReport {
    /// Shared scenario title of the evaluated checkpoints.
    pub figure_title: String,
    pub injection: InjectionSpec,
    pub evaluations: Vec<PolicyEvaluation>,
    /// Written figure; `None` when plotting is disabled or failed.
    pub figure: Option<PathBuf>,
}

/// Outcome of [`evaluate_increasing_noise`].
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub figure_title: String,
    pub results: SweepResults,
    pub statistics: SweepStatistics,
    pub figure: Option<PathBuf>,
}

/// Loads every configured checkpoint.
pub fn load_handles<P, E>(config: &ResilienceConfig) -> Result<Vec<PolicyHandle<P, E>>>
where
    P: RestorePolicy,
    E: BuildEnvironment,
{
    let handles = config
        .checkpoints
        .iter()
        .map(PolicyHandle::<P, E>::load)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(handles)
}

/// Title of the scenario all handles were trained on.
///
/// # Errors
///
/// [`ConfigError::Invalid`] if the handles come from different scenarios.
pub fn common_scenario<P: Policy, E: Environment>(
    handles: &[PolicyHandle<P, E>],
) -> Result<String> {
    let Some(first) = handles.first() else {
        return Err(ConfigError::Invalid("no checkpoints given".into()).into());
    };
    let title = &first.name().env_title;
    if let Some(other) = handles.iter().find(|h| &h.name().env_title != title) {
        return Err(ConfigError::Invalid(format!(
            "checkpoints mix scenarios {title} and {}",
            other.name().env_title
        ))
        .into());
    }
    Ok(title.clone())
}

/// Evaluates every checkpoint with and without the configured injection and
/// draws the comparison figure.
pub fn evaluate_resilience<P, E>(config: &ResilienceConfig) -> Result<ResilienceReport>
where
    P: RestorePolicy,
    E: BuildEnvironment,
{
    config.validate()?;
    let injection = config.injection_spec()?;
    let mut handles = load_handles::<P, E>(config)?;
    let figure_title = common_scenario(&handles)?;

    let mut evaluator = config.evaluator();
    let evaluations =
        evaluator.evaluate(&mut handles, Some(&injection), config.compute_baseline)?;
    for evaluation in &evaluations {
        log_evaluation(evaluation);
    }

    let figure = keep_results(draw_resilience_figure(
        config,
        &figure_title,
        &injection,
        &evaluations,
    ));
    Ok(ResilienceReport {
        figure_title,
        injection,
        evaluations,
        figure,
    })
}

/// Sweeps the configured noise grid over every checkpoint and draws the
/// reward curves.
pub fn evaluate_increasing_noise<P, E>(config: &ResilienceConfig) -> Result<SweepReport>
where
    P: RestorePolicy,
    E: BuildEnvironment,
{
    config.validate()?;
    let grid = config.sweep_grid()?;
    let mut handles = load_handles::<P, E>(config)?;
    let figure_title = common_scenario(&handles)?;

    let mut evaluator = config.evaluator();
    let results = evaluator.sweep(&mut handles, &grid, config.mode, &config.targets)?;
    let statistics = SweepStatistics::from_results(&results, config.reward_transform);
    for (p, model) in statistics.models.iter().enumerate() {
        let early = statistics.early_termination_rate.row(p);
        let worst = early.iter().copied().fold(0.0, f64::max);
        if worst > 0.0 {
            warn!(model = %model, rate = worst, "Episodes ended before max_steps");
        }
    }

    let figure = keep_results(draw_sweep_figure(config, &figure_title, &statistics));
    Ok(SweepReport {
        figure_title,
        results,
        statistics,
        figure,
    })
}

/// Drawing failures are logged; the evaluation results are still returned.
fn keep_results(drawn: Drawn) -> Option<PathBuf> {
    drawn.unwrap_or_else(|e| {
        warn!(error = %e, "Figure not drawn");
        None
    })
}

fn log_evaluation(evaluation: &PolicyEvaluation) {
    let model = &evaluation.name.model_title;
    let runs = [
        ("baseline", &evaluation.baseline),
        ("injected", &evaluation.injected),
    ];
    for (run, rewards) in runs {
        if let Some(summary) = rewards.as_deref().and_then(RewardSummary::from_rewards) {
            info!(
                model = %model,
                run,
                median = summary.median,
                q1 = summary.q1,
                q3 = summary.q3,
                mean = summary.mean,
                "Reward summary"
            );
        }
    }
    if let Some(retention) = evaluation.retention() {
        info!(
            model = %model,
            mean_pct = retention.mean_pct,
            median_pct = retention.median_pct,
            "Performance maintained"
        );
    }
}

#[cfg(feature = "plot")]
fn draw_resilience_figure(
    config: &ResilienceConfig,
    figure_title: &str,
    injection: &InjectionSpec,
    evaluations: &[PolicyEvaluation],
) -> Drawn {
    let path = plot::resilience_path(
        &config.result_dir,
        figure_title,
        &injection.file_stem(),
        config.plotting_mode,
    );
    let figure = plot::ResilienceFigure::new(figure_title, injection.title(), config.n_episodes);
    plot::draw_resilience(&path, &figure, evaluations, config.plotting_mode)?;
    Ok(Some(path))
}

#[cfg(not(feature = "plot"))]
fn draw_resilience_figure(
    _config: &ResilienceConfig,
    _figure_title: &str,
    _injection: &InjectionSpec,
    _evaluations: &[PolicyEvaluation],
) -> Drawn {
    warn!("Built without the plot feature; skipping figure");
    Ok(None)
}

#[cfg(feature = "plot")]
fn draw_sweep_figure(
    config: &ResilienceConfig,
    figure_title: &str,
    statistics: &SweepStatistics,
) -> Drawn {
    let path = plot::sweep_path(&config.result_dir, figure_title, config.mode, &config.targets);
    plot::draw_sweep(&path, figure_title, statistics, config.mode)?;
    Ok(Some(path))
}

#[cfg(not(feature = "plot"))]
fn draw_sweep_figure(
    _config: &ResilienceConfig,
    _figure_title: &str,
    _statistics: &SweepStatistics,
) -> Drawn {
    warn!("Built without the plot feature; skipping figure");
    Ok(None)
}
