//! Resilience CLI
//!
//! Evaluates trained navigation checkpoints under observation or action noise.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use marl_resilience::checkpoint::{BuildEnvironment, RestorePolicy};
use marl_resilience::config::{PolicyKind, ResilienceConfig};
use marl_resilience::pipeline::{evaluate_increasing_noise, evaluate_resilience};
use marl_resilience::policies::{GoalSeekingPolicy, LinearPolicy, RandomPolicy};
use marl_resilience::scenarios::NavigationEnvironment;

#[derive(Parser)]
#[command(name = "resilience")]
#[command(version, about = "Resilience evaluation of multi-agent policies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RunArgs {
    /// JSON run configuration
    #[arg(long)]
    config: PathBuf,

    /// Overrides the episodes per model
    #[arg(long)]
    episodes: Option<usize>,

    /// Overrides the noise seed
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the results directory
    #[arg(long)]
    result_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare rewards with and without a fixed noise injection
    Evaluate(RunArgs),

    /// Sweep the noise magnitude and plot reward curves
    Sweep(RunArgs),

    /// Print a default configuration
    Init,
}

#[derive(Clone, Copy)]
enum Run {
    Resilience,
    Sweep,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate(args) => dispatch(Run::Resilience, &load_config(args)?)?,
        Commands::Sweep(args) => dispatch(Run::Sweep, &load_config(args)?)?,
        Commands::Init => {
            println!("{}", serde_json::to_string_pretty(&ResilienceConfig::default())?);
        }
    }

    Ok(())
}

fn load_config(args: RunArgs) -> Result<ResilienceConfig> {
    let mut config = ResilienceConfig::from_file(&args.config)?;
    if let Some(episodes) = args.episodes {
        config.n_episodes = episodes;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(result_dir) = args.result_dir {
        config.result_dir = result_dir;
    }
    config.validate()?;
    Ok(config)
}

fn dispatch(run: Run, config: &ResilienceConfig) -> Result<()> {
    match config.policy {
        PolicyKind::Linear => execute::<LinearPolicy, NavigationEnvironment>(run, config),
        PolicyKind::GoalSeeking => {
            execute::<GoalSeekingPolicy, NavigationEnvironment>(run, config)
        }
        PolicyKind::Random => execute::<RandomPolicy, NavigationEnvironment>(run, config),
        #[cfg(feature = "nn")]
        PolicyKind::Mlp => {
            execute::<marl_resilience::policies::MlpPolicy, NavigationEnvironment>(run, config)
        }
        #[cfg(not(feature = "nn"))]
        PolicyKind::Mlp => anyhow::bail!("mlp checkpoints require the 'nn' feature"),
    }
}

fn execute<P, E>(run: Run, config: &ResilienceConfig) -> Result<()>
where
    P: RestorePolicy,
    E: BuildEnvironment,
{
    let figure = match run {
        Run::Resilience => evaluate_resilience::<P, E>(config)?.figure,
        Run::Sweep => evaluate_increasing_noise::<P, E>(config)?.figure,
    };
    match figure {
        Some(path) => tracing::info!(path = %path.display(), "Done"),
        None => tracing::info!("Done"),
    }
    Ok(())
}
