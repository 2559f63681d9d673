//! Run command - Train the driving agent in the grid world

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};

use crate::{
    app::{AgentConfig, App},
    cli::output::{format_number, format_rate, print_kv, print_section, print_subsection},
    pipeline::{JsonlObserver, MetricsObserver, ProgressObserver, Simulator, SimulatorConfig},
    q_learning::{LearnerParams, UpdateRule},
    world::WorldConfig,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UpdateRuleArg {
    /// Q += α(r - γ·max Q')
    Incremental,
    /// Q += α(r + γ·max Q' - Q)
    Canonical,
}

impl From<UpdateRuleArg> for UpdateRule {
    fn from(arg: UpdateRuleArg) -> Self {
        match arg {
            UpdateRuleArg::Incremental => UpdateRule::Incremental,
            UpdateRuleArg::Canonical => UpdateRule::Canonical,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the driving agent", allow_negative_numbers = true)]
pub struct RunArgs {
    /// Number of trials
    #[arg(long, short = 'n', default_value_t = 100)]
    pub trials: usize,

    /// Pause between ticks, in seconds
    #[arg(long, default_value_t = 0.0)]
    pub update_delay: f64,

    /// Exploration rate
    #[arg(long, default_value_t = 0.05)]
    pub epsilon: f64,

    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    pub alpha: f64,

    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Update law for revisited state-action pairs
    #[arg(long, value_enum, default_value = "incremental")]
    pub update_rule: UpdateRuleArg,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of dummy cars
    #[arg(long, default_value_t = 3)]
    pub dummies: usize,

    /// Let trials run past the deadline (up to the hard time limit)
    #[arg(long, default_value_t = false)]
    pub no_deadline: bool,

    /// Clear the learned table at the start of every trial
    #[arg(long, default_value_t = false, conflicts_with = "load")]
    pub reset_between_trials: bool,

    /// Reject unknown actions and non-finite rewards
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Run log receiving the parameter banner
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Append every table entry to the run log after the last trial
    #[arg(long, default_value_t = false, requires = "log")]
    pub dump_table: bool,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Save the learned table as MessagePack
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Save the learned table as JSON
    #[arg(long)]
    pub table_json: Option<PathBuf>,

    /// Start from a previously saved table
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let update_delay = Duration::try_from_secs_f64(args.update_delay)
        .map_err(|e| anyhow!("Invalid --update-delay {}: {e}", args.update_delay))?;

    let params = LearnerParams::new(args.epsilon, args.alpha, args.gamma);
    let mut agent_config = AgentConfig::new(params)
        .with_update_rule(args.update_rule.into())
        .with_strict(args.strict)
        .with_reset_between_trials(args.reset_between_trials);
    if let Some(seed) = args.seed {
        agent_config = agent_config.with_seed(seed);
    }
    if let Some(log) = &args.log {
        agent_config = agent_config.with_log_path(log);
    }

    let app = App::new();
    let mut world = app
        .create_world(WorldConfig {
            num_dummies: args.dummies,
            seed: args.seed,
            ..WorldConfig::default()
        })
        .context("Failed to build grid world")?;
    let id = world.create_agent();
    world.set_primary_agent(id, !args.no_deadline)?;

    let mut agent = match &args.load {
        Some(path) => app
            .load_agent(id, agent_config, path)
            .with_context(|| format!("Failed to load table from {}", path.display()))?,
        None => app
            .create_agent(id, agent_config)
            .context("Failed to create agent")?,
    };

    let mut simulator = Simulator::new(SimulatorConfig {
        n_trials: args.trials,
        update_delay,
    });
    if !args.no_progress {
        simulator = simulator.with_observer(Box::new(ProgressObserver::new()));
    }
    simulator = simulator.with_observer(Box::new(MetricsObserver::new()));
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        simulator = simulator.with_observer(Box::new(observer));
    }

    let result = simulator.run(&mut world, &mut agent)?;

    print_section("Run Complete");
    print_kv("Trials", &format_number(result.total_trials));
    print_kv(
        "Reached",
        &format!(
            "{} ({})",
            result.successes,
            format_rate(result.success_rate)
        ),
    );
    print_kv(
        "On time",
        &format!("{} ({})", result.on_time, format_rate(result.on_time_rate)),
    );
    print_kv("Mean reward", &format!("{:.2}", result.mean_reward));
    print_kv("Mean steps", &format!("{:.1}", result.mean_steps));
    print_kv("Penalties", &format_number(result.penalties));

    print_subsection("Learner");
    let learner = agent.learner();
    print_kv("Epsilon", &learner.params().epsilon.to_string());
    print_kv("Alpha", &learner.params().alpha.to_string());
    print_kv("Gamma", &learner.params().gamma.to_string());
    print_kv("Update rule", &learner.update_rule().to_string());
    print_kv("Table entries", &format_number(learner.table().len()));

    if args.dump_table {
        agent
            .learner_mut()
            .dump_table()
            .context("Failed to dump table to run log")?;
    }

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("\nSummary written to: {}", path.display());
    }

    if let Some(path) = &args.output {
        app.save_snapshot(&agent, path)
            .with_context(|| format!("Failed to save table to {}", path.display()))?;
        println!("Table saved to: {}", path.display());
    }

    if let Some(path) = &args.table_json {
        save_table_json(&agent, path)?;
        println!("Table written to: {}", path.display());
    }

    Ok(())
}

fn save_table_json(agent: &crate::agent::DrivingAgent, path: &Path) -> Result<()> {
    agent
        .learner()
        .snapshot()
        .save_json(path)
        .with_context(|| format!("Failed to write table to {}", path.display()))
}
