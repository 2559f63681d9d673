//! Headless trial runner

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    ports::{Agent, Environment, Observer},
    world::GridWorld,
};

/// Simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Number of trials to run
    pub n_trials: usize,

    /// Pause between ticks
    pub update_delay: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            n_trials: 100,
            update_delay: Duration::ZERO,
        }
    }
}

/// How a single trial went for the primary agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trial: usize,
    /// Reached the destination at all
    pub reached: bool,
    /// Reached it with deadline to spare
    pub on_time: bool,
    pub steps: usize,
    pub total_reward: f64,
    /// Ticks with a negative reward
    pub penalties: usize,
    /// Deadline left at the last tick
    pub deadline_left: i32,
}

/// Result of a simulator run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub total_trials: usize,
    pub successes: usize,
    pub on_time: usize,
    pub success_rate: f64,
    pub on_time_rate: f64,
    pub mean_reward: f64,
    pub mean_steps: f64,
    pub penalties: usize,
}

impl RunResult {
    pub fn from_trials(trials: &[TrialSummary]) -> Self {
        let total_trials = trials.len();
        let successes = trials.iter().filter(|t| t.reached).count();
        let on_time = trials.iter().filter(|t| t.on_time).count();
        let penalties = trials.iter().map(|t| t.penalties).sum();
        let rate = |count: f64| {
            if total_trials > 0 {
                count / total_trials as f64
            } else {
                0.0
            }
        };

        Self {
            total_trials,
            successes,
            on_time,
            success_rate: rate(successes as f64),
            on_time_rate: rate(on_time as f64),
            mean_reward: rate(trials.iter().map(|t| t.total_reward).sum()),
            mean_steps: rate(trials.iter().map(|t| t.steps as f64).sum()),
            penalties,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives trials of a [`GridWorld`] with one primary agent.
///
/// Each tick: lights and dummy traffic move, the agent updates, then time
/// advances and deadlines are checked.
pub struct Simulator {
    config: SimulatorConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the simulator
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run every configured trial.
    ///
    /// `agent` must be the car registered as the world's primary agent.
    pub fn run(&mut self, world: &mut GridWorld, agent: &mut dyn Agent) -> Result<RunResult> {
        for observer in &mut self.observers {
            observer.on_run_start(self.config.n_trials)?;
        }

        let mut trials = Vec::with_capacity(self.config.n_trials);
        for trial in 0..self.config.n_trials {
            let summary = self.run_trial(trial, world, agent)?;
            for observer in &mut self.observers {
                observer.on_trial_end(trial, &summary)?;
            }
            trials.push(summary);
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        let result = RunResult::from_trials(&trials);
        info!(
            trials = result.total_trials,
            success_rate = result.success_rate,
            mean_reward = result.mean_reward,
            "run finished"
        );
        Ok(result)
    }

    fn run_trial(
        &mut self,
        trial: usize,
        world: &mut GridWorld,
        agent: &mut dyn Agent,
    ) -> Result<TrialSummary> {
        let destination = world.reset()?;
        let primary = world
            .primary_agent()
            .ok_or(crate::Error::NoPrimaryAgent)?;
        let deadline = world.deadline(primary)?;
        agent.reset(destination)?;

        for observer in &mut self.observers {
            observer.on_trial_start(trial, destination, deadline)?;
        }

        let mut summary = TrialSummary {
            trial,
            reached: false,
            on_time: false,
            steps: 0,
            total_reward: 0.0,
            penalties: 0,
            deadline_left: deadline,
        };

        while !world.is_done() {
            world.begin_step()?;
            let t = world.t();
            let record = agent.update(world, t)?;
            world.end_step();

            summary.steps += 1;
            summary.total_reward += record.reward;
            if record.reward < 0.0 {
                summary.penalties += 1;
            }
            summary.deadline_left = record.deadline;

            for observer in &mut self.observers {
                observer.on_step(trial, &record)?;
            }

            if !world.is_done() && !self.config.update_delay.is_zero() {
                std::thread::sleep(self.config.update_delay);
            }
        }

        let status = world.status();
        summary.reached = status.reached;
        summary.on_time = status.on_time;
        info!(
            trial,
            reached = summary.reached,
            steps = summary.steps,
            total_reward = summary.total_reward,
            "trial finished"
        );
        Ok(summary)
    }
}
