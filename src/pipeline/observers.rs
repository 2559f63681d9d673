//! Observer implementations for simulator runs

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    pipeline::TrialSummary,
    ports::{Observer, StepRecord},
    types::Position,
};

/// Progress bar observer - Shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    failures: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            failures: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} F:{}", self.successes, self.failures)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(total_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials (S:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, trial: usize, summary: &TrialSummary) -> Result<()> {
        if summary.reached {
            self.successes += 1;
        } else {
            self.failures += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(trial as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks per-run aggregates
#[derive(Debug, Default)]
pub struct MetricsObserver {
    trials: usize,
    successes: usize,
    on_time: usize,
    total_reward: f64,
    total_steps: usize,
    illegal_moves: usize,
}

/// Summary of run metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub trials: usize,
    pub successes: usize,
    pub on_time: usize,
    pub success_rate: f64,
    pub mean_reward: f64,
    pub mean_steps: f64,
    pub illegal_moves: usize,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.successes as f64 / self.trials as f64
        }
    }

    pub fn mean_reward(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_reward / self.trials as f64
        }
    }

    pub fn mean_steps(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.trials as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            trials: self.trials,
            successes: self.successes,
            on_time: self.on_time,
            success_rate: self.success_rate(),
            mean_reward: self.mean_reward(),
            mean_steps: self.mean_steps(),
            illegal_moves: self.illegal_moves,
        }
    }
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _trial: usize, record: &StepRecord) -> Result<()> {
        self.total_steps += 1;
        self.total_reward += record.reward;
        if record.reward == crate::world::grid::REWARD_ILLEGAL {
            self.illegal_moves += 1;
        }
        Ok(())
    }

    fn on_trial_end(&mut self, _trial: usize, summary: &TrialSummary) -> Result<()> {
        self.trials += 1;
        if summary.reached {
            self.successes += 1;
        }
        if summary.on_time {
            self.on_time += 1;
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        info!(
            trials = self.trials,
            success_rate = self.success_rate(),
            mean_steps = self.mean_steps(),
            illegal_moves = self.illegal_moves,
            "run metrics"
        );
        Ok(())
    }
}

/// Complete record of one trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialObservation {
    pub trial: usize,
    pub destination: Position,
    pub initial_deadline: i32,
    pub summary: TrialSummary,
    pub steps: Vec<StepRecord>,
}

/// JSONL observer - Writes one JSON object per trial
pub struct JsonlObserver {
    writer: BufWriter<File>,
    destination: Position,
    initial_deadline: i32,
    steps: Vec<StepRecord>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            destination: Position(0, 0),
            initial_deadline: 0,
            steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_trial_start(&mut self, _trial: usize, destination: Position, deadline: i32) -> Result<()> {
        self.destination = destination;
        self.initial_deadline = deadline;
        self.steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _trial: usize, record: &StepRecord) -> Result<()> {
        self.steps.push(record.clone());
        Ok(())
    }

    fn on_trial_end(&mut self, trial: usize, summary: &TrialSummary) -> Result<()> {
        let observation = TrialObservation {
            trial,
            destination: self.destination,
            initial_deadline: self.initial_deadline,
            summary: summary.clone(),
            steps: std::mem::take(&mut self.steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, Light, Percepts};

    fn step(reward: f64) -> StepRecord {
        StepRecord {
            t: 0,
            deadline: 10,
            percepts: Percepts::clear(Light::Green),
            waypoint: Some(Action::Forward),
            action: Action::Forward,
            reward,
        }
    }

    fn summary(trial: usize, reached: bool) -> TrialSummary {
        TrialSummary {
            trial,
            reached,
            on_time: reached,
            steps: 2,
            total_reward: 1.0,
            penalties: 1,
            deadline_left: 3,
        }
    }

    #[test]
    fn test_metrics_observer() {
        let mut metrics = MetricsObserver::new();
        metrics.on_step(0, &step(2.0)).unwrap();
        metrics.on_step(0, &step(-1.0)).unwrap();
        metrics.on_trial_end(0, &summary(0, true)).unwrap();
        metrics.on_trial_end(1, &summary(1, false)).unwrap();

        let s = metrics.summary();
        assert_eq!(s.trials, 2);
        assert_eq!(s.successes, 1);
        assert_eq!(s.success_rate, 0.5);
        assert_eq!(s.illegal_moves, 1);
        assert_eq!(s.mean_reward, 0.5);
        assert_eq!(s.mean_steps, 1.0);
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_trial() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("trials.jsonl");

        {
            let mut observer = JsonlObserver::new(&path).unwrap();
            for trial in 0..2 {
                observer.on_trial_start(trial, Position(3, 4), 20).unwrap();
                observer.on_step(trial, &step(2.0)).unwrap();
                observer.on_step(trial, &step(-0.5)).unwrap();
                observer.on_trial_end(trial, &summary(trial, true)).unwrap();
            }
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["trial"], 1);
        assert_eq!(parsed["steps"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["steps"][0]["action"], "forward");
    }
}
