//! Observer port - watching simulator runs
//!
//! Observers collect data during a run without the simulator knowing about
//! output formats.

use crate::{Result, pipeline::TrialSummary, ports::StepRecord, types::Position};

/// Observer trait for monitoring simulator runs
///
/// # Event Sequence
///
/// 1. `on_run_start(total_trials)` - once
/// 2. For each trial:
///    - `on_trial_start(trial, destination, deadline)`
///    - `on_step(trial, record)` - for each tick of the primary agent
///    - `on_trial_end(trial, summary)`
/// 3. `on_run_end()` - once
///
/// # Examples
///
/// ```no_run
/// use smartcab::{pipeline::TrialSummary, ports::Observer};
///
/// struct SuccessCounter {
///     successes: usize,
/// }
///
/// impl Observer for SuccessCounter {
///     fn on_trial_end(&mut self, _trial: usize, summary: &TrialSummary) -> smartcab::Result<()> {
///         if summary.reached {
///             self.successes += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_run_start(&mut self, _total_trials: usize) -> Result<()> {
        Ok(())
    }

    fn on_trial_start(
        &mut self,
        _trial: usize,
        _destination: Position,
        _deadline: i32,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after every tick of the primary agent, once it has learned.
    fn on_step(&mut self, _trial: usize, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    fn on_trial_end(&mut self, _trial: usize, _summary: &TrialSummary) -> Result<()> {
        Ok(())
    }

    /// Use this to flush files or print summaries.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}
