//! Configuration types for agent creation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::q_learning::{LearnerParams, UpdateRule};

/// Configuration for creating a driving agent.
///
/// This type provides a type-safe, builder-style API for configuring agents
/// before creation through the dependency injection container.
///
/// # Examples
///
/// ```
/// use smartcab::app::AgentConfig;
/// use smartcab::q_learning::{LearnerParams, UpdateRule};
///
/// let config = AgentConfig::new(LearnerParams::new(0.05, 0.1, 0.9))
///     .with_seed(42)
///     .with_update_rule(UpdateRule::Canonical)
///     .with_strict(true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Exploration rate, learning rate and discount
    pub params: LearnerParams,
    /// Update law applied to revisited pairs
    pub update_rule: UpdateRule,
    /// Reject foreign actions and non-finite rewards
    pub strict: bool,
    /// Clear the learned table at the start of every trial
    pub reset_between_trials: bool,
    /// Run log receiving the parameter banner and table dumps
    pub log_path: Option<PathBuf>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a new agent configuration with the given learning parameters.
    ///
    /// Uses default values for other parameters:
    /// - Update rule: `UpdateRule::Incremental`
    /// - Strict: off
    /// - Reset between trials: off
    /// - Run log: none
    /// - Seed: None (non-deterministic)
    pub fn new(params: LearnerParams) -> Self {
        Self {
            params,
            update_rule: UpdateRule::default(),
            strict: false,
            reset_between_trials: false,
            log_path: None,
            seed: None,
        }
    }

    pub fn with_update_rule(mut self, rule: UpdateRule) -> Self {
        self.update_rule = rule;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_reset_between_trials(mut self, reset: bool) -> Self {
        self.reset_between_trials = reset;
        self
    }

    /// Append the run log to `path`.
    pub fn with_log_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(LearnerParams::driving())
    }
}
