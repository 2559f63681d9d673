//! Simulation pipeline
//!
//! This module provides:
//! - A headless simulator that drives trials of the grid world
//! - Observers that record progress, aggregates and per-trial traces

pub mod observers;
pub mod simulator;

// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, TrialObservation,
};
pub use simulator::{RunResult, Simulator, SimulatorConfig, TrialSummary};

pub use crate::ports::{Agent, Observer};
