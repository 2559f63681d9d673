//! Smartcab: a self-driving cab that learns traffic rules by Q-learning
//!
//! This crate provides:
//! - A generic tabular Q-learner with ε-greedy selection and uniform tie-breaking
//! - A wrap-around grid world with traffic lights and dummy traffic
//! - A route planner and the Q-learning driving agent
//! - A headless simulator with observers for progress, metrics and traces
//! - Table snapshots and an append-only run log

pub mod adapters;
pub mod agent;
pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;
pub mod world;

pub use agent::DrivingAgent;
pub use error::{Error, Result};
pub use q_learning::{LearnerParams, QLearner, QTable, UpdateRule};
pub use types::{Action, DriveState};
