//! Agent port - a driver that the simulator resets and ticks.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::Environment,
    types::{Action, Percepts, Position},
};

/// What happened during one tick of a driving agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub t: u64,
    pub deadline: i32,
    pub percepts: Percepts,
    pub waypoint: Option<Action>,
    pub action: Action,
    pub reward: f64,
}

/// Capability interface for anything the simulator can drive.
///
/// There is a single learning implementation,
/// [`crate::agent::DrivingAgent`]; tests supply scripted ones.
pub trait Agent: Send {
    fn name(&self) -> &str;

    /// Prepare for a new trial heading to `destination`.
    fn reset(&mut self, destination: Position) -> Result<()>;

    /// Run one sense/decide/act/learn cycle at time `t`.
    fn update(&mut self, env: &mut dyn Environment, t: u64) -> Result<StepRecord>;
}
