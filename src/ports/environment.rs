//! Environment port - sensing and acting in the simulated world.

use crate::{
    Result,
    types::{Action, AgentId, Percepts, Pose},
};

/// Everything a driving agent may ask of the world.
///
/// Unknown agent handles fail with [`crate::Error::UnknownAgent`].
pub trait Environment {
    /// The fixed, ordered set of legal moves.
    fn valid_actions(&self) -> &[Action];

    /// Read the light and nearby traffic at the car's intersection.
    fn sense(&self, agent: AgentId) -> Result<Percepts>;

    /// Execute `action` for the car and return the scalar reward.
    fn act(&mut self, agent: AgentId, action: Action) -> Result<f64>;

    /// Ticks left before the car's deadline. May go negative.
    fn deadline(&self, agent: AgentId) -> Result<i32>;

    fn pose(&self, agent: AgentId) -> Result<Pose>;

    /// Publish the car's intended move so other drivers can perceive it.
    fn announce_waypoint(&mut self, agent: AgentId, waypoint: Option<Action>) -> Result<()>;
}
