//! Planner port - turns a destination into the next desired move.

use crate::types::{Action, Pose, Position};

pub trait Planner: Send {
    /// Set the destination for subsequent waypoint queries.
    fn route_to(&mut self, destination: Position);

    /// Next move toward the destination from `pose`.
    ///
    /// Returns `None` once the car stands on the destination.
    fn next_waypoint(&self, pose: Pose) -> Option<Action>;
}
