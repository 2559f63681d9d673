//! Greedy route planner

use crate::{
    ports::Planner,
    types::{Action, Pose, Position},
};

/// Steers toward the destination, closing the east-west gap first.
///
/// Ignores lights, traffic and wrap-around shortcuts.
#[derive(Debug, Clone, Default)]
pub struct RoutePlanner {
    destination: Option<Position>,
}

impl RoutePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }
}

impl Planner for RoutePlanner {
    fn route_to(&mut self, destination: Position) {
        self.destination = Some(destination);
    }

    fn next_waypoint(&self, pose: Pose) -> Option<Action> {
        let destination = self.destination?;
        let dx = destination.0 - pose.location.0;
        let dy = destination.1 - pose.location.1;
        let (hx, hy) = (pose.heading.dx(), pose.heading.dy());

        if dx != 0 {
            Some(if dx * hx > 0 {
                Action::Forward
            } else if dx * hx < 0 {
                // Facing away: start a U-turn
                Action::Right
            } else if dx * hy > 0 {
                Action::Left
            } else {
                Action::Right
            })
        } else if dy != 0 {
            Some(if dy * hy > 0 {
                Action::Forward
            } else if dy * hy < 0 {
                Action::Right
            } else if dy * hx > 0 {
                Action::Right
            } else {
                Action::Left
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Heading;

    fn pose(x: i32, y: i32, heading: Heading) -> Pose {
        Pose {
            location: Position(x, y),
            heading,
        }
    }

    #[test]
    fn test_no_route_no_waypoint() {
        let planner = RoutePlanner::new();
        assert_eq!(planner.next_waypoint(pose(1, 1, Heading::EAST)), None);
    }

    #[test]
    fn test_arrived() {
        let mut planner = RoutePlanner::new();
        planner.route_to(Position(3, 3));
        assert_eq!(planner.next_waypoint(pose(3, 3, Heading::NORTH)), None);
    }

    #[test]
    fn test_east_west_leg() {
        let mut planner = RoutePlanner::new();
        planner.route_to(Position(6, 2));

        assert_eq!(planner.next_waypoint(pose(2, 2, Heading::EAST)), Some(Action::Forward));
        assert_eq!(planner.next_waypoint(pose(2, 2, Heading::WEST)), Some(Action::Right));
        // Facing south, east is to the left.
        assert_eq!(planner.next_waypoint(pose(2, 2, Heading::SOUTH)), Some(Action::Left));
        assert_eq!(planner.next_waypoint(pose(2, 2, Heading::NORTH)), Some(Action::Right));
    }

    #[test]
    fn test_north_south_leg() {
        let mut planner = RoutePlanner::new();
        planner.route_to(Position(2, 5));

        assert_eq!(planner.next_waypoint(pose(2, 1, Heading::SOUTH)), Some(Action::Forward));
        assert_eq!(planner.next_waypoint(pose(2, 1, Heading::NORTH)), Some(Action::Right));
        // Facing east, south is to the right.
        assert_eq!(planner.next_waypoint(pose(2, 1, Heading::EAST)), Some(Action::Right));
        assert_eq!(planner.next_waypoint(pose(2, 1, Heading::WEST)), Some(Action::Left));
    }
}
