//! Domain value types shared by the world, the planner and the learner.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A driving move.
///
/// The legal move set is fixed for the lifetime of a learner; [`Action::ALL`]
/// is the set the grid world hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Idle,
    Forward,
    Left,
    Right,
}

impl Action {
    /// Every legal move, in the order the environment reports them.
    pub const ALL: [Action; 4] = [Action::Idle, Action::Forward, Action::Left, Action::Right];

    /// Moves a car can intend to make (everything except idling).
    pub const MOVES: [Action; 3] = [Action::Forward, Action::Left, Action::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Forward => "forward",
            Action::Left => "left",
            Action::Right => "right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" | "none" => Ok(Action::Idle),
            "forward" => Ok(Action::Forward),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            _ => Err(crate::Error::InvalidAction {
                action: s.to_string(),
            }),
        }
    }
}

/// Traffic light as seen by a particular car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Light {
    Red,
    Green,
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Light::Red => f.write_str("red"),
            Light::Green => f.write_str("green"),
        }
    }
}

/// Unit heading on the grid. `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading(pub i32, pub i32);

impl Heading {
    pub const EAST: Heading = Heading(1, 0);
    pub const NORTH: Heading = Heading(0, -1);
    pub const WEST: Heading = Heading(-1, 0);
    pub const SOUTH: Heading = Heading(0, 1);

    pub const ALL: [Heading; 4] = [Heading::EAST, Heading::NORTH, Heading::WEST, Heading::SOUTH];

    pub fn dx(&self) -> i32 {
        self.0
    }

    pub fn dy(&self) -> i32 {
        self.1
    }

    pub fn turn_left(self) -> Heading {
        Heading(self.1, -self.0)
    }

    pub fn turn_right(self) -> Heading {
        Heading(-self.1, self.0)
    }

    pub fn is_vertical(&self) -> bool {
        self.1 != 0
    }

    pub fn is_horizontal(&self) -> bool {
        self.0 != 0
    }

    fn dot(&self, other: Heading) -> i32 {
        self.0 * other.0 + self.1 * other.1
    }

    /// True when `other` points the opposite way.
    pub fn is_opposite(&self, other: Heading) -> bool {
        self.dot(other) == -1
    }

    /// True when `other` points to our right.
    pub fn is_right_of(&self, other: Heading) -> bool {
        self.1 == other.0 && -self.0 == other.1
    }
}

/// Handle for a car registered with a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Intersection coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position(pub i32, pub i32);

impl Position {
    pub fn manhattan(&self, other: Position) -> u32 {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Where a car is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub location: Position,
    pub heading: Heading,
}

/// Raw sensor reading for one car at its current intersection.
///
/// Traffic fields carry the other car's announced move, or `None` when the
/// approach is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Percepts {
    pub light: Light,
    pub oncoming: Option<Action>,
    pub left: Option<Action>,
    pub right: Option<Action>,
}

impl Percepts {
    pub fn clear(light: Light) -> Self {
        Self {
            light,
            oncoming: None,
            left: None,
            right: None,
        }
    }
}

/// State key used by the driving agent.
///
/// Composed of the light, oncoming traffic, traffic from the left and the
/// planner's next waypoint, in that order. Traffic from the right is not part
/// of the state: it never constrains a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriveState {
    pub light: Light,
    pub oncoming: Option<Action>,
    pub left: Option<Action>,
    pub waypoint: Option<Action>,
}

impl DriveState {
    pub fn from_percepts(percepts: &Percepts, waypoint: Option<Action>) -> Self {
        Self {
            light: percepts.light,
            oncoming: percepts.oncoming,
            left: percepts.left,
            waypoint,
        }
    }
}

impl fmt::Display for DriveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn slot(value: Option<Action>) -> &'static str {
            value.map_or("-", |a| a.as_str())
        }
        write!(
            f,
            "light={} oncoming={} left={} waypoint={}",
            self.light,
            slot(self.oncoming),
            slot(self.left),
            slot(self.waypoint)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_are_inverse() {
        for heading in Heading::ALL {
            assert_eq!(heading.turn_left().turn_right(), heading);
            assert_eq!(heading.turn_left().turn_left().turn_left().turn_left(), heading);
        }
        assert_eq!(Heading::EAST.turn_left(), Heading::NORTH);
        assert_eq!(Heading::EAST.turn_right(), Heading::SOUTH);
    }

    #[test]
    fn test_relative_headings() {
        assert!(Heading::EAST.is_opposite(Heading::WEST));
        assert!(!Heading::EAST.is_opposite(Heading::NORTH));
        // Facing east, traffic heading north comes from our right.
        assert!(Heading::EAST.is_right_of(Heading::NORTH));
        assert!(!Heading::EAST.is_right_of(Heading::SOUTH));
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("Forward".parse::<Action>().unwrap(), Action::Forward);
        assert_eq!("none".parse::<Action>().unwrap(), Action::Idle);
        assert!("reverse".parse::<Action>().is_err());
    }

    #[test]
    fn test_drive_state_drops_right_traffic() {
        let mut percepts = Percepts::clear(Light::Green);
        percepts.right = Some(Action::Forward);
        let a = DriveState::from_percepts(&percepts, Some(Action::Left));
        percepts.right = None;
        let b = DriveState::from_percepts(&percepts, Some(Action::Left));
        assert_eq!(a, b);
    }
}
