//! Q-learning driver

use tracing::debug;

use crate::{
    Result,
    ports::{Agent, Environment, Planner, StepRecord},
    q_learning::QLearner,
    types::{Action, AgentId, DriveState, Position},
    world::RoutePlanner,
};

/// A car that learns to drive from the rewards the world hands back.
///
/// Each tick it asks the planner for a waypoint, senses, picks an action,
/// acts, senses again and feeds the transition to its learner. The next
/// state reuses the waypoint computed at the start of the tick.
#[derive(Debug)]
pub struct DrivingAgent<P = RoutePlanner> {
    id: AgentId,
    name: String,
    planner: P,
    learner: QLearner<DriveState, Action>,
    reset_between_trials: bool,
}

impl DrivingAgent<RoutePlanner> {
    pub fn new(id: AgentId, learner: QLearner<DriveState, Action>) -> Self {
        Self::with_planner(id, RoutePlanner::new(), learner)
    }
}

impl<P: Planner> DrivingAgent<P> {
    pub fn with_planner(id: AgentId, planner: P, learner: QLearner<DriveState, Action>) -> Self {
        Self {
            id,
            name: "Q-Learning".to_string(),
            planner,
            learner,
            reset_between_trials: false,
        }
    }

    /// Clear the learned table at the start of every trial.
    ///
    /// Off by default: a table normally accumulates across all trials.
    pub fn with_reset_between_trials(mut self, reset: bool) -> Self {
        self.reset_between_trials = reset;
        self
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn learner(&self) -> &QLearner<DriveState, Action> {
        &self.learner
    }

    pub fn learner_mut(&mut self) -> &mut QLearner<DriveState, Action> {
        &mut self.learner
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }
}

impl<P: Planner> Agent for DrivingAgent<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self, destination: Position) -> Result<()> {
        self.planner.route_to(destination);
        if self.reset_between_trials {
            self.learner.clear();
        }
        Ok(())
    }

    fn update(&mut self, env: &mut dyn Environment, t: u64) -> Result<StepRecord> {
        let waypoint = self.planner.next_waypoint(env.pose(self.id)?);
        env.announce_waypoint(self.id, waypoint)?;

        let percepts = env.sense(self.id)?;
        let deadline = env.deadline(self.id)?;
        let state = DriveState::from_percepts(&percepts, waypoint);

        let action = self.learner.choose_action(&state);
        let reward = env.act(self.id, action)?;

        let after = env.sense(self.id)?;
        let next_state = DriveState::from_percepts(&after, waypoint);
        self.learner.learn(state, action, reward, &next_state)?;

        debug!(t, deadline, ?percepts, %action, reward, "agent update");

        Ok(StepRecord {
            t,
            deadline,
            percepts,
            waypoint,
            action,
            reward,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        q_learning::LearnerParams,
        types::{Heading, Light, Percepts, Pose},
    };

    /// One-intersection world: every move is legal and earns the same reward.
    struct FlatWorld {
        reward: f64,
        acts: Vec<Action>,
        announced: Option<Action>,
    }

    impl Environment for FlatWorld {
        fn valid_actions(&self) -> &[Action] {
            &Action::ALL
        }

        fn sense(&self, _agent: AgentId) -> Result<Percepts> {
            Ok(Percepts::clear(Light::Green))
        }

        fn act(&mut self, _agent: AgentId, action: Action) -> Result<f64> {
            self.acts.push(action);
            Ok(self.reward)
        }

        fn deadline(&self, _agent: AgentId) -> Result<i32> {
            Ok(10)
        }

        fn pose(&self, _agent: AgentId) -> Result<Pose> {
            Ok(Pose {
                location: Position(1, 1),
                heading: Heading::EAST,
            })
        }

        fn announce_waypoint(&mut self, _agent: AgentId, waypoint: Option<Action>) -> Result<()> {
            self.announced = waypoint;
            Ok(())
        }
    }

    fn agent() -> DrivingAgent {
        let learner = QLearner::new(LearnerParams::driving(), Action::ALL.to_vec())
            .unwrap()
            .with_seed(9);
        DrivingAgent::new(AgentId(0), learner)
    }

    #[test]
    fn test_update_learns_transition() {
        let mut env = FlatWorld {
            reward: 2.0,
            acts: Vec::new(),
            announced: None,
        };
        let mut driver = agent();
        driver.reset(Position(5, 1)).unwrap();

        let record = driver.update(&mut env, 0).unwrap();

        assert_eq!(record.waypoint, Some(Action::Forward));
        assert_eq!(env.announced, Some(Action::Forward));
        assert_eq!(env.acts, vec![record.action]);

        let state = DriveState::from_percepts(&record.percepts, record.waypoint);
        assert_eq!(driver.learner().value(&state, &record.action), Some(2.0));
    }

    #[test]
    fn test_table_survives_reset_by_default() {
        let mut env = FlatWorld {
            reward: 1.0,
            acts: Vec::new(),
            announced: None,
        };
        let mut driver = agent();
        driver.reset(Position(5, 1)).unwrap();
        driver.update(&mut env, 0).unwrap();

        driver.reset(Position(1, 4)).unwrap();
        assert_eq!(driver.learner().table().len(), 1);
    }

    #[test]
    fn test_reset_between_trials_clears_table() {
        let mut env = FlatWorld {
            reward: 1.0,
            acts: Vec::new(),
            announced: None,
        };
        let mut driver = agent().with_reset_between_trials(true);
        driver.reset(Position(5, 1)).unwrap();
        driver.update(&mut env, 0).unwrap();

        driver.reset(Position(1, 4)).unwrap();
        assert!(driver.learner().table().is_empty());
    }
}
