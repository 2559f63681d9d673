//! Grid world with traffic lights and dummy traffic

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    ports::Environment,
    types::{Action, AgentId, Heading, Light, Percepts, Pose, Position},
};

/// Deadline floor after which a trial ends even when deadlines are not enforced.
pub const HARD_TIME_LIMIT: i32 = -100;

/// Ticks granted per unit of Manhattan distance between start and destination.
pub const DEADLINE_FACTOR: i32 = 5;

/// Largest grid [`GridWorld::new`] accepts.
pub const MAX_INTERSECTIONS: i32 = 1 << 20;

/// Minimum Manhattan distance between a trial's start and destination.
pub const MIN_TRIP_DISTANCE: u32 = 4;

/// Reward for a legal move along the announced waypoint.
pub const REWARD_ON_ROUTE: f64 = 2.0;
/// Reward for a legal move elsewhere.
pub const REWARD_OFF_ROUTE: f64 = -0.5;
/// Reward for an illegal move (the car stays put).
pub const REWARD_ILLEGAL: f64 = -1.0;
/// Bonus for reaching the destination with time to spare.
pub const REWARD_ARRIVAL: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of intersections east-west
    pub width: i32,
    /// Number of intersections north-south
    pub height: i32,
    /// Dummy cars added by [`GridWorld::new`]
    pub num_dummies: usize,
    /// Random seed for lights, placement and dummy traffic
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 6,
            num_dummies: 3,
            seed: None,
        }
    }
}

impl WorldConfig {
    fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid {}x{} has no intersections", self.width, self.height),
            });
        }
        self.intersections()?;
        let span = (self.width - 1 + self.height - 1) as u32;
        if span < MIN_TRIP_DISTANCE {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "grid {}x{} cannot fit a trip of {MIN_TRIP_DISTANCE} blocks",
                    self.width, self.height
                ),
            });
        }
        Ok(())
    }

    fn intersections(&self) -> Result<usize> {
        self.width
            .checked_mul(self.height)
            .filter(|count| *count <= MAX_INTERSECTIONS)
            .map(|count| count as usize)
            .ok_or_else(|| Error::InvalidConfiguration {
                message: format!(
                    "grid {}x{} exceeds {MAX_INTERSECTIONS} intersections",
                    self.width, self.height
                ),
            })
    }
}

#[derive(Debug, Clone)]
struct TrafficLight {
    /// true: north-south traffic has green
    ns_green: bool,
    period: u64,
    last_updated: u64,
}

impl TrafficLight {
    fn random(rng: &mut StdRng) -> Self {
        Self {
            ns_green: rng.random_bool(0.5),
            period: *[3u64, 4, 5].choose(rng).unwrap_or(&3),
            last_updated: 0,
        }
    }

    fn update(&mut self, t: u64) {
        if t.saturating_sub(self.last_updated) >= self.period {
            self.ns_green = !self.ns_green;
            self.last_updated = t;
        }
    }

    fn light_for(&self, heading: Heading) -> Light {
        if (self.ns_green && heading.is_vertical()) || (!self.ns_green && heading.is_horizontal())
        {
            Light::Green
        } else {
            Light::Red
        }
    }
}

#[derive(Debug, Clone)]
struct CarState {
    pose: Pose,
    destination: Option<Position>,
    deadline: Option<i32>,
    /// Move the car has announced to other drivers
    next_waypoint: Option<Action>,
    /// Driven by the world itself rather than by an external agent
    dummy: bool,
}

/// Outcome of the current trial from the primary car's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TripStatus {
    pub done: bool,
    pub reached: bool,
    pub on_time: bool,
}

/// Wrap-around grid of signalled intersections.
///
/// One car may be registered as primary: its arrival and deadline end a
/// trial. Dummy cars wander at random and obey the same right-of-way rules.
pub struct GridWorld {
    config: WorldConfig,
    lights: Vec<TrafficLight>,
    cars: Vec<CarState>,
    primary: Option<AgentId>,
    enforce_deadline: bool,
    t: u64,
    status: TripStatus,
    rng: StdRng,
}

impl GridWorld {
    /// Build the grid and add `config.num_dummies` dummy cars.
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let count = config.intersections()?;
        let lights = (0..count).map(|_| TrafficLight::random(&mut rng)).collect();
        let num_dummies = config.num_dummies;

        let mut world = Self {
            config,
            lights,
            cars: Vec::new(),
            primary: None,
            enforce_deadline: false,
            t: 0,
            status: TripStatus::default(),
            rng,
        };
        world.add_dummies(num_dummies);
        Ok(world)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Register an externally driven car.
    pub fn create_agent(&mut self) -> AgentId {
        let pose = self.random_pose();
        self.cars.push(CarState {
            pose,
            destination: None,
            deadline: None,
            next_waypoint: None,
            dummy: false,
        });
        AgentId(self.cars.len() - 1)
    }

    pub fn add_dummies(&mut self, count: usize) {
        for _ in 0..count {
            let pose = self.random_pose();
            let intent = self.random_intent();
            self.cars.push(CarState {
                pose,
                destination: None,
                deadline: None,
                next_waypoint: Some(intent),
                dummy: true,
            });
        }
    }

    /// Track `agent` as the car whose trips define trials.
    pub fn set_primary_agent(&mut self, agent: AgentId, enforce_deadline: bool) -> Result<()> {
        self.car(agent)?;
        self.primary = Some(agent);
        self.enforce_deadline = enforce_deadline;
        Ok(())
    }

    pub fn primary_agent(&self) -> Option<AgentId> {
        self.primary
    }

    /// Start a new trial and return the primary car's destination.
    pub fn reset(&mut self) -> Result<Position> {
        let primary = self.primary.ok_or(Error::NoPrimaryAgent)?;
        self.t = 0;
        self.status = TripStatus::default();
        for light in &mut self.lights {
            light.last_updated = 0;
        }

        let (start, destination) = loop {
            let start = self.random_position();
            let destination = self.random_position();
            if start.manhattan(destination) >= MIN_TRIP_DISTANCE {
                break (start, destination);
            }
        };
        let heading = self.random_heading();
        let deadline = start.manhattan(destination) as i32 * DEADLINE_FACTOR;

        for idx in 0..self.cars.len() {
            if idx == primary.0 {
                let car = &mut self.cars[idx];
                car.pose = Pose {
                    location: start,
                    heading,
                };
                car.destination = Some(destination);
                car.deadline = Some(deadline);
            } else {
                let pose = self.random_pose();
                let car = &mut self.cars[idx];
                car.pose = pose;
                car.destination = None;
                car.deadline = None;
            }
        }

        info!(%start, %destination, deadline, "trial reset");
        Ok(destination)
    }

    /// Advance lights and dummy traffic for the current tick.
    pub fn begin_step(&mut self) -> Result<()> {
        let t = self.t;
        for light in &mut self.lights {
            light.update(t);
        }
        for idx in 0..self.cars.len() {
            if self.cars[idx].dummy {
                self.drive_dummy(AgentId(idx))?;
            }
        }
        Ok(())
    }

    /// Advance time and apply the deadline rules to the primary car.
    pub fn end_step(&mut self) {
        self.t += 1;
        let Some(primary) = self.primary else {
            return;
        };
        let car = &mut self.cars[primary.0];
        if let Some(deadline) = car.deadline {
            if deadline <= HARD_TIME_LIMIT {
                self.status.done = true;
                warn!(deadline, "hard time limit reached");
            } else if self.enforce_deadline && deadline <= 0 {
                self.status.done = true;
                warn!(deadline, "deadline reached");
            }
            car.deadline = Some(deadline - 1);
        }
    }

    pub fn t(&self) -> u64 {
        self.t
    }

    pub fn is_done(&self) -> bool {
        self.status.done
    }

    pub fn status(&self) -> TripStatus {
        self.status
    }

    pub fn destination(&self, agent: AgentId) -> Result<Option<Position>> {
        Ok(self.car(agent)?.destination)
    }

    /// Light a car facing `heading` sees at `location`.
    pub fn light_at(&self, location: Position, heading: Heading) -> Result<Light> {
        Ok(self.lights[self.light_index(location)?].light_for(heading))
    }

    /// Whether `location` is an intersection of this grid.
    pub fn contains(&self, location: Position) -> bool {
        (1..=self.config.width).contains(&location.0)
            && (1..=self.config.height).contains(&location.1)
    }

    /// Move a car directly. Intended for scenario setup.
    pub fn place(&mut self, agent: AgentId, pose: Pose) -> Result<()> {
        self.light_index(pose.location)?;
        self.car_mut(agent)?.pose = pose;
        Ok(())
    }

    /// Force the north-south phase of one intersection. Intended for scenario setup.
    pub fn set_north_south_green(&mut self, location: Position, ns_green: bool) -> Result<()> {
        let idx = self.light_index(location)?;
        self.lights[idx].ns_green = ns_green;
        Ok(())
    }

    fn light_index(&self, location: Position) -> Result<usize> {
        if !self.contains(location) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "{location} lies outside the {}x{} grid",
                    self.config.width, self.config.height
                ),
            });
        }
        Ok(((location.1 - 1) * self.config.width + (location.0 - 1)) as usize)
    }

    fn car(&self, agent: AgentId) -> Result<&CarState> {
        self.cars
            .get(agent.0)
            .ok_or(Error::UnknownAgent { id: agent.0 })
    }

    fn car_mut(&mut self, agent: AgentId) -> Result<&mut CarState> {
        self.cars
            .get_mut(agent.0)
            .ok_or(Error::UnknownAgent { id: agent.0 })
    }

    fn random_position(&mut self) -> Position {
        Position(
            self.rng.random_range(1..=self.config.width),
            self.rng.random_range(1..=self.config.height),
        )
    }

    fn random_heading(&mut self) -> Heading {
        Heading::ALL[self.rng.random_range(0..Heading::ALL.len())]
    }

    fn random_pose(&mut self) -> Pose {
        Pose {
            location: self.random_position(),
            heading: self.random_heading(),
        }
    }

    fn random_intent(&mut self) -> Action {
        Action::MOVES[self.rng.random_range(0..Action::MOVES.len())]
    }

    /// Next intersection along `heading`, wrapping at the edges.
    fn advance(&self, location: Position, heading: Heading) -> Position {
        let wrap = |v: i32, dv: i32, size: i32| (v - 1 + dv).rem_euclid(size) + 1;
        Position(
            wrap(location.0, heading.dx(), self.config.width),
            wrap(location.1, heading.dy(), self.config.height),
        )
    }

    fn drive_dummy(&mut self, agent: AgentId) -> Result<()> {
        let percepts = self.sense(agent)?;
        let intent = self.car(agent)?.next_waypoint.unwrap_or(Action::Idle);
        let action = if dummy_may_proceed(intent, &percepts) {
            let next = self.random_intent();
            self.car_mut(agent)?.next_waypoint = Some(next);
            intent
        } else {
            Action::Idle
        };
        self.act(agent, action)?;
        Ok(())
    }
}

/// Right-of-way check dummy drivers apply before committing to a move.
fn dummy_may_proceed(intent: Action, percepts: &Percepts) -> bool {
    match intent {
        Action::Right => !(percepts.light == Light::Red && percepts.left == Some(Action::Forward)),
        Action::Forward => percepts.light == Light::Green,
        Action::Left => {
            percepts.light == Light::Green
                && !matches!(percepts.oncoming, Some(Action::Forward | Action::Right))
        }
        Action::Idle => true,
    }
}

impl Environment for GridWorld {
    fn valid_actions(&self) -> &[Action] {
        &Action::ALL
    }

    fn sense(&self, agent: AgentId) -> Result<Percepts> {
        let me = self.car(agent)?;
        let Pose { location, heading } = me.pose;
        let mut percepts = Percepts::clear(self.light_at(location, heading)?);

        for (idx, other) in self.cars.iter().enumerate() {
            if idx == agent.0 || other.pose.location != location || other.pose.heading == heading
            {
                continue;
            }
            let intent = other.next_waypoint;
            if heading.is_opposite(other.pose.heading) {
                if percepts.oncoming != Some(Action::Left) {
                    percepts.oncoming = intent;
                }
            } else if heading.is_right_of(other.pose.heading) {
                if !matches!(percepts.right, Some(Action::Forward | Action::Left)) {
                    percepts.right = intent;
                }
            } else if percepts.left != Some(Action::Forward) {
                percepts.left = intent;
            }
        }
        Ok(percepts)
    }

    fn act(&mut self, agent: AgentId, action: Action) -> Result<f64> {
        let percepts = self.sense(agent)?;
        let car = self.car(agent)?;
        let Pose { location, heading } = car.pose;
        let announced = car.next_waypoint;
        let green = percepts.light == Light::Green;

        let turned = match action {
            Action::Idle => Some(heading),
            Action::Forward => green.then_some(heading),
            Action::Left => (green
                && matches!(percepts.oncoming, None | Some(Action::Left)))
            .then(|| heading.turn_left()),
            Action::Right => {
                (green || percepts.left != Some(Action::Forward)).then(|| heading.turn_right())
            }
        };

        let mut reward = match turned {
            None => REWARD_ILLEGAL,
            Some(_) if action == Action::Idle => 0.0,
            Some(new_heading) => {
                let pose = Pose {
                    location: self.advance(location, new_heading),
                    heading: new_heading,
                };
                self.car_mut(agent)?.pose = pose;
                if announced == Some(action) {
                    REWARD_ON_ROUTE
                } else {
                    REWARD_OFF_ROUTE
                }
            }
        };

        if Some(agent) == self.primary {
            let car = self.car(agent)?;
            if car.destination == Some(car.pose.location) {
                let on_time = car.deadline.is_some_and(|d| d >= 0);
                if on_time {
                    reward += REWARD_ARRIVAL;
                }
                self.status = TripStatus {
                    done: true,
                    reached: true,
                    on_time,
                };
                info!(t = self.t, on_time, "primary agent reached destination");
            }
        }

        debug!(agent = %agent, ?action, reward, "act");
        Ok(reward)
    }

    fn deadline(&self, agent: AgentId) -> Result<i32> {
        Ok(self.car(agent)?.deadline.unwrap_or(0))
    }

    fn pose(&self, agent: AgentId) -> Result<Pose> {
        Ok(self.car(agent)?.pose)
    }

    fn announce_waypoint(&mut self, agent: AgentId, waypoint: Option<Action>) -> Result<()> {
        self.car_mut(agent)?.next_waypoint = waypoint;
        Ok(())
    }
}
