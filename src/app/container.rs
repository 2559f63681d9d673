//! Dependency injection container for the smartcab application.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for creating worlds, learners and agents.

use std::{path::Path, sync::Arc};

use super::config::AgentConfig;
use crate::{
    Error, Result,
    adapters::{FileSink, MsgPackRepository},
    agent::DrivingAgent,
    ports::{Planner, SnapshotRepository},
    q_learning::{QLearner, QTable},
    types::{Action, AgentId, DriveState},
    world::{GridWorld, WorldConfig},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use smartcab::app::{AgentConfig, App};
/// use smartcab::world::WorldConfig;
///
/// let app = App::new();
///
/// let mut world = app.create_world(WorldConfig::default())?;
/// let id = world.create_agent();
/// world.set_primary_agent(id, true)?;
///
/// let agent = app.create_agent(id, AgentConfig::default().with_seed(42))?;
/// # Ok::<(), smartcab::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use smartcab::app::App;
/// use smartcab::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for table snapshots
    snapshot_repository: Arc<dyn SnapshotRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for snapshots
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            snapshot_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn snapshot_repository(&self) -> Arc<dyn SnapshotRepository + Send + Sync> {
        Arc::clone(&self.snapshot_repository)
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Build a grid world, seeding it with the app default when the config
    /// carries no seed of its own.
    pub fn create_world(&self, mut config: WorldConfig) -> Result<GridWorld> {
        if config.seed.is_none() {
            config.seed = self.default_seed;
        }
        GridWorld::new(config)
    }

    /// Build a learner over the four driving actions.
    ///
    /// When the config names a run log, the parameter banner is appended to
    /// it before the learner is returned.
    pub fn create_learner(&self, config: &AgentConfig) -> Result<QLearner<DriveState, Action>> {
        let mut learner = QLearner::new(config.params, Action::ALL.to_vec())?
            .with_update_rule(config.update_rule)
            .with_strict(config.strict);

        // Apply seed from config or use container default
        if let Some(seed) = config.seed.or(self.default_seed) {
            learner = learner.with_seed(seed);
        }

        if let Some(path) = &config.log_path {
            learner = learner.with_sink(Box::new(FileSink::append(path)?))?;
        }

        Ok(learner)
    }

    /// Create a driving agent for the car `id`.
    pub fn create_agent(&self, id: AgentId, config: AgentConfig) -> Result<DrivingAgent> {
        let learner = self.create_learner(&config)?;
        Ok(DrivingAgent::new(id, learner).with_reset_between_trials(config.reset_between_trials))
    }

    /// Create a driving agent whose table starts from a saved snapshot.
    ///
    /// Fails for configs that clear the table between trials, since the
    /// loaded table would be dropped before the first tick.
    pub fn load_agent(&self, id: AgentId, config: AgentConfig, path: &Path) -> Result<DrivingAgent> {
        if config.reset_between_trials {
            return Err(Error::InvalidConfiguration {
                message: "a loaded table cannot be combined with reset between trials"
                    .to_string(),
            });
        }
        let table = self.load_table(path)?;
        let learner = self.create_learner(&config)?.with_table(table);
        Ok(DrivingAgent::new(id, learner).with_reset_between_trials(config.reset_between_trials))
    }

    pub fn load_table(&self, path: &Path) -> Result<QTable<DriveState, Action>> {
        let snapshot = self.snapshot_repository.load(path)?;
        Ok(QTable::from_snapshot(snapshot))
    }

    /// Save an agent's learned table.
    pub fn save_snapshot<P: Planner>(&self, agent: &DrivingAgent<P>, path: &Path) -> Result<()> {
        self.snapshot_repository
            .save(&agent.learner().snapshot(), path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    snapshot_repository: Option<Arc<dyn SnapshotRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            snapshot_repository: None,
            default_seed: None,
        }
    }

    pub fn with_repository<R: SnapshotRepository + Send + Sync + 'static>(
        mut self,
        repo: R,
    ) -> Self {
        self.snapshot_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for every world and learner this app creates.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            snapshot_repository: self
                .snapshot_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
