//! Integration tests for dependency injection.
//!
//! These tests exercise the app container with in-memory repositories and
//! fixed seeds, so nothing touches the disk unless a test asks for it.

use std::{path::Path, time::Duration};

use smartcab::{
    adapters::{FileSink, InMemoryRepository, MemorySink, MsgPackRepository},
    app::{AgentConfig, App},
    pipeline::{Simulator, SimulatorConfig},
    ports::SnapshotRepository,
    world::WorldConfig,
};

fn train(app: &App, trials: usize) -> smartcab::DrivingAgent {
    let mut world = app.create_world(WorldConfig::default()).unwrap();
    let id = world.create_agent();
    world.set_primary_agent(id, true).unwrap();

    let mut agent = app.create_agent(id, AgentConfig::default()).unwrap();
    Simulator::new(SimulatorConfig {
        n_trials: trials,
        update_delay: Duration::ZERO,
    })
    .run(&mut world, &mut agent)
    .unwrap();
    agent
}

#[test]
fn test_app_with_in_memory_repository() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .with_default_seed(42)
        .build();

    let agent = train(&app, 5);

    let path = Path::new("trained_table");
    app.save_snapshot(&agent, path).unwrap();

    let table = app.load_table(path).unwrap();
    assert_eq!(table.len(), agent.learner().table().len());
    for (state, action, value) in agent.learner().table().export() {
        assert_eq!(table.get(state, action), Some(value));
    }
}

#[test]
fn test_deterministic_training_with_seed() {
    let app1 = App::for_testing().with_default_seed(42).build();
    let app2 = App::for_testing().with_default_seed(42).build();

    let agent1 = train(&app1, 5);
    let agent2 = train(&app2, 5);

    assert_eq!(
        agent1.learner().snapshot().len(),
        agent2.learner().snapshot().len()
    );
    for (state, action, value) in agent1.learner().table().export() {
        assert_eq!(agent2.learner().value(state, action), Some(value));
    }
}

#[test]
fn test_msgpack_repository_on_disk() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("table.msgpack");

    let app = App::for_testing()
        .with_repository(MsgPackRepository::new())
        .with_default_seed(3)
        .build();
    let agent = train(&app, 3);
    app.save_snapshot(&agent, &path).unwrap();

    let snapshot = MsgPackRepository::new().load(&path).unwrap();
    assert_eq!(snapshot.len(), agent.learner().table().len());
}

#[test]
fn test_run_log_receives_banner_once() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let log = temp_dir.path().join("logs").join("run.txt");

    let app = App::for_testing().with_default_seed(1).build();
    let config = AgentConfig::default().with_log_path(&log);
    app.create_learner(&config).unwrap();
    app.create_learner(&config).unwrap();

    let text = std::fs::read_to_string(&log).unwrap();
    // Appended, never truncated: two learners, two banners.
    assert_eq!(text.matches("*** parameters:").count(), 2);
}

#[test]
fn test_dump_table_only_on_demand() {
    let app = App::for_testing().with_default_seed(8).build();
    let mut agent = train(&app, 3);

    let sink = MemorySink::new();
    agent
        .learner_mut()
        .attach_sink(Box::new(sink.clone()))
        .unwrap();
    let banner_lines = sink.lines().len();
    assert_eq!(banner_lines, 3);

    agent.learner_mut().dump_table().unwrap();
    assert_eq!(
        sink.lines().len(),
        banner_lines + agent.learner().table().len()
    );
}

#[test]
fn test_file_sink_path() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("sink.txt");
    let sink = FileSink::append(&path).unwrap();
    assert_eq!(sink.path(), path.as_path());
}
