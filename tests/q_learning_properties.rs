//! Statistical and behavioural properties of the tabular Q-learner.

use std::collections::HashMap;

use smartcab::{
    Action, DriveState, Error, LearnerParams, QLearner, QTable, UpdateRule,
    types::Light,
};

fn learner(epsilon: f64, seed: u64) -> QLearner<u32, Action> {
    QLearner::new(LearnerParams::new(epsilon, 0.5, 0.9), Action::ALL.to_vec())
        .unwrap()
        .with_seed(seed)
}

fn counts(learner: &mut QLearner<u32, Action>, state: u32, draws: usize) -> HashMap<Action, usize> {
    let mut counts = HashMap::new();
    for _ in 0..draws {
        *counts.entry(learner.choose_action(&state)).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_table_round_trip_and_distinct_unknown() {
    let mut table: QTable<u32, Action> = QTable::new();
    assert_eq!(table.get(&0, &Action::Idle), None);

    table.set(0, Action::Idle, 0.0);
    assert_eq!(table.get(&0, &Action::Idle), Some(0.0));
    assert_eq!(table.get(&0, &Action::Forward), None);
    assert_eq!(table.get(&1, &Action::Idle), None);
}

#[test]
fn test_export_visits_every_entry() {
    let mut table: QTable<u32, Action> = QTable::new();
    for state in 0..50 {
        for action in Action::ALL {
            table.set(state, action, state as f64);
        }
    }

    assert_eq!(table.export().count(), 200);
    // Restarting the export yields the same rows.
    let total: f64 = table.export().map(|(_, _, v)| v).sum();
    let again: f64 = table.export().map(|(_, _, v)| v).sum();
    assert_eq!(total, again);
}

#[test]
fn test_first_visit_then_incremental_update() {
    let mut learner = learner(0.0, 1);

    learner.learn(0, Action::Forward, 2.0, &1).unwrap();
    assert_eq!(learner.value(&0, &Action::Forward), Some(2.0));

    learner.learn(1, Action::Left, 4.0, &2).unwrap();

    // 2.0 + 0.5 * (1.0 - 0.9 * 4.0) = 0.7
    learner.learn(0, Action::Forward, 1.0, &1).unwrap();
    let value = learner.value(&0, &Action::Forward).unwrap();
    assert!((value - 0.7).abs() < 1e-12);
}

#[test]
fn test_canonical_rule_is_opt_in() {
    let default_learner = learner(0.0, 1);
    assert_eq!(default_learner.update_rule(), UpdateRule::Incremental);

    let mut canonical = learner(0.0, 1).with_update_rule(UpdateRule::Canonical);
    canonical.learn(0, Action::Forward, 2.0, &1).unwrap();
    canonical.learn(1, Action::Left, 4.0, &2).unwrap();

    // 2.0 + 0.5 * (1.0 + 0.9 * 4.0 - 2.0) = 3.3
    canonical.learn(0, Action::Forward, 1.0, &1).unwrap();
    let value = canonical.value(&0, &Action::Forward).unwrap();
    assert!((value - 3.3).abs() < 1e-12);
}

#[test]
fn test_greedy_choice_is_deterministic_with_unique_best() {
    let mut learner = learner(0.0, 5);
    learner.learn(0, Action::Right, 1.5, &1).unwrap();
    learner.learn(0, Action::Left, 0.5, &1).unwrap();

    for _ in 0..1_000 {
        assert_eq!(learner.choose_action(&0), Action::Right);
    }
}

#[test]
fn test_ties_are_broken_uniformly() {
    let mut learner = learner(0.0, 17);
    learner.learn(0, Action::Forward, 1.0, &1).unwrap();
    learner.learn(0, Action::Left, 1.0, &1).unwrap();
    learner.learn(0, Action::Idle, -1.0, &1).unwrap();

    let draws = 10_000;
    let counts = counts(&mut learner, 0, draws);

    assert_eq!(counts.get(&Action::Idle), None);
    assert_eq!(counts.get(&Action::Right), None);
    for action in [Action::Forward, Action::Left] {
        let share = counts[&action] as f64 / draws as f64;
        assert!((share - 0.5).abs() < 0.02, "{action}: {share}");
    }
}

#[test]
fn test_unvisited_state_spreads_over_all_actions() {
    let mut learner = learner(0.0, 23);
    let draws = 10_000;
    let counts = counts(&mut learner, 42, draws);

    for action in Action::ALL {
        let share = counts[&action] as f64 / draws as f64;
        assert!((share - 0.25).abs() < 0.02, "{action}: {share}");
    }
}

#[test]
fn test_full_exploration_ignores_estimates() {
    let mut learner = learner(1.0, 31);
    learner.learn(0, Action::Forward, 100.0, &1).unwrap();

    let draws = 10_000;
    let counts = counts(&mut learner, 0, draws);
    for action in Action::ALL {
        let share = counts[&action] as f64 / draws as f64;
        assert!((share - 0.25).abs() < 0.02, "{action}: {share}");
    }
}

#[test]
fn test_table_grows_with_distinct_pairs() {
    let mut learner = learner(0.1, 3);
    for state in 0..1_000u32 {
        learner.learn(state, Action::Idle, 0.0, &(state + 1)).unwrap();
    }
    assert_eq!(learner.table().len(), 1_000);

    // Revisits update in place.
    learner.learn(0, Action::Idle, 1.0, &1).unwrap();
    assert_eq!(learner.table().len(), 1_000);
}

#[test]
fn test_strict_mode_leaves_table_untouched() {
    let mut strict = QLearner::new(LearnerParams::driving(), Action::MOVES.to_vec())
        .unwrap()
        .with_strict(true);
    let state = DriveState {
        light: Light::Green,
        oncoming: None,
        left: None,
        waypoint: Some(Action::Forward),
    };

    let err = strict.learn(state, Action::Idle, 1.0, &state).unwrap_err();
    assert!(matches!(err, Error::InvalidAction { .. }));

    let err = strict
        .learn(state, Action::Forward, f64::INFINITY, &state)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReward { .. }));

    assert!(strict.table().is_empty());
}

#[test]
fn test_empty_action_set_rejected() {
    let result = QLearner::<u32, Action>::new(LearnerParams::driving(), Vec::new());
    assert!(matches!(result, Err(Error::NoActionsAvailable)));
}
