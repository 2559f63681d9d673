//! Q-table: sparse value store for temporal difference learning

use std::{collections::HashMap, hash::Hash};

use super::snapshot::{QEntry, QTableSnapshot};

/// Q-table mapping (state, action) pairs to Q-values
///
/// A missing key is "unknown", which is distinct from a stored `0.0`. The
/// table grows with every new pair it sees and is only emptied by an explicit
/// [`QTable::clear`].
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    q_values: HashMap<(S, A), f64>,
}

impl<S, A> QTable<S, A> {
    /// Drop every entry
    pub fn clear(&mut self) {
        self.q_values.clear();
    }

    /// Get total number of Q-values stored
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}

impl<S, A> QTable<S, A>
where
    S: Eq + Hash + Clone,
    A: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            q_values: HashMap::new(),
        }
    }

    /// Get Q-value for a state-action pair, `None` if never written
    pub fn get(&self, state: &S, action: &A) -> Option<f64> {
        // Borrowed tuple lookup needs owned keys; states and actions are small.
        self.q_values
            .get(&(state.clone(), action.clone()))
            .copied()
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: S, action: A, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Maximum known Q-value over `actions` in `state`.
    ///
    /// Unknown entries sit below every real value; they are skipped rather
    /// than mapped to a number. Returns `None` if no action is known.
    pub fn best_known(&self, state: &S, actions: &[A]) -> Option<f64> {
        actions
            .iter()
            .filter_map(|action| self.get(state, action))
            .fold(None, |best, q| match best {
                Some(b) if b >= q => Some(b),
                _ => Some(q),
            })
    }

    /// Iterate over every stored entry.
    ///
    /// Order is unspecified. Calling again starts a fresh pass.
    pub fn export(&self) -> impl Iterator<Item = (&S, &A, f64)> + '_ {
        self.q_values
            .iter()
            .map(|((state, action), value)| (state, action, *value))
    }

    pub fn snapshot(&self) -> QTableSnapshot<S, A> {
        QTableSnapshot::new(
            self.export()
                .map(|(state, action, value)| QEntry {
                    state: state.clone(),
                    action: action.clone(),
                    value,
                })
                .collect(),
        )
    }

    /// Rebuild a table from a snapshot. Later duplicates overwrite earlier ones.
    pub fn from_snapshot(snapshot: QTableSnapshot<S, A>) -> Self {
        let mut table = Self::new();
        for entry in snapshot.entries {
            table.set(entry.state, entry.action, entry.value);
        }
        table
    }
}

impl<S, A> Default for QTable<S, A>
where
    S: Eq + Hash + Clone,
    A: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_starts_unknown() {
        let qtable: QTable<&str, u8> = QTable::new();
        assert_eq!(qtable.get(&"s0", &0), None);
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new();
        qtable.set("s0", 4u8, 1.5);
        assert_eq!(qtable.get(&"s0", &4), Some(1.5));
        assert_eq!(qtable.get(&"s0", &3), None);
    }

    #[test]
    fn test_zero_is_not_unknown() {
        let mut qtable = QTable::new();
        qtable.set("s0", 0u8, 0.0);
        assert_eq!(qtable.get(&"s0", &0), Some(0.0));
        assert_eq!(qtable.get(&"s0", &1), None);
    }

    #[test]
    fn test_latest_write_wins() {
        let mut qtable = QTable::new();
        qtable.set("s0", 1u8, 1.0);
        qtable.set("s0", 1u8, -3.25);
        assert_eq!(qtable.get(&"s0", &1), Some(-3.25));
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_best_known_skips_unknown() {
        let mut qtable = QTable::new();
        qtable.set("s0", 0u8, -5.0);
        qtable.set("s0", 2u8, -7.0);

        let actions = [0u8, 1, 2, 3];
        assert_eq!(qtable.best_known(&"s0", &actions), Some(-5.0));
        assert_eq!(qtable.best_known(&"s1", &actions), None);
    }

    #[test]
    fn test_export_is_restartable() {
        let mut qtable = QTable::new();
        qtable.set("a", 0u8, 1.0);
        qtable.set("b", 1u8, 2.0);

        let first: f64 = qtable.export().map(|(_, _, v)| v).sum();
        let second: f64 = qtable.export().map(|(_, _, v)| v).sum();
        assert_eq!(first, 3.0);
        assert_eq!(first, second);
        assert_eq!(qtable.export().count(), 2);
    }

    #[test]
    fn test_snapshot_rebuilds_table() {
        let mut qtable = QTable::new();
        qtable.set("a", 0u8, 1.0);
        qtable.set("b", 3u8, -0.5);

        let rebuilt = QTable::from_snapshot(qtable.snapshot());
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.get(&"b", &3), Some(-0.5));
    }
}
