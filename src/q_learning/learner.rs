//! Epsilon-greedy Q-learner over a fixed action set

use std::{fmt, hash::Hash};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    Error, Result,
    ports::DiagnosticSink,
    q_learning::{QTable, QTableSnapshot},
};

/// Fixed hyperparameters of a learner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearnerParams {
    /// ε: probability of a uniformly random move
    pub epsilon: f64,
    /// α: weight of the TD term when revising a known estimate
    pub alpha: f64,
    /// γ: weight of the best next-state estimate
    pub gamma: f64,
}

impl LearnerParams {
    pub fn new(epsilon: f64, alpha: f64, gamma: f64) -> Self {
        Self {
            epsilon,
            alpha,
            gamma,
        }
    }

    /// Parameters the driving agent runs with.
    pub fn driving() -> Self {
        Self::new(0.05, 0.1, 0.9)
    }

    /// Check ε ∈ [0,1], α ∈ (0,1], γ ∈ [0,1].
    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.epsilon) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon {} must lie in [0, 1]", self.epsilon),
            });
        }
        if !in_unit(self.alpha) || self.alpha == 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!("alpha {} must lie in (0, 1]", self.alpha),
            });
        }
        if !in_unit(self.gamma) {
            return Err(Error::InvalidConfiguration {
                message: format!("gamma {} must lie in [0, 1]", self.gamma),
            });
        }
        Ok(())
    }
}

impl Default for LearnerParams {
    fn default() -> Self {
        Self::new(0.1, 0.5, 0.9)
    }
}

/// How a known estimate is revised.
///
/// A first visit always seeds the estimate with the observed reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// Q(s,a) ← Q(s,a) + α(r - γ max_a' Q(s',a'))
    #[default]
    Incremental,
    /// Q(s,a) ← Q(s,a) + α(r + γ max_a' Q(s',a') - Q(s,a))
    ///
    /// Textbook Q-learning target. Produces different policies than
    /// `Incremental`; opt-in only.
    Canonical,
}

impl UpdateRule {
    fn apply(self, current: f64, reward: f64, best_next: f64, params: &LearnerParams) -> f64 {
        match self {
            UpdateRule::Incremental => {
                let delta = reward - params.gamma * best_next;
                current + params.alpha * delta
            }
            UpdateRule::Canonical => {
                let td_error = reward + params.gamma * best_next - current;
                current + params.alpha * td_error
            }
        }
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateRule::Incremental => f.write_str("incremental"),
            UpdateRule::Canonical => f.write_str("canonical"),
        }
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learner with ε-greedy action selection.
///
/// Owns its [`QTable`] exclusively. Selection and updates always range over
/// the full action set given at construction.
///
/// # Examples
///
/// ```
/// use smartcab::q_learning::{LearnerParams, QLearner};
///
/// let mut learner = QLearner::new(LearnerParams::new(0.0, 0.5, 0.9), vec!['a', 'b'])?
///     .with_seed(3);
/// learner.learn("s0", 'b', 1.0, &"s1")?;
/// assert_eq!(learner.choose_action(&"s0"), 'b');
/// # Ok::<(), smartcab::Error>(())
/// ```
pub struct QLearner<S, A> {
    q_table: QTable<S, A>,
    params: LearnerParams,
    actions: Vec<A>,
    update_rule: UpdateRule,
    strict: bool,
    rng: StdRng,
    rng_seed: Option<u64>,
    sink: Option<Box<dyn DiagnosticSink>>,
}

impl<S, A> QLearner<S, A>
where
    S: Eq + Hash + Clone + fmt::Debug,
    A: Eq + Hash + Clone + fmt::Debug,
{
    /// Create a learner over `actions`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoActionsAvailable`] for an empty action set and
    /// [`Error::InvalidConfiguration`] for out-of-range parameters.
    pub fn new(params: LearnerParams, actions: Vec<A>) -> Result<Self> {
        params.validate()?;
        if actions.is_empty() {
            return Err(Error::NoActionsAvailable);
        }
        Ok(Self {
            q_table: QTable::new(),
            params,
            actions,
            update_rule: UpdateRule::default(),
            strict: false,
            rng: build_rng(None),
            rng_seed: None,
            sink: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    pub fn with_update_rule(mut self, rule: UpdateRule) -> Self {
        self.update_rule = rule;
        self
    }

    /// Reject actions outside the action set and non-finite rewards in
    /// [`QLearner::learn`] instead of storing them.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Attach a diagnostic sink and write the parameter banner to it.
    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Result<Self> {
        self.attach_sink(sink)?;
        Ok(self)
    }

    pub fn with_table(mut self, table: QTable<S, A>) -> Self {
        self.q_table = table;
        self
    }

    pub fn attach_sink(&mut self, mut sink: Box<dyn DiagnosticSink>) -> Result<()> {
        sink.append_line("")?;
        sink.append_line(&format!(
            "*** parameters: epsilon: {}, alpha: {}, gamma: {}, update rule: {}",
            self.params.epsilon, self.params.alpha, self.params.gamma, self.update_rule
        ))?;
        sink.append_line(&"*".repeat(48))?;
        self.sink = Some(sink);
        Ok(())
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// ε-greedy action selection. Does not touch the table.
    pub fn choose_action(&mut self, state: &S) -> A {
        if self.rng.random::<f64>() < self.params.epsilon {
            let idx = self.rng.random_range(0..self.actions.len());
            return self.actions[idx].clone();
        }
        self.greedy_action(state)
    }

    /// Best known action; ties are broken uniformly at random.
    ///
    /// With nothing known for `state` every action ties.
    fn greedy_action(&mut self, state: &S) -> A {
        let values: Vec<Option<f64>> = self
            .actions
            .iter()
            .map(|action| self.q_table.get(state, action))
            .collect();

        let ties: Vec<usize> = match self.q_table.best_known(state, &self.actions) {
            Some(best) => values
                .iter()
                .enumerate()
                .filter(|(_, q)| **q == Some(best))
                .map(|(idx, _)| idx)
                .collect(),
            None => (0..self.actions.len()).collect(),
        };

        let idx = match ties.as_slice() {
            [only] => *only,
            // NaN estimates compare unequal to everything, including themselves.
            [] => self.rng.random_range(0..self.actions.len()),
            many => many[self.rng.random_range(0..many.len())],
        };
        self.actions[idx].clone()
    }

    /// Temporal-difference update for one transition.
    ///
    /// # Errors
    ///
    /// Only in strict mode: [`Error::InvalidAction`] or
    /// [`Error::InvalidReward`]. The table is unchanged on error.
    pub fn learn(&mut self, state: S, action: A, reward: f64, next_state: &S) -> Result<()> {
        if self.strict {
            self.check_transition(&action, reward)?;
        }

        let best_next = self
            .q_table
            .best_known(next_state, &self.actions)
            .unwrap_or(0.0);

        let current = self.q_table.get(&state, &action);
        let updated = match current {
            None => reward,
            Some(q) => self
                .update_rule
                .apply(q, reward, best_next, &self.params),
        };

        trace!(?state, ?action, reward, best_next, ?current, updated, "q update");
        self.q_table.set(state, action, updated);
        Ok(())
    }

    fn check_transition(&self, action: &A, reward: f64) -> Result<()> {
        if !self.actions.contains(action) {
            return Err(Error::InvalidAction {
                action: format!("{action:?}"),
            });
        }
        if !reward.is_finite() {
            return Err(Error::InvalidReward { value: reward });
        }
        Ok(())
    }

    /// Write every table entry to the attached sink, if any.
    pub fn dump_table(&mut self) -> Result<()> {
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        for (state, action, value) in self.q_table.export() {
            sink.append_line(&format!("({state:?}, {action:?}) {value}"))?;
        }
        Ok(())
    }

    /// Forget everything learned so far.
    pub fn clear(&mut self) {
        self.q_table.clear();
    }

    pub fn value(&self, state: &S, action: &A) -> Option<f64> {
        self.q_table.get(state, action)
    }

    pub fn table(&self) -> &QTable<S, A> {
        &self.q_table
    }

    pub fn snapshot(&self) -> QTableSnapshot<S, A> {
        self.q_table.snapshot()
    }

    pub fn params(&self) -> &LearnerParams {
        &self.params
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    pub fn update_rule(&self) -> UpdateRule {
        self.update_rule
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

impl<S, A> fmt::Debug for QLearner<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QLearner")
            .field("params", &self.params)
            .field("entries", &self.q_table.len())
            .field("update_rule", &self.update_rule)
            .field("strict", &self.strict)
            .field("rng_seed", &self.rng_seed)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}
