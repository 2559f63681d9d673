//! Tabular Q-learning
//!
//! The value store ([`QTable`]) and the decision/learning engine built on it
//! ([`QLearner`]).
//!
//! ## Update law
//!
//! For a transition `(s, a, r, s')` with `M' = max_a' Q(s', a')` over known
//! estimates (0.0 when `s'` has none):
//!
//! | Q(s,a) before | Q(s,a) after |
//! |---------------|--------------|
//! | unknown       | `r` |
//! | `q`           | `q + α(r - γM')` ([`UpdateRule::Incremental`], default) |
//! | `q`           | `q + α(r + γM' - q)` ([`UpdateRule::Canonical`]) |
//!
//! ## Usage Example
//!
//! ```no_run
//! use smartcab::q_learning::{LearnerParams, QLearner, UpdateRule};
//! use smartcab::types::Action;
//!
//! let learner = QLearner::<u32, Action>::new(
//!     LearnerParams::new(
//!         0.05, // epsilon (exploration)
//!         0.1,  // alpha (learning rate)
//!         0.9,  // gamma (discount)
//!     ),
//!     Action::ALL.to_vec(),
//! )?
//! .with_update_rule(UpdateRule::Incremental);
//! # Ok::<(), smartcab::Error>(())
//! ```

pub mod learner;
pub mod q_table;
pub mod snapshot;

pub use learner::{LearnerParams, QLearner, UpdateRule};
pub use q_table::QTable;
pub use snapshot::{QEntry, QTableSnapshot};
