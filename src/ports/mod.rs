//! Ports (trait boundaries) for external collaborators.
//!
//! The learner core only talks to the world through these traits. Concrete
//! implementations live in [`crate::world`], [`crate::agent`] and
//! [`crate::adapters`].

pub mod agent;
pub mod environment;
pub mod observer;
pub mod planner;
pub mod repository;
pub mod sink;

pub use agent::{Agent, StepRecord};
pub use environment::Environment;
pub use observer::Observer;
pub use planner::Planner;
pub use repository::{DriveSnapshot, SnapshotRepository};
pub use sink::DiagnosticSink;
