//! Simulated grid world and route planning
//!
//! A headless take on the smartcab world: a wrap-around grid of signalled
//! intersections, a handful of dummy cars, and a greedy planner that tells
//! the learning car which way to go next.

pub mod grid;
pub mod planner;

pub use grid::{GridWorld, TripStatus, WorldConfig};
pub use planner::RoutePlanner;
