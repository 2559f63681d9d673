//! CLI infrastructure for the smartcab simulator
//!
//! This module provides the command-line interface for running training
//! sessions in the grid world and inspecting saved tables.

pub mod commands;
pub mod output;
