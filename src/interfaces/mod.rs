//! Interfaces Layer - entry points into the engine
//!
//! - `cli`: command-line driver replaying JSON-lines orders through the engine

pub mod cli;
