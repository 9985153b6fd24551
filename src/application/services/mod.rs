//! Application Services
//!
//! - `matching_service`: the matching loop and its channel sink
//! - `engine`: starts the worker and exposes submit / receive / shutdown

pub mod engine;
pub mod matching_service;

pub use engine::{EngineConfig, EngineHandle, MatchingEngine};
pub use matching_service::{ChannelSink, MatchingService};
