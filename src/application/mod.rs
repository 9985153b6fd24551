//! Application Layer - Services and Use Cases
//!
//! Runs the domain's order book behind message-passing entry points.
//!
//! ## Modules
//! - `services`: the matching worker and the engine handle
//! - `use_cases`: validated order submission

pub mod services;
pub mod use_cases;

pub use services::{EngineConfig, EngineHandle, MatchingEngine, MatchingService};
pub use use_cases::SubmitOrderUseCase;
