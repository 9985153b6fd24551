//! Shared utilities and types used across all layers
//!
//! - Protocol records (order requests, processed-order reports)
//! - Error types
//! - Completion tracker, asset interning, timestamps, metrics

pub mod asset_pool;
pub mod completion;
pub mod error;
pub mod metrics;
pub mod protocol;
pub mod timestamp;

pub use asset_pool::AssetPool;
pub use completion::CompletionTracker;
pub use error::{EngineError, MatchError};
pub use protocol::{NewOrderRequest, OrderReport};
pub use timestamp::{get_fast_timestamp, get_precise_timestamp};
