//! Order book
//!
//! - `queue`: FIFO of resting orders for one asset side
//! - `book`: per-asset queues and the matching algorithm
//! - `traits`: the sink that observes processed transactions

pub mod book;
pub mod queue;
pub mod traits;

pub use book::{prices_match, Executions, OrderBook};
pub use queue::OrderQueue;
pub use traits::TransactionSink;
