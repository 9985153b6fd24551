//! Multi-asset order matching engine
//!
//! A single worker thread drains an inbound stream of orders, matches each
//! one against its asset's book (price compatibility, FIFO time priority,
//! partial fills at the resting order's price) and emits the two updated
//! orders of every transaction on an outbound stream, signalling an injected
//! completion tracker once per transaction.

// 全局内存分配器：使用 jemalloc
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

pub mod application;
pub mod domain;
pub mod interfaces;
pub mod shared;

pub use application::{EngineConfig, EngineHandle, MatchingEngine};
pub use domain::{Asset, AssetId, Order, OrderBook, OrderStatus, OrderType, Price, Transaction};
pub use shared::{CompletionTracker, EngineError, MatchError};
