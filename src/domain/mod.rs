//! Domain Layer - Core Business Logic
//!
//! Pure matching logic: no channels, no threads, no I/O.
//!
//! ## Modules
//! - `entities`: Asset, Order, Transaction
//! - `orderbook`: per-asset queues and the matching algorithm
//! - `validation`: request checks applied before orders are built

pub mod entities;
pub mod orderbook;
pub mod validation;

pub use entities::{Asset, AssetId, Order, OrderStatus, OrderType, Price, Transaction};
pub use orderbook::{OrderBook, OrderQueue, TransactionSink};
pub use validation::{OrderValidator, ValidationConfig, ValidationError};
