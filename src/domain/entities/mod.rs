//! Domain entities
//!
//! Plain records with the state transitions the matching process needs.
//! Nothing here knows about channels or threads.

pub mod asset;
pub mod order;
pub mod price;
pub mod transaction;

pub use asset::{Asset, AssetId};
pub use order::{InvestorId, Order, OrderId, OrderStatus, OrderType};
pub use price::Price;
pub use transaction::{Transaction, TransactionId};
