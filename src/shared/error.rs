//! Error types shared across layers

use crate::domain::entities::{AssetId, OrderId, TransactionId};
use crate::domain::validation::ValidationError;

/// Violations detected while building or applying a transaction.
///
/// None of these can occur while the book's invariants hold; the book logs
/// them and keeps running instead of aborting the asset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("transaction must trade a positive number of shares")]
    ZeroShares,

    #[error("order {buying} is not a BUY or order {selling} is not a SELL")]
    SideMismatch { buying: OrderId, selling: OrderId },

    #[error("cannot pair orders of different assets ({buying} / {selling})")]
    AssetMismatch { buying: AssetId, selling: AssetId },

    #[error("order {order_id} has {pending} pending shares, cannot trade {requested}")]
    InsufficientShares {
        order_id: OrderId,
        pending: u64,
        requested: u64,
    },

    #[error("transaction {transaction_id} applied to orders it was not built from")]
    UnknownOrder { transaction_id: TransactionId },
}

/// Errors surfaced by the engine's message-passing entry points.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("inbound order stream is closed")]
    InputClosed,

    #[error("failed to spawn matching worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("matching worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
