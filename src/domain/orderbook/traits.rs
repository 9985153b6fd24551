//! Seam between the order book and whatever consumes processed transactions

use crate::domain::entities::{Order, Transaction};
use std::sync::Arc;

/// Receives every transaction the book processes.
///
/// Called exactly once per transaction, after shares have been deducted and
/// the transaction recorded in the book and in both orders' histories. The
/// orders passed in reflect their updated pending shares.
pub trait TransactionSink {
    fn on_transaction(&mut self, transaction: &Arc<Transaction>, buying: &Order, selling: &Order);
}

/// Discards everything. Handy for benchmarks and book-only use.
impl TransactionSink for () {
    fn on_transaction(&mut self, _: &Arc<Transaction>, _: &Order, _: &Order) {}
}
