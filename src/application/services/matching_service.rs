//! Matching Service - the single matching worker
//!
//! Drains the inbound order stream, routes every order through the order
//! book and emits processed orders downstream.
//!
//! ## Architecture
//! - Receives orders via an unbounded MPSC channel
//! - Matches them sequentially; the book is touched by this worker only
//! - Emits the buying order then the selling order of every transaction
//! - Signals the injected [`CompletionTracker`] once per transaction, when
//!   the caller supplied one
//!
//! The loop ends when every inbound sender is dropped and the buffered
//! orders are drained; it then hands the book back to the caller.

use crate::domain::entities::{Order, Transaction};
use crate::domain::orderbook::{OrderBook, TransactionSink};
use crate::shared::completion::CompletionTracker;
use crate::shared::metrics::METRICS;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Sink used by the engine: outbound stream plus completion signalling.
pub struct ChannelSink {
    outbound: UnboundedSender<Order>,
    tracker: Option<Arc<CompletionTracker>>,
}

impl ChannelSink {
    pub fn new(outbound: UnboundedSender<Order>, tracker: Option<Arc<CompletionTracker>>) -> Self {
        Self { outbound, tracker }
    }
}

impl TransactionSink for ChannelSink {
    fn on_transaction(&mut self, transaction: &Arc<Transaction>, buying: &Order, selling: &Order) {
        let asset = transaction.asset().as_str();
        METRICS.transactions_total.with_label_values(&[asset]).inc();
        METRICS
            .shares_traded_total
            .with_label_values(&[asset])
            .inc_by(transaction.shares() as f64);

        for order in [buying, selling] {
            if self.outbound.send(order.clone()).is_err() {
                tracing::error!(
                    transaction_id = transaction.id(),
                    order_id = order.id(),
                    "输出通道已关闭，无法发送已处理订单"
                );
            }
        }

        // 无论下游是否还在，成交都已完成
        if let Some(tracker) = &self.tracker {
            tracker.done();
        }
    }
}

pub struct MatchingService {
    orderbook: OrderBook,
    inbound: UnboundedReceiver<Order>,
    sink: ChannelSink,
    orders_processed: u64,
}

impl MatchingService {
    pub fn new(
        orderbook: OrderBook,
        inbound: UnboundedReceiver<Order>,
        outbound: UnboundedSender<Order>,
        tracker: Arc<CompletionTracker>,
    ) -> Self {
        Self::with_sink(orderbook, inbound, ChannelSink::new(outbound, Some(tracker)))
    }

    /// Worker for callers that never wait on a drain barrier.
    pub fn untracked(
        orderbook: OrderBook,
        inbound: UnboundedReceiver<Order>,
        outbound: UnboundedSender<Order>,
    ) -> Self {
        Self::with_sink(orderbook, inbound, ChannelSink::new(outbound, None))
    }

    fn with_sink(orderbook: OrderBook, inbound: UnboundedReceiver<Order>, sink: ChannelSink) -> Self {
        MatchingService {
            orderbook,
            inbound,
            sink,
            orders_processed: 0,
        }
    }

    /// Runs the matching loop on the current thread until the inbound stream
    /// is closed and drained. Must not be called from inside an async runtime.
    pub fn run(mut self) -> OrderBook {
        tracing::info!("撮合引擎启动");
        while let Some(order) = self.inbound.blocking_recv() {
            self.process_order(order);
        }
        tracing::info!(
            orders = self.orders_processed,
            transactions = self.orderbook.transactions().len(),
            "撮合引擎关闭"
        );
        self.orderbook
    }

    /// Runs [`run`](Self::run) on a dedicated named thread.
    pub fn spawn(self, name: &str, cpu_core: Option<usize>) -> io::Result<JoinHandle<OrderBook>> {
        thread::Builder::new().name(name.to_string()).spawn(move || {
            if let Some(core) = cpu_core {
                pin_to_core(core);
            }
            self.run()
        })
    }

    #[inline]
    fn process_order(&mut self, order: Order) {
        let asset = order.asset_id().clone();
        let side = order.order_type();

        METRICS
            .orders_total
            .with_label_values(&[side.as_str(), asset.as_str()])
            .inc();
        if order.is_filled() {
            METRICS
                .rejected_orders_total
                .with_label_values(&["no_pending_shares"])
                .inc();
        }

        let timer = METRICS
            .matching_duration
            .with_label_values(&[asset.as_str()])
            .start_timer();
        let executed = self.orderbook.match_order(order, &mut self.sink);
        timer.observe_duration();

        self.orders_processed += 1;
        if !executed.is_empty() {
            tracing::debug!(asset = %asset, transactions = executed.len(), "order matched");
        }

        for resting_side in [side, side.opposite()] {
            METRICS
                .resting_orders
                .with_label_values(&[asset.as_str(), resting_side.as_str()])
                .set(self.orderbook.resting_order_count(asset.as_str(), resting_side) as f64);
        }
    }
}

#[cfg(feature = "cpu-affinity")]
fn pin_to_core(core: usize) {
    match core_affinity::get_core_ids().and_then(|ids| ids.get(core).copied()) {
        Some(id) if core_affinity::set_for_current(id) => {
            tracing::info!(core, "matching worker pinned");
        }
        _ => tracing::warn!(core, "could not pin matching worker"),
    }
}

#[cfg(not(feature = "cpu-affinity"))]
fn pin_to_core(core: usize) {
    tracing::warn!(core, "cpu-affinity feature disabled, worker not pinned");
}
