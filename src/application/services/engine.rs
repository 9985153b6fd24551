//! Engine handle
//!
//! Wires the inbound and outbound streams, spawns the [`MatchingService`]
//! worker and exposes the only entry points other threads get: submit
//! orders, receive processed orders, shut down.
//!
//! ```rust,ignore
//! let tracker = Arc::new(CompletionTracker::new());
//! let mut engine = MatchingEngine::start(EngineConfig::default(), tracker.clone())?;
//! tracker.add(1);
//! engine.submit(sell)?;
//! engine.submit(buy)?;
//! tracker.wait();
//! let book = engine.shutdown()?;
//! ```
//!
//! Drivers that only need the final book use [`MatchingEngine::start_untracked`].

use super::matching_service::MatchingService;
use crate::domain::entities::{Order, TransactionId};
use crate::domain::orderbook::OrderBook;
use crate::shared::completion::CompletionTracker;
use crate::shared::error::EngineError;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Name of the matching worker thread
    pub worker_name: String,

    /// Core to pin the worker to (needs the `cpu-affinity` feature)
    pub cpu_core: Option<usize>,

    /// Id given to the first transaction
    pub starting_transaction_id: TransactionId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_name: "matching-engine".to_string(),
            cpu_core: None,
            starting_transaction_id: 1,
        }
    }
}

pub struct MatchingEngine;

impl MatchingEngine {
    /// Starts a matching worker with an empty book.
    pub fn start(
        config: EngineConfig,
        tracker: Arc<CompletionTracker>,
    ) -> Result<EngineHandle, EngineError> {
        Self::launch(config, Some(tracker))
    }

    /// Starts a worker that signals no completion tracker.
    pub fn start_untracked(config: EngineConfig) -> Result<EngineHandle, EngineError> {
        Self::launch(config, None)
    }

    fn launch(
        config: EngineConfig,
        tracker: Option<Arc<CompletionTracker>>,
    ) -> Result<EngineHandle, EngineError> {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let book = OrderBook::with_starting_transaction_id(config.starting_transaction_id);
        let service = match tracker {
            Some(tracker) => MatchingService::new(book, inbound_rx, outbound_tx, tracker),
            None => MatchingService::untracked(book, inbound_rx, outbound_tx),
        };
        let worker = service.spawn(&config.worker_name, config.cpu_core)?;

        tracing::info!(worker = %config.worker_name, "matching engine started");

        Ok(EngineHandle {
            inbound: inbound_tx,
            processed: Some(outbound_rx),
            worker,
        })
    }
}

/// Owner-side view of a running engine.
pub struct EngineHandle {
    inbound: UnboundedSender<Order>,
    processed: Option<UnboundedReceiver<Order>>,
    worker: JoinHandle<OrderBook>,
}

impl EngineHandle {
    /// Queues an order for matching. Never blocks.
    pub fn submit(&self, order: Order) -> Result<(), EngineError> {
        self.inbound.send(order).map_err(|_| EngineError::InputClosed)
    }

    pub fn inbound(&self) -> &UnboundedSender<Order> {
        &self.inbound
    }

    /// Extra producer handle. The worker only stops once every clone is dropped.
    pub fn sender(&self) -> UnboundedSender<Order> {
        self.inbound.clone()
    }

    /// Outbound stream of processed orders, unless it was taken.
    pub fn processed(&mut self) -> Option<&mut UnboundedReceiver<Order>> {
        self.processed.as_mut()
    }

    /// Moves the outbound stream out, e.g. to a consumer thread or task.
    pub fn take_processed(&mut self) -> Option<UnboundedReceiver<Order>> {
        self.processed.take()
    }

    /// Closes this handle's inbound side and waits for the worker to drain.
    ///
    /// Blocks the calling thread; call it outside an async context or from
    /// `spawn_blocking`.
    pub fn shutdown(self) -> Result<OrderBook, EngineError> {
        let EngineHandle { inbound, worker, .. } = self;
        drop(inbound);
        worker.join().map_err(|_| EngineError::WorkerPanicked)
    }
}
