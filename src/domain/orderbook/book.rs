//! Per-asset order book and the matching algorithm

use super::queue::OrderQueue;
use super::traits::TransactionSink;
use crate::domain::entities::{AssetId, Order, OrderType, Transaction, TransactionId};
use crate::shared::error::MatchError;
use crate::shared::timestamp::get_fast_timestamp;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Transactions produced by one `match_order` call (0-8 typical).
pub type Executions = SmallVec<[Arc<Transaction>; 8]>;

#[derive(Debug, Clone, Default)]
struct AssetQueues {
    buy: OrderQueue,
    sell: OrderQueue,
}

impl AssetQueues {
    fn side(&self, side: OrderType) -> &OrderQueue {
        match side {
            OrderType::Buy => &self.buy,
            OrderType::Sell => &self.sell,
        }
    }

    /// (opposing, same side) for an incoming order of `incoming` type
    fn split_for(&mut self, incoming: OrderType) -> (&mut OrderQueue, &mut OrderQueue) {
        match incoming {
            OrderType::Buy => (&mut self.sell, &mut self.buy),
            OrderType::Sell => (&mut self.buy, &mut self.sell),
        }
    }
}

/// Owns a buy queue and a sell queue per asset plus the append-only
/// transaction history.
///
/// Queues are created on the first order of an asset and never removed.
/// All mutation goes through [`OrderBook::match_order`].
#[derive(Debug, Clone)]
pub struct OrderBook {
    assets: HashMap<AssetId, AssetQueues>,
    transactions: Vec<Arc<Transaction>>,
    next_transaction_id: TransactionId,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::with_starting_transaction_id(1)
    }

    pub fn with_starting_transaction_id(first_id: TransactionId) -> Self {
        OrderBook {
            assets: HashMap::new(),
            transactions: Vec::new(),
            next_transaction_id: first_id,
        }
    }

    /// Matches `incoming` against the opposite side of its asset.
    ///
    /// Resting orders are visited head first. Matching stops at the first
    /// candidate whose price the incoming limit does not accept; that
    /// candidate stays at the head. Every execution trades
    /// `min(pending shares)` at the resting order's price and is handed to
    /// `sink`. A partially filled resting order goes back to the head of its
    /// queue; an incoming order with shares left rests at the tail of its own
    /// side.
    pub fn match_order<S: TransactionSink>(&mut self, mut incoming: Order, sink: &mut S) -> Executions {
        let mut executed = Executions::new();

        if incoming.is_filled() {
            tracing::warn!(order_id = incoming.id(), "order reached the book with no pending shares, dropped");
            return executed;
        }

        let queues = self.assets.entry(incoming.asset_id().clone()).or_default();
        let (opposing, same_side) = queues.split_for(incoming.order_type());

        while let Some(mut candidate) = opposing.take_next() {
            if !prices_match(&incoming, &candidate) {
                opposing.push_front(candidate);
                break;
            }

            if candidate.is_filled() {
                // 不应出现：已成交订单不会回到队列
                tracing::warn!(
                    order_id = candidate.id(),
                    asset = %candidate.asset_id(),
                    "resting order with no pending shares skipped"
                );
                continue;
            }

            let transaction = match execute(&mut incoming, &mut candidate, self.next_transaction_id) {
                Ok(transaction) => Arc::new(transaction),
                Err(e) => {
                    tracing::error!(
                        incoming = incoming.id(),
                        resting = candidate.id(),
                        "matching aborted: {}",
                        e
                    );
                    opposing.push_front(candidate);
                    break;
                }
            };
            self.next_transaction_id += 1;

            incoming.record(transaction.clone());
            candidate.record(transaction.clone());
            self.transactions.push(transaction.clone());

            tracing::debug!(
                transaction_id = transaction.id(),
                asset = %transaction.asset(),
                buying = transaction.buying_order(),
                selling = transaction.selling_order(),
                shares = transaction.shares(),
                price = %transaction.price(),
                "transaction executed"
            );

            let (buying, selling) = match incoming.order_type() {
                OrderType::Buy => (&incoming, &candidate),
                OrderType::Sell => (&candidate, &incoming),
            };
            sink.on_transaction(&transaction, buying, selling);
            executed.push(transaction);

            if !candidate.is_filled() {
                opposing.push_front(candidate);
            }
            if incoming.is_filled() {
                break;
            }
        }

        if !incoming.is_filled() {
            tracing::trace!(
                order_id = incoming.id(),
                pending = incoming.pending_shares(),
                "order resting"
            );
            same_side.add(incoming);
        }

        executed
    }

    /// Every transaction this book has executed, oldest first.
    pub fn transactions(&self) -> &[Arc<Transaction>] {
        &self.transactions
    }

    pub fn queue(&self, asset: &str, side: OrderType) -> Option<&OrderQueue> {
        self.assets.get(asset).map(|queues| queues.side(side))
    }

    pub fn resting_order_count(&self, asset: &str, side: OrderType) -> usize {
        self.queue(asset, side).map_or(0, OrderQueue::len)
    }

    pub fn resting_orders(&self) -> impl Iterator<Item = &Order> {
        self.assets
            .values()
            .flat_map(|queues| queues.buy.iter().chain(queues.sell.iter()))
    }

    pub fn assets(&self) -> impl Iterator<Item = &AssetId> {
        self.assets.keys()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the incoming order's limit accepts the resting order's price.
/// Equal prices always match.
pub fn prices_match(incoming: &Order, resting: &Order) -> bool {
    match incoming.order_type() {
        OrderType::Buy => resting.price() <= incoming.price(),
        OrderType::Sell => resting.price() >= incoming.price(),
    }
}

/// Builds and applies one transaction between an incoming and a resting order.
fn execute(
    incoming: &mut Order,
    resting: &mut Order,
    id: TransactionId,
) -> Result<Transaction, MatchError> {
    let shares = incoming.pending_shares().min(resting.pending_shares());
    let price = resting.price();

    let (buying, selling) = match incoming.order_type() {
        OrderType::Buy => (incoming, resting),
        OrderType::Sell => (resting, incoming),
    };

    let transaction = Transaction::new(id, buying, selling, shares, price, get_fast_timestamp())?;
    transaction.process(buying, selling)?;
    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Asset, OrderStatus, Price};

    #[derive(Default)]
    struct Recorder {
        events: Vec<(Arc<Transaction>, Order, Order)>,
    }

    impl TransactionSink for Recorder {
        fn on_transaction(&mut self, transaction: &Arc<Transaction>, buying: &Order, selling: &Order) {
            self.events
                .push((transaction.clone(), buying.clone(), selling.clone()));
        }
    }

    fn buy(id: u64, asset: &str, price: u64, shares: u64) -> Order {
        Order::new(id, 100 + id, Asset::new(asset), OrderType::Buy, Price::new(price), shares)
    }

    fn sell(id: u64, asset: &str, price: u64, shares: u64) -> Order {
        Order::new(id, 100 + id, Asset::new(asset), OrderType::Sell, Price::new(price), shares)
    }

    fn resting_ids(book: &OrderBook, asset: &str, side: OrderType) -> Vec<(u64, u64)> {
        book.queue(asset, side)
            .map(|q| q.iter().map(|o| (o.id(), o.pending_shares())).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_full_match_at_equal_price() {
        let mut book = OrderBook::new();
        let mut sink = Recorder::default();

        assert!(book.match_order(sell(1, "X", 1000, 100), &mut sink).is_empty());
        let executed = book.match_order(buy(2, "X", 1000, 100), &mut sink);

        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].shares(), 100);
        assert_eq!(executed[0].price(), Price::new(1000));

        let (_, buying, selling) = &sink.events[0];
        assert_eq!(buying.pending_shares(), 0);
        assert_eq!(selling.pending_shares(), 0);
        assert_eq!(buying.status(), OrderStatus::Closed);
        assert_eq!(selling.status(), OrderStatus::Closed);

        assert_eq!(book.resting_order_count("X", OrderType::Buy), 0);
        assert_eq!(book.resting_order_count("X", OrderType::Sell), 0);
    }

    #[test]
    fn test_partial_fill_of_incoming_rests_remainder() {
        let mut book = OrderBook::new();
        let mut sink = Recorder::default();

        book.match_order(sell(1, "X", 950, 50), &mut sink);
        let executed = book.match_order(buy(2, "X", 1000, 80), &mut sink);

        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].shares(), 50);
        assert_eq!(executed[0].price(), Price::new(950));
        assert_eq!(executed[0].total(), 950 * 50);

        assert!(resting_ids(&book, "X", OrderType::Sell).is_empty());
        assert_eq!(resting_ids(&book, "X", OrderType::Buy), vec![(2, 30)]);

        let resting = book.queue("X", OrderType::Buy).unwrap().peek().unwrap();
        assert_eq!(resting.transactions().len(), 1);
        assert_eq!(resting.status(), OrderStatus::Open);
    }

    #[test]
    fn test_incompatible_price_rests_both() {
        let mut book = OrderBook::new();
        let mut sink = Recorder::default();

        book.match_order(buy(1, "X", 800, 30), &mut sink);
        let executed = book.match_order(sell(2, "X", 900, 30), &mut sink);

        assert!(executed.is_empty());
        assert!(sink.events.is_empty());
        assert_eq!(resting_ids(&book, "X", OrderType::Buy), vec![(1, 30)]);
        assert_eq!(resting_ids(&book, "X", OrderType::Sell), vec![(2, 30)]);
    }

    #[test]
    fn test_time_priority_at_equal_price() {
        let mut book = OrderBook::new();
        let mut sink = Recorder::default();

        book.match_order(sell(1, "X", 1000, 20), &mut sink);
        book.match_order(sell(2, "X", 1000, 20), &mut sink);
        let executed = book.match_order(buy(3, "X", 1000, 20), &mut sink);

        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].selling_order(), 1);
        assert_eq!(resting_ids(&book, "X", OrderType::Sell), vec![(2, 20)]);
        let untouched = book.queue("X", OrderType::Sell).unwrap().peek().unwrap();
        assert!(untouched.transactions().is_empty());
    }

    #[test]
    fn test_partially_filled_resting_order_keeps_head() {
        let mut book = OrderBook::new();
        let mut sink = Recorder::default();

        book.match_order(sell(1, "X", 1000, 50), &mut sink);
        book.match_order(sell(2, "X", 1000, 50), &mut sink);
        book.match_order(buy(3, "X", 1000, 20), &mut sink);

        // order 1 still ahead of order 2
        assert_eq!(resting_ids(&book, "X", OrderType::Sell), vec![(1, 30), (2, 50)]);

        let executed = book.match_order(buy(4, "X", 1000, 40), &mut sink);
        assert_eq!(executed.len(), 2);
        assert_eq!(executed[0].selling_order(), 1);
        assert_eq!(executed[0].shares(), 30);
        assert_eq!(executed[1].selling_order(), 2);
        assert_eq!(executed[1].shares(), 10);
        assert_eq!(resting_ids(&book, "X", OrderType::Sell), vec![(2, 40)]);
    }

    #[test]
    fn test_incoming_sell_trades_at_resting_buy_price() {
        let mut book = OrderBook::new();
        let mut sink = Recorder::default();

        book.match_order(buy(1, "X", 1050, 10), &mut sink);
        let executed = book.match_order(sell(2, "X", 1000, 10), &mut sink);

        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].price(), Price::new(1050));
        assert_eq!(executed[0].buying_order(), 1);
        assert_eq!(executed[0].selling_order(), 2);
    }

    #[test]
    fn test_sweep_stops_at_first_incompatible_head() {
        let mut book = OrderBook::new();
        let mut sink = Recorder::default();

        book.match_order(sell(1, "X", 900, 10), &mut sink);
        book.match_order(sell(2, "X", 1100, 10), &mut sink);
        book.match_order(sell(3, "X", 950, 10), &mut sink);

        let executed = book.match_order(buy(4, "X", 1000, 30), &mut sink);

        // order 3 is compatible but sits behind order 2 in arrival order
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].selling_order(), 1);
        assert_eq!(resting_ids(&book, "X", OrderType::Sell), vec![(2, 10), (3, 10)]);
        assert_eq!(resting_ids(&book, "X", OrderType::Buy), vec![(4, 20)]);
    }

    #[test]
    fn test_empty_book_rests_without_transactions() {
        let mut book = OrderBook::new();
        let executed = book.match_order(buy(1, "NEW", 1000, 5), &mut ());

        assert!(executed.is_empty());
        assert!(book.transactions().is_empty());
        assert_eq!(book.asset_count(), 1);
        assert_eq!(resting_ids(&book, "NEW", OrderType::Buy), vec![(1, 5)]);
        assert_eq!(book.resting_order_count("NEW", OrderType::Sell), 0);
    }

    #[test]
    fn test_assets_are_isolated() {
        let mut book = OrderBook::new();
        book.match_order(sell(1, "X", 1000, 10), &mut ());
        let executed = book.match_order(buy(2, "Y", 1000, 10), &mut ());

        assert!(executed.is_empty());
        assert_eq!(book.asset_count(), 2);
        assert_eq!(book.resting_orders().count(), 2);
    }

    #[test]
    fn test_history_recorded_everywhere() {
        let mut book = OrderBook::with_starting_transaction_id(500);
        let mut sink = Recorder::default();

        book.match_order(sell(1, "X", 1000, 10), &mut sink);
        book.match_order(sell(2, "X", 1000, 10), &mut sink);
        book.match_order(buy(3, "X", 1000, 15), &mut sink);

        let ids: Vec<_> = book.transactions().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![500, 501]);

        let (last_tx, buying, selling) = sink.events.last().unwrap();
        assert_eq!(buying.transactions().len(), 2);
        assert_eq!(selling.transactions().len(), 1);
        assert!(Arc::ptr_eq(&buying.transactions()[1], last_tx));
        assert!(Arc::ptr_eq(&book.transactions()[1], last_tx));
    }

    #[test]
    fn test_sink_sees_updated_shares() {
        let mut book = OrderBook::new();
        let mut sink = Recorder::default();

        book.match_order(buy(1, "X", 1000, 100), &mut sink);
        book.match_order(sell(2, "X", 1000, 30), &mut sink);
        book.match_order(sell(3, "X", 1000, 30), &mut sink);

        let pending: Vec<_> = sink
            .events
            .iter()
            .map(|(t, b, s)| (t.shares(), b.pending_shares(), s.pending_shares()))
            .collect();
        assert_eq!(pending, vec![(30, 70, 0), (30, 40, 0)]);
    }

    #[test]
    fn test_filled_resting_order_is_skipped() {
        let mut book = OrderBook::new();

        let mut ghost = sell(1, "X", 1000, 10);
        ghost.fill(10);
        book.assets
            .entry(AssetId::new("X"))
            .or_default()
            .sell
            .add(ghost);
        book.match_order(sell(2, "X", 1000, 10), &mut ());

        let executed = book.match_order(buy(3, "X", 1000, 10), &mut ());
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].selling_order(), 2);
        assert_eq!(book.resting_order_count("X", OrderType::Sell), 0);
    }

    #[test]
    fn test_filled_incoming_order_never_rests() {
        let mut book = OrderBook::new();
        let mut empty = buy(1, "X", 1000, 10);
        empty.fill(10);

        assert!(book.match_order(empty, &mut ()).is_empty());
        assert_eq!(book.resting_order_count("X", OrderType::Buy), 0);
    }

    #[test]
    fn test_prices_match_rule() {
        let b = buy(1, "X", 1000, 1);
        let s = sell(2, "X", 1000, 1);
        assert!(prices_match(&b, &s));
        assert!(prices_match(&s, &b));
        assert!(prices_match(&buy(3, "X", 1001, 1), &s));
        assert!(!prices_match(&buy(4, "X", 999, 1), &s));
        assert!(prices_match(&sell(5, "X", 999, 1), &b));
        assert!(!prices_match(&sell(6, "X", 1001, 1), &b));
    }
}
