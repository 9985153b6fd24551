use super::asset::{Asset, AssetId};
use super::price::Price;
use super::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type OrderId = u64;
pub type InvestorId = u64;

/// 订单方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    pub fn opposite(self) -> OrderType {
        match self {
            OrderType::Buy => OrderType::Sell,
            OrderType::Sell => OrderType::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Buy => "buy",
            OrderType::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Buy => f.write_str("BUY"),
            OrderType::Sell => f.write_str("SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Open,
    Closed,
}

/// One side's intent to trade.
///
/// `order_type`, `price` and `shares` are fixed at creation. `pending_shares`
/// only ever shrinks, and only through [`Transaction::process`].
///
/// Clones share the transaction history, so a snapshot costs O(1) however
/// many fills the order has seen.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    investor_id: InvestorId,
    asset: Asset,
    order_type: OrderType,
    price: Price,
    shares: u64,
    pending_shares: u64,
    status: OrderStatus,
    transactions: Arc<Vec<Arc<Transaction>>>,
}

impl Order {
    /// Builds an open order with all requested shares pending.
    ///
    /// Callers are expected to have validated the request first; the book
    /// assumes `shares > 0` on entry.
    pub fn new(
        id: OrderId,
        investor_id: InvestorId,
        asset: Asset,
        order_type: OrderType,
        price: Price,
        shares: u64,
    ) -> Self {
        Order {
            id,
            investor_id,
            asset,
            order_type,
            price,
            shares,
            pending_shares: shares,
            status: OrderStatus::Open,
            transactions: Arc::new(Vec::new()),
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn investor_id(&self) -> InvestorId {
        self.investor_id
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn asset_id(&self) -> &AssetId {
        &self.asset.id
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Originally requested quantity.
    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn pending_shares(&self) -> u64 {
        self.pending_shares
    }

    pub fn filled_shares(&self) -> u64 {
        self.shares - self.pending_shares
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_filled(&self) -> bool {
        self.pending_shares == 0
    }

    /// Transactions this order took part in, oldest first.
    pub fn transactions(&self) -> &[Arc<Transaction>] {
        &self.transactions
    }

    /// Deducts executed shares and closes the order once nothing is pending.
    /// `shares` has already been checked against `pending_shares`.
    pub(crate) fn fill(&mut self, shares: u64) {
        debug_assert!(shares <= self.pending_shares);
        self.pending_shares -= shares;
        if self.pending_shares == 0 {
            self.status = OrderStatus::Closed;
        }
    }

    pub(crate) fn record(&mut self, transaction: Arc<Transaction>) {
        // 只有仍被快照持有时才会复制
        Arc::make_mut(&mut self.transactions).push(transaction);
    }
}
