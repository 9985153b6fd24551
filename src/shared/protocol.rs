//! Wire-level records exchanged with order producers and consumers

use crate::domain::entities::{
    Asset, InvestorId, Order, OrderId, OrderStatus, OrderType, Price, TransactionId,
};
use crate::shared::asset_pool::AssetPool;
use serde::{Deserialize, Serialize};

/// 新订单请求
///
/// `price` is in integer ticks (two implied decimals, so 950 is 9.50).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    pub order_id: OrderId,
    pub investor_id: InvestorId,
    pub asset_id: String,
    #[serde(default)]
    pub asset_name: Option<String>,
    pub order_type: OrderType,
    pub price: Price,
    pub shares: u64,
}

impl NewOrderRequest {
    /// Builds the order, interning its trimmed asset id through `pool`.
    pub fn into_order(self, pool: &AssetPool) -> Order {
        let asset = Asset::new(pool.intern(self.asset_id.trim()));
        let asset = match self.asset_name {
            Some(name) => asset.with_name(name),
            None => asset,
        };
        Order::new(
            self.order_id,
            self.investor_id,
            asset,
            self.order_type,
            self.price,
            self.shares,
        )
    }
}

/// Snapshot of a processed order as emitted downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReport {
    pub order_id: OrderId,
    pub investor_id: InvestorId,
    pub asset_id: String,
    pub order_type: OrderType,
    pub price: Price,
    pub shares: u64,
    pub pending_shares: u64,
    pub status: OrderStatus,
    pub transactions: Vec<TransactionId>,
}

impl From<&Order> for OrderReport {
    fn from(order: &Order) -> Self {
        OrderReport {
            order_id: order.id(),
            investor_id: order.investor_id(),
            asset_id: order.asset_id().to_string(),
            order_type: order.order_type(),
            price: order.price(),
            shares: order.shares(),
            pending_shares: order.pending_shares(),
            status: order.status(),
            transactions: order.transactions().iter().map(|t| t.id()).collect(),
        }
    }
}
