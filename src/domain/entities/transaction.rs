use super::asset::AssetId;
use super::order::{Order, OrderId, OrderType};
use super::price::Price;
use crate::shared::error::MatchError;

pub type TransactionId = u64;

/// Record of one match between a buying order and a selling order.
///
/// The transaction names both orders by id; the orders themselves hold the
/// shared `Arc<Transaction>` in their history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionId,
    asset: AssetId,
    buying_order: OrderId,
    selling_order: OrderId,
    shares: u64,
    price: Price,
    total: u128,
    executed_at: u64,
}

impl Transaction {
    /// Pairs a buying and a selling order for `shares` at `price`.
    ///
    /// Rejects zero shares, a pair that is not one BUY and one SELL of the
    /// same asset, and quantities either side cannot cover.
    pub fn new(
        id: TransactionId,
        buying: &Order,
        selling: &Order,
        shares: u64,
        price: Price,
        executed_at: u64,
    ) -> Result<Self, MatchError> {
        if shares == 0 {
            return Err(MatchError::ZeroShares);
        }
        if buying.order_type() != OrderType::Buy || selling.order_type() != OrderType::Sell {
            return Err(MatchError::SideMismatch {
                buying: buying.id(),
                selling: selling.id(),
            });
        }
        if buying.asset_id() != selling.asset_id() {
            return Err(MatchError::AssetMismatch {
                buying: buying.asset_id().clone(),
                selling: selling.asset_id().clone(),
            });
        }
        for order in [buying, selling] {
            if order.pending_shares() < shares {
                return Err(MatchError::InsufficientShares {
                    order_id: order.id(),
                    pending: order.pending_shares(),
                    requested: shares,
                });
            }
        }

        Ok(Transaction {
            id,
            asset: buying.asset_id().clone(),
            buying_order: buying.id(),
            selling_order: selling.id(),
            shares,
            price,
            total: price.notional(shares),
            executed_at,
        })
    }

    /// Deducts the traded shares from both orders.
    ///
    /// The orders passed in must be the ones this transaction was built from
    /// and must still cover `shares`.
    pub fn process(&self, buying: &mut Order, selling: &mut Order) -> Result<(), MatchError> {
        if buying.id() != self.buying_order || selling.id() != self.selling_order {
            return Err(MatchError::UnknownOrder {
                transaction_id: self.id,
            });
        }
        for order in [&*buying, &*selling] {
            if order.pending_shares() < self.shares {
                return Err(MatchError::InsufficientShares {
                    order_id: order.id(),
                    pending: order.pending_shares(),
                    requested: self.shares,
                });
            }
        }

        buying.fill(self.shares);
        selling.fill(self.shares);
        Ok(())
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    pub fn buying_order(&self) -> OrderId {
        self.buying_order
    }

    pub fn selling_order(&self) -> OrderId {
        self.selling_order
    }

    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// price × shares, in price ticks
    pub fn total(&self) -> u128 {
        self.total
    }

    /// Unix nanoseconds.
    pub fn executed_at(&self) -> u64 {
        self.executed_at
    }
}
