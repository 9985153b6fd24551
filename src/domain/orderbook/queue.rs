//! FIFO queue of resting orders for one (asset, side)

use crate::domain::entities::Order;
use std::collections::VecDeque;

/// Arrival-ordered resting orders.
///
/// Insertion order is match priority. Prices are compared per candidate
/// during matching; the queue never re-sorts.
#[derive(Debug, Clone, Default)]
pub struct OrderQueue {
    orders: VecDeque<Order>,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the tail.
    pub fn add(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Removes and returns the head, or `None` when empty.
    pub fn take_next(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Puts an order back at the head, keeping its time priority.
    pub(crate) fn push_front(&mut self, order: Order) {
        self.orders.push_front(order);
    }

    pub fn peek(&self) -> Option<&Order> {
        self.orders.front()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Sum of pending shares across all resting orders.
    pub fn pending_shares(&self) -> u64 {
        self.orders.iter().map(Order::pending_shares).sum()
    }
}
