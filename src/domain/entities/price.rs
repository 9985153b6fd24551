use serde::{Deserialize, Serialize};
use std::fmt;

/// 价格精度：两位小数
pub const PRICE_SCALE: u64 = 100;

/// Limit / execution price in integer ticks of `1 / PRICE_SCALE`.
///
/// `Price::new(950)` is 9.50. Integer ticks keep comparisons exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub const fn new(ticks: u64) -> Self {
        Price(ticks)
    }

    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Notional value of `shares` at this price, in ticks.
    pub fn notional(self, shares: u64) -> u128 {
        self.0 as u128 * shares as u128
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / PRICE_SCALE, self.0 % PRICE_SCALE)
    }
}
