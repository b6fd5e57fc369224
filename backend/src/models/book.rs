//! Cached order-book levels
//!
//! Agents never touch the live book. They see point-in-time snapshots of
//! aggregate levels, delivered in response to an explicit spread query and
//! discarded by the agent itself once consumed.

use serde::{Deserialize, Serialize};

/// The minimum price increment, in minor currency units.
pub const TICK: i64 = 1;

/// One aggregated price level of a book snapshot.
///
/// Snapshots are ordered best price first: descending prices on the bid
/// side, ascending on the ask side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price in minor currency units
    pub price: i64,
    /// Aggregate resting size at this price
    pub size: i64,
}

impl PriceLevel {
    /// Create a level.
    pub fn new(price: i64, size: i64) -> Self {
        Self { price, size }
    }
}

/// Best (first) level of a snapshot, if any.
pub fn best(levels: &[PriceLevel]) -> Option<&PriceLevel> {
    levels.first()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_of_empty_side() {
        assert_eq!(best(&[]), None);
    }

    #[test]
    fn test_best_is_first() {
        let bids = vec![PriceLevel::new(100, 500), PriceLevel::new(99, 1_200)];
        assert_eq!(best(&bids).map(|l| l.price), Some(100));
    }
}
