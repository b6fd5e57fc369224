//! Limit order model
//!
//! An order is owned exclusively by the agent that created it until it is
//! canceled or executed; the order book holds a reference, never ownership.
//!
//! CRITICAL: all money values are i64 (minor currency units, e.g. cents)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing an order
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    #[error("order quantity must be at least 1, got {0}")]
    QuantityTooSmall(i64),

    #[error("limit price must be positive, got {0}")]
    NonPositivePrice(i64),
}

/// Which side of the book an order rests on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Whether this is the buy side
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }
}

/// A resting limit order
///
/// # Example
/// ```
/// use spoofing_simulator_core_rs::{Order, Side};
///
/// let order = Order::new("ord_00000001".to_string(), "IBM".to_string(), 10_000, Side::Buy, 99)
///     .unwrap();
/// assert_eq!(order.limit_price(), 99);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier unique within the owning agent's blotter
    id: String,

    /// Instrument the order rests on
    symbol: String,

    /// Number of shares (always >= 1)
    quantity: i64,

    /// Buy or sell
    side: Side,

    /// Limit price in minor currency units (always >= 1)
    limit_price: i64,
}

impl Order {
    /// Create a new limit order
    ///
    /// # Arguments
    /// * `id` - Identifier allocated by the owning blotter
    /// * `symbol` - Instrument symbol
    /// * `quantity` - Number of shares, must be >= 1
    /// * `side` - Buy or sell
    /// * `limit_price` - Price in minor units, must be >= 1
    pub fn new(
        id: String,
        symbol: String,
        quantity: i64,
        side: Side,
        limit_price: i64,
    ) -> Result<Self, OrderError> {
        if quantity < 1 {
            return Err(OrderError::QuantityTooSmall(quantity));
        }
        if limit_price < 1 {
            return Err(OrderError::NonPositivePrice(limit_price));
        }

        Ok(Self {
            id,
            symbol,
            quantity,
            side,
            limit_price,
        })
    }

    /// Order identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Instrument symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of shares
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Buy or sell
    pub fn side(&self) -> Side {
        self.side
    }

    /// Limit price in minor currency units
    pub fn limit_price(&self) -> i64 {
        self.limit_price
    }
}
