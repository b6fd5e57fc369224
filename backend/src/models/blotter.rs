//! Per-agent order-management view
//!
//! The blotter is the slice of the order-management substrate that belongs
//! to a single agent: its holdings, its outstanding orders, and its cached
//! market data. The agent's strategy code treats holdings as read-only;
//! they move only when the substrate applies an execution notification.
//!
//! # Caching with explicit invalidation
//!
//! Bid/ask snapshots are populated by a spread query and live until the
//! consuming agent calls [`Blotter::clear_book`]. There is no expiry and no
//! subscription: a snapshot is a point-in-time observation, and clearing it
//! is what forces a fresh query on the next cycle.
//!
//! CRITICAL: all money values are i64 (minor currency units)

use crate::core::time::MarketHours;
use crate::models::book::PriceLevel;
use crate::models::order::Order;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Reserved holdings entry for settled cash.
pub const CASH_SYMBOL: &str = "CASH";

/// A single agent's view of its own trading state.
///
/// # Example
/// ```
/// use spoofing_simulator_core_rs::Blotter;
///
/// let blotter = Blotter::new(100_000);
/// assert_eq!(blotter.cash(), 100_000);
/// assert_eq!(blotter.open_order_count(), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blotter {
    /// Symbol → signed quantity, plus the reserved CASH entry
    holdings: HashMap<String, i64>,

    /// Outstanding orders by id.
    ///
    /// A BTreeMap so that sweeps over outstanding orders (cancel-stale,
    /// cancel-all) visit them in a reproducible order under a fixed seed.
    orders: BTreeMap<String, Order>,

    /// Cached bid levels per symbol, best (highest) first
    known_bids: HashMap<String, Vec<PriceLevel>>,

    /// Cached ask levels per symbol, best (lowest) first
    known_asks: HashMap<String, Vec<PriceLevel>>,

    /// Cached last observed trade price per symbol
    last_trade: HashMap<String, i64>,

    /// Session hours, once the open/close discovery handshake completes
    market_hours: Option<MarketHours>,

    /// Set by the substrate when the market has closed for the day
    closed_for_day: bool,

    /// Next order sequence number for id allocation
    next_order_seq: u64,
}

impl Blotter {
    /// Create a blotter holding only starting cash.
    pub fn new(starting_cash: i64) -> Self {
        let mut holdings = HashMap::new();
        holdings.insert(CASH_SYMBOL.to_string(), starting_cash);
        Self {
            holdings,
            orders: BTreeMap::new(),
            known_bids: HashMap::new(),
            known_asks: HashMap::new(),
            last_trade: HashMap::new(),
            market_hours: None,
            closed_for_day: false,
            next_order_seq: 0,
        }
    }

    // =========================================================================
    // Holdings
    // =========================================================================

    /// Settled cash in minor currency units.
    pub fn cash(&self) -> i64 {
        self.holdings.get(CASH_SYMBOL).copied().unwrap_or(0)
    }

    /// Signed position in `symbol`, or None if the symbol has never traded.
    pub fn holding(&self, symbol: &str) -> Option<i64> {
        self.holdings.get(symbol).copied()
    }

    /// Whether any position entry exists for `symbol`.
    pub fn has_position(&self, symbol: &str) -> bool {
        self.holdings.contains_key(symbol)
    }

    // =========================================================================
    // Outstanding orders
    // =========================================================================

    /// Allocate the next order id.
    ///
    /// Ids are formatted counters (`ord_00000000`, `ord_00000001`, ...) so
    /// that two runs with the same seed produce byte-identical logs.
    pub fn allocate_order_id(&mut self) -> String {
        let id = format!("ord_{:08}", self.next_order_seq);
        self.next_order_seq += 1;
        id
    }

    /// Record a freshly placed order as outstanding.
    pub fn register_order(&mut self, order: Order) {
        self.orders.insert(order.id().to_string(), order);
    }

    /// Remove an order, e.g. when the substrate confirms a cancellation.
    ///
    /// Returns the removed order, or None if it was already gone;
    /// cancellation is cooperative, so a confirm may trail an execution.
    pub fn remove_order(&mut self, order_id: &str) -> Option<Order> {
        self.orders.remove(order_id)
    }

    /// All outstanding orders, keyed by id.
    pub fn outstanding_orders(&self) -> &BTreeMap<String, Order> {
        &self.orders
    }

    /// Number of outstanding orders.
    pub fn open_order_count(&self) -> usize {
        self.orders.len()
    }

    /// Apply an execution notification for `order`.
    ///
    /// Moves the position and cash by the filled quantity at the limit
    /// price and drops the order from the outstanding set. Tolerates
    /// notifications for orders the agent believed already canceled (the
    /// holdings still move; there is simply no entry left to remove).
    ///
    /// Returns true if the order was still outstanding.
    pub fn apply_execution(&mut self, order: &Order) -> bool {
        let notional = order.quantity() * order.limit_price();
        let position = self.holdings.entry(order.symbol().to_string()).or_insert(0);
        if order.side().is_buy() {
            *position += order.quantity();
        } else {
            *position -= order.quantity();
        }
        let cash = self.holdings.entry(CASH_SYMBOL.to_string()).or_insert(0);
        if order.side().is_buy() {
            *cash -= notional;
        } else {
            *cash += notional;
        }

        self.orders.remove(order.id()).is_some()
    }

    // =========================================================================
    // Cached market data
    // =========================================================================

    /// Record a spread-query response.
    ///
    /// The exchange's spread reply also reports the last trade, so the
    /// last-trade cache is refreshed here when the response carries one.
    pub fn record_spread(
        &mut self,
        symbol: &str,
        bids: Vec<PriceLevel>,
        asks: Vec<PriceLevel>,
        last_trade: Option<i64>,
    ) {
        self.known_bids.insert(symbol.to_string(), bids);
        self.known_asks.insert(symbol.to_string(), asks);
        if let Some(price) = last_trade {
            self.last_trade.insert(symbol.to_string(), price);
        }
    }

    /// Cached bid levels for `symbol`, best first.
    pub fn known_bids(&self, symbol: &str) -> Option<&[PriceLevel]> {
        self.known_bids.get(symbol).map(|levels| levels.as_slice())
    }

    /// Cached ask levels for `symbol`, best first.
    pub fn known_asks(&self, symbol: &str) -> Option<&[PriceLevel]> {
        self.known_asks.get(symbol).map(|levels| levels.as_slice())
    }

    /// Whether any spread snapshot (either side) is cached for `symbol`.
    pub fn have_spread(&self, symbol: &str) -> bool {
        self.known_bids.contains_key(symbol) || self.known_asks.contains_key(symbol)
    }

    /// Discard the cached snapshot for `symbol`.
    ///
    /// The consumer calls this once a snapshot has been acted on, which
    /// sends it back into the awaiting-spread state on its next wakeup.
    pub fn clear_book(&mut self, symbol: &str) {
        self.known_bids.remove(symbol);
        self.known_asks.remove(symbol);
    }

    /// Record a last-trade query response.
    pub fn record_last_trade(&mut self, symbol: &str, price: i64) {
        self.last_trade.insert(symbol.to_string(), price);
    }

    /// Cached last trade price for `symbol`.
    pub fn last_trade(&self, symbol: &str) -> Option<i64> {
        self.last_trade.get(symbol).copied()
    }

    // =========================================================================
    // Market session
    // =========================================================================

    /// Session hours, if the discovery handshake has completed.
    pub fn market_hours(&self) -> Option<MarketHours> {
        self.market_hours
    }

    /// Publish session hours (substrate side).
    pub fn set_market_hours(&mut self, hours: MarketHours) {
        self.market_hours = Some(hours);
    }

    /// Whether the market has closed for the day.
    pub fn market_closed(&self) -> bool {
        self.closed_for_day
    }

    /// Mark the market closed for the day (substrate side).
    pub fn set_market_closed(&mut self, closed: bool) {
        self.closed_for_day = closed;
    }
}
