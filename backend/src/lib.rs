//! Spoofing Simulator Core - Rust Engine
//!
//! Adversarial-trading agents for a discrete-event market simulation: a
//! coordinating Botmaster that accumulates a position and opens an attack
//! window, and Spoofers that layer a large deceptive bid one tick behind
//! the best bid for as long as the window stays open.
//!
//! # Architecture
//!
//! - **core**: simulated time (opaque nanosecond clock, market session)
//! - **models**: domain types (Order, Message, Blotter, Event)
//! - **agents**: the Botmaster and Spoofer state machines
//! - **link**: the consumed interface of the external kernel and exchange
//! - **checkpoint**: pause/resume snapshots of agent state
//! - **rng**: deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (minor currency units)
//! 2. All randomness is deterministic (seeded RNG per agent)
//! 3. A spoofer's deceptive order, when one rests, sits exactly one tick
//!    behind the most recently observed best bid

// Module declarations
pub mod agents;
pub mod checkpoint;
pub mod core;
pub mod link;
pub mod models;
pub mod rng;

// Re-exports for convenience
pub use agents::{
    botmaster::{Botmaster, BotmasterConfig, BotmasterState},
    spoofer::{MasterCmd, Spoofer, SpooferConfig, SpooferState},
    AgentError, ConfigError, TradingAgent,
};
pub use checkpoint::{BotmasterSnapshot, CheckpointError, SpooferSnapshot};
pub use crate::core::time::{MarketHours, SimDuration, SimTime};
pub use link::ExchangeLink;
pub use models::{
    blotter::{Blotter, CASH_SYMBOL},
    book::{PriceLevel, TICK},
    event::{Event, EventLog},
    message::Message,
    order::{Order, OrderError, Side},
    AgentId,
};
pub use rng::RngManager;
