//! Domain types for the spoofing simulation
//!
//! - **order**: limit orders and their validation
//! - **message**: the inter-agent wire protocol
//! - **book**: cached order-book levels
//! - **blotter**: the per-agent order-management view
//! - **event**: structured event logging for replay and auditing

pub mod blotter;
pub mod book;
pub mod event;
pub mod message;
pub mod order;

/// Kernel-assigned agent identity, used as message source/destination and
/// order-book attribution.
pub type AgentId = u32;

pub use blotter::{Blotter, CASH_SYMBOL};
pub use book::{PriceLevel, TICK};
pub use event::{Event, EventLog};
pub use message::Message;
pub use order::{Order, OrderError, Side};
