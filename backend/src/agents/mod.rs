//! Trading agents
//!
//! Two cooperating roles drive the manipulation scenario:
//! - **Botmaster** (coordinator): decides the attack time, accumulates a
//!   position, answers attack-status queries, liquidates at end of day.
//! - **Spoofer**: maintains a large deceptive bid one tick behind the best
//!   bid for the duration of the attack window.
//!
//! Both are finite-state reactive entities. The kernel drives them with
//! exactly two inbound events, a scheduled wakeup and an asynchronous
//! message, and each handler runs to completion, issuing commands through
//! an [`ExchangeLink`] and re-scheduling its own next wakeup. All waiting
//! is expressed as a future wakeup, never as blocking.

pub mod botmaster;
pub mod spoofer;

pub use botmaster::{Botmaster, BotmasterConfig, BotmasterState};
pub use spoofer::{MasterCmd, Spoofer, SpooferConfig, SpooferState};

use crate::core::time::SimTime;
use crate::link::ExchangeLink;
use crate::models::blotter::Blotter;
use crate::models::event::EventLog;
use crate::models::message::Message;
use crate::models::order::{Order, OrderError, Side};
use crate::models::AgentId;
use thiserror::Error;

/// Errors that reject an agent at construction time
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("spoofer needs a fixed spoof time or a coordinator to poll")]
    MissingTrigger,

    #[error("fixed spoof time and coordinator polling are mutually exclusive")]
    ConflictingTrigger,
}

/// Errors that can occur while an agent handles a wakeup or message
#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    /// The coordinator's cash buys less than one share; the run is
    /// misconfigured and cannot meaningfully continue.
    #[error("cash {cash} buys no shares at last trade {last_trade}")]
    CashExhausted { cash: i64, last_trade: i64 },

    #[error(transparent)]
    Order(#[from] OrderError),
}

/// A reactive simulation entity driven by wakeups and messages.
///
/// The kernel owns delivery; the agent owns its blotter and its event log.
/// Handlers are synchronous and run to completion (no suspension points),
/// matching the single-threaded cooperative scheduling model.
pub trait TradingAgent {
    /// Kernel-assigned identity
    fn id(&self) -> AgentId;

    /// Human-readable name for logs and attribution
    fn name(&self) -> &str;

    /// This agent's order-management view
    fn blotter(&self) -> &Blotter;

    /// Mutable view for the substrate to apply updates through
    fn blotter_mut(&mut self) -> &mut Blotter;

    /// Structured log of everything the agent has done
    fn event_log(&self) -> &EventLog;

    /// Handle a scheduled wakeup at simulated time `now`.
    fn wakeup(&mut self, now: SimTime, link: &mut dyn ExchangeLink) -> Result<(), AgentError>;

    /// Handle an inbound message delivered at simulated time `now`.
    fn receive_message(
        &mut self,
        now: SimTime,
        message: Message,
        link: &mut dyn ExchangeLink,
    ) -> Result<(), AgentError>;
}

/// Upper bound (exclusive) of the uniform wake jitter, in nanoseconds.
///
/// Short randomized re-wake delays bridge asynchronous query/response gaps
/// without producing a detectable fixed polling cadence.
pub(crate) const WAKE_JITTER_NS: i64 = 100;

/// Build, register, and submit a limit order in one step.
///
/// The blotter allocates the id and records the order as outstanding
/// before the command goes out, so the order exists in exactly one
/// outstanding set from the moment the exchange can see it.
pub(crate) fn submit_limit_order(
    agent: AgentId,
    blotter: &mut Blotter,
    link: &mut dyn ExchangeLink,
    symbol: &str,
    quantity: i64,
    side: Side,
    limit_price: i64,
) -> Result<Order, AgentError> {
    let order = Order::new(
        blotter.allocate_order_id(),
        symbol.to_string(),
        quantity,
        side,
        limit_price,
    )?;
    blotter.register_order(order.clone());
    link.place_limit_order(agent, order.clone());
    Ok(order)
}
