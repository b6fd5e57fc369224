//! Interface to the scheduling kernel and order-management substrate
//!
//! The discrete-event kernel, the matching engine, and the live order book
//! are external collaborators. Agents reach them only through the
//! [`ExchangeLink`] trait: every call here is a fire-and-forget command
//! whose effect, if any, arrives later as a blotter update or an inbound
//! [`Message`](crate::models::Message), never as a return value.
//!
//! The kernel delivers wakeups and messages to one agent at a time in
//! nondecreasing simulated-time order; each handler runs to completion
//! before the next event is processed, so no locking is needed anywhere in
//! the agent logic.

use crate::core::time::SimTime;
use crate::models::message::Message;
use crate::models::order::Order;
use crate::models::AgentId;

/// Commands an agent may issue to the outside world.
///
/// Implemented by the external kernel (and by scripted harnesses in tests).
pub trait ExchangeLink {
    /// Submit a limit order to the exchange on behalf of `agent`.
    ///
    /// The order has already passed construction-time validation and is
    /// registered in the agent's blotter; the exchange acknowledges fills
    /// through `OrderExecuted` notifications.
    fn place_limit_order(&mut self, agent: AgentId, order: Order);

    /// Request cancellation of a resting order.
    ///
    /// Idempotent from the caller's perspective; the effect is
    /// asynchronous, and the caller must tolerate a fill that was already
    /// in flight when the cancel was issued.
    fn cancel_order(&mut self, agent: AgentId, order: &Order);

    /// Ask the exchange for the current visible spread of `symbol`.
    ///
    /// The response arrives later as a blotter spread update (which also
    /// refreshes the last-trade cache), not as a return value.
    fn request_spread(&mut self, agent: AgentId, symbol: &str);

    /// Ask the exchange for the last trade price of `symbol`.
    fn request_last_trade(&mut self, agent: AgentId, symbol: &str);

    /// Schedule exactly one future wakeup for `agent`.
    ///
    /// Overwrites any previously scheduled wakeup for the same agent.
    fn set_wakeup(&mut self, agent: AgentId, at: SimTime);

    /// Send an asynchronous message to another agent.
    ///
    /// Delivery order is preserved per destination.
    fn send_message(&mut self, from: AgentId, to: AgentId, message: Message);
}
