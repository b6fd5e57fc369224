//! Event logging for simulation replay and auditing.
//!
//! This module defines the Event enum which captures every externally
//! visible action an agent takes. Events enable:
//! - Deterministic replay verification (same seed → same event sequence)
//! - Debugging (understand what an agent did and when)
//! - Analysis (count placements, cancellations, skipped cycles)
//!
//! Each agent owns its log; the kernel never writes into it.

use crate::core::time::SimTime;
use crate::models::order::Side;
use crate::models::AgentId;

/// One externally visible agent action.
///
/// All events carry the simulated timestamp at which they occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A limit order was submitted to the exchange
    OrderPlaced {
        time: SimTime,
        agent: AgentId,
        order_id: String,
        symbol: String,
        side: Side,
        quantity: i64,
        price: i64,
    },

    /// A cancel request was sent for a resting order
    CancelRequested {
        time: SimTime,
        agent: AgentId,
        order_id: String,
        price: i64,
    },

    /// A spoofing cycle ran but took no layering action
    SpoofSkipped {
        time: SimTime,
        agent: AgentId,
        symbol: String,
        reason: String,
    },

    /// A spoofer asked its coordinator whether the window is open
    AttackQuerySent {
        time: SimTime,
        agent: AgentId,
        coordinator: AgentId,
    },

    /// A coordinator's answer arrived
    AttackStatusReceived {
        time: SimTime,
        agent: AgentId,
        attack: bool,
    },

    /// A coordinator answered an attack-status query
    AttackQueryAnswered {
        time: SimTime,
        agent: AgentId,
        requester: AgentId,
        attack: bool,
    },

    /// The coordinator submitted its accumulation order
    Accumulation {
        time: SimTime,
        agent: AgentId,
        symbol: String,
        quantity: i64,
        price: i64,
    },

    /// The coordinator submitted its liquidation order
    Liquidation {
        time: SimTime,
        agent: AgentId,
        symbol: String,
        quantity: i64,
        price: i64,
    },

    /// An execution notification was applied to the blotter
    ExecutionRecorded {
        time: SimTime,
        agent: AgentId,
        order_id: String,
        quantity: i64,
        price: i64,
    },

    /// The safety reflex withdrew everything after an unexpected fill
    SafetyUnwind {
        time: SimTime,
        agent: AgentId,
        orders_canceled: usize,
    },
}

impl Event {
    /// Timestamp at which this event occurred
    pub fn time(&self) -> SimTime {
        match self {
            Event::OrderPlaced { time, .. } => *time,
            Event::CancelRequested { time, .. } => *time,
            Event::SpoofSkipped { time, .. } => *time,
            Event::AttackQuerySent { time, .. } => *time,
            Event::AttackStatusReceived { time, .. } => *time,
            Event::AttackQueryAnswered { time, .. } => *time,
            Event::Accumulation { time, .. } => *time,
            Event::Liquidation { time, .. } => *time,
            Event::ExecutionRecorded { time, .. } => *time,
            Event::SafetyUnwind { time, .. } => *time,
        }
    }

    /// Agent that produced this event
    pub fn agent(&self) -> AgentId {
        match self {
            Event::OrderPlaced { agent, .. } => *agent,
            Event::CancelRequested { agent, .. } => *agent,
            Event::SpoofSkipped { agent, .. } => *agent,
            Event::AttackQuerySent { agent, .. } => *agent,
            Event::AttackStatusReceived { agent, .. } => *agent,
            Event::AttackQueryAnswered { agent, .. } => *agent,
            Event::Accumulation { agent, .. } => *agent,
            Event::Liquidation { agent, .. } => *agent,
            Event::ExecutionRecorded { agent, .. } => *agent,
            Event::SafetyUnwind { agent, .. } => *agent,
        }
    }

    /// Short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::OrderPlaced { .. } => "OrderPlaced",
            Event::CancelRequested { .. } => "CancelRequested",
            Event::SpoofSkipped { .. } => "SpoofSkipped",
            Event::AttackQuerySent { .. } => "AttackQuerySent",
            Event::AttackStatusReceived { .. } => "AttackStatusReceived",
            Event::AttackQueryAnswered { .. } => "AttackQueryAnswered",
            Event::Accumulation { .. } => "Accumulation",
            Event::Liquidation { .. } => "Liquidation",
            Event::ExecutionRecorded { .. } => "ExecutionRecorded",
            Event::SafetyUnwind { .. } => "SafetyUnwind",
        }
    }
}

/// Event log for storing and querying agent events.
///
/// A simple wrapper around Vec<Event> with convenience filters.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in insertion order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Most recent event, if any
    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
