//! Shared test harness
//!
//! `CommandTrace` is a scripted stand-in for the external kernel and
//! exchange: it records every command an agent issues, in order, and the
//! test plays the exchange's side by mutating the agent's blotter.

#![allow(dead_code)]

use spoofing_simulator_core_rs::{
    AgentId, ExchangeLink, MarketHours, Message, Order, PriceLevel, SimTime, TradingAgent,
};

pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// 09:30, in nanoseconds from the session epoch (midnight).
pub const MARKET_OPEN_NS: u64 = 34_200 * NANOS_PER_SEC;

/// 16:00, in nanoseconds from the session epoch.
pub const MARKET_CLOSE_NS: u64 = 57_600 * NANOS_PER_SEC;

/// A standard 09:30–16:00 session.
pub fn session() -> MarketHours {
    MarketHours::new(
        SimTime::from_nanos(MARKET_OPEN_NS),
        SimTime::from_nanos(MARKET_CLOSE_NS),
    )
}

/// One command recorded from an agent.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Place {
        agent: AgentId,
        order: Order,
    },
    Cancel {
        agent: AgentId,
        order_id: String,
    },
    SpreadQuery {
        agent: AgentId,
        symbol: String,
    },
    LastTradeQuery {
        agent: AgentId,
        symbol: String,
    },
    Wakeup {
        agent: AgentId,
        at: SimTime,
    },
    Outbound {
        from: AgentId,
        to: AgentId,
        message: Message,
    },
}

/// Records every command an agent issues, in order.
#[derive(Debug, Default)]
pub struct CommandTrace {
    pub commands: Vec<Command>,
}

impl CommandTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Orders submitted, in order.
    pub fn placements(&self) -> Vec<&Order> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Place { order, .. } => Some(order),
                _ => None,
            })
            .collect()
    }

    /// Ids of orders whose cancellation was requested, in order.
    pub fn cancel_ids(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Cancel { order_id, .. } => Some(order_id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Scheduled wakeup times, in order.
    pub fn wakeups(&self) -> Vec<SimTime> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Wakeup { at, .. } => Some(*at),
                _ => None,
            })
            .collect()
    }

    /// Outbound messages, in order, as (from, to, message).
    pub fn outbound(&self) -> Vec<(AgentId, AgentId, &Message)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Outbound { from, to, message } => Some((*from, *to, message)),
                _ => None,
            })
            .collect()
    }

    /// Number of spread queries issued.
    pub fn spread_query_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::SpreadQuery { .. }))
            .count()
    }

    /// Number of last-trade queries issued.
    pub fn last_trade_query_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::LastTradeQuery { .. }))
            .count()
    }
}

impl ExchangeLink for CommandTrace {
    fn place_limit_order(&mut self, agent: AgentId, order: Order) {
        self.commands.push(Command::Place { agent, order });
    }

    fn cancel_order(&mut self, agent: AgentId, order: &Order) {
        self.commands.push(Command::Cancel {
            agent,
            order_id: order.id().to_string(),
        });
    }

    fn request_spread(&mut self, agent: AgentId, symbol: &str) {
        self.commands.push(Command::SpreadQuery {
            agent,
            symbol: symbol.to_string(),
        });
    }

    fn request_last_trade(&mut self, agent: AgentId, symbol: &str) {
        self.commands.push(Command::LastTradeQuery {
            agent,
            symbol: symbol.to_string(),
        });
    }

    fn set_wakeup(&mut self, agent: AgentId, at: SimTime) {
        self.commands.push(Command::Wakeup { agent, at });
    }

    fn send_message(&mut self, from: AgentId, to: AgentId, message: Message) {
        self.commands.push(Command::Outbound { from, to, message });
    }
}

/// Confirm every cancel request in `trace` against the agent's blotter,
/// as a cooperating exchange eventually would. Returns how many resting
/// orders were actually removed.
pub fn confirm_cancels(agent: &mut dyn TradingAgent, trace: &CommandTrace) -> usize {
    let mut removed = 0;
    for command in &trace.commands {
        if let Command::Cancel { order_id, .. } = command {
            if agent.blotter_mut().remove_order(order_id).is_some() {
                removed += 1;
            }
        }
    }
    removed
}

/// Publish a one-level bid book to the agent, as a spread response would.
pub fn respond_spread(agent: &mut dyn TradingAgent, symbol: &str, best_bid: i64, size: i64) {
    agent.blotter_mut().record_spread(
        symbol,
        vec![PriceLevel::new(best_bid, size)],
        vec![PriceLevel::new(best_bid + 2, size)],
        Some(best_bid),
    );
}

/// Publish an empty book (no bids, no asks) to the agent.
pub fn respond_empty_spread(agent: &mut dyn TradingAgent, symbol: &str) {
    agent.blotter_mut().record_spread(symbol, vec![], vec![], None);
}
