//! Botmaster agent
//!
//! The coordinator of the manipulation scenario. It sits out the morning,
//! then at its configured attack time converts essentially all cash into a
//! long position in the target symbol, flips into its attacking state, and
//! finally dumps the whole position just before the close. While attacking
//! it answers `QueryAttackTime` messages, which is the only way any other
//! agent can observe the attack window.

use crate::agents::{submit_limit_order, AgentError, TradingAgent, WAKE_JITTER_NS};
use crate::checkpoint::{config_hash, BotmasterSnapshot, CheckpointError};
use crate::core::time::{SimDuration, SimTime};
use crate::link::ExchangeLink;
use crate::models::blotter::Blotter;
use crate::models::event::{Event, EventLog};
use crate::models::message::Message;
use crate::models::order::Side;
use crate::models::AgentId;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Accumulation orders are priced at this multiple of the last trade so
/// they are marketable against any plausible ask.
pub const ACCUMULATION_PRICE_MULTIPLIER: i64 = 100;

/// Liquidation orders are priced at one minor unit to guarantee execution.
pub const LIQUIDATION_PRICE: i64 = 1;

/// How long before the close the liquidation wakeup is scheduled.
pub const LIQUIDATION_LEAD: SimDuration = SimDuration::from_millis(20);

/// Construction parameters for a [`Botmaster`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotmasterConfig {
    /// Kernel-assigned identity
    pub id: AgentId,

    /// Human-readable name for logs
    pub name: String,

    /// Symbol to accumulate and dump
    pub symbol: String,

    /// Time the attack window opens
    pub attack_time: SimTime,

    /// Mean arrival rate of the pre-attack holding pattern
    pub lambda_a: f64,

    /// Opening cash in minor currency units
    pub starting_cash: i64,

    /// Seed for this agent's own random delays
    pub rng_seed: u64,
}

impl BotmasterConfig {
    /// Config with the customary defaults.
    pub fn new(id: AgentId, name: impl Into<String>, attack_time: SimTime) -> Self {
        Self {
            id,
            name: name.into(),
            symbol: "IBM".to_string(),
            attack_time,
            lambda_a: 0.005,
            starting_cash: 100_000,
            rng_seed: 1,
        }
    }
}

/// The coordinator's persistent machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotmasterState {
    /// Constructed, first wakeup not yet delivered
    AwaitingWakeup,
    /// Holding pattern before the attack, and terminal after liquidation
    /// or the close
    Inactive,
    /// A last-trade query is in flight to the exchange
    AwaitingLastTrade,
    /// Position acquired; attack window open
    Attacking,
}

/// The coordinating agent. See the module docs for the lifecycle.
#[derive(Debug)]
pub struct Botmaster {
    config: BotmasterConfig,
    state: BotmasterState,
    /// Guards the once-per-day accumulation order
    accumulation_placed: bool,
    /// Guards the once-per-day liquidation order
    liquidation_placed: bool,
    rng: RngManager,
    blotter: Blotter,
    log: EventLog,
}

impl Botmaster {
    /// Create a coordinator.
    pub fn new(config: BotmasterConfig) -> Self {
        let rng = RngManager::new(config.rng_seed);
        let blotter = Blotter::new(config.starting_cash);
        Self {
            state: BotmasterState::AwaitingWakeup,
            accumulation_placed: false,
            liquidation_placed: false,
            rng,
            blotter,
            log: EventLog::new(),
            config,
        }
    }

    /// Current machine state.
    pub fn state(&self) -> BotmasterState {
        self.state
    }

    /// The configuration this agent was built from.
    pub fn config(&self) -> &BotmasterConfig {
        &self.config
    }

    /// Uniform [0, 100) ns delay for the next self-scheduled wakeup.
    fn wake_jitter(&mut self) -> SimDuration {
        SimDuration::from_nanos(self.rng.range(0, WAKE_JITTER_NS) as u64)
    }

    /// Capture a restorable snapshot of this agent.
    pub fn checkpoint(&self) -> Result<BotmasterSnapshot, CheckpointError> {
        Ok(BotmasterSnapshot {
            config_hash: config_hash(&self.config)?,
            state: self.state,
            accumulation_placed: self.accumulation_placed,
            liquidation_placed: self.liquidation_placed,
            rng_state: self.rng.get_state(),
            blotter: self.blotter.clone(),
        })
    }

    /// Rebuild an agent from a snapshot captured under the same config.
    pub fn restore(
        config: BotmasterConfig,
        snapshot: BotmasterSnapshot,
    ) -> Result<Self, CheckpointError> {
        if config_hash(&config)? != snapshot.config_hash {
            return Err(CheckpointError::ConfigMismatch);
        }

        let mut agent = Botmaster::new(config);
        agent.state = snapshot.state;
        agent.accumulation_placed = snapshot.accumulation_placed;
        agent.liquidation_placed = snapshot.liquidation_placed;
        agent.rng = RngManager::new(snapshot.rng_state);
        agent.blotter = snapshot.blotter;
        Ok(agent)
    }
}

impl TradingAgent for Botmaster {
    fn id(&self) -> AgentId {
        self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn blotter(&self) -> &Blotter {
        &self.blotter
    }

    fn blotter_mut(&mut self) -> &mut Blotter {
        &mut self.blotter
    }

    fn event_log(&self) -> &EventLog {
        &self.log
    }

    fn wakeup(&mut self, now: SimTime, link: &mut dyn ExchangeLink) -> Result<(), AgentError> {
        let Some(hours) = self.blotter.market_hours() else {
            // The substrate is still discovering open/close times.
            return Ok(());
        };
        if self.blotter.market_closed() {
            self.state = BotmasterState::Inactive;
            return Ok(());
        }

        if now < self.config.attack_time {
            self.state = BotmasterState::Inactive;
            // Enter the market on a Poisson schedule rather than a
            // detectable fixed cadence.
            let delta = self.rng.exponential(self.config.lambda_a).round() as u64;
            link.set_wakeup(
                self.config.id,
                self.config.attack_time + SimDuration::from_nanos(delta),
            );
            return Ok(());
        }

        // The attack begins. Going fully long (no margin) needs the last
        // trade price first.
        let Some(last_trade) = self.blotter.last_trade(&self.config.symbol) else {
            link.request_last_trade(self.config.id, &self.config.symbol);
            self.state = BotmasterState::AwaitingLastTrade;
            let jitter = self.wake_jitter();
            link.set_wakeup(self.config.id, now + jitter);
            return Ok(());
        };

        if !self.blotter.has_position(&self.config.symbol) {
            if self.accumulation_placed {
                // The buy is in flight; check again shortly.
                let jitter = self.wake_jitter();
                link.set_wakeup(self.config.id, now + jitter);
                return Ok(());
            }

            // Spend essentially all cash on the target symbol.
            let cash = self.blotter.cash();
            let quantity = (cash as f64 / last_trade as f64).round() as i64;
            if quantity < 1 {
                return Err(AgentError::CashExhausted { cash, last_trade });
            }

            let order = submit_limit_order(
                self.config.id,
                &mut self.blotter,
                link,
                &self.config.symbol,
                quantity,
                Side::Buy,
                last_trade * ACCUMULATION_PRICE_MULTIPLIER,
            )?;
            self.accumulation_placed = true;
            self.state = BotmasterState::Attacking;
            self.log.log(Event::Accumulation {
                time: now,
                agent: self.config.id,
                symbol: self.config.symbol.clone(),
                quantity: order.quantity(),
                price: order.limit_price(),
            });

            // Nothing left to do until it is time to dump.
            link.set_wakeup(self.config.id, hours.close.saturating_sub(LIQUIDATION_LEAD));
            return Ok(());
        }

        // Time to dump.
        if !self.liquidation_placed {
            let held = self.blotter.holding(&self.config.symbol).unwrap_or(0);
            if held >= 1 {
                let order = submit_limit_order(
                    self.config.id,
                    &mut self.blotter,
                    link,
                    &self.config.symbol,
                    held,
                    Side::Sell,
                    LIQUIDATION_PRICE,
                )?;
                self.liquidation_placed = true;
                self.log.log(Event::Liquidation {
                    time: now,
                    agent: self.config.id,
                    symbol: self.config.symbol.clone(),
                    quantity: order.quantity(),
                    price: order.limit_price(),
                });
            }
        }
        self.state = BotmasterState::Inactive;
        Ok(())
    }

    fn receive_message(
        &mut self,
        now: SimTime,
        message: Message,
        link: &mut dyn ExchangeLink,
    ) -> Result<(), AgentError> {
        match message {
            Message::QueryAttackTime { sender } => {
                // The sole contract other agents may rely on: a boolean
                // snapshot of whether we are attacking right now.
                let attack = self.state == BotmasterState::Attacking;
                link.send_message(
                    self.config.id,
                    sender,
                    Message::AttackTimeResponse {
                        sender: self.config.id,
                        attack,
                    },
                );
                self.log.log(Event::AttackQueryAnswered {
                    time: now,
                    agent: self.config.id,
                    requester: sender,
                    attack,
                });
            }
            Message::OrderExecuted { order } => {
                self.blotter.apply_execution(&order);
                self.log.log(Event::ExecutionRecorded {
                    time: now,
                    agent: self.config.id,
                    order_id: order.id().to_string(),
                    quantity: order.quantity(),
                    price: order.limit_price(),
                });
            }
            // Coordinators poll nobody; a stray answer is ignored.
            Message::AttackTimeResponse { .. } => {}
        }
        Ok(())
    }
}
