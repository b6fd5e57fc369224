//! Spoofer agent
//!
//! Maintains a single large deceptive bid exactly one tick behind the best
//! bid while the attack window is open, re-quoting whenever the best bid
//! moves and withdrawing everything the instant one of its orders fills.
//! The layering strategy follows Wellman's "Spoofing the Limit Order Book":
//! the order must distort the visible book without ever reaching the top
//! of it, where it could execute.
//!
//! Two trigger modes exist, fixed at construction: a fixed spoof start
//! time, or polling a Botmaster for the shared attack window over the
//! query/response protocol.

use crate::agents::{submit_limit_order, AgentError, ConfigError, TradingAgent, WAKE_JITTER_NS};
use crate::checkpoint::{config_hash, CheckpointError, SpooferSnapshot};
use crate::core::time::{SimDuration, SimTime};
use crate::link::ExchangeLink;
use crate::models::blotter::Blotter;
use crate::models::book::{self, TICK};
use crate::models::event::{Event, EventLog};
use crate::models::message::Message;
use crate::models::order::Side;
use crate::models::AgentId;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Best bids at or below this price leave no room to quote one tick
/// behind without crossing zero.
pub const MIN_SPOOFABLE_BID: i64 = TICK;

/// Construction parameters for a [`Spoofer`].
///
/// Exactly one of `spoof_time` and `coordinator` must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpooferConfig {
    /// Kernel-assigned identity
    pub id: AgentId,

    /// Human-readable name for logs
    pub name: String,

    /// Symbol to spoof
    pub symbol: String,

    /// Fixed time spoofing begins at (fixed-time mode)
    pub spoof_time: Option<SimTime>,

    /// Coordinator to poll for the attack window (polling mode)
    pub coordinator: Option<AgentId>,

    /// Size of the deceptive bid, in shares
    pub spoof_shares: i64,

    /// Mean arrival rate of the pre-spoof holding pattern
    pub lambda_a: f64,

    /// Opening cash in minor currency units
    pub starting_cash: i64,

    /// Seed for this agent's own random delays
    pub rng_seed: u64,
}

impl SpooferConfig {
    /// Config with the customary defaults; the trigger mode must still be
    /// chosen by setting `spoof_time` or `coordinator`.
    pub fn new(id: AgentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            symbol: "IBM".to_string(),
            spoof_time: None,
            coordinator: None,
            spoof_shares: 10_000,
            lambda_a: 0.005,
            starting_cash: 100_000,
            rng_seed: 1,
        }
    }
}

/// The spoofer's persistent machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpooferState {
    /// Constructed, first wakeup not yet delivered
    AwaitingWakeup,
    /// Holding pattern outside the attack window (terminal once the
    /// market closes for the day)
    Inactive,
    /// An attack-status query is in flight to the coordinator
    AwaitingCmd,
    /// A spread query is in flight to the exchange
    AwaitingSpread,
    /// Running layering cycles against a cached spread
    Active,
}

/// Last known coordinator answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MasterCmd {
    /// No answer received yet
    None,
    /// Coordinator said the window is not open
    Wait,
    /// Coordinator said the window is open
    Attack,
}

/// How this spoofer decides the window is open.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    FixedTime(SimTime),
    Poll(AgentId),
}

/// The spoofing agent. See the module docs for the protocol.
#[derive(Debug)]
pub struct Spoofer {
    config: SpooferConfig,
    trigger: Trigger,
    state: SpooferState,
    master_cmd: MasterCmd,
    rng: RngManager,
    blotter: Blotter,
    log: EventLog,
}

impl Spoofer {
    /// Create a spoofer, validating the trigger mode.
    ///
    /// # Errors
    /// - [`ConfigError::MissingTrigger`] if neither a spoof time nor a
    ///   coordinator was supplied
    /// - [`ConfigError::ConflictingTrigger`] if both were
    pub fn new(config: SpooferConfig) -> Result<Self, ConfigError> {
        let trigger = match (config.spoof_time, config.coordinator) {
            (Some(time), None) => Trigger::FixedTime(time),
            (None, Some(coordinator)) => Trigger::Poll(coordinator),
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingTrigger),
            (None, None) => return Err(ConfigError::MissingTrigger),
        };

        let rng = RngManager::new(config.rng_seed);
        let blotter = Blotter::new(config.starting_cash);
        Ok(Self {
            trigger,
            state: SpooferState::AwaitingWakeup,
            master_cmd: MasterCmd::None,
            rng,
            blotter,
            log: EventLog::new(),
            config,
        })
    }

    /// Current machine state.
    pub fn state(&self) -> SpooferState {
        self.state
    }

    /// Last known coordinator answer.
    pub fn master_cmd(&self) -> MasterCmd {
        self.master_cmd
    }

    /// The configuration this agent was built from.
    pub fn config(&self) -> &SpooferConfig {
        &self.config
    }

    /// Uniform [0, 100) ns delay for the next self-scheduled wakeup.
    fn wake_jitter(&mut self) -> SimDuration {
        SimDuration::from_nanos(self.rng.range(0, WAKE_JITTER_NS) as u64)
    }

    /// Withdraw every outstanding order. Returns how many cancels went out.
    fn cancel_open_orders(&mut self, now: SimTime, link: &mut dyn ExchangeLink) -> usize {
        let mut canceled = 0;
        for order in self.blotter.outstanding_orders().values() {
            link.cancel_order(self.config.id, order);
            self.log.log(Event::CancelRequested {
                time: now,
                agent: self.config.id,
                order_id: order.id().to_string(),
                price: order.limit_price(),
            });
            canceled += 1;
        }
        canceled
    }

    /// Run one layering cycle against the cached spread snapshot.
    ///
    /// Keeps at most one resting order, priced exactly one tick behind the
    /// most recently observed best bid: stale orders are canceled, a
    /// surviving order at the target is left alone, and a new order goes
    /// out only when nothing survives.
    fn refresh_layer(&mut self, now: SimTime, link: &mut dyn ExchangeLink) -> Result<(), AgentError> {
        let best_bid = match self
            .blotter
            .known_bids(&self.config.symbol)
            .and_then(book::best)
        {
            Some(level) => level.price,
            None => {
                // Nothing to layer behind; touch nothing.
                self.log.log(Event::SpoofSkipped {
                    time: now,
                    agent: self.config.id,
                    symbol: self.config.symbol.clone(),
                    reason: "no bids to layer behind".to_string(),
                });
                return Ok(());
            }
        };

        if best_bid <= MIN_SPOOFABLE_BID {
            // No room to quote behind the best bid. Anything still resting
            // was quoted against an older book and is stale.
            self.cancel_open_orders(now, link);
            self.log.log(Event::SpoofSkipped {
                time: now,
                agent: self.config.id,
                symbol: self.config.symbol.clone(),
                reason: format!("best bid {} leaves no room to quote behind", best_bid),
            });
            return Ok(());
        }

        let target_price = best_bid - TICK;
        let open_before = self.blotter.open_order_count();
        let mut canceled = 0usize; // reset every cycle

        for order in self.blotter.outstanding_orders().values() {
            if order.limit_price() != target_price {
                link.cancel_order(self.config.id, order);
                self.log.log(Event::CancelRequested {
                    time: now,
                    agent: self.config.id,
                    order_id: order.id().to_string(),
                    price: order.limit_price(),
                });
                canceled += 1;
            }
        }

        if open_before > 0 && canceled < open_before {
            // A survivor already rests at the target price; the book is
            // correctly layered.
            return Ok(());
        }

        let order = submit_limit_order(
            self.config.id,
            &mut self.blotter,
            link,
            &self.config.symbol,
            self.config.spoof_shares,
            Side::Buy,
            target_price,
        )?;
        self.log.log(Event::OrderPlaced {
            time: now,
            agent: self.config.id,
            order_id: order.id().to_string(),
            symbol: self.config.symbol.clone(),
            side: Side::Buy,
            quantity: order.quantity(),
            price: target_price,
        });
        Ok(())
    }

    /// Capture a restorable snapshot of this agent.
    pub fn checkpoint(&self) -> Result<SpooferSnapshot, CheckpointError> {
        Ok(SpooferSnapshot {
            config_hash: config_hash(&self.config)?,
            state: self.state,
            master_cmd: self.master_cmd,
            rng_state: self.rng.get_state(),
            blotter: self.blotter.clone(),
        })
    }

    /// Rebuild an agent from a snapshot captured under the same config.
    pub fn restore(
        config: SpooferConfig,
        snapshot: SpooferSnapshot,
    ) -> Result<Self, CheckpointError> {
        if config_hash(&config)? != snapshot.config_hash {
            return Err(CheckpointError::ConfigMismatch);
        }

        let mut agent = Spoofer::new(config)?;
        agent.state = snapshot.state;
        agent.master_cmd = snapshot.master_cmd;
        agent.rng = RngManager::new(snapshot.rng_state);
        agent.blotter = snapshot.blotter;
        Ok(agent)
    }
}

impl TradingAgent for Spoofer {
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
        if self.blotter.market_hours().is_none() {
            // The substrate is still discovering open/close times.
            return Ok(());
        }
        if self.blotter.market_closed() {
            self.state = SpooferState::Inactive;
            return Ok(());
        }

        match self.trigger {
            Trigger::FixedTime(spoof_time) if now < spoof_time => {
                self.state = SpooferState::Inactive;
                // Enter the market on a Poisson schedule rather than a
                // detectable fixed cadence.
                let delta = self.rng.exponential(self.config.lambda_a).round() as u64;
                link.set_wakeup(self.config.id, spoof_time + SimDuration::from_nanos(delta));
                return Ok(());
            }
            Trigger::Poll(coordinator) if self.master_cmd != MasterCmd::Attack => {
                if self.state != SpooferState::AwaitingCmd {
                    link.send_message(
                        self.config.id,
                        coordinator,
                        Message::QueryAttackTime {
                            sender: self.config.id,
                        },
                    );
                    self.log.log(Event::AttackQuerySent {
                        time: now,
                        agent: self.config.id,
                        coordinator,
                    });
                    self.state = SpooferState::AwaitingCmd;
                }
                // Double-check that nothing of ours is resting outside the
                // attack window.
                self.cancel_open_orders(now, link);
                let jitter = self.wake_jitter();
                link.set_wakeup(self.config.id, now + jitter);
                return Ok(());
            }
            _ => {}
        }

        // The attack window is open.

        // Without a cached spread there is nothing to quote against; the
        // spread reply also refreshes the last trade for free.
        if !self.blotter.have_spread(&self.config.symbol) {
            if self.state != SpooferState::AwaitingSpread {
                link.request_spread(self.config.id, &self.config.symbol);
                self.state = SpooferState::AwaitingSpread;
            }
            let jitter = self.wake_jitter();
            link.set_wakeup(self.config.id, now + jitter);
            return Ok(());
        }

        self.state = SpooferState::Active;
        self.refresh_layer(now, link)?;

        // Discard the snapshot we just acted on; the next cycle re-queries.
        self.blotter.clear_book(&self.config.symbol);
        let jitter = self.wake_jitter();
        link.set_wakeup(self.config.id, now + jitter);
        Ok(())
    }

    fn receive_message(
        &mut self,
        now: SimTime,
        message: Message,
        link: &mut dyn ExchangeLink,
    ) -> Result<(), AgentError> {
        match message {
            Message::OrderExecuted { order } => {
                // Substrate bookkeeping first, then the reflex: a fill on a
                // deceptive order means the layering invariant broke, so
                // everything still resting is withdrawn immediately.
                self.blotter.apply_execution(&order);
                self.log.log(Event::ExecutionRecorded {
                    time: now,
                    agent: self.config.id,
                    order_id: order.id().to_string(),
                    quantity: order.quantity(),
                    price: order.limit_price(),
                });
                let orders_canceled = self.cancel_open_orders(now, link);
                self.log.log(Event::SafetyUnwind {
                    time: now,
                    agent: self.config.id,
                    orders_canceled,
                });
            }
            Message::AttackTimeResponse { attack, .. } => {
                self.master_cmd = if attack {
                    MasterCmd::Attack
                } else {
                    MasterCmd::Wait
                };
                // Acted on at the next wakeup, not here.
                self.state = SpooferState::Inactive;
                self.log.log(Event::AttackStatusReceived {
                    time: now,
                    agent: self.config.id,
                    attack,
                });
            }
            // Spoofers never coordinate anyone; a query addressed here
            // carries nothing to act on.
            Message::QueryAttackTime { .. } => {}
        }
        Ok(())
    }
}
