//! Integration of the attack-window protocol
//!
//! The spoofer learns the attack window only through the
//! query/response message pair; this test pumps the recorded outbound
//! messages between the two agents the way the kernel would.

mod common;

use common::{confirm_cancels, respond_spread, session, CommandTrace, Command, MARKET_OPEN_NS};
use spoofing_simulator_core_rs::{
    Botmaster, BotmasterConfig, BotmasterState, MasterCmd, Message, SimDuration, SimTime, Side,
    Spoofer, SpooferConfig, SpooferState, TradingAgent,
};

const ATTACK_NS: u64 = MARKET_OPEN_NS + 3_600 * 1_000_000_000;

fn setup() -> (Botmaster, Spoofer) {
    let mut master_config = BotmasterConfig::new(1, "botmaster", SimTime::from_nanos(ATTACK_NS));
    master_config.rng_seed = 11;
    let mut botmaster = Botmaster::new(master_config);
    botmaster.blotter_mut().set_market_hours(session());

    let mut spoofer_config = SpooferConfig::new(3, "spoofer");
    spoofer_config.coordinator = Some(1);
    spoofer_config.rng_seed = 13;
    let mut spoofer = Spoofer::new(spoofer_config).unwrap();
    spoofer.blotter_mut().set_market_hours(session());

    (botmaster, spoofer)
}

/// Deliver every message recorded in `trace` addressed to `agent`,
/// collecting whatever the recipient sends in response.
fn pump(trace: &CommandTrace, agent: &mut dyn TradingAgent, now: SimTime) -> CommandTrace {
    let mut responses = CommandTrace::new();
    for command in &trace.commands {
        if let Command::Outbound { to, message, .. } = command {
            if *to == agent.id() {
                agent
                    .receive_message(now, message.clone(), &mut responses)
                    .unwrap();
            }
        }
    }
    responses
}

#[test]
fn test_spoofer_waits_until_coordinator_attacks() {
    let (mut botmaster, mut spoofer) = setup();
    let before_attack = SimTime::from_nanos(MARKET_OPEN_NS + 1_000);

    // The spoofer polls; the coordinator is not attacking yet.
    let mut spoofer_out = CommandTrace::new();
    spoofer.wakeup(before_attack, &mut spoofer_out).unwrap();
    assert_eq!(spoofer.state(), SpooferState::AwaitingCmd);

    let master_out = pump(&spoofer_out, &mut botmaster, before_attack);
    let spoofer_replies = pump(&master_out, &mut spoofer, before_attack);
    assert!(spoofer_replies.commands.is_empty());

    assert_eq!(spoofer.master_cmd(), MasterCmd::Wait);
    assert_eq!(spoofer.state(), SpooferState::Inactive);

    // Still flat: polling continues, no market activity.
    let mut next = CommandTrace::new();
    spoofer
        .wakeup(before_attack + SimDuration::from_nanos(90), &mut next)
        .unwrap();
    assert!(next.placements().is_empty());
    assert_eq!(next.outbound().len(), 1);
}

#[test]
fn test_attack_window_propagates_and_spoofing_begins() {
    let (mut botmaster, mut spoofer) = setup();
    let attack_time = SimTime::from_nanos(ATTACK_NS);

    // The coordinator acquires its position and starts attacking.
    botmaster.blotter_mut().record_last_trade("IBM", 50);
    let mut master_out = CommandTrace::new();
    botmaster.wakeup(attack_time, &mut master_out).unwrap();
    assert_eq!(botmaster.state(), BotmasterState::Attacking);

    // The spoofer polls and now hears "attack".
    let poll_time = attack_time + SimDuration::from_nanos(10);
    let mut spoofer_out = CommandTrace::new();
    spoofer.wakeup(poll_time, &mut spoofer_out).unwrap();
    let master_replies = pump(&spoofer_out, &mut botmaster, poll_time);
    pump(&master_replies, &mut spoofer, poll_time);
    assert_eq!(spoofer.master_cmd(), MasterCmd::Attack);

    // Next wakeup: the window is open, so the spoofer wants the spread.
    let mut out = CommandTrace::new();
    let t1 = poll_time + SimDuration::from_nanos(80);
    spoofer.wakeup(t1, &mut out).unwrap();
    assert_eq!(out.spread_query_count(), 1);
    assert_eq!(spoofer.state(), SpooferState::AwaitingSpread);

    // Spread arrives; the next cycle layers one tick behind the best bid.
    respond_spread(&mut spoofer, "IBM", 100, 10_000);
    let mut cycle = CommandTrace::new();
    let t2 = t1 + SimDuration::from_nanos(70);
    spoofer.wakeup(t2, &mut cycle).unwrap();
    confirm_cancels(&mut spoofer, &cycle);

    let placements = cycle.placements();
    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].side(), Side::Buy);
    assert_eq!(placements[0].limit_price(), 99);
    assert_eq!(spoofer.state(), SpooferState::Active);
}

#[test]
fn test_polling_spoofer_stays_flat_through_repeated_rounds() {
    let (mut botmaster, mut spoofer) = setup();

    // Several poll rounds before the window opens: the spoofer never
    // places an order and keeps asking.
    let mut queries = 0;
    for round in 0..4u64 {
        let now = SimTime::from_nanos(MARKET_OPEN_NS + round * 200);
        let mut out = CommandTrace::new();
        spoofer.wakeup(now, &mut out).unwrap();
        queries += out.outbound().len();
        assert!(out.placements().is_empty());

        let replies = pump(&out, &mut botmaster, now);
        pump(&replies, &mut spoofer, now);
        assert_eq!(spoofer.master_cmd(), MasterCmd::Wait);
    }

    // One query per round: each answer resets the pending-request state.
    assert_eq!(queries, 4);
    assert_eq!(spoofer.blotter().open_order_count(), 0);
}
