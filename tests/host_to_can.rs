//! Host → CAN path: transmit retries, ordering, and echo correlation.
mod helpers;

use gs_can_relay::traits::Activity;
use helpers::{poll_n, relay_with, MockClock};

#[test]
/// Four buffers, one host request with echo_id 7 (legacy host): the echo reaches
/// the host with the same id and a fresh timestamp, and the pool refills.
fn echo_scenario_legacy_host() {
    let clock = MockClock::at(5_000);
    let mut relay = relay_with(1, clock.clone());
    relay.host_mut().push_request(7, 0x100);

    poll_n(&mut relay, 1);

    assert!(relay.from_host().is_empty());
    assert_eq!(relay.can().transmitted.len(), 1);
    assert_eq!(relay.can().transmitted[0].echo_id, 7);

    let echo = relay.host().sent[0];
    assert_eq!(echo.echo_id, 7);
    assert_eq!(echo.can_id, 0x100);
    assert_eq!(echo.timestamp_us, 5_000);
    assert_eq!(relay.pool().available(), 4);
    assert_eq!(relay.indicator().activity, vec![Activity::CanTransmit]);
}

#[test]
/// Same scenario on a queued-protocol host: the echo sits in the to-host queue
/// until the transmit pump runs.
fn echo_scenario_queued_host() {
    let clock = MockClock::at(1_234);
    let mut relay = relay_with(2, clock.clone());
    relay.host_mut().ready = false;
    relay.host_mut().push_request(7, 0x100);

    poll_n(&mut relay, 1);

    assert!(relay.from_host().is_empty());
    assert!(relay.host().sent.is_empty());
    assert_eq!(relay.to_host().len(), 1);
    let queued = relay.to_host().front().expect("echo queued");
    assert_eq!(relay.pool().frame(queued).echo_id, 7);
    assert_eq!(relay.pool().frame(queued).timestamp_us, 1_234);
    assert_eq!(relay.pool().available(), 3);

    clock.set(9_999);
    relay.host_mut().ready = true;
    poll_n(&mut relay, 1);

    assert_eq!(relay.host().sent.len(), 1);
    assert_eq!(relay.host().sent[0].echo_id, 7);
    // Stamped at CAN transmit time, not at host delivery.
    assert_eq!(relay.host().sent[0].timestamp_us, 1_234);
    assert_eq!(relay.pool().available(), 4);
}

#[test]
/// A rejected CAN transmit keeps the frame at the head; later frames never overtake it.
fn failed_transmit_retries_in_order() {
    let mut relay = relay_with(1, MockClock::at(0));
    relay.host_mut().push_request(1, 0x101);
    relay.host_mut().push_request(2, 0x102);
    relay.can_mut().reject_transmits = 3;

    for _ in 0..3 {
        poll_n(&mut relay, 1);
        let head = relay.from_host().front().expect("request still queued");
        assert_eq!(relay.pool().frame(head).echo_id, 1);
        assert!(relay.can().transmitted.is_empty());
    }
    assert_eq!(relay.from_host().len(), 2);

    poll_n(&mut relay, 2);

    let order: Vec<u32> = relay.can().transmitted.iter().map(|f| f.echo_id).collect();
    assert_eq!(order, vec![1, 2]);
    assert_eq!(relay.can().transmit_attempts, 5);
    assert_eq!(relay.stats().can_tx_retries, 3);

    let echoes: Vec<u32> = relay.host().sent.iter().map(|f| f.echo_id).collect();
    assert_eq!(echoes, vec![1, 2]);
    assert_eq!(relay.pool().available(), 4);
}

#[test]
/// A persistently busy bus holds frames without losing or duplicating them.
fn busy_bus_holds_frames_until_released() {
    let mut relay = relay_with(2, MockClock::at(0));
    relay.can_mut().bus_busy = true;
    for echo_id in 10..14 {
        relay.host_mut().push_request(echo_id, 0x200);
    }

    poll_n(&mut relay, 20);

    assert_eq!(relay.from_host().len(), 4);
    assert_eq!(relay.pool().available(), 0);
    assert!(relay.can().transmitted.is_empty());
    assert!(relay.host().sent.is_empty());

    relay.can_mut().bus_busy = false;
    poll_n(&mut relay, 6);

    let on_bus: Vec<u32> = relay.can().transmitted.iter().map(|f| f.echo_id).collect();
    assert_eq!(on_bus, vec![10, 11, 12, 13]);
    let echoes: Vec<u32> = relay.host().sent.iter().map(|f| f.echo_id).collect();
    assert_eq!(echoes, vec![10, 11, 12, 13]);
    assert_eq!(relay.pool().available(), 4);
}

#[test]
/// With every buffer in use, host requests wait in the link instead of being dropped.
fn host_intake_waits_for_free_buffer() {
    let mut relay = relay_with(2, MockClock::at(0));
    relay.can_mut().bus_busy = true;
    for echo_id in 0..6 {
        relay.host_mut().push_request(echo_id, 0x300);
    }

    poll_n(&mut relay, 10);

    assert_eq!(relay.from_host().len(), 4);
    assert_eq!(relay.host().inbox.len(), 2);
    assert_eq!(relay.stats().host_rx, 4);

    relay.can_mut().bus_busy = false;
    poll_n(&mut relay, 10);

    let on_bus: Vec<u32> = relay.can().transmitted.iter().map(|f| f.echo_id).collect();
    assert_eq!(on_bus, vec![0, 1, 2, 3, 4, 5]);
    assert!(relay.host().inbox.is_empty());
}
