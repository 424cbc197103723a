//! Integration tests for ordering, the capacity bound and eviction strategies.

use std::sync::Arc;
use std::time::{Duration, Instant};
use toast_dispatch::{
    Dispatcher, DispatcherBuilder, EvictionStrategy, ManualClock, NotificationChannel,
    NotificationRequest,
};

fn setup(
    max_visible: usize,
    strategy: EvictionStrategy,
) -> (NotificationChannel, ManualClock, Dispatcher) {
    let channel = NotificationChannel::new();
    let clock = ManualClock::new(Instant::now());
    let dispatcher = DispatcherBuilder::new()
        .with_max_visible(max_visible)
        .with_eviction_strategy(strategy)
        .with_clock(Arc::new(clock.clone()))
        .build(&channel)
        .unwrap();
    (channel, clock, dispatcher)
}

fn bodies(dispatcher: &Dispatcher) -> Vec<String> {
    dispatcher
        .snapshot()
        .iter()
        .map(|n| n.body().to_string())
        .collect()
}

#[test]
fn test_order_matches_admission() {
    let (channel, _clock, dispatcher) = setup(10, EvictionStrategy::Oldest);

    for body in ["a", "b", "a", "c", "d"] {
        channel.info(body);
    }

    assert_eq!(bodies(&dispatcher), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_bound_holds_and_oldest_goes_first() {
    let (channel, _clock, dispatcher) = setup(3, EvictionStrategy::Oldest);

    for i in 0..10 {
        channel.info(format!("message {i}"));
        assert!(dispatcher.snapshot().len() <= 3);
    }

    assert_eq!(bodies(&dispatcher), vec!["message 7", "message 8", "message 9"]);
    assert_eq!(dispatcher.metrics().notifications_evicted(), 7);
}

#[test]
fn test_exiting_notifications_count_toward_bound() {
    let (channel, _clock, dispatcher) = setup(2, EvictionStrategy::Oldest);

    channel.info("a");
    channel.info("b");
    dispatcher.dismiss_all();
    channel.info("c");

    let active = dispatcher.snapshot();
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].body(), "b");
    assert!(!active[0].is_visible());
    assert!(active[1].is_visible());
}

#[test]
fn test_oldest_evicts_persistent_entries() {
    let (channel, _clock, dispatcher) = setup(2, EvictionStrategy::Oldest);

    channel.publish(NotificationRequest::info("keep me").persistent());
    channel.info("b");
    channel.info("c");

    assert_eq!(bodies(&dispatcher), vec!["b", "c"]);
}

#[test]
fn test_persistent_exempt_keeps_persistent_entries() {
    let (channel, _clock, dispatcher) = setup(2, EvictionStrategy::PersistentExempt);

    channel.publish(NotificationRequest::info("keep me").persistent());
    channel.info("b");
    channel.info("c");

    assert_eq!(bodies(&dispatcher), vec!["keep me", "c"]);
}

#[test]
fn test_persistent_exempt_falls_back_to_oldest() {
    let (channel, _clock, dispatcher) = setup(2, EvictionStrategy::PersistentExempt);

    channel.publish(NotificationRequest::info("p1").persistent());
    channel.publish(NotificationRequest::info("p2").persistent());
    channel.publish(NotificationRequest::info("p3").persistent());

    assert_eq!(bodies(&dispatcher), vec!["p2", "p3"]);
}

#[test]
fn test_evicted_key_still_suppresses_until_window_ends() {
    let (channel, clock, dispatcher) = setup(1, EvictionStrategy::Oldest);

    channel.info("a");
    channel.info("b");
    channel.info("a");
    assert_eq!(bodies(&dispatcher), vec!["b"]);

    clock.advance(Duration::from_millis(500));
    channel.info("a");
    assert_eq!(bodies(&dispatcher), vec!["a"]);
}
