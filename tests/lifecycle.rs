//! Integration tests for notification lifecycle, dismissal and teardown.

use std::sync::Arc;
use std::time::{Duration, Instant};
use toast_dispatch::{
    Action, Dispatcher, DispatcherBuilder, ManualClock, NotificationChannel, NotificationPatch,
    NotificationRequest,
};

fn setup() -> (NotificationChannel, ManualClock, Dispatcher) {
    let channel = NotificationChannel::new();
    let clock = ManualClock::new(Instant::now());
    let dispatcher = DispatcherBuilder::new()
        .with_clock(Arc::new(clock.clone()))
        .build(&channel)
        .unwrap();
    (channel, clock, dispatcher)
}

#[test]
fn test_auto_dismiss_then_removal() {
    let (channel, clock, dispatcher) = setup();

    channel.info("Saved");

    clock.advance(Duration::from_millis(4_999));
    dispatcher.run_due_timers();
    assert!(dispatcher.snapshot()[0].is_visible());

    clock.advance(Duration::from_millis(1));
    dispatcher.run_due_timers();
    assert!(!dispatcher.snapshot()[0].is_visible());

    clock.advance(Duration::from_millis(300));
    dispatcher.run_due_timers();
    assert!(dispatcher.snapshot().is_empty());
    assert_eq!(dispatcher.metrics().notifications_expired(), 1);
}

#[test]
fn test_per_request_lifetime() {
    let (channel, clock, dispatcher) = setup();

    channel.publish(NotificationRequest::info("quick").with_lifetime(Duration::from_secs(1)));
    channel.info("default");

    clock.advance(Duration::from_secs(1));
    dispatcher.run_due_timers();

    let active = dispatcher.snapshot();
    assert!(!active[0].is_visible());
    assert!(active[1].is_visible());
}

#[test]
fn test_persistent_requests_never_expire() {
    let (channel, clock, dispatcher) = setup();

    channel.publish(NotificationRequest::info("Update available").persistent());
    channel.publish(NotificationRequest::error("Retry?").with_action(Action::new("retry")));

    clock.advance(Duration::from_secs(3_600));
    dispatcher.run_due_timers();

    let active = dispatcher.snapshot();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|n| n.is_visible() && n.is_persistent()));
    assert_eq!(
        active[1].action().and_then(|a| a.downcast_ref::<&str>()),
        Some(&"retry")
    );
}

#[test]
fn test_dismiss_is_terminal() {
    let (channel, clock, dispatcher) = setup();
    let presenter = dispatcher.presenter();

    channel.info("Uploading");
    let id = presenter.snapshot()[0].id();

    assert!(presenter.dismiss(id));
    assert!(!presenter.dismiss(id));
    assert!(dispatcher.update(id, NotificationPatch::new().description("still exiting")));

    clock.advance(Duration::from_millis(300));
    dispatcher.run_due_timers();

    assert!(presenter.snapshot().iter().all(|n| n.id() != id));
    assert!(!dispatcher.update(id, NotificationPatch::new().description("Uploaded")));
    assert!(!presenter.dismiss(id));
    assert!(presenter.snapshot().is_empty());
}

#[test]
fn test_update_in_place() {
    let (_channel, _clock, dispatcher) = setup();

    let id = dispatcher
        .dispatch(NotificationRequest::info("Uploading").with_title("Sync"))
        .unwrap();
    assert!(dispatcher.update(id, NotificationPatch::new().description("Uploaded")));

    let active = dispatcher.snapshot();
    assert_eq!(active[0].id(), id);
    assert_eq!(active[0].title(), Some("Sync"));
    assert_eq!(active[0].body(), "Uploaded");
}

#[test]
fn test_dismiss_all() {
    let (channel, clock, dispatcher) = setup();

    channel.info("one");
    channel.info("two");
    channel.publish(NotificationRequest::info("three").persistent());

    assert_eq!(dispatcher.presenter().dismiss_all(), 3);
    assert!(dispatcher.snapshot().iter().all(|n| !n.is_visible()));

    clock.advance(Duration::from_millis(300));
    dispatcher.run_due_timers();
    assert!(dispatcher.snapshot().is_empty());
}

#[test]
fn test_revision_tracks_changes() {
    let (channel, clock, dispatcher) = setup();
    let presenter = dispatcher.presenter();

    let initial = presenter.revision();
    channel.info("Saved");
    let after_add = presenter.revision();
    assert!(after_add > initial);

    channel.info("Saved");
    assert_eq!(presenter.revision(), after_add);

    clock.advance(Duration::from_secs(5));
    dispatcher.run_due_timers();
    assert!(presenter.revision() > after_add);
}

#[test]
fn test_teardown_cancels_timers() {
    let (channel, clock, mut dispatcher) = setup();

    channel.info("Saved");
    dispatcher.teardown();
    assert_eq!(dispatcher.pending_timers(), 0);

    clock.advance(Duration::from_secs(10));
    assert_eq!(dispatcher.run_due_timers(), 0);

    let active = dispatcher.snapshot();
    assert_eq!(active.len(), 1);
    assert!(active[0].is_visible());
}

#[test]
fn test_new_dispatcher_after_teardown_is_unaffected() {
    let channel = NotificationChannel::new();
    let clock = ManualClock::new(Instant::now());
    let build = || {
        DispatcherBuilder::new()
            .with_clock(Arc::new(clock.clone()))
            .build(&channel)
            .unwrap()
    };

    let mut first = build();
    channel.error("Failed to load buses");
    first.teardown();
    assert_eq!(channel.subscriber_count(), 0);

    let second = build();
    channel.error("Failed to load buses");
    assert_eq!(second.snapshot().len(), 1);

    clock.advance(Duration::from_millis(600));
    first.run_due_timers();
    second.run_due_timers();

    assert_eq!(first.snapshot().len(), 1);
    assert_eq!(second.pending_keys(), 0);
    assert_eq!(second.snapshot().len(), 1);
}

#[test]
fn test_unbounded_lifetime_is_admitted_and_kept() {
    let (channel, clock, dispatcher) = setup();

    channel.publish(NotificationRequest::info("forever").with_lifetime(Duration::MAX));
    assert_eq!(dispatcher.pending_keys(), 1);

    clock.advance(Duration::from_secs(3_600));
    dispatcher.run_due_timers();

    let active = dispatcher.snapshot();
    assert_eq!(active.len(), 1);
    assert!(active[0].is_visible());
    assert_eq!(dispatcher.metrics().notifications_expired(), 0);
}

#[test]
fn test_update_with_action_stops_auto_dismiss() {
    let (_channel, clock, dispatcher) = setup();

    let id = dispatcher
        .dispatch(NotificationRequest::info("Deleted"))
        .unwrap();
    assert!(dispatcher.update(id, NotificationPatch::new().action(Action::new("undo"))));

    clock.advance(Duration::from_secs(5));
    dispatcher.run_due_timers();

    let active = dispatcher.snapshot();
    assert!(active[0].is_persistent());
    assert!(active[0].is_visible());
    assert_eq!(dispatcher.metrics().notifications_expired(), 0);
}
