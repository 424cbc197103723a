//! Basic example: a data-fetching task reports failures through the channel
//! while a render loop prints whatever the presenter shows.
//!
//! Dispatcher logs go to stderr: `cargo run --example basic`

use std::time::Duration;
use toast_dispatch::{DispatcherBuilder, NotificationChannel, NotificationLayer, Presenter};
use tracing::{error, info};
use tracing_subscriber::prelude::*;

fn render(presenter: &Presenter) {
    let active = presenter.snapshot();
    if active.is_empty() {
        println!("  (no toasts)");
    }
    for toast in active {
        let state = if toast.is_visible() { "visible" } else { "exiting" };
        println!(
            "  [{}] {:<11} {} {}",
            toast.id(),
            toast.category().as_str(),
            toast.title().unwrap_or("-"),
            toast.body()
        );
        println!("         state: {}", state);
    }
}

#[tokio::main]
async fn main() {
    let channel = NotificationChannel::new();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(NotificationLayer::new(channel.clone()))
        .init();

    let dispatcher = DispatcherBuilder::new()
        .with_default_lifetime(Duration::from_secs(2))
        .build(&channel)
        .expect("default configuration is valid");
    let presenter = dispatcher.presenter();
    let driver = dispatcher.spawn_driver();

    println!("=== Toast Dispatch Example ===\n");

    println!("A flaky fetcher reports the same failure 5 times in a row:");
    for _ in 0..5 {
        channel.error("Failed to load buses");
    }
    render(&presenter);

    println!("\nA log line with target \"toast\" raises a notification too:");
    info!(target: "toast", title = "Sync", "Uploaded 3 files");
    error!("ordinary errors stay in the log");
    render(&presenter);

    println!("\nTwo more distinct messages push the oldest out (max 3):");
    channel.info("Route 42 delayed");
    channel.info("Route 7 back on schedule");
    render(&presenter);

    println!("\nAfter 3 seconds everything has expired:");
    tokio::time::sleep(Duration::from_secs(3)).await;
    render(&presenter);

    let snapshot = dispatcher.metrics().snapshot();
    println!(
        "\nadmitted: {}, suppressed: {}, evicted: {}, expired: {}",
        snapshot.notifications_admitted,
        snapshot.duplicates_suppressed,
        snapshot.notifications_evicted,
        snapshot.notifications_expired
    );

    driver.shutdown().await.expect("driver shutdown failed");
    println!("\n=== Example Complete ===");
}
