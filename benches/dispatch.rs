use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Instant;
use toast_dispatch::{
    Category, DispatcherBuilder, ManualClock, NotificationChannel, NotificationRequest,
};

/// Benchmark dedup key computation speed
fn bench_dedup_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedup_key");

    let short = NotificationRequest::error("Failed to load buses");
    let titled = NotificationRequest::new(Category::Default).with_title("Heads up");
    let long = NotificationRequest::info("x".repeat(1_024));

    group.bench_function("short_description", |b| {
        b.iter(|| black_box(&short).dedup_key())
    });
    group.bench_function("title_fallback", |b| b.iter(|| black_box(&titled).dedup_key()));
    group.bench_function("long_description", |b| b.iter(|| black_box(&long).dedup_key()));

    group.finish();
}

/// Benchmark publish throughput with varying duplicate ratios
fn bench_publish_duplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");
    group.throughput(Throughput::Elements(1000));

    // distinct keys per 1000 publishes: 1 = all duplicates, 1000 = none
    for distinct in [1usize, 10, 1000].iter() {
        let messages: Vec<String> = (0..*distinct).map(|i| format!("Message {}", i)).collect();

        group.bench_with_input(
            BenchmarkId::new("distinct_keys", distinct),
            &messages,
            |b, messages| {
                b.iter(|| {
                    let channel = NotificationChannel::new();
                    let clock = ManualClock::new(Instant::now());
                    let dispatcher = DispatcherBuilder::new()
                        .with_clock(Arc::new(clock))
                        .build(&channel)
                        .unwrap();

                    for i in 0..1000 {
                        channel.error(black_box(messages[i % messages.len()].as_str()));
                    }
                    black_box(dispatcher.snapshot().len())
                })
            },
        );
    }

    group.finish();
}

/// Benchmark contention when several threads publish on the same channel
fn bench_concurrent_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for num_threads in [2, 4, 8].iter() {
        group.throughput(Throughput::Elements((*num_threads as u64) * 1000));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let channel = NotificationChannel::new();
                    let _dispatcher = DispatcherBuilder::new().build(&channel).unwrap();

                    let mut handles = vec![];
                    for i in 0..num_threads {
                        let channel = channel.clone();
                        let handle = std::thread::spawn(move || {
                            let message = format!("Failed to load feed {}", i);
                            for _ in 0..1000 {
                                channel.error(black_box(message.as_str()));
                            }
                        });
                        handles.push(handle);
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_dedup_key,
    bench_publish_duplication,
    bench_concurrent_publish,
);
criterion_main!(benches);
