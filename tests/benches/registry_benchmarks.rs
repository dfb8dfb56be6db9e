//! # Event Registry Benchmarks
//!
//! | Operation | Expectation |
//! |-----------|-------------|
//! | subscribe | Constant per call, independent of group size |
//! | publish | Linear in the number of handlers |
//! | publish + wait_all | Dominated by task scheduling |
//! | unsubscribe | Constant per call |

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use event_registry::{EventRegistry, Pending, SubscriberId};
use tokio::runtime::Runtime;

#[derive(Debug)]
struct Quote {
    price: u64,
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

async fn registry_with_subscribers(count: usize, sink: &Arc<AtomicU64>) -> EventRegistry {
    let registry = EventRegistry::new();
    for _ in 0..count {
        let sink = Arc::clone(sink);
        registry
            .subscribe(SubscriberId::new(), move |quote: Pending<Quote>| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.fetch_add(quote.await.price, Ordering::Relaxed);
                    Ok(())
                }
            })
            .await
            .expect("subscribe");
    }
    registry
}

// ============================================================================
// Subscribe / Unsubscribe
// ============================================================================

fn bench_subscription_churn(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("subscription");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("subscribe_unsubscribe", |b| {
        let registry = EventRegistry::new();
        b.to_async(&rt).iter(|| {
            let registry = registry.clone();
            async move {
                let id = SubscriberId::new();
                registry
                    .subscribe(id, |_quote: Pending<Quote>| async { Ok(()) })
                    .await
                    .expect("subscribe");
                black_box(registry.unsubscribe::<Quote>(id).await.is_ok())
            }
        })
    });

    group.finish();
}

// ============================================================================
// Publish fan-out
// ============================================================================

fn bench_publish_fan_out(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("publish");
    group.measurement_time(Duration::from_secs(5));

    let sink = Arc::new(AtomicU64::new(0));
    let publisher = SubscriberId::new();

    for size in [1usize, 10, 100, 1000] {
        let registry = rt.block_on(registry_with_subscribers(size, &sink));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("started", size), &registry, |b, registry| {
            b.to_async(&rt).iter(|| async {
                let delivery = registry
                    .publish_value(publisher, Quote { price: 1 })
                    .await
                    .expect("publish");
                black_box(delivery.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("done", size), &registry, |b, registry| {
            b.to_async(&rt).iter(|| async {
                let delivery = registry
                    .publish_value(publisher, Quote { price: 1 })
                    .await
                    .expect("publish");
                black_box(delivery.wait_all().await.len())
            })
        });
    }

    group.finish();
    black_box(sink.load(Ordering::Relaxed));
}

criterion_group!(benches, bench_subscription_churn, bench_publish_fan_out);
criterion_main!(benches);
