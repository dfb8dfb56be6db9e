//! # Registry Properties
//!
//! Observable guarantees of the registry, one test per guarantee:
//!
//! 1. Publishing a never-subscribed type fails with `EventTypeNotRegistered`
//! 2. A publish from C reaches the handlers of A and B
//! 3. A publisher never receives its own event
//! 4. Unsubscribing an unknown identity fails with `SubscriptionNotFound`
//! 5. Every handler of one identity is invoked, each with its own slot
//! 6. A failing handler only fails its own slot
//! 7. Concurrent subscriptions are neither lost nor duplicated
//! 8. After unsubscribe, the identity receives nothing and cannot unsubscribe again

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use event_registry::{
        EventHandler, EventRegistry, EventType, HandlerError, HandlerResult, IntoPending, Pending,
        RegistryError, SubscriberId,
    };
    use futures::future::join_all;
    use tokio::sync::Mutex;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct OrderPlaced {
        order_id: u64,
    }

    #[derive(Debug)]
    struct Unused;

    /// Records which identity saw which order.
    struct Recorder {
        owner: SubscriberId,
        seen: Arc<Mutex<Vec<(SubscriberId, u64)>>>,
    }

    #[async_trait]
    impl EventHandler<OrderPlaced> for Recorder {
        async fn handle(&self, event: Pending<OrderPlaced>) -> HandlerResult {
            let order = event.await;
            self.seen.lock().await.push((self.owner, order.order_id));
            Ok(())
        }
    }

    fn counting(
        hits: &Arc<AtomicUsize>,
    ) -> impl Fn(Pending<OrderPlaced>) -> futures::future::Ready<HandlerResult> + Send + Sync + 'static
    {
        let hits = Arc::clone(hits);
        move |_event| {
            hits.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Ok(()))
        }
    }

    // =============================================================================
    // PROPERTIES
    // =============================================================================

    #[tokio::test]
    async fn test_publish_without_any_subscription_fails() {
        let registry = EventRegistry::new();

        let err = registry
            .publish_value(SubscriberId::new(), Unused)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::EventTypeNotRegistered {
                event_type: EventType::of::<Unused>()
            }
        );
        assert!(!registry.is_registered::<Unused>());
    }

    #[tokio::test]
    async fn test_publish_reaches_other_subscribers() {
        let registry = EventRegistry::new();
        let (a, b, c) = (SubscriberId::new(), SubscriberId::new(), SubscriberId::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        for owner in [a, b] {
            let recorder = Arc::new(Recorder {
                owner,
                seen: Arc::clone(&seen),
            });
            registry
                .subscribe_handler::<OrderPlaced, _>(owner, recorder)
                .await
                .unwrap();
        }

        let delivery = registry
            .publish(c, OrderPlaced { order_id: 42 }.into_pending())
            .await
            .unwrap();
        assert_eq!(delivery.len(), 2);

        let outcomes = timeout(WAIT, delivery.wait_all()).await.unwrap();
        assert!(outcomes.iter().all(Result::is_ok));

        let mut seen = seen.lock().await.clone();
        seen.sort();
        let mut expected = vec![(a, 42), (b, 42)];
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_publisher_excludes_itself() {
        let registry = EventRegistry::new();
        let a = SubscriberId::new();
        let hits = Arc::new(AtomicUsize::new(0));

        registry.subscribe(a, counting(&hits)).await.unwrap();

        let err = registry
            .publish_value(a, OrderPlaced { order_id: 1 })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::NoSubscribers {
                event_type: EventType::of::<OrderPlaced>(),
                publisher: a,
            }
        );
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_identity_fails() {
        let registry = EventRegistry::new();
        let subscribed = SubscriberId::new();
        let stranger = SubscriberId::new();

        // Type never registered at all.
        assert!(matches!(
            registry.unsubscribe::<OrderPlaced>(stranger).await,
            Err(RegistryError::SubscriptionNotFound { subscriber, .. }) if subscriber == stranger
        ));

        // Type registered, identity unknown.
        let hits = Arc::new(AtomicUsize::new(0));
        registry.subscribe(subscribed, counting(&hits)).await.unwrap();
        assert!(matches!(
            registry.unsubscribe::<OrderPlaced>(stranger).await,
            Err(RegistryError::SubscriptionNotFound { subscriber, .. }) if subscriber == stranger
        ));
        assert_eq!(registry.subscriber_count::<OrderPlaced>(), 1);
    }

    #[tokio::test]
    async fn test_all_handlers_of_one_identity_run() {
        let registry = EventRegistry::new();
        let a = SubscriberId::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        registry.subscribe(a, counting(&first)).await.unwrap();
        registry.subscribe(a, counting(&second)).await.unwrap();
        assert_eq!(registry.subscriber_count::<OrderPlaced>(), 1);
        assert_eq!(registry.handler_count::<OrderPlaced>(a), 2);

        let delivery = registry
            .publish_value(SubscriberId::new(), OrderPlaced { order_id: 7 })
            .await
            .unwrap();

        assert_eq!(delivery.len(), 2);
        assert!(delivery.signals().iter().all(|s| s.subscriber() == a));
        let outcomes = timeout(WAIT, delivery.wait_all()).await.unwrap();
        assert_eq!(outcomes, vec![Ok(()), Ok(())]);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_handler_only_fails_its_slot() {
        let registry = EventRegistry::new();
        let faulty = SubscriberId::new();
        let hits = Arc::new(AtomicUsize::new(0));

        registry.subscribe(SubscriberId::new(), counting(&hits)).await.unwrap();
        registry
            .subscribe(faulty, |_event: Pending<OrderPlaced>| async {
                Err::<(), HandlerError>("order rejected".into())
            })
            .await
            .unwrap();
        registry.subscribe(SubscriberId::new(), counting(&hits)).await.unwrap();

        // Top-level publish still succeeds.
        let delivery = registry
            .publish_value(SubscriberId::new(), OrderPlaced { order_id: 3 })
            .await
            .unwrap();
        assert_eq!(delivery.len(), 3);

        let outcomes = timeout(WAIT, delivery.wait_all()).await.unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 2);

        let failures: Vec<_> = outcomes.into_iter().filter_map(Result::err).collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            &failures[0],
            RegistryError::HandlerInvocationFailure { subscriber, reason, .. }
                if *subscriber == faulty && reason == "order rejected"
        ));
        assert!(failures[0].is_slot_failure());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_panicking_handlers_fail_with_invocation_failure() {
        let registry = EventRegistry::new();
        let on_call = SubscriberId::new();
        let while_running = SubscriberId::new();

        fn refuse(_event: Pending<OrderPlaced>) -> futures::future::Ready<HandlerResult> {
            panic!("refused on call")
        }

        registry.subscribe(on_call, refuse).await.unwrap();
        registry
            .subscribe(while_running, |event: Pending<OrderPlaced>| async move {
                if event.await.order_id > 0 {
                    panic!("crashed while running");
                }
                Ok(())
            })
            .await
            .unwrap();
        registry
            .subscribe(SubscriberId::new(), |_event: Pending<OrderPlaced>| async { Ok(()) })
            .await
            .unwrap();

        let delivery = registry
            .publish_value(SubscriberId::new(), OrderPlaced { order_id: 5 })
            .await
            .unwrap();
        let outcomes = timeout(WAIT, delivery.wait_all()).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        for (who, message) in [(on_call, "refused on call"), (while_running, "crashed while running")] {
            assert!(outcomes.iter().any(|r| matches!(
                r,
                Err(RegistryError::HandlerInvocationFailure { subscriber, reason, .. })
                    if *subscriber == who && reason == message
            )));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_subscriptions_are_all_kept() {
        let registry = EventRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        // Start all 100 before awaiting any.
        let completions: Vec<_> = (0..100)
            .map(|_| registry.subscribe(SubscriberId::new(), counting(&hits)))
            .collect();
        for outcome in join_all(completions).await {
            outcome.unwrap();
        }
        assert_eq!(registry.subscriber_count::<OrderPlaced>(), 100);

        let delivery = registry
            .publish_value(SubscriberId::new(), OrderPlaced { order_id: 100 })
            .await
            .unwrap();
        assert_eq!(delivery.len(), 100);

        timeout(WAIT, delivery.wait_all()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 100);
    }

    #[tokio::test]
    async fn test_unsubscribed_identity_receives_nothing() {
        let registry = EventRegistry::new();
        let a = SubscriberId::new();
        let b = SubscriberId::new();
        let a_hits = Arc::new(AtomicUsize::new(0));
        let b_hits = Arc::new(AtomicUsize::new(0));

        registry.subscribe(a, counting(&a_hits)).await.unwrap();
        registry.subscribe(b, counting(&b_hits)).await.unwrap();

        registry.unsubscribe::<OrderPlaced>(a).await.unwrap();

        let delivery = registry
            .publish_value(SubscriberId::new(), OrderPlaced { order_id: 8 })
            .await
            .unwrap();
        assert_eq!(delivery.len(), 1);
        assert_eq!(delivery.signals()[0].subscriber(), b);
        timeout(WAIT, delivery.wait_all()).await.unwrap();

        assert_eq!(a_hits.load(Ordering::SeqCst), 0);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);
        assert!(matches!(
            registry.unsubscribe::<OrderPlaced>(a).await,
            Err(RegistryError::SubscriptionNotFound { subscriber, .. }) if subscriber == a
        ));
    }
}
