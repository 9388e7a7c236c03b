//! Abandoned sessions are reclaimed by the background sweeper.

use crate::prelude::*;
use sessionhub::{FakeClock, HubConfig, HubError, SessionHub};

#[tokio::test]
async fn untouched_session_is_evicted_within_window() {
    let hub = sweeping_hub(2, 1);
    let id = hub.begin();

    // stale_after + sweep_interval, plus slack
    tokio::time::sleep(UNIT * 5).await;

    assert!(!hub.contains(id));
    assert_eq!(
        hub.complete(id, Ok("too late".into())),
        Err(HubError::SessionNotFound(id))
    );
    hub.stop_sweeper().await;
}

#[tokio::test]
async fn active_waiter_outlives_sweeps_inside_window() {
    let hub = sweeping_hub(10, 1);
    let id = hub.begin();

    let producer = tokio::spawn({
        let hub = hub.clone();
        async move {
            tokio::time::sleep(UNIT * 3).await;
            hub.complete(id, Ok("made it".into()))
        }
    });

    let outcome = hub.wait_timeout(id, UNIT * 8).await.unwrap();
    assert_eq!(outcome, Ok("made it".to_string()));
    producer.await.unwrap().unwrap();
    hub.stop_sweeper().await;
}

#[tokio::test]
async fn eviction_unblocks_waiter_with_closed() {
    // Misconfigured on purpose: the stale window is shorter than the wait
    let hub = sweeping_hub(1, 1);
    let id = hub.begin();

    let err = hub.wait_timeout(id, UNIT * 30).await.unwrap_err();
    assert_eq!(err, HubError::SessionClosed(id));
    hub.stop_sweeper().await;
}

#[tokio::test]
async fn memory_returns_to_zero_after_abandonment() {
    let hub = sweeping_hub(1, 1);
    for _ in 0..500 {
        hub.begin();
    }
    assert_eq!(hub.len(), 500);

    tokio::time::sleep(UNIT * 4).await;
    assert!(hub.is_empty());
    hub.stop_sweeper().await;
}

#[tokio::test(start_paused = true)]
async fn default_constructor_evicts_abandoned_session() {
    let clock = FakeClock::new();
    let config = HubConfig::default().with_clock(clock.clone());
    let (stale_after, sweep_interval) = (config.stale_after, config.sweep_interval);
    let hub: SessionHub<String, String> = SessionHub::new(config);
    let id = hub.begin();

    clock.advance(stale_after + UNIT);
    tokio::time::sleep(sweep_interval + UNIT).await;

    assert!(!hub.contains(id));
    assert!(hub.is_empty());
}

#[tokio::test]
async fn default_hub_runs_its_own_sweeper() {
    let hub: SessionHub<String, String> = SessionHub::default();
    assert!(hub.has_sweeper());
    assert!(hub.stop_sweeper().await);
    assert!(!hub.has_sweeper());
}
