//! Single-waiter scenarios: one producer, one consumer, one session.

use crate::prelude::*;
use sessionhub::{Cancellation, HubError, SessionHub, SessionId};
use std::time::Duration;

#[tokio::test]
async fn completed_value_arrives_before_deadline() {
    let hub: SessionHub<i64, String> = SessionHub::default();
    let id = hub.begin();
    assert_eq!(id, SessionId(1));

    let producer = tokio::spawn({
        let hub = hub.clone();
        async move {
            tokio::time::sleep(UNIT).await;
            hub.complete(id, Ok(100))
        }
    });

    let started = tokio::time::Instant::now();
    let value = hub.wait_timeout(id, UNIT * 5).await.unwrap();
    assert_eq!(value, Ok(100));
    assert!(started.elapsed() < UNIT * 5);
    producer.await.unwrap().unwrap();
}

#[tokio::test]
async fn wait_without_complete_hits_deadline() {
    let hub = hub();
    hub.begin();
    let id = hub.begin();
    assert_eq!(id, SessionId(2));

    let started = tokio::time::Instant::now();
    let err = hub.wait_timeout(id, UNIT).await.unwrap_err();
    assert!(started.elapsed() >= UNIT);
    assert_eq!(
        err,
        HubError::Cancelled {
            id,
            reason: Cancellation::DeadlineExceeded
        }
    );

    // Cleanup already removed the session
    assert_eq!(
        hub.complete(id, Ok("late".into())),
        Err(HubError::SessionNotFound(id))
    );
}

#[tokio::test]
async fn producer_error_reaches_waiter_unchanged() {
    let hub = hub();
    let id = hub.begin();
    hub.complete(id, Err("connection reset".into())).unwrap();

    let outcome = hub.wait_timeout(id, UNIT).await.unwrap();
    assert_eq!(outcome, Err("connection reset".to_string()));
}

#[tokio::test]
async fn complete_succeeds_at_most_once() {
    let hub = hub();
    let id = hub.begin();

    hub.complete(id, Ok("first".into())).unwrap();
    let second = hub.complete(id, Ok("second".into())).unwrap_err();
    assert!(matches!(
        second,
        HubError::AlreadyClosed(_) | HubError::AlreadyCompleted(_)
    ));

    assert_eq!(hub.wait_timeout(id, UNIT).await.unwrap(), Ok("first".into()));
}

#[tokio::test]
async fn close_is_a_quiet_noop_when_repeated() {
    let hub = hub();
    let id = hub.begin();

    assert!(hub.close(id));
    assert!(!hub.close(id));

    let err = hub.wait_timeout(id, UNIT).await.unwrap_err();
    assert_eq!(err, HubError::SessionNotFound(id));
    assert!(!hub.close(id));
}

#[tokio::test]
async fn abandoned_send_closes_session_for_waiter() {
    let hub = hub();
    let id = hub.begin();

    let waiter = tokio::spawn({
        let hub = hub.clone();
        async move { hub.wait_timeout(id, UNIT * 10).await }
    });

    // Sending the request failed, so the producer gives up on the session
    tokio::time::sleep(Duration::from_millis(20)).await;
    hub.close(id);

    let err = waiter.await.unwrap().unwrap_err();
    assert_eq!(err, HubError::SessionClosed(id));
}

#[tokio::test]
async fn each_wait_resolves_exactly_once() {
    let hub = hub();
    let ids: Vec<_> = (0..4).map(|_| hub.begin()).collect();

    hub.complete(ids[0], Ok("value".into())).unwrap();
    hub.close(ids[1]);

    let outcomes = [
        hub.wait_timeout(ids[0], UNIT).await,
        hub.wait_timeout(ids[1], UNIT).await,
        hub.wait_timeout(ids[2], UNIT).await,
        hub.wait_timeout(SessionId(999), UNIT).await,
    ];

    assert_eq!(outcomes[0], Ok(Ok("value".into())));
    assert_eq!(outcomes[1], Err(HubError::SessionNotFound(ids[1])));
    assert!(matches!(outcomes[2], Err(HubError::Cancelled { .. })));
    assert_eq!(outcomes[3], Err(HubError::SessionNotFound(SessionId(999))));
    // The untouched fourth session is still live
    assert!(hub.contains(ids[3]));
    assert_eq!(hub.len(), 1);
}
