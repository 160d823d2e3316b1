use std::sync::Arc;
use std::time::Duration;

use test_fixtures::{peers_of, MockTransport, PeerBehavior};
use tokio::time::Instant;
use vigil_core::config::DispatchConfig;
use vigil_core::models::{QueryFailure, Request};
use vigil_dispatch::RequestDispatcher;

fn config(timeout_ms: u64, max_in_flight: usize) -> DispatchConfig {
    DispatchConfig {
        query_timeout_ms: timeout_ms,
        timeout_slack_ms: 50,
        max_in_flight,
        ..Default::default()
    }
}

fn request() -> Request {
    Request {
        step: 3,
        payload: serde_json::json!(3),
    }
}

#[tokio::test(start_paused = true)]
async fn silent_peer_does_not_delay_siblings() {
    let transport = Arc::new(MockTransport::new());
    transport.script("a", PeerBehavior::Silent);
    transport.script(
        "b",
        PeerBehavior::Echo {
            delay: Duration::from_millis(20),
        },
    );
    let dispatcher = RequestDispatcher::new(transport.clone(), &config(500, 8));

    let started = Instant::now();
    let outcomes = dispatcher.fan_out(&peers_of(&["a", "b", "c"]), &request()).await;
    let elapsed = started.elapsed();

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(
        outcomes[0].result,
        Err(QueryFailure::Timeout { .. })
    ));
    assert_eq!(outcomes[1].result.as_ref().unwrap().payload, serde_json::json!(6));
    assert_eq!(outcomes[2].result.as_ref().unwrap().payload, serde_json::json!(6));
    assert!(elapsed <= dispatcher.worst_case(), "took {elapsed:?}");
    assert_eq!(transport.total_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn failing_peer_is_isolated() {
    let transport = Arc::new(MockTransport::new());
    transport.script("b", PeerBehavior::Fail("connection refused".into()));
    let dispatcher = RequestDispatcher::new(transport, &config(100, 8));

    let outcomes = dispatcher.fan_out(&peers_of(&["a", "b", "c"]), &request()).await;

    assert!(outcomes[0].is_success());
    assert_eq!(
        outcomes[1].result,
        Err(QueryFailure::Transport("connection refused".into()))
    );
    assert!(outcomes[2].is_success());
}

#[tokio::test(start_paused = true)]
async fn outcomes_keep_peer_order_and_identity() {
    let transport = Arc::new(MockTransport::new());
    transport.script(
        "a",
        PeerBehavior::Echo {
            delay: Duration::from_millis(40),
        },
    );
    let dispatcher = RequestDispatcher::new(transport, &config(100, 8));

    let peers = peers_of(&["a", "b"]);
    let outcomes = dispatcher.fan_out(&peers, &request()).await;
    assert_eq!(outcomes[0].peer, peers[0]);
    assert_eq!(outcomes[1].peer, peers[1]);
}

#[tokio::test(start_paused = true)]
async fn bounded_in_flight_never_exceeds_deadline() {
    let transport = Arc::new(MockTransport::new());
    for id in ["a", "b", "c", "d"] {
        transport.script(
            id,
            PeerBehavior::Echo {
                delay: Duration::from_millis(80),
            },
        );
    }
    // One permit: calls run one after another, 80ms each, against a
    // 100ms + 50ms deadline. The first answers, the second is issued at 80ms
    // and cut at 150ms, and the last two never get a permit.
    let dispatcher = RequestDispatcher::new(transport.clone(), &config(100, 1));

    let started = Instant::now();
    let outcomes = dispatcher
        .fan_out(&peers_of(&["a", "b", "c", "d"]), &request())
        .await;

    // Timer wheel resolution is 1ms.
    assert!(started.elapsed() <= dispatcher.worst_case() + Duration::from_millis(2));
    assert!(outcomes[0].is_success());
    assert!(matches!(
        outcomes[1].result,
        Err(QueryFailure::Abandoned { .. })
    ));
    assert_eq!(outcomes[2].result, Err(QueryFailure::NotDispatched));
    assert_eq!(outcomes[3].result, Err(QueryFailure::NotDispatched));
    assert_eq!(transport.calls_to("c"), 0);
    assert_eq!(transport.calls_to("d"), 0);
}

#[tokio::test(start_paused = true)]
async fn permit_starved_peer_is_not_reported_as_timed_out() {
    let transport = Arc::new(MockTransport::new());
    transport.script("a", PeerBehavior::Silent);
    transport.script(
        "b",
        PeerBehavior::Echo {
            delay: Duration::from_millis(100),
        },
    );
    // "a" holds the only permit for its full 500ms timeout; "b" would answer
    // in 100ms but only gets 50ms before the fan-out deadline.
    let dispatcher = RequestDispatcher::new(transport, &config(500, 1));

    let outcomes = dispatcher.fan_out(&peers_of(&["a", "b"]), &request()).await;

    assert_eq!(
        outcomes[0].result,
        Err(QueryFailure::Timeout {
            after: Duration::from_millis(500)
        })
    );
    let starved = outcomes[1].result.as_ref().unwrap_err();
    assert!(!matches!(starved, QueryFailure::Timeout { .. }));
    assert!(!starved.is_peer_fault());
}

#[tokio::test(start_paused = true)]
async fn permits_are_shared_across_concurrent_fan_outs() {
    let transport = Arc::new(MockTransport::new());
    transport.script("a", PeerBehavior::Silent);
    transport.script("c", PeerBehavior::Silent);
    let dispatcher = RequestDispatcher::new(transport.clone(), &config(100, 1));

    // The first pass queues "a" then "c" on the single permit ahead of the
    // second pass's "b". "a" times out at 100ms, "c" is cut at 150ms and "b"
    // never leaves the queue.
    let first = peers_of(&["a", "c"]);
    let second = peers_of(&["b"]);
    let first_request = request();
    let second_request = request();
    let (left, right) = tokio::join!(
        dispatcher.fan_out(&first, &first_request),
        dispatcher.fan_out(&second, &second_request)
    );

    assert!(matches!(left[0].result, Err(QueryFailure::Timeout { .. })));
    assert!(matches!(left[1].result, Err(QueryFailure::Abandoned { .. })));
    assert_eq!(right[0].result, Err(QueryFailure::NotDispatched));
    assert_eq!(transport.calls_to("b"), 0);
}

#[tokio::test]
async fn empty_peer_set_returns_immediately() {
    let dispatcher = RequestDispatcher::new(Arc::new(MockTransport::new()), &config(100, 4));
    assert!(dispatcher.fan_out(&[], &request()).await.is_empty());
}
