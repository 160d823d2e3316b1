use std::sync::Arc;
use std::time::Duration;

use vigil_core::models::{
    Identity, PeerOutcome, PeerRecord, QueryFailure, Response, RunEvent, StatusLine,
};
use vigil_core::traits::IRunObserver;
use vigil_observability::{EpochMetrics, FanoutObserver, RecordingObserver, TracingObserver};

#[test]
fn recording_observer_keeps_order() {
    let observer = RecordingObserver::new();
    observer.observe(&RunEvent::StateSaved { step: 1 });
    observer.observe(&RunEvent::NanRewards { ordinals: vec![3] });

    let events = observer.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], RunEvent::StateSaved { step: 1 });
    assert_eq!(
        observer.count(|e| matches!(e, RunEvent::NanRewards { .. })),
        1
    );

    observer.clear();
    assert!(observer.events().is_empty());
}

#[test]
fn fanout_delivers_to_every_target() {
    let a = Arc::new(RecordingObserver::new());
    let b = Arc::new(RecordingObserver::new());
    let fanout = FanoutObserver::new(vec![a.clone()])
        .with(b.clone())
        .with(Arc::new(TracingObserver));

    fanout.observe(&RunEvent::Status(StatusLine {
        step: 4,
        height: 400,
        roster_size: 2,
        top_scores: vec![(Identity::from("a"), 0.5)],
    }));

    assert_eq!(a.events().len(), 1);
    assert_eq!(b.events().len(), 1);
}

#[test]
fn metrics_count_fanout_outcomes() {
    let peer = PeerRecord::new("p", "addr");
    let outcomes = vec![
        PeerOutcome {
            peer: peer.clone(),
            result: Ok(Response {
                payload: serde_json::json!(1),
                latency: Duration::from_millis(3),
            }),
        },
        PeerOutcome {
            peer: peer.clone(),
            result: Err(QueryFailure::Timeout {
                after: Duration::from_millis(50),
            }),
        },
        PeerOutcome {
            peer,
            result: Err(QueryFailure::Transport("refused".into())),
        },
    ];

    let mut metrics = EpochMetrics::new();
    assert_eq!(metrics.peer_success_rate(), None);
    metrics.record_fanout(&outcomes);
    metrics.record_epoch(true);
    metrics.record_submission(Some(false));

    assert_eq!(metrics.forward_passes, 1);
    assert_eq!(metrics.peer_successes, 1);
    assert_eq!(metrics.peer_failures, 2);
    assert_eq!(metrics.peer_timeouts, 1);
    assert_eq!(metrics.submissions_rejected, 1);
    assert!(metrics.last_epoch_at.is_some());
    let rate = metrics.peer_success_rate().unwrap();
    assert!((rate - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(metrics.snapshot()["epochs_completed"], 1);
}

#[test]
fn metrics_keep_unqueried_peers_out_of_failures() {
    let peer = PeerRecord::new("p", "addr");
    let outcomes = vec![
        PeerOutcome {
            peer: peer.clone(),
            result: Err(QueryFailure::NotDispatched),
        },
        PeerOutcome {
            peer: peer.clone(),
            result: Err(QueryFailure::Abandoned {
                after: Duration::from_millis(20),
            }),
        },
        PeerOutcome {
            peer,
            result: Ok(Response {
                payload: serde_json::json!(1),
                latency: Duration::from_millis(3),
            }),
        },
    ];

    let mut metrics = EpochMetrics::new();
    metrics.record_fanout(&outcomes);

    assert_eq!(metrics.peers_not_queried, 2);
    assert_eq!(metrics.peer_failures, 0);
    assert_eq!(metrics.peer_timeouts, 0);
    assert_eq!(metrics.peer_success_rate(), Some(1.0));
}
