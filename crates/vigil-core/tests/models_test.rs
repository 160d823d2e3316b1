use vigil_core::errors::{LedgerError, RegistrationError, VigilError};
use vigil_core::models::{Identity, PeerRecord, PersistedState, RewardBatch, RosterSnapshot};
use vigil_core::WeightSubmission;

fn peer(id: &str) -> PeerRecord {
    PeerRecord::new(id, format!("10.0.0.1:{}", id.len()))
}

#[test]
fn snapshot_rederives_ordinals_from_position() {
    let mut stale = peer("b");
    stale.ordinal = 42;
    let snapshot = RosterSnapshot::new(7, vec![peer("a"), stale, peer("c")]);

    let ordinals: Vec<usize> = snapshot.peers().iter().map(|p| p.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);
    assert_eq!(snapshot.height(), 7);
    assert_eq!(snapshot.ordinal_of(&Identity::from("c")), Some(2));
    assert!(!snapshot.contains(&Identity::from("z")));
}

#[test]
fn identity_table_follows_roster_order() {
    let snapshot = RosterSnapshot::new(1, vec![peer("x"), peer("y")]);
    let table = snapshot.identity_table();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(1), Some(&Identity::from("y")));
    assert_eq!(table.get(2), None);
}

#[test]
fn reward_batch_keeps_bindings() {
    let mut batch = RewardBatch::from_pairs([(0, 1.0), (3, f64::NAN)]);
    batch.push_bound(2, Identity::from("p2"), 0.5);
    assert_eq!(batch.len(), 3);
    assert!(batch.entries()[0].identity.is_none());
    assert_eq!(batch.entries()[2].identity, Some(Identity::from("p2")));
    assert!(batch.entries()[1].reward.is_nan());
}

#[test]
fn submission_rejects_mismatched_lengths() {
    assert!(WeightSubmission::new(vec![0, 1], vec![10], 5, 1).is_err());
    let ok = WeightSubmission::new(vec![0, 1], vec![10, 20], 5, 1).unwrap();
    assert_eq!(ok.len(), 2);
    assert_eq!(ok.height(), 5);
}

#[test]
fn persisted_state_consistency() {
    let state = PersistedState {
        step: 3,
        scores: vec![0.1, 0.2],
        identities: vec![Identity::from("a"), Identity::from("b")].into_iter().collect(),
    };
    assert!(state.is_consistent());

    let broken = PersistedState {
        scores: vec![0.1],
        ..state
    };
    assert!(!broken.is_consistent());
}

#[test]
fn error_taxonomy_classification() {
    let fatal: VigilError = RegistrationError::NotRegistered {
        identity: "hk".to_string(),
    }
    .into();
    assert!(fatal.is_fatal());
    assert!(!fatal.is_transient());

    let transient: VigilError = LedgerError::Unavailable {
        reason: "rpc down".to_string(),
    }
    .into();
    assert!(!transient.is_fatal());
    assert!(transient.is_transient());
}
