use rusqlite::Connection;
use vigil_core::errors::{StorageError, VigilError};
use vigil_core::models::{Identity, PersistedState};
use vigil_core::traits::IStateStore;
use vigil_storage::StateStore;

fn state(step: u64, scores: &[f64]) -> PersistedState {
    PersistedState {
        step,
        scores: scores.to_vec(),
        identities: (0..scores.len())
            .map(|i| Identity::new(format!("peer-{i}")))
            .collect(),
    }
}

#[test]
fn empty_store_loads_none() {
    let store = StateStore::open_in_memory().unwrap();
    assert_eq!(store.load().unwrap(), None);
    assert_eq!(store.last_saved_at().unwrap(), None);
}

#[test]
fn save_then_load_is_exact() {
    let store = StateStore::open_in_memory().unwrap();
    let saved = state(2, &[0.36, 0.0, 0.2, 0.1 + 0.2]);
    store.save(&saved).unwrap();
    assert_eq!(store.load().unwrap(), Some(saved));
    assert!(store.last_saved_at().unwrap().is_some());
}

#[test]
fn scores_near_a_decimal_boundary_load_unchanged() {
    let store = StateStore::open_in_memory().unwrap();
    let scores = [
        0.09965501712941585,
        f64::MIN_POSITIVE,
        5e-324,
        f64::MAX,
        -0.0,
        1.0 - f64::EPSILON,
    ];
    store.save(&state(1, &scores)).unwrap();
    let loaded = store.load().unwrap().unwrap();
    for (got, want) in loaded.scores.iter().zip(scores) {
        assert_eq!(got.to_bits(), want.to_bits(), "{got:e} != {want:e}");
    }
}

#[test]
fn second_save_replaces_first() {
    let store = StateStore::open_in_memory().unwrap();
    store.save(&state(1, &[0.5])).unwrap();
    store.save(&state(2, &[0.25, 0.75])).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.step, 2);
    assert_eq!(loaded.scores, vec![0.25, 0.75]);
}

#[test]
fn rejected_save_keeps_previous_copy() {
    let store = StateStore::open_in_memory().unwrap();
    store.save(&state(1, &[0.5])).unwrap();

    let mut bad = state(2, &[0.5, 0.5]);
    bad.scores.pop();
    assert!(store.save(&bad).is_err());
    assert!(store.save(&state(3, &[f64::NAN])).is_err());

    assert_eq!(store.load().unwrap(), Some(state(1, &[0.5])));
}

#[test]
fn clear_forgets_state() {
    let store = StateStore::open_in_memory().unwrap();
    store.save(&state(1, &[0.5])).unwrap();
    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn reopen_file_restores_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.db");

    {
        let store = StateStore::open(&path).unwrap();
        assert!(store.is_wal().unwrap());
        store.save(&state(7, &[0.1, 0.9])).unwrap();
    }

    let store = StateStore::open(&path).unwrap();
    assert_eq!(store.schema_version().unwrap(), 1);
    assert!(store.check_integrity().unwrap());
    assert_eq!(store.load().unwrap(), Some(state(7, &[0.1, 0.9])));
}

#[test]
fn mangled_row_reports_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.db");
    {
        let store = StateStore::open(&path).unwrap();
        store.save(&state(1, &[0.5, 0.5])).unwrap();
    }
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "UPDATE validator_state SET identities = '[\"only-one\"]' WHERE id = 1",
            [],
        )
        .unwrap();
    }

    let store = StateStore::open(&path).unwrap();
    let err = store.load().unwrap_err();
    assert!(matches!(
        err,
        VigilError::StorageError(StorageError::CorruptState { .. })
    ));
}

#[test]
fn unparseable_scores_report_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.db");
    {
        let store = StateStore::open(&path).unwrap();
        store.save(&state(1, &[0.5])).unwrap();
    }
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute("UPDATE validator_state SET scores = 'not json'", [])
            .unwrap();
    }

    let store = StateStore::open(&path).unwrap();
    assert!(store.load().is_err());
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    fn finite_f64() -> impl Strategy<Value = f64> {
        any::<u64>()
            .prop_map(f64::from_bits)
            .prop_filter("finite", |v| v.is_finite())
    }

    proptest! {
        #[test]
        fn finite_scores_survive_storage_bit_for_bit(
            step in 0u64..(i64::MAX as u64),
            scores in proptest::collection::vec(finite_f64(), 0..64),
        ) {
            let store = StateStore::open_in_memory().unwrap();
            store.save(&state(step, &scores)).unwrap();
            let loaded = store.load().unwrap().unwrap();
            prop_assert_eq!(loaded.step, step);
            let bits = |v: &[f64]| v.iter().map(|s| s.to_bits()).collect::<Vec<_>>();
            prop_assert_eq!(bits(&loaded.scores), bits(&scores));
        }
    }
}
