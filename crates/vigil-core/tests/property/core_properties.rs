use proptest::prelude::*;
use vigil_core::config::VigilConfig;
use vigil_core::models::{Identity, PeerRecord, RosterSnapshot};

fn arb_peer() -> impl Strategy<Value = PeerRecord> {
    ("[a-z]{1,6}", any::<usize>(), any::<bool>()).prop_map(|(id, ordinal, serving)| PeerRecord {
        ordinal,
        serving,
        ..PeerRecord::new(id, "127.0.0.1:9000")
    })
}

fn configured() -> VigilConfig {
    VigilConfig {
        identity: "validator".to_string(),
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn snapshot_ordinals_follow_position(
        height in any::<u64>(),
        peers in prop::collection::vec(arb_peer(), 0..32),
    ) {
        let snapshot = RosterSnapshot::new(height, peers.clone());
        prop_assert_eq!(snapshot.len(), peers.len());
        prop_assert_eq!(snapshot.identity_table().len(), peers.len());
        for (i, peer) in snapshot.peers().iter().enumerate() {
            prop_assert_eq!(peer.ordinal, i);
            prop_assert_eq!(&peer.identity, &peers[i].identity);
            prop_assert_eq!(snapshot.get(i), Some(peer));
        }
    }

    #[test]
    fn ordinal_of_finds_first_occurrence(
        ids in prop::collection::vec("[a-c]{1,2}", 1..16),
    ) {
        let peers = ids.iter().map(|id| PeerRecord::new(id.as_str(), "addr")).collect();
        let snapshot = RosterSnapshot::new(1, peers);
        for id in &ids {
            let identity = Identity::from(id.as_str());
            let expected = ids.iter().position(|other| other == id);
            prop_assert_eq!(snapshot.ordinal_of(&identity), expected);
        }
        prop_assert!(!snapshot.contains(&Identity::from("zz-absent")));
    }

    #[test]
    fn positive_epoch_length_override_validates(epoch_length in 1u64..=u64::MAX) {
        let mut config = configured();
        config
            .apply_overrides([(
                "VIGIL_EPOCH_LENGTH".to_string(),
                epoch_length.to_string(),
            )])
            .unwrap();
        prop_assert_eq!(config.runloop.epoch_length, epoch_length);
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn alpha_outside_unit_interval_is_rejected(alpha in prop_oneof![
        -10.0f64..=0.0,
        1.0f64 + 1e-9..10.0,
    ]) {
        let mut config = configured();
        config
            .apply_overrides([("VIGIL_ALPHA".to_string(), alpha.to_string())])
            .unwrap();
        prop_assert!(config.validate().is_err());
    }
}
