//! Property-based and scenario tests for the chainproof engine
//!
//! These verify the chain's integrity invariants under random inputs and
//! walk the demonstration scenarios end to end through the controller.

use proptest::prelude::*;
use serde_json::json;

use chainproof::chain::{Chain, ChainError};
use chainproof::controller::{ChainEvent, Controller};
use chainproof::crypto::{canonical_json, sha256_hex, sha256_hex_value};
use chainproof::model::Block;

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

proptest! {
    /// Every sequence of appends leaves the chain valid and fully linked.
    #[test]
    fn prop_appends_keep_chain_valid(
        amounts in proptest::collection::vec(1u32..1_000_000u32, 1..12)
    ) {
        let mut chain = Chain::new();
        for (i, amount) in amounts.iter().enumerate() {
            let idx = chain.append(json!({"seq": i, "amount": amount})).unwrap();
            prop_assert_eq!(idx as usize, i + 1);
            prop_assert!(chain.verify().is_ok());
        }

        let records = chain.records();
        for i in 1..records.len() {
            prop_assert_eq!(&records[i]["previous_hash"], &records[i - 1]["hash"]);
        }
    }

    /// Hashing is deterministic and insertion-order independent for
    /// structurally equal objects.
    #[test]
    fn prop_hash_ignores_key_order(
        a in 0u64..u64::MAX,
        b in "[a-z]{0,16}",
    ) {
        let forward = json!({"alpha": a, "beta": &b});
        let backward = json!({"beta": &b, "alpha": a});
        prop_assert_eq!(sha256_hex_value(&forward), sha256_hex_value(&backward));
    }

    /// Distinct pre-images yield distinct digests (no accidental collisions
    /// over simple inputs).
    #[test]
    fn prop_distinct_strings_distinct_hashes(s in "[a-z]{1,32}") {
        let other = format!("{s}x");
        prop_assert_ne!(sha256_hex(&s), sha256_hex(&other));
    }

    /// Record round-trip preserves every block exactly, valid or corrupted.
    #[test]
    fn prop_record_roundtrip_exact(
        payload_key in "[a-z]{1,8}",
        payload_val in 0u64..u64::MAX,
        corrupt in any::<bool>(),
    ) {
        let mut block = Block::new(7, json!({"key": payload_key, "value": payload_val}), "parent");
        if corrupt {
            block.corrupt_payload(json!({"tampered": true}));
        }

        let restored = Block::from_record(&block.to_record()).unwrap();
        prop_assert_eq!(&restored, &block);
        prop_assert_eq!(restored.self_validate(), !corrupt);
    }

    /// Corrupting any single block is detected at exactly that block,
    /// and every other block stays internally self-valid.
    #[test]
    fn prop_corruption_detected_at_index(
        extra_blocks in 1usize..8,
        victim_seed in any::<u64>(),
    ) {
        let mut chain = Chain::new();
        for i in 0..extra_blocks {
            chain.append(json!({"n": i})).unwrap();
        }

        let victim = victim_seed % chain.len() as u64;
        let corrupted = chain.corrupt_block(victim, json!({"evil": true}));
        prop_assert!(corrupted);

        match chain.verify() {
            Err(ChainError::HashMismatch { index }) => prop_assert_eq!(index, victim),
            other => prop_assert!(false, "expected hash mismatch, got {:?}", other),
        }

        for i in 0..chain.len() as u64 {
            let block = chain.get(i).unwrap();
            prop_assert_eq!(block.self_validate(), i != victim);
        }
    }

    /// Search finds exactly the blocks whose payload carries the needle,
    /// regardless of query case.
    #[test]
    fn prop_search_case_insensitive(tag in "[A-Za-z]{3,10}") {
        let mut chain = Chain::new();
        chain.append(json!({"who": format!("user-{tag}")})).unwrap();
        chain.append(json!({"who": "nobody"})).unwrap();

        let hits = chain.search(&tag.to_lowercase());
        prop_assert!(hits.iter().any(|b| b.index() == 1));
        prop_assert!(hits
            .iter()
            .all(|b| canonical_json(b.payload())
                .to_lowercase()
                .contains(&tag.to_lowercase())));
    }
}

// ============================================================================
// SCENARIO TESTS
// ============================================================================

/// The full demonstration walk: fresh chain, one transaction, a simulated
/// attack, detection, reset.
#[test]
fn test_demo_walkthrough() {
    let mut controller = Controller::new(Chain::new());

    // Fresh chain: genesis only.
    let records = controller.get_chain();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["index"], 0);
    assert_eq!(records[0]["previous_hash"], "0");

    // One transaction appends one linked block.
    controller
        .submit_transaction("Alice", "Bob", 10.0, "test")
        .unwrap();
    let records = controller.get_chain();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["previous_hash"], records[0]["hash"]);
    assert!(controller.validate().0);

    // Tamper with block 1; detection names it.
    controller.simulate_attack(1).unwrap();
    let (ok, message) = controller.validate();
    assert!(!ok);
    assert!(message.contains('1'));

    // Reset restores a single, different genesis.
    let old_genesis_hash = records[0]["hash"].clone();
    controller.reset().unwrap();
    let records = controller.get_chain();
    assert_eq!(records.len(), 1);
    assert_ne!(records[0]["hash"], old_genesis_hash);
    assert!(controller.validate().0);
}

/// Zero-amount boundary: rejected with an amount-related message, nothing
/// appended.
#[test]
fn test_zero_amount_boundary() {
    let mut controller = Controller::new(Chain::new());
    let before = controller.stats().count;

    let err = controller
        .submit_transaction("Alice", "Bob", 0.0, "")
        .unwrap_err();

    assert!(err.to_string().contains("amount"));
    assert_eq!(controller.stats().count, before);
}

/// Validation without mutation reports the same result every time.
#[test]
fn test_validate_idempotent() {
    let mut controller = Controller::new(Chain::new());
    controller
        .submit_transaction("Alice", "Bob", 3.0, "")
        .unwrap();

    let first = controller.validate();
    for _ in 0..5 {
        assert_eq!(controller.validate(), first.clone());
    }

    controller.simulate_attack(0).unwrap();
    let broken = controller.validate();
    assert!(!broken.0);
    for _ in 0..5 {
        assert_eq!(controller.validate(), broken.clone());
    }
}

/// Export/import round-trip through a real file, stale hash included.
#[test]
fn test_file_roundtrip_including_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");

    let mut source = Controller::new(Chain::new());
    source
        .submit_transaction("Alice", "Bob", 10.0, "coffee")
        .unwrap();
    source
        .submit_transaction("Bob", "Carol", 4.0, "lunch")
        .unwrap();
    source.simulate_attack(2).unwrap();
    source.export(&path).unwrap();

    let mut restored = Controller::new(Chain::new());
    restored.import(&path).unwrap();

    assert_eq!(restored.get_chain(), source.get_chain());
    let (ok, message) = restored.validate();
    assert!(!ok);
    assert!(message.contains('2'));
}

/// Stats reflect the chain as it grows and as it breaks.
#[test]
fn test_stats_track_state() {
    let mut controller = Controller::new(Chain::new());

    let s0 = controller.stats();
    assert_eq!(s0.count, 1);
    assert_eq!(s0.mean_interval_seconds, 0.0);
    assert!(s0.is_valid);

    controller
        .submit_transaction("Alice", "Bob", 1.0, "")
        .unwrap();
    let s1 = controller.stats();
    assert_eq!(s1.count, 2);
    assert!(s1.size_bytes > s0.size_bytes);
    assert!(s1.is_valid);

    controller.simulate_attack(1).unwrap();
    assert!(!controller.stats().is_valid);
}

/// Observer fan-out covers every mutating operation, including import.
#[test]
fn test_observer_sees_every_mutation() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.json");

    let mut controller = Controller::new(Chain::new());
    controller
        .submit_transaction("Alice", "Bob", 2.0, "")
        .unwrap();
    controller.export(&path).unwrap();

    let events = Rc::new(RefCell::new(Vec::new()));
    {
        let events = Rc::clone(&events);
        controller.register_observer(Box::new(move |e| {
            events.borrow_mut().push(e.clone());
            Ok(())
        }));
    }

    controller.submit_raw_block(json!({"raw": true})).unwrap();
    controller.simulate_attack(0).unwrap();
    controller.import(&path).unwrap();
    controller.reset().unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            ChainEvent::BlockAppended { index: 2 },
            ChainEvent::BlockCorrupted { index: 0 },
            ChainEvent::Imported { blocks: 2 },
            ChainEvent::Reset,
        ]
    );
}
