//! Contract test: partial target decoding
//!
//! A malformed record at position k truncates the remaining sequence but
//! the k-1 targets decoded before it are still dispatched and the run
//! still persists. Only a target source that cannot be opened at all is
//! fatal to a changed run.

mod common;

use common::*;
use ipsync_core::{Error, MemoryAddressStore, RunReport, SyncEngine};
use std::sync::Arc;

const MALFORMED_AT_THIRD: &str = r#"
    {"updateHost": "dyn.example.net", "host": "a.example.org"}
    {"updateHost": "dyn.example.net", "host": "b.example.org"}
    {"updateHost": 42, "host": false}
    {"updateHost": "dyn.example.net", "host": "never-reached.example.org"}
"#;

#[tokio::test]
async fn malformed_record_at_k_dispatches_k_minus_one_targets() {
    let store = MemoryAddressStore::new();
    let client = Arc::new(CountingUpdateClient::new());

    let engine = SyncEngine::new(
        Box::new(FixedAddressSource::new("203.0.113.9".parse().unwrap())),
        Box::new(store.clone()),
        Arc::clone(&client) as _,
        Box::new(StaticTargetSource::new(MALFORMED_AT_THIRD)),
    );

    let report = engine.run().await.unwrap();

    match report {
        RunReport::Updated { outcomes, .. } => assert_eq!(outcomes.len(), 2),
        RunReport::Unchanged { .. } => panic!("expected an updated run"),
    }

    let names: Vec<_> = client
        .dispatched()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"a.example.org".to_string()));
    assert!(names.contains(&"b.example.org".to_string()));
    assert!(!names.contains(&"never-reached.example.org".to_string()));

    // The truncated sequence does not abort the run; the address is
    // persisted after the partial fan-out.
    assert_eq!(store.current().await, Some("203.0.113.9".parse().unwrap()));
}

#[tokio::test]
async fn malformed_first_record_dispatches_nothing_but_still_persists() {
    let store = MemoryAddressStore::new();
    let client = Arc::new(CountingUpdateClient::new());

    let engine = SyncEngine::new(
        Box::new(FixedAddressSource::new("203.0.113.9".parse().unwrap())),
        Box::new(store.clone()),
        Arc::clone(&client) as _,
        Box::new(StaticTargetSource::new("not json at all")),
    );

    let report = engine.run().await.unwrap();

    assert!(matches!(report, RunReport::Updated { ref outcomes, .. } if outcomes.is_empty()));
    assert_eq!(client.call_count(), 0);
    assert_eq!(store.current().await, Some("203.0.113.9".parse().unwrap()));
}

#[tokio::test]
async fn unopenable_target_source_fails_a_changed_run() {
    let store = MemoryAddressStore::with_address("203.0.113.5".parse().unwrap());
    let client = Arc::new(CountingUpdateClient::new());

    let engine = SyncEngine::new(
        Box::new(FixedAddressSource::new("203.0.113.9".parse().unwrap())),
        Box::new(store.clone()),
        Arc::clone(&client) as _,
        Box::new(UnopenableTargetSource),
    );

    assert!(matches!(engine.run().await, Err(Error::TargetSource(_))));
    assert_eq!(client.call_count(), 0);

    // Nothing was persisted; the next run will detect the change again.
    assert_eq!(store.current().await, Some("203.0.113.5".parse().unwrap()));
}
