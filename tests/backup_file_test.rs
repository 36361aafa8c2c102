//! Integration tests for backup files

use chrono::Utc;
use jamf_batch::core::snapshot::{
    read_backup, verify_backup, FileSnapshotStore, SnapshotRecord, SnapshotStore,
};
use jamf_batch::domain::{ResourceDetail, ResourceId, ResourceKind, ResourceRef};
use serde_json::json;
use std::sync::Arc;

fn record(id: u64) -> SnapshotRecord {
    let detail = ResourceDetail::new(
        ResourceRef::new(ResourceId::new(id).unwrap(), ResourceKind::App),
        json!({"mobile_device_application": {
            "general": {"id": id, "name": format!("App {id}"), "bundle_id": "com.example.app"},
            "scope": {"all_mobile_devices": true}
        }}),
    )
    .unwrap();
    SnapshotRecord::capture(&detail).unwrap()
}

#[tokio::test]
async fn test_persisted_records_read_back_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::create(dir.path(), Utc::now()).await.unwrap();

    let first = store.persist(&record(101)).await.unwrap();
    let second = store.persist(&record(102)).await.unwrap();
    assert_eq!(first.sequence, 1);
    assert_eq!(second.sequence, 2);

    let records = read_backup(store.path()).await.unwrap();
    assert_eq!(records, vec![record_like(&records[0], 101), record_like(&records[1], 102)]);
    assert!(store
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .ends_with(".backup"));
}

// captured_at differs between captures; compare everything else
fn record_like(read: &SnapshotRecord, id: u64) -> SnapshotRecord {
    SnapshotRecord {
        captured_at: read.captured_at,
        ..record(id)
    }
}

#[tokio::test]
async fn test_verify_detects_tampered_and_broken_lines() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::create(dir.path(), Utc::now()).await.unwrap();
    for id in [1, 2, 3] {
        store.persist(&record(id)).await.unwrap();
    }

    let contents = std::fs::read_to_string(store.path()).unwrap();
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    lines[1] = lines[1].replace("App 2", "App two");
    lines.push("{not json".to_string());
    std::fs::write(store.path(), lines.join("\n") + "\n").unwrap();

    let verification = verify_backup(store.path()).await.unwrap();
    assert_eq!(verification.total, 4);
    assert_eq!(verification.valid, 2);
    assert!(!verification.is_success());

    assert_eq!(verification.failures[0].line, 2);
    assert_eq!(verification.failures[0].resource.map(|r| r.id.get()), Some(2));
    assert_eq!(verification.failures[0].reason, "checksum mismatch");
    assert_eq!(verification.failures[1].line, 4);
    assert!(verification.failures[1].resource.is_none());
}

#[tokio::test]
async fn test_concurrent_persists_keep_lines_intact() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileSnapshotStore::create(dir.path(), Utc::now()).await.unwrap());

    let handles: Vec<_> = (1..=32)
        .map(|id| {
            let store = store.clone();
            tokio::spawn(async move { store.persist(&record(id)).await })
        })
        .collect();

    let mut sequences = Vec::new();
    for handle in handles {
        sequences.push(handle.await.unwrap().unwrap().sequence);
    }
    sequences.sort_unstable();
    assert_eq!(sequences, (1..=32).collect::<Vec<u64>>());

    let verification = verify_backup(store.path()).await.unwrap();
    assert_eq!(verification.total, 32);
    assert!(verification.is_success());

    let mut ids: Vec<u64> = read_backup(store.path())
        .await
        .unwrap()
        .iter()
        .map(|r| r.resource.id.get())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=32).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_verify_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(verify_backup(dir.path().join("missing.backup")).await.is_err());
}
