//! Tests for the in-memory store

use super::fixtures::{generation, generations, hidden_generation};
use super::*;
use crate::error::Error;
use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

fn ids(records: &[Generation]) -> Vec<String> {
    records.iter().map(|g| g.id.clone()).collect()
}

// ============================================================================
// Ordering and Windows
// ============================================================================

#[tokio::test]
async fn test_memory_store_orders_newest_first() {
    let store = MemoryStore::with_records(generations(3));
    let page = store
        .fetch_page(1, 10, &Visibility::VisibleOnly)
        .await
        .unwrap();
    assert_eq!(ids(&page), vec!["gen-0002", "gen-0001", "gen-0000"]);
}

#[tokio::test]
async fn test_memory_store_page_windows_overlap_by_lookahead() {
    // limit 3 = two records per page plus one lookahead
    let store = MemoryStore::with_records(generations(5));

    let first = store.fetch_page(1, 3, &Visibility::All).await.unwrap();
    assert_eq!(ids(&first), vec!["gen-0004", "gen-0003", "gen-0002"]);

    let second = store.fetch_page(2, 3, &Visibility::All).await.unwrap();
    assert_eq!(ids(&second), vec!["gen-0002", "gen-0001", "gen-0000"]);

    let third = store.fetch_page(3, 3, &Visibility::All).await.unwrap();
    assert_eq!(ids(&third), vec!["gen-0000"]);
}

#[tokio::test]
async fn test_memory_store_page_past_end_is_empty() {
    let store = MemoryStore::with_records(generations(5));
    let page = store.fetch_page(u64::MAX, 51, &Visibility::All).await.unwrap();
    assert!(page.is_empty());
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_memory_store_visibility_filter() {
    let store = MemoryStore::with_records(vec![
        generation(0),
        hidden_generation(1),
        generation(2),
    ]);

    let visible = store
        .fetch_page(1, 10, &Visibility::VisibleOnly)
        .await
        .unwrap();
    assert_eq!(ids(&visible), vec!["gen-0002", "gen-0000"]);

    let hidden = store
        .fetch_page(1, 10, &Visibility::HiddenOnly)
        .await
        .unwrap();
    assert_eq!(ids(&hidden), vec!["gen-0001"]);

    let all = store.fetch_page(1, 10, &Visibility::All).await.unwrap();
    assert_eq!(all.len(), 3);
}

// ============================================================================
// Lookup, Insert, Failure
// ============================================================================

#[tokio::test]
async fn test_memory_store_get() {
    let store = MemoryStore::with_records(generations(3));
    let found = store.get("gen-0001").await.unwrap();
    assert_eq!(found.map(|g| g.seed), Some(1001));
    assert!(store.get("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_memory_store_insert_keeps_order() {
    let store = MemoryStore::new();
    assert!(store.is_empty().await);

    store.insert(vec![generation(1), generation(5)]).await;
    store.insert(vec![generation(3)]).await;
    assert_eq!(store.len().await, 3);

    let page = store.fetch_page(1, 10, &Visibility::All).await.unwrap();
    assert_eq!(ids(&page), vec!["gen-0005", "gen-0003", "gen-0001"]);
}

#[tokio::test]
async fn test_memory_store_failure_is_an_error_not_empty() {
    let store = MemoryStore::with_records(generations(3));
    store.set_failing(true);

    let err = store
        .fetch_page(1, 10, &Visibility::VisibleOnly)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Store { .. }));
    assert!(store.get("gen-0001").await.is_err());

    store.set_failing(false);
    assert_eq!(
        store
            .fetch_page(1, 10, &Visibility::VisibleOnly)
            .await
            .unwrap()
            .len(),
        3
    );
}

#[tokio::test]
async fn test_memory_store_records_calls() {
    let store = MemoryStore::new().with_call_log();
    store.fetch_page(4, 51, &Visibility::All).await.unwrap();

    assert_eq!(
        store.fetch_calls().await,
        vec![FetchCall {
            page: 4,
            limit: 51,
            visibility: Visibility::All,
        }]
    );
}

#[tokio::test]
async fn test_memory_store_call_log_off_by_default() {
    let store = MemoryStore::with_records(generations(3));
    for page in 1..=100 {
        store.fetch_page(page, 51, &Visibility::All).await.unwrap();
    }

    assert!(store.fetch_calls().await.is_empty());
}

#[tokio::test]
async fn test_memory_store_keeps_microsecond_timestamps() {
    let mut record = generation(1);
    record.created_at = Utc.with_ymd_and_hms(2023, 5, 6, 7, 8, 9).unwrap()
        + Duration::nanoseconds(123_456_789);
    let store = MemoryStore::with_records(vec![record.clone()]);

    let mut inserted = generation(2);
    inserted.updated_at = record.created_at;
    store.insert([inserted]).await;

    let expected = Utc.with_ymd_and_hms(2023, 5, 6, 7, 8, 9).unwrap()
        + Duration::microseconds(123_456);
    let stored = store.get("gen-0001").await.unwrap().unwrap();
    assert_eq!(stored.created_at, expected);
    assert_eq!(stored, record.with_stored_precision());
    let stored = store.get("gen-0002").await.unwrap().unwrap();
    assert_eq!(stored.updated_at, expected);
}
