//! In-memory generation store
//!
//! Keeps generations in listing order behind an async lock. Useful for demos
//! and tests; supports injecting failures to exercise the error path, and an
//! opt-in log of `fetch_page` calls.

use super::types::{listing_order, Generation, GenerationStore, Visibility};
use crate::error::{Error, Result};
use crate::pagination::page_offset;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A recorded `fetch_page` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCall {
    pub page: u64,
    pub limit: usize,
    pub visibility: Visibility,
}

/// In-memory store, cheap to clone (all clones share the same data)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<Generation>>>,
    calls: Arc<RwLock<Vec<FetchCall>>>,
    record_calls: bool,
    failing: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with generations
    pub fn with_records(records: Vec<Generation>) -> Self {
        let mut records: Vec<_> = records
            .into_iter()
            .map(Generation::with_stored_precision)
            .collect();
        records.sort_by(listing_order);
        Self {
            records: Arc::new(RwLock::new(records)),
            ..Self::default()
        }
    }

    /// Record every `fetch_page` call, readable through [`Self::fetch_calls`]
    #[must_use]
    pub fn with_call_log(mut self) -> Self {
        self.record_calls = true;
        self
    }

    /// Insert generations, keeping listing order
    pub async fn insert(&self, generations: impl IntoIterator<Item = Generation>) {
        let mut records = self.records.write().await;
        records.extend(generations.into_iter().map(Generation::with_stored_precision));
        records.sort_by(listing_order);
    }

    /// Number of stored generations (all visibilities)
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// `fetch_page` calls made so far (empty unless the call log is enabled)
    pub async fn fetch_calls(&self) -> Vec<FetchCall> {
        self.calls.read().await.clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::store("memory store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl GenerationStore for MemoryStore {
    type Record = Generation;
    type Filter = Visibility;

    async fn fetch_page(
        &self,
        page: u64,
        limit: usize,
        filter: &Visibility,
    ) -> Result<Vec<Generation>> {
        if self.record_calls {
            self.calls.write().await.push(FetchCall {
                page,
                limit,
                visibility: *filter,
            });
        }
        self.check_available()?;

        let offset = usize::try_from(page_offset(page, limit)).unwrap_or(usize::MAX);
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|g| filter.includes(g.hidden))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Generation>> {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(records.iter().find(|g| g.id == id).cloned())
    }
}
