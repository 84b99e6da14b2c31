//! Paginated randomized fetcher
//!
//! Asks the store for one page plus one lookahead record, decides whether a
//! next page exists from that single call, then shuffles what it keeps.

use super::types::{
    split_overfetch, PageRequest, PageResponse, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use crate::error::Result;
use crate::store::GenerationStore;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::Arc;

/// Serves pages of a store's listing in randomized order
pub struct PageFetcher<S> {
    store: Arc<S>,
    page_size: usize,
}

impl<S> Clone for PageFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            page_size: self.page_size,
        }
    }
}

impl<S> fmt::Debug for PageFetcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageFetcher")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl<S: GenerationStore> PageFetcher<S> {
    /// Create a fetcher with the default page size
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Create a fetcher over a shared store
    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the page size, clamped to `1..=MAX_PAGE_SIZE`
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Records per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch one page, shuffled with a freshly seeded generator
    pub async fn fetch(
        &self,
        request: PageRequest,
        filter: &S::Filter,
    ) -> Result<PageResponse<S::Record>> {
        let mut rng = StdRng::from_entropy();
        self.fetch_with_rng(request, filter, &mut rng).await
    }

    /// Fetch one page, shuffled with the given generator
    pub async fn fetch_with_rng<R>(
        &self,
        request: PageRequest,
        filter: &S::Filter,
        rng: &mut R,
    ) -> Result<PageResponse<S::Record>>
    where
        R: Rng + Send + ?Sized,
    {
        let page = request.page;
        let limit = self.page_size.saturating_add(1);

        let fetched = self.store.fetch_page(page, limit, filter).await?;
        let fetched_count = fetched.len();

        let (mut generations, next) = split_overfetch(fetched, page, self.page_size);
        generations.shuffle(rng);

        tracing::debug!(
            page,
            limit,
            fetched = fetched_count,
            kept = generations.len(),
            next = ?next,
            "Assembled gallery page"
        );

        Ok(PageResponse {
            generations,
            page,
            next,
        })
    }
}
