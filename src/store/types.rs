//! Store types and traits
//!
//! Defines the generation record, the visibility filter, and the
//! `GenerationStore` trait every backing store implements.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Store Trait
// ============================================================================

/// A read-side record store that serves pages of a listing.
///
/// A failed fetch is an `Err`. `Ok(vec![])` always means the page is
/// legitimately empty.
#[async_trait]
pub trait GenerationStore: Send + Sync + 'static {
    /// Record type returned by this store
    type Record: Send + Sync + 'static;

    /// Filter token, passed through the pager unmodified
    type Filter: Send + Sync + 'static;

    /// Fetch up to `limit` records belonging to `page` (1-indexed).
    ///
    /// The store decides how `page` maps to an offset. See
    /// [`crate::pagination::page_offset`] for the mapping the bundled stores use.
    async fn fetch_page(
        &self,
        page: u64,
        limit: usize,
        filter: &Self::Filter,
    ) -> Result<Vec<Self::Record>>;

    /// Look up a single record by id
    async fn get(&self, id: &str) -> Result<Option<Self::Record>>;
}

// ============================================================================
// Visibility
// ============================================================================

/// Which generations a listing includes, based on their `hidden` flag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// Only generations that are not hidden
    #[default]
    VisibleOnly,
    /// Only hidden generations
    HiddenOnly,
    /// Everything
    All,
}

impl Visibility {
    /// Whether a record with the given `hidden` flag passes this filter
    pub fn includes(self, hidden: bool) -> bool {
        match self {
            Visibility::VisibleOnly => !hidden,
            Visibility::HiddenOnly => hidden,
            Visibility::All => true,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Visibility::VisibleOnly => "visible-only",
            Visibility::HiddenOnly => "hidden-only",
            Visibility::All => "all",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Generation Record
// ============================================================================

/// A text reference (prompt or negative prompt)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRef {
    pub id: String,
    pub text: String,
}

/// A named reference (model or scheduler)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

/// A single gallery generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Unique generation id
    pub id: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Prompt used for the generation
    pub prompt: TextRef,
    /// Optional negative prompt
    #[serde(default)]
    pub negative_prompt: Option<TextRef>,
    /// Model used
    pub model: NamedRef,
    /// Scheduler used
    pub scheduler: NamedRef,
    /// Sampling seed
    pub seed: i64,
    /// Number of inference steps
    pub inference_steps: u32,
    /// Classifier-free guidance scale
    pub guidance_scale: f64,
    /// Id of the stored image
    pub image_id: String,
    /// Creation time, used for listing order
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Hidden generations are excluded from the default listing
    #[serde(default, skip_serializing)]
    pub hidden: bool,
}

/// Sub-second digits kept on stored timestamps (DuckDB `TIMESTAMP` precision)
const TIMESTAMP_PRECISION: u16 = 6;

impl Generation {
    /// Truncate both timestamps to microseconds, the precision every store keeps
    #[must_use]
    pub fn with_stored_precision(mut self) -> Self {
        self.created_at = self.created_at.trunc_subsecs(TIMESTAMP_PRECISION);
        self.updated_at = self.updated_at.trunc_subsecs(TIMESTAMP_PRECISION);
        self
    }
}

/// Listing order shared by all bundled stores: newest first, ties broken by id
pub(crate) fn listing_order(a: &Generation, b: &Generation) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}
