//! Sync types and constants.

use serde::Serialize;

use crate::gateway::PageMeta;

/// Page size requested from the remote service (its maximum).
pub const PAGE_SIZE: u32 = 100;

/// Default number of concurrent page fetches or removals.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default age threshold for cleanup sweeps, in months.
pub const DEFAULT_CLEANUP_AGE_MONTHS: u32 = 12;

/// Options for a full sync.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Maximum concurrent page fetches after page 1.
    pub concurrency: usize,
    /// Page size to request.
    pub per_page: u32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            per_page: PAGE_SIZE,
        }
    }
}

/// A record that was fetched but could not be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// URL of the record (may be empty if the remote omitted it).
    pub url: String,
    /// Error message.
    pub error: String,
}

/// A page that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    /// Page number (1-based).
    pub page: u32,
    /// Error message.
    pub error: String,
}

/// Outcome of fetching and saving a single page.
#[derive(Debug, Clone)]
pub struct PageReport {
    /// Page number (1-based).
    pub page: u32,
    /// Pagination details reported with the page.
    pub meta: PageMeta,
    /// Records on the page.
    pub fetched: usize,
    /// Records saved.
    pub saved: usize,
    /// Records that failed to save.
    pub failures: Vec<RecordFailure>,
}

/// Aggregate outcome of a full sync.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Number of pages the remote reported.
    pub pages: u32,
    /// Records received across all fetched pages.
    pub fetched: usize,
    /// Records saved.
    pub saved: usize,
    /// Records that failed to save.
    pub failures: Vec<RecordFailure>,
    /// Pages after the first that could not be fetched.
    pub failed_pages: Vec<PageFailure>,
    /// Whether the sync stopped early because it was cancelled.
    pub cancelled: bool,
}

impl SyncReport {
    /// Fold a page outcome into the aggregate.
    pub fn absorb(&mut self, page: PageReport) {
        self.fetched += page.fetched;
        self.saved += page.saved;
        self.failures.extend(page.failures);
    }

    /// Whether every page was fetched and every record saved.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.failed_pages.is_empty() && !self.cancelled
    }
}
