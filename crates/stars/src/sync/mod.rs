//! Sync engine: paged fetch from the gateway into the local store.
//!
//! - `types` - `SyncOptions`, reports, constants
//! - `progress` - `SyncProgress`, `ProgressCallback`, `emit()`
//! - `fetch` - single-page fetch and normalization
//! - [`engine`] - `sync_all()`, `sync_if_empty()`

mod cancel;
pub mod engine;
mod fetch;
mod progress;
mod types;

pub(crate) use cancel::or_cancel;

pub use engine::{sync_all, sync_if_empty};
pub use fetch::{fetch_page, save_repos};
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{
    DEFAULT_CLEANUP_AGE_MONTHS, DEFAULT_CONCURRENCY, PAGE_SIZE, PageFailure, PageReport,
    RecordFailure, SyncOptions, SyncReport,
};
