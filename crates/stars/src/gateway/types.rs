use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::Result;

/// A starred repository as reported by the remote service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteRepo {
    /// HTML URL of the repository. Becomes the local key.
    pub url: String,
    /// Primary language, as reported (any case).
    pub language: Option<String>,
    /// Repository description.
    pub description: Option<String>,
    /// Stargazer count.
    pub stargazers: u32,
    /// Whether the repository is archived.
    pub archived: bool,
    /// When code was last pushed.
    pub pushed_at: Option<DateTime<Utc>>,
    /// When the repository was last updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// When the repository was created.
    pub created_at: Option<DateTime<Utc>>,
    /// Repository topics.
    pub topics: Vec<String>,
}

/// Pagination details for one page of the starred list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    /// Index of the last page (1-based). Equals the current page when the
    /// response is itself the last page.
    pub last_page: u32,
}

impl PageMeta {
    /// Metadata for a single-page collection.
    pub fn single() -> Self {
        Self { last_page: 1 }
    }
}

/// One page of starred repositories.
#[derive(Debug, Clone)]
pub struct StarredPage {
    /// Repositories on this page, in remote order.
    pub repos: Vec<RemoteRepo>,
    /// Pagination details.
    pub meta: PageMeta,
}

/// Abstraction over the remote star service.
///
/// Implementations must be cheap to share across tasks; the sync engine
/// calls `list_starred` concurrently for different pages and the reconciler
/// calls `unstar` concurrently for different repositories.
///
/// Implementations should not retry internally and should map their own
/// failures onto [`GatewayError`](super::GatewayError).
#[async_trait]
pub trait StarGateway: Send + Sync {
    /// List one page of `username`'s starred repositories.
    ///
    /// `page` is 1-based.
    async fn list_starred(&self, username: &str, page: u32, per_page: u32)
    -> Result<StarredPage>;

    /// Remove the authenticated user's star from `owner/name`.
    async fn unstar(&self, owner: &str, name: &str) -> Result<()>;
}
