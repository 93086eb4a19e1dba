//! Top-level error type for engine operations.

use sea_orm::DbErr;
use thiserror::Error;

use crate::credentials::AuthError;
use crate::gateway::GatewayError;
use crate::repository::RepositoryError;

/// Errors returned by the sync, query and reconcile operations.
///
/// Per-record failures during a sync or sweep are not errors; they are
/// collected in the operation's report.
#[derive(Debug, Error)]
pub enum StarsError {
    /// Credentials could not be resolved.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The remote service rejected or failed a call.
    #[error("Gateway error: {0}")]
    Gateway(GatewayError),

    /// The local store failed.
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),

    /// The store is healthy but nothing matched the selection.
    #[error("No stars matching criteria found")]
    NoMatch,

    /// A stored URL could not be split into owner and name.
    #[error("Invalid repository URL: {url}")]
    InvalidUrl { url: String },

    /// The remote star was removed but the local record could not be deleted.
    #[error("Unstarred {url} but failed to delete it locally: {source}")]
    Consistency {
        url: String,
        #[source]
        source: RepositoryError,
    },

    /// The operation was cancelled before it finished.
    #[error("Operation cancelled")]
    Cancelled,
}

impl StarsError {
    /// Whether this is the "nothing to show" outcome rather than a failure.
    #[inline]
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }

    /// Whether the remote and local sides may now disagree.
    #[inline]
    pub fn is_consistency_warning(&self) -> bool {
        matches!(self, Self::Consistency { .. })
    }
}

impl From<GatewayError> for StarsError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Cancelled => Self::Cancelled,
            other => Self::Gateway(other),
        }
    }
}

impl From<DbErr> for StarsError {
    fn from(err: DbErr) -> Self {
        Self::Store(RepositoryError::Database(err))
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, StarsError>;
