//! Stars - a local mirror of a user's starred GitHub repositories.
//!
//! This library keeps a SQLite (or Postgres) copy of the starred list in
//! sync with the remote account, answers queries over it, and removes stars
//! on both sides.
//!
//! # Features
//!
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to bring the schema up to date on connection.
//! - `github` - The octocrab/reqwest implementation of [`StarGateway`].
//!
//! # Example
//!
//! ```ignore
//! use stars::{StarManager, connect_and_migrate, github::GitHubClient};
//!
//! let db = connect_and_migrate("sqlite:///home/me/.cache/stars.db?mode=rwc").await?;
//! let client = GitHubClient::new(&token)?;
//! let manager = StarManager::new(db, client, "octocat");
//!
//! let report = manager.sync_all().await?;
//! println!("saved {} stars, {} failures", report.saved, report.failures.len());
//! ```

pub mod bootstrap;
pub mod credentials;
pub mod db;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod query;
pub mod reconcile;
pub mod repository;
pub mod sync;

#[cfg(feature = "github")]
pub mod github;

#[cfg(feature = "migrate")]
pub mod migration;

pub use credentials::{
    AuthError, ChainedCredentials, CredentialProvider, Credentials, NetrcCredentials,
    StaticCredentials,
};
pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use error::{Result, StarsError};
pub use gateway::{GatewayError, PageMeta, RemoteRepo, StarGateway, StarredPage};
pub use manager::StarManager;
pub use query::{SelectOptions, TopicFrequency};
pub use reconcile::{CleanupOptions, CleanupReport, RemovalFailure};
pub use repository::{Match, RepositoryError, StarFilter};
pub use sync::{ProgressCallback, SyncOptions, SyncProgress, SyncReport};
