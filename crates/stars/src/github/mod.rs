//! GitHub implementation of the star gateway.
//!
//! - `error` - Error types for GitHub API operations
//! - `client` - Client creation, page listing and unstarring
//! - `convert` - Conversion from octocrab models to gateway types

mod client;
mod convert;
mod error;

pub use client::{
    DEFAULT_API_BASE, DEFAULT_API_HOST, GitHubClient, LinkPagination, create_client,
    parse_link_header,
};
pub use convert::to_remote_repo;
pub use error::GitHubError;
