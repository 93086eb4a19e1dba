//! Platform-agnostic interface to the remote star service.
//!
//! The sync engine and the reconciler only ever see [`StarGateway`]; the
//! GitHub implementation lives in [`crate::github`] and tests provide their
//! own doubles.

mod convert;
mod errors;
mod types;

pub use errors::{GatewayError, Result, short_error_message};
pub use types::{PageMeta, RemoteRepo, StarGateway, StarredPage};
