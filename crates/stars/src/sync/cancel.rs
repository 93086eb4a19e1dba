use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::gateway::{self, GatewayError};

/// Race a gateway call against `token`.
///
/// Returns `GatewayError::Cancelled` if the token fires first; the call's
/// future is dropped at that point.
pub(crate) async fn or_cancel<F, T>(token: &CancellationToken, call: F) -> gateway::Result<T>
where
    F: Future<Output = gateway::Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(GatewayError::Cancelled),
        res = call => res,
    }
}
