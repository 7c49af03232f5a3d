use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

pub enum CancelAware<T> {
    Value(T),
    Cancelled,
}

/// Races `fut` against the token. A token that is already cancelled wins
/// without polling `fut`.
pub async fn await_or_cancel<T, F>(token: &CancellationToken, fut: F) -> CancelAware<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => CancelAware::Cancelled,
        value = fut => CancelAware::Value(value),
    }
}

/// Returns `false` if the wait was interrupted.
pub async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    match await_or_cancel(token, tokio::time::sleep(duration)).await {
        CancelAware::Value(()) => true,
        CancelAware::Cancelled => false,
    }
}
