//! Explicit per-call deadlines for upstream provider calls (spec §5
//! "Cancellation and timeouts").

use std::future::Future;
use std::time::Duration;

use crate::error::CoreError;

/// Race `fut` against `timeout`; on expiry surface an `UpstreamTransport`
/// failure instead of letting the call hang.
pub async fn with_deadline<F, T>(timeout: Duration, fut: F) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(CoreError::UpstreamTransport(format!(
            "deadline of {timeout:?} exceeded"
        ))),
    }
}
