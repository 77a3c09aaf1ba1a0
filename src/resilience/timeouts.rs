//! Timeout enforcement.
//!
//! Every upstream call carries a deadline; a hung provider must not hang the
//! inbound request. Timed-out calls surface as `UpstreamError::Timeout` and are
//! answered with 504 Gateway Timeout.

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::payments::{UpstreamError, UpstreamResult};

/// Run `fut` under `deadline`.
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> UpstreamResult<T>
where
    F: Future<Output = UpstreamResult<T>>,
{
    match timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let result =
            with_deadline(Duration::from_secs(1), async { Ok::<_, UpstreamError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_deadline_expires() {
        let deadline = Duration::from_millis(50);
        let result = with_deadline(deadline, async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, UpstreamError>(())
        })
        .await;
        assert!(matches!(result, Err(UpstreamError::Timeout(d)) if d == deadline));
    }
}
