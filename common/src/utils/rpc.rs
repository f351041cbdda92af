use anyhow::Error;
use std::{future::Future, time::Duration};

/// Awaits `fut`, failing with a descriptive error if it does not complete
/// within `timeout`.
pub async fn with_timeout<T, E, F>(timeout: Duration, what: &str, fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, E>>,
    E: Into<Error>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(|e| {
            let err: Error = e.into();
            err.context(format!("Failed to {what}"))
        }),
        Err(_) => Err(anyhow::anyhow!(
            "Timed out after {}s while trying to {what}",
            timeout.as_secs()
        )),
    }
}
