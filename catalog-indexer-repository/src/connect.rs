//! Establishing the search backend connection.
//!
//! Connecting never gives up: each failed attempt is logged and retried
//! after a fixed delay until the backend answers.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::OpenSearchClient;

/// Delay between two connection attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Run `attempt` until it succeeds, sleeping `delay` after every failure.
///
/// There is no attempt limit. `endpoint` only labels the log lines.
pub async fn retry_forever<T, F, Fut>(endpoint: &str, delay: Duration, mut attempt: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SearchIndexError>>,
{
    let mut attempts: u64 = 0;

    loop {
        attempts += 1;

        match attempt().await {
            Ok(value) => {
                if attempts > 1 {
                    info!(endpoint = %endpoint, attempts, "Connected after retrying");
                }
                return value;
            }
            Err(e) => {
                warn!(
                    endpoint = %endpoint,
                    attempt = attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %e,
                    "Search backend connection failed"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Connect to the search backend at `url`, retrying forever.
///
/// An attempt succeeds once the client is built and the cluster answers the
/// health probe with a success status.
pub async fn connect_search_backend(url: &str, delay: Duration) -> OpenSearchClient {
    connect_verified(url, delay, || OpenSearchClient::new(url)).await
}

/// Build a provider with `build` and probe its health, retrying both steps
/// until the probe succeeds.
pub async fn connect_verified<P, F, Fut>(endpoint: &str, delay: Duration, mut build: F) -> P
where
    P: SearchIndexProvider,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<P, SearchIndexError>>,
{
    retry_forever(endpoint, delay, || {
        let built = build();
        async move {
            let client = built.await?;
            if client.health_check().await? {
                Ok(client)
            } else {
                Err(SearchIndexError::connection("Cluster health probe failed"))
            }
        }
    })
    .await
}
