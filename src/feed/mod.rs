//! Producer side of the restaurant map
//!
//! A device publishes its location to a shared store; a sync loop watches
//! that location, asks the restaurant search service what is nearby, writes
//! each result back to the store and hands marker inputs to whoever renders
//! the map.

pub mod config;
pub mod publisher;
pub mod search;
pub mod store;
pub mod sync;

pub use config::{FeedConfig, RetryConfig, SearchConfig, StoreConfig, API_KEY_ENV};
pub use publisher::LocationPublisher;
pub use search::{Restaurant, RestaurantRecord, RestaurantSource, ZomatoClient};
pub use store::{LocationStore, MemoryStore, RestStore};
pub use sync::{MarkerInput, RestaurantSync};

use crate::{prelude::Future, runtime::async_delay, traits::backoff_delay, Result};
use once_cell::sync::Lazy;

/// Shared async HTTP client for the search service and the REST store
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("catmap/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .tcp_keepalive(std::time::Duration::from_secs(30))
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .build()
        .expect("failed to build reqwest async client")
});

/// Runs `op` until it succeeds, fails with a non-retryable error, or runs
/// out of retries.
pub(crate) async fn with_retry<T, F, Fut>(retry: &RetryConfig, what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                let delay = backoff_delay(attempt, retry.retry_delay_ms, retry.exponential_backoff);
                log::warn!(
                    "{} failed (attempt {}/{}), retrying in {:?}: {}",
                    what,
                    attempt + 1,
                    retry.max_retries + 1,
                    delay,
                    e
                );
                async_delay(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Turns a non-success response into [`MapError::Upstream`](crate::MapError::Upstream).
/// The query string is dropped from the reported URL since it may carry
/// credentials.
pub(crate) fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut url = response.url().clone();
    url.set_query(None);
    Err(crate::MapError::Upstream {
        status: status.as_u16(),
        url: url.to_string(),
    })
}
