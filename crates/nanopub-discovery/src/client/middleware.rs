//! Middleware stack for the endpoint HTTP client.

use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

/// Wrap `client` with transient-failure retries.
///
/// With `max_retries == 0` no retry layer is installed, so each endpoint gets
/// exactly one call per fallback pass.
pub fn with_retries(client: Client, max_retries: u32) -> ClientWithMiddleware {
    if max_retries == 0 {
        return ClientBuilder::new(client).build();
    }

    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(500), Duration::from_secs(5))
        .build_with_max_retries(max_retries);

    ClientBuilder::new(client).with(RetryTransientMiddleware::new_with_policy(retry_policy)).build()
}
