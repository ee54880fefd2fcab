//! Shared HTTP plumbing for the capability clients.

use reqwest::{Client, StatusCode};
use shared::error::ApiError;
use std::sync::LazyLock;
use std::time::Duration;

/// One pooled client for every capability call. The 120 s timeout is the
/// only timeout in the system; a hung service stalls the session until the
/// transport gives up.
pub(crate) static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

pub(crate) fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

/// Readable error for a non-2xx response whose body carried no `error` field.
pub(crate) fn status_error(status: StatusCode, body: &str) -> ApiError {
    let detail: String = body.chars().take(800).collect();
    if detail.trim().is_empty() {
        ApiError::Service(format!("backend error: {}", status))
    } else {
        ApiError::Service(format!("backend error: {}\n{}", status, detail))
    }
}
