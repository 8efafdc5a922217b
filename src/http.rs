//! HTTP client utilities
//!
//! Provides a reqwest::Client configured with timeouts and proxy support

use crate::error::AppError;
use reqwest::{Client, Proxy};
use std::time::Duration;

/// Explicit proxy for all platform traffic; takes precedence over the
/// HTTP_PROXY / HTTPS_PROXY / NO_PROXY variables reqwest honors by default.
pub const PROXY_ENV: &str = "SUBSTACK_MCP_PROXY";

/// Build a reqwest Client with the given timeout
pub fn client_with_timeout(timeout: Duration) -> Result<Client, AppError> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(concat!("substack-mcp/", env!("CARGO_PKG_VERSION")));

    if let Some(proxy_url) = std::env::var(PROXY_ENV).ok().filter(|v| !v.trim().is_empty()) {
        let proxy = Proxy::all(proxy_url.trim())
            .map_err(|e| AppError::InvalidInput(format!("Invalid {}: {}", PROXY_ENV, e)))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}
