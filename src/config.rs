//! Runtime configuration
//!
//! Defaults are overridden by environment variables and CLI flags, both read
//! through clap (see [`crate::cli::GlobalOpts`]).

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CACHE_FILE: &str = "substack_cache.json";
pub const DEFAULT_API_BASE: &str = "https://substack.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    /// Where discovered newsletters are remembered between runs
    pub cache_file: PathBuf,
    /// Base URL for platform-wide endpoints (author profiles)
    pub api_base: String,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// Bound on a single newsletter's search inside a fan-out
    pub search_timeout: Duration,
    /// Bound on a whole tool call
    pub tool_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            api_base: DEFAULT_API_BASE.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }
}
