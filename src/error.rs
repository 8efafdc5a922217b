//! Error types and input validation for the Substack MCP server

use serde::Serialize;
use std::fmt;
use url::Url;

/// Application error taxonomy shared by tools, CLI and the MCP loop
#[derive(Debug, Serialize)]
pub enum AppError {
    InvalidInput(String),
    NetworkError(String),
    ParseError(String),
    Timeout(String),
    CacheError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            AppError::CacheError(msg) => write!(f, "Cache error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Short machine-readable kind, carried in the `data` of MCP error responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NetworkError(_) => "network_error",
            AppError::ParseError(_) => "parse_error",
            AppError::Timeout(_) => "timeout",
            AppError::CacheError(_) => "cache_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// JSON-RPC error code used when this error crosses the protocol boundary
    pub fn rpc_code(&self) -> i64 {
        match self {
            AppError::InvalidInput(_) => crate::mcp::INVALID_PARAMS,
            _ => crate::mcp::INTERNAL_ERROR,
        }
    }

    /// Process exit code for CLI mode
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) => 1,
            AppError::NetworkError(_) | AppError::ParseError(_) => 2,
            AppError::Timeout(_) => 4,
            AppError::CacheError(_) | AppError::Internal(_) => 5,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_decode() {
            AppError::ParseError(err.to_string())
        } else {
            AppError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::CacheError(err.to_string())
    }
}

/// Validate and normalize a newsletter or post reference.
///
/// Accepts full `http(s)://` URLs and bare hosts (`example.substack.com`),
/// which are given an `https://` scheme. Trailing slashes are removed.
pub fn normalize_url(reference: &str, what: &str) -> Result<String, AppError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", what)));
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        return Err(AppError::InvalidInput(format!(
            "{} must be an http(s) URL: {}",
            what, trimmed
        )));
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| AppError::InvalidInput(format!("Invalid {}: {} ({})", what, trimmed, e)))?;

    match parsed.host_str() {
        Some(host) if host.contains('.') => {}
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Invalid {}: {} (host must contain a domain)",
                what, trimmed
            )))
        }
    }

    Ok(candidate.trim_end_matches('/').to_string())
}

pub fn validate_query(query: &str) -> Result<(), AppError> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidInput("Query cannot be empty".to_string()));
    }

    if query.len() > 500 {
        return Err(AppError::InvalidInput(
            "Query too long, maximum 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Reject zero-valued count arguments
pub fn validate_positive(value: usize, name: &str) -> Result<(), AppError> {
    if value == 0 {
        return Err(AppError::InvalidInput(format!("{} must be at least 1", name)));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<String, AppError> {
    let handle = username.trim().trim_start_matches('@');
    if handle.is_empty() {
        return Err(AppError::InvalidInput("Author username cannot be empty".to_string()));
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(AppError::InvalidInput(format!("Invalid author username: {}", handle)));
    }
    Ok(handle.to_string())
}
