//! MCP tools implementation

pub mod author;
pub mod discover;
pub mod format;
pub mod newsletter;
pub mod post;
pub mod posts;
pub mod search;
pub mod search_across;


use crate::cache::NewsletterCache;
use crate::config::Config;
use crate::error::AppError;
use crate::mcp::{McpResponse, ToolResult};
use crate::substack::{ContentSource, SubstackClient};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::time::timeout;

/// Everything a tool needs: the content source, the newsletter cache and config
pub struct ToolContext {
    pub source: Arc<dyn ContentSource>,
    pub cache: NewsletterCache,
    pub config: Config,
}

impl ToolContext {
    /// Context backed by the live Substack API
    pub fn new(config: Config) -> Result<Self, AppError> {
        let source = Arc::new(SubstackClient::new(&config)?);
        Ok(Self::with_source(config, source))
    }

    pub fn with_source(config: Config, source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            cache: NewsletterCache::new(config.cache_file.clone()),
            config,
        }
    }
}

/// Deserialize MCP tool arguments into the tool's argument struct
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, AppError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| AppError::InvalidInput(format!("Invalid arguments: {}", e)))
}

/// Run a tool body under the whole-call timeout and turn the outcome into a response
pub async fn respond<F>(id: Option<Value>, label: &str, limit: std::time::Duration, body: F) -> McpResponse
where
    F: Future<Output = Result<ToolResult, AppError>>,
{
    match timeout(limit, body).await {
        Ok(Ok(result)) => McpResponse::tool_result(id, &result),
        Ok(Err(e)) => McpResponse::app_error(id, &e),
        Err(_) => McpResponse::app_error(
            id,
            &AppError::Timeout(format!("{} request exceeded {} second timeout", label, limit.as_secs())),
        ),
    }
}

/// Dispatch a `tools/call` by tool name; `None` for unknown tools
pub async fn call_tool(
    ctx: &ToolContext,
    id: Option<Value>,
    name: &str,
    args: Value,
) -> Option<McpResponse> {
    let response = match name {
        "get_newsletter_posts" => posts::handle_posts(ctx, id, args).await,
        "get_post_content" => post::handle_post_content(ctx, id, args).await,
        "search_newsletter" => search::handle_search(ctx, id, args).await,
        "search_across_substacks" => search_across::handle_search_across(ctx, id, args).await,
        "discover_popular_substacks" => discover::handle_discover(ctx, id, args).await,
        "get_author_info" => author::handle_author(ctx, id, args).await,
        "get_newsletter_recommendations" => newsletter::handle_recommendations(ctx, id, args).await,
        "get_newsletter_authors" => newsletter::handle_authors(ctx, id, args).await,
        _ => return None,
    };
    Some(response)
}
