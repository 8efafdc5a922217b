//! `get_newsletter_posts` tool

use super::{format, parse_args, respond, ToolContext};
use crate::cli::GetPostsArgs;
use crate::error::{normalize_url, validate_positive, AppError};
use crate::mcp::{McpResponse, ToolResult};
use serde_json::Value;
use tracing::info;

pub async fn handle_posts(ctx: &ToolContext, id: Option<Value>, args: Value) -> McpResponse {
    respond(id, "Posts", ctx.config.tool_timeout, async {
        execute_posts(ctx, parse_args(args)?).await
    })
    .await
}

/// Execute get_newsletter_posts (shared by MCP and CLI)
pub async fn execute_posts(ctx: &ToolContext, args: GetPostsArgs) -> Result<ToolResult, AppError> {
    let newsletter = normalize_url(&args.newsletter_url, "newsletter URL")?;
    validate_positive(args.limit, "limit")?;

    info!("Posts request for {} (sorting: {}, limit: {})", newsletter, args.sorting.as_str(), args.limit);

    let posts = ctx
        .source
        .newsletter_posts(&newsletter, args.sorting, args.limit)
        .await?;

    if posts.is_empty() {
        return Ok(ToolResult::text("No posts found for this newsletter."));
    }

    Ok(ToolResult::text(format::post_list(
        &format!("Posts from {}", newsletter),
        &posts,
    )))
}
