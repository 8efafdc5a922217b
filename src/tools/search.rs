//! `search_newsletter` tool

use super::{format, parse_args, respond, ToolContext};
use crate::cli::SearchNewsletterArgs;
use crate::error::{normalize_url, validate_positive, validate_query, AppError};
use crate::mcp::{McpResponse, ToolResult};
use serde_json::Value;
use tracing::info;

pub async fn handle_search(ctx: &ToolContext, id: Option<Value>, args: Value) -> McpResponse {
    respond(id, "Search", ctx.config.tool_timeout, async {
        execute_search(ctx, parse_args(args)?).await
    })
    .await
}

pub async fn execute_search(
    ctx: &ToolContext,
    args: SearchNewsletterArgs,
) -> Result<ToolResult, AppError> {
    let newsletter = normalize_url(&args.newsletter_url, "newsletter URL")?;
    validate_query(&args.search_query)?;
    validate_positive(args.limit, "limit")?;

    info!("Search request for '{}' in {}", args.search_query, newsletter);

    let posts = ctx
        .source
        .search_posts(&newsletter, &args.search_query, args.limit)
        .await?;

    if posts.is_empty() {
        return Ok(ToolResult::text(format!(
            "No results found for '{}' in {}",
            args.search_query, newsletter
        )));
    }

    Ok(ToolResult::text(format::post_list(
        &format!("Search results for '{}' in {}", args.search_query, newsletter),
        &posts,
    )))
}
