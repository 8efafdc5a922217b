//! `get_post_content` tool

use super::{format, parse_args, respond, ToolContext};
use crate::cli::PostContentArgs;
use crate::error::{normalize_url, AppError};
use crate::mcp::{McpResponse, ToolResult};
use serde_json::Value;
use tracing::{debug, info};

pub async fn handle_post_content(ctx: &ToolContext, id: Option<Value>, args: Value) -> McpResponse {
    respond(id, "Post content", ctx.config.tool_timeout, async {
        execute_post_content(ctx, parse_args(args)?).await
    })
    .await
}

pub async fn execute_post_content(
    ctx: &ToolContext,
    args: PostContentArgs,
) -> Result<ToolResult, AppError> {
    let post_url = normalize_url(&args.post_url, "post URL")?;
    info!("Post content request for {}", post_url);

    let detail = ctx.source.post_detail(&post_url).await?;
    let Some(detail) = detail.filter(|d| !d.body_html.trim().is_empty()) else {
        debug!("No content returned for {}", post_url);
        return Ok(ToolResult::text(format!(
            "Could not retrieve content for post: {}",
            post_url
        )));
    };

    let text = format!(
        "# {}\n\nBy: {}\nPublished: {}\n\n{}",
        detail.title,
        detail.author,
        detail.published_at,
        format::html_to_text(&detail.body_html)
    );

    Ok(ToolResult::text(text))
}
