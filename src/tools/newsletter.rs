//! `get_newsletter_recommendations` and `get_newsletter_authors` tools

use super::{parse_args, respond, ToolContext};
use crate::cli::NewsletterArgs;
use crate::error::{normalize_url, AppError};
use crate::mcp::{McpResponse, ToolResult};
use serde_json::Value;
use tracing::info;

pub async fn handle_recommendations(ctx: &ToolContext, id: Option<Value>, args: Value) -> McpResponse {
    respond(id, "Recommendations", ctx.config.tool_timeout, async {
        execute_recommendations(ctx, parse_args(args)?).await
    })
    .await
}

pub async fn handle_authors(ctx: &ToolContext, id: Option<Value>, args: Value) -> McpResponse {
    respond(id, "Authors", ctx.config.tool_timeout, async {
        execute_authors(ctx, parse_args(args)?).await
    })
    .await
}

pub async fn execute_recommendations(
    ctx: &ToolContext,
    args: NewsletterArgs,
) -> Result<ToolResult, AppError> {
    let newsletter = normalize_url(&args.newsletter_url, "newsletter URL")?;
    info!("Recommendations request for {}", newsletter);

    let recommendations = ctx.source.recommendations(&newsletter).await?;
    if recommendations.is_empty() {
        return Ok(ToolResult::text(format!("No recommendations found for {}", newsletter)));
    }

    let mut text = format!("Recommended newsletters for {}:\n\n", newsletter);
    for (i, rec) in recommendations.iter().enumerate() {
        match &rec.name {
            Some(name) => text.push_str(&format!("{}. {} ({})\n", i + 1, rec.url, name)),
            None => text.push_str(&format!("{}. {}\n", i + 1, rec.url)),
        }
    }
    Ok(ToolResult::text(text))
}

pub async fn execute_authors(ctx: &ToolContext, args: NewsletterArgs) -> Result<ToolResult, AppError> {
    let newsletter = normalize_url(&args.newsletter_url, "newsletter URL")?;
    info!("Authors request for {}", newsletter);

    let authors = ctx.source.newsletter_authors(&newsletter).await?;
    if authors.is_empty() {
        return Ok(ToolResult::text(format!("No authors found for {}", newsletter)));
    }

    let mut text = format!("Authors of {}:\n\n", newsletter);
    for (i, author) in authors.iter().enumerate() {
        text.push_str(&format!("{}. {} (@{})\n", i + 1, author.name, author.handle));
    }
    Ok(ToolResult::text(text))
}
