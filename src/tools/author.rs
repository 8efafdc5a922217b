//! `get_author_info` tool

use super::{parse_args, respond, ToolContext};
use crate::cli::AuthorInfoArgs;
use crate::error::{validate_username, AppError};
use crate::mcp::{McpResponse, ToolResult};
use crate::substack::AuthorProfile;
use serde_json::Value;
use tracing::info;

/// Subscriptions listed per author
const MAX_SUBSCRIPTIONS: usize = 10;

pub async fn handle_author(ctx: &ToolContext, id: Option<Value>, args: Value) -> McpResponse {
    respond(id, "Author", ctx.config.tool_timeout, async {
        execute_author(ctx, parse_args(args)?).await
    })
    .await
}

pub async fn execute_author(ctx: &ToolContext, args: AuthorInfoArgs) -> Result<ToolResult, AppError> {
    let username = validate_username(&args.author_username)?;
    info!("Author request for {}", username);

    match ctx.source.author_profile(&username).await? {
        Some(profile) => Ok(ToolResult::text(render_profile(&username, &profile))),
        None => Ok(ToolResult::text(format!(
            "Could not retrieve information for author: {}",
            username
        ))),
    }
}

pub fn render_profile(username: &str, profile: &AuthorProfile) -> String {
    let mut text = format!(
        "Author: {}\nUsername: {}\nBio: {}\n\n",
        profile.name, username, profile.bio
    );

    if !profile.subscriptions.is_empty() {
        text.push_str("Subscriptions:\n");
        for name in profile.subscriptions.iter().take(MAX_SUBSCRIPTIONS) {
            text.push_str(&format!("- {}\n", name));
        }
    }
    text
}
