//! `search_across_substacks` tool

use super::{format, parse_args, respond, ToolContext};
use crate::cli::SearchAcrossArgs;
use crate::error::{normalize_url, validate_positive, validate_query, AppError};
use crate::fanout::{search_across, FanOutReport, FanOutRequest};
use crate::mcp::{McpResponse, ToolResult};
use serde_json::Value;
use tracing::info;

pub async fn handle_search_across(ctx: &ToolContext, id: Option<Value>, args: Value) -> McpResponse {
    respond(id, "Cross-newsletter search", ctx.config.tool_timeout, async {
        execute_search_across(ctx, parse_args(args)?).await
    })
    .await
}

pub async fn execute_search_across(
    ctx: &ToolContext,
    args: SearchAcrossArgs,
) -> Result<ToolResult, AppError> {
    validate_query(&args.query)?;
    validate_positive(args.max_newsletters, "max_newsletters")?;
    validate_positive(args.per_newsletter_limit, "per_newsletter_limit")?;

    // A bad entry is left for its own search to fail; it must not sink the others.
    let explicit: Vec<String> = args
        .newsletters
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(|n| normalize_url(n, "newsletter URL").unwrap_or_else(|_| n.to_string()))
        .collect();

    let request = FanOutRequest {
        query: &args.query,
        newsletters: Some(explicit.as_slice()),
        max_newsletters: args.max_newsletters,
        per_newsletter_limit: args.per_newsletter_limit,
        popular_only: args.popular_only,
    };

    let report = search_across(
        ctx.source.as_ref(),
        &ctx.cache,
        &request,
        ctx.config.search_timeout,
    )
    .await;

    info!(
        "Cross-newsletter search for '{}': {} matches in {} of {} newsletters ({} failed)",
        report.query,
        report.total_matches(),
        report.groups.len(),
        report.selection.newsletters.len(),
        report.failures.len()
    );

    Ok(ToolResult::text(render_report(&report)))
}

/// Render grouped results; failed newsletters are not mentioned
pub fn render_report(report: &FanOutReport) -> String {
    let searched = report.selection.newsletters.len();

    if searched == 0 {
        return "No newsletters available to search.".to_string();
    }

    if !report.has_results() {
        return format!(
            "No results found for '{}' across {} newsletters.",
            report.query, searched
        );
    }

    let mut text = format!(
        "Search results for '{}' across {} newsletters:\n\n",
        report.query, searched
    );
    for group in &report.groups {
        text.push_str(&format!("## {}\n\n", group.newsletter));
        format::push_posts(&mut text, &group.posts);
    }
    text
}
