//! `discover_popular_substacks` tool
//!
//! Returns curated newsletters and remembers them in the newsletter cache so
//! that later cross-newsletter searches default to them.

use super::{parse_args, respond, ToolContext};
use crate::cli::DiscoverArgs;
use crate::discovery::{self, Discovery};
use crate::error::{validate_positive, AppError};
use crate::mcp::{McpResponse, ToolResult};
use serde_json::Value;
use tracing::{info, warn};

pub async fn handle_discover(ctx: &ToolContext, id: Option<Value>, args: Value) -> McpResponse {
    respond(id, "Discover", ctx.config.tool_timeout, async {
        execute_discover(ctx, parse_args(args)?).await
    })
    .await
}

pub async fn execute_discover(ctx: &ToolContext, args: DiscoverArgs) -> Result<ToolResult, AppError> {
    validate_positive(args.limit, "limit")?;

    let found = discovery::discover(args.category.as_deref(), args.limit);
    info!(
        "Discovered {} newsletters (category: {:?}, known: {})",
        found.newsletters.len(),
        found.category,
        found.category_found
    );

    // The cache is advisory; a failed write must not fail discovery.
    if let Err(e) = ctx.cache.save_async(found.newsletters.clone()).await {
        warn!("Failed to update newsletter cache: {}", e);
    }

    Ok(ToolResult::text(render_discovery(&found)))
}

pub fn render_discovery(found: &Discovery) -> String {
    let mut text = String::new();

    let heading = match (&found.category, found.category_found) {
        (Some(category), false) => {
            text.push_str(&format!(
                "Category '{}' not found. Available categories: {}.\n\n",
                category,
                discovery::category_names().join(", ")
            ));
            "Popular newsletters across all categories".to_string()
        }
        (Some(category), true) => format!("Popular newsletters in {}", category.to_lowercase()),
        (None, _) => "Popular newsletters".to_string(),
    };

    text.push_str(&format!("{}:\n\n", heading));
    for (i, newsletter) in found.newsletters.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, newsletter));
    }
    text
}
