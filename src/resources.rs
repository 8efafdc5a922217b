//! `post_content` resource: raw body of a post, addressed as `substack://post/{post_url}`

use crate::error::{normalize_url, AppError};
use crate::tools::ToolContext;
use serde_json::{json, Value};
use tracing::info;

pub const POST_URI_PREFIX: &str = "substack://post/";
pub const NO_CONTENT: &str = "No content available";

pub fn templates() -> Value {
    json!([{
        "uriTemplate": format!("{}{{post_url}}", POST_URI_PREFIX),
        "name": "post_content",
        "description": "Raw content of a Substack post",
        "mimeType": "text/html"
    }])
}

/// Post URL addressed by a resource URI
pub fn post_url_from_uri(uri: &str) -> Result<String, AppError> {
    let post_url = uri
        .strip_prefix(POST_URI_PREFIX)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown resource URI: {}", uri)))?;
    normalize_url(post_url, "post URL")
}

/// Raw post body, or a placeholder when the post has none
pub async fn read_post_content(ctx: &ToolContext, post_url: &str) -> Result<String, AppError> {
    info!("Resource read for {}", post_url);
    let detail = ctx.source.post_detail(post_url).await?;
    Ok(detail
        .map(|d| d.body_html)
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| NO_CONTENT.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_url_from_uri() {
        assert_eq!(
            post_url_from_uri("substack://post/https://x.substack.com/p/hello").unwrap(),
            "https://x.substack.com/p/hello"
        );
        assert_eq!(
            post_url_from_uri("substack://post/x.substack.com/p/hello").unwrap(),
            "https://x.substack.com/p/hello"
        );
        assert!(post_url_from_uri("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_template_shape() {
        let t = templates();
        assert_eq!(t[0]["uriTemplate"], "substack://post/{post_url}");
    }
}
