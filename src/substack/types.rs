//! Normalized records returned by the content client

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_DATE: &str = "Unknown date";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const UNKNOWN_NAME: &str = "Unknown";
pub const NO_BIO: &str = "No biography available";

/// Archive sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sorting {
    #[default]
    New,
    Top,
}

impl Sorting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sorting::New => "new",
            Sorting::Top => "top",
        }
    }
}

/// One post as listed in an archive or search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    pub published_at: String,
    pub url: String,
}

impl PostSummary {
    pub fn new(title: Option<String>, published_at: Option<String>, url: impl Into<String>) -> Self {
        Self {
            title: non_blank(title).unwrap_or_else(|| UNTITLED.to_string()),
            published_at: non_blank(published_at).unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            url: url.into(),
        }
    }
}

/// Full post with body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub title: String,
    pub author: String,
    pub published_at: String,
    /// Raw HTML body; empty when the platform withholds it (e.g. paywalled)
    pub body_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub name: String,
    pub username: String,
    pub bio: String,
    /// Names of publications the author subscribes to, platform order
    pub subscriptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterAuthor {
    pub name: String,
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: Option<String>,
    pub url: String,
}

/// Treat empty and whitespace-only strings as missing
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_summary_defaults() {
        let post = PostSummary::new(None, Some("  ".to_string()), "https://x.substack.com/p/a");
        assert_eq!(post.title, "Untitled");
        assert_eq!(post.published_at, "Unknown date");
        assert_eq!(post.url, "https://x.substack.com/p/a");
    }

    #[test]
    fn test_sorting_serde() {
        let top: Sorting = serde_json::from_value(serde_json::json!("top")).unwrap();
        assert_eq!(top, Sorting::Top);
        assert!(serde_json::from_value::<Sorting>(serde_json::json!("oldest")).is_err());
        assert_eq!(Sorting::default().as_str(), "new");
    }
}
