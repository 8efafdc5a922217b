//! CLI mode and tool argument definitions
//!
//! Each tool's arguments are one struct used three ways: as a clap
//! subcommand, as the serde target for MCP `tools/call` arguments, and as the
//! JSON schema advertised by `tools/list`.

use crate::config::{
    Config, DEFAULT_API_BASE, DEFAULT_CACHE_FILE, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_SEARCH_TIMEOUT_SECS, DEFAULT_TOOL_TIMEOUT_SECS,
};
use crate::substack::Sorting;
use clap::{Args, Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// substack-mcp: runs as an MCP server on stdio when no subcommand is given
#[derive(Parser)]
#[command(name = "substack-mcp")]
#[command(about = "Substack newsletter, post and author lookup", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// File remembering discovered newsletters
    #[arg(long, global = true, env = "SUBSTACK_MCP_CACHE_FILE", default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Base URL for platform-wide endpoints
    #[arg(long, global = true, env = "SUBSTACK_MCP_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, global = true, env = "SUBSTACK_MCP_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,

    /// Timeout for one newsletter's search during a cross-newsletter search
    #[arg(long, global = true, env = "SUBSTACK_MCP_SEARCH_TIMEOUT_SECS", default_value_t = DEFAULT_SEARCH_TIMEOUT_SECS)]
    pub search_timeout_secs: u64,

    /// Timeout for a whole tool call in seconds
    #[arg(long, global = true, env = "SUBSTACK_MCP_TIMEOUT_SECS", default_value_t = DEFAULT_TOOL_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl GlobalOpts {
    pub fn to_config(&self) -> Config {
        Config {
            cache_file: self.cache_file.clone(),
            api_base: self.api_base.clone(),
            http_timeout: Duration::from_secs(self.http_timeout_secs.max(1)),
            search_timeout: Duration::from_secs(self.search_timeout_secs.max(1)),
            tool_timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List recent posts of a newsletter
    Posts(GetPostsArgs),
    /// Show the content of one post
    Post(PostContentArgs),
    /// Search posts within one newsletter
    Search(SearchNewsletterArgs),
    /// Search the same query across several newsletters
    SearchAcross(SearchAcrossArgs),
    /// List popular newsletters, optionally by category
    Discover(DiscoverArgs),
    /// Show an author's profile
    Author(AuthorInfoArgs),
    /// List newsletters recommended by a newsletter
    Recommendations(NewsletterArgs),
    /// List the authors of a newsletter
    Authors(NewsletterArgs),
}

fn default_posts_limit() -> usize {
    5
}

fn default_max_newsletters() -> usize {
    5
}

fn default_per_newsletter_limit() -> usize {
    3
}

fn default_discover_limit() -> usize {
    10
}

/// get_newsletter_posts arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct GetPostsArgs {
    /// URL of the Substack newsletter (e.g., https://example.substack.com)
    #[arg(short = 'u', long)]
    pub newsletter_url: String,

    /// Maximum number of posts to retrieve (default: 5)
    #[arg(short = 'l', long, default_value_t = 5)]
    #[serde(default = "default_posts_limit")]
    pub limit: usize,

    /// How to sort posts, either "new" or "top" (default: "new")
    #[arg(short = 's', long, value_enum, default_value_t = Sorting::New)]
    #[serde(default)]
    pub sorting: Sorting,
}

/// get_post_content arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct PostContentArgs {
    /// URL of the Substack post (e.g., https://example.substack.com/p/post-slug)
    #[arg(short = 'u', long)]
    pub post_url: String,
}

/// search_newsletter arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchNewsletterArgs {
    /// URL of the Substack newsletter
    #[arg(short = 'u', long)]
    pub newsletter_url: String,

    /// The search term to look for
    #[arg(short = 'q', long)]
    #[serde(alias = "query")]
    pub search_query: String,

    /// Maximum number of results to return (default: 5)
    #[arg(short = 'l', long, default_value_t = 5)]
    #[serde(default = "default_posts_limit")]
    pub limit: usize,
}

/// search_across_substacks arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchAcrossArgs {
    /// The search term to look for in every newsletter
    #[arg(short = 'q', long)]
    pub query: String,

    /// Newsletter URLs to search; when omitted, cached or popular newsletters are used
    #[arg(short = 'n', long = "newsletter")]
    #[serde(default)]
    pub newsletters: Option<Vec<String>>,

    /// Maximum number of newsletters to search (default: 5)
    #[arg(short = 'm', long, default_value_t = 5)]
    #[serde(default = "default_max_newsletters")]
    pub max_newsletters: usize,

    /// Maximum results per newsletter (default: 3)
    #[arg(short = 'l', long, default_value_t = 3)]
    #[serde(default = "default_per_newsletter_limit")]
    pub per_newsletter_limit: usize,

    /// Search only the built-in popular newsletters (default: false)
    #[arg(short = 'p', long)]
    #[serde(default)]
    pub popular_only: bool,
}

/// discover_popular_substacks arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct DiscoverArgs {
    /// Category such as technology, business, politics, economics, science or culture
    #[arg(short = 'c', long)]
    #[serde(default)]
    pub category: Option<String>,

    /// Maximum number of newsletters to return (default: 10)
    #[arg(short = 'l', long, default_value_t = 10)]
    #[serde(default = "default_discover_limit")]
    pub limit: usize,
}

/// get_author_info arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct AuthorInfoArgs {
    /// The username of the Substack author
    #[arg(short = 'a', long)]
    pub author_username: String,
}

/// Arguments for tools that take only a newsletter
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct NewsletterArgs {
    /// URL of the Substack newsletter
    #[arg(short = 'u', long)]
    pub newsletter_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_posts_args_defaults() {
        let args: GetPostsArgs =
            serde_json::from_value(json!({"newsletter_url": "https://x.substack.com"})).unwrap();
        assert_eq!(args.limit, 5);
        assert_eq!(args.sorting, Sorting::New);
    }

    #[test]
    fn test_search_across_args_defaults() {
        let args: SearchAcrossArgs = serde_json::from_value(json!({"query": "ai"})).unwrap();
        assert_eq!(args.newsletters, None);
        assert_eq!(args.max_newsletters, 5);
        assert_eq!(args.per_newsletter_limit, 3);
        assert!(!args.popular_only);
    }

    #[test]
    fn test_search_newsletter_accepts_query_alias() {
        let args: SearchNewsletterArgs = serde_json::from_value(json!({
            "newsletter_url": "https://x.substack.com",
            "query": "rust"
        }))
        .unwrap();
        assert_eq!(args.search_query, "rust");
    }

    #[test]
    fn test_cli_parses_search_across() {
        let cli = Cli::try_parse_from([
            "substack-mcp",
            "search-across",
            "-q",
            "climate",
            "-n",
            "https://a.substack.com",
            "-n",
            "https://b.substack.com",
            "--popular-only",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::SearchAcross(args)) => {
                assert_eq!(args.query, "climate");
                assert_eq!(args.newsletters.map(|n| n.len()), Some(2));
                assert!(args.popular_only);
            }
            _ => panic!("expected search-across"),
        }
    }

    #[test]
    fn test_cli_without_subcommand_is_server_mode() {
        let cli = Cli::try_parse_from(["substack-mcp", "--cache-file", "/tmp/c.json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.global.to_config().cache_file, PathBuf::from("/tmp/c.json"));
    }
}
