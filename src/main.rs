//! substack-mcp MCP Server & CLI
//!
//! Dual-mode application:
//! - MCP Server Mode (no subcommand): Model Context Protocol server using stdio
//! - CLI Mode: run one tool and print its text
//!
//! Tools cover newsletter posts, post content, per-newsletter and
//! cross-newsletter search, newsletter discovery, author profiles,
//! recommendations and newsletter authors.

mod cache;
mod cli;
mod config;
mod discovery;
mod error;
mod fanout;
mod http;
mod mcp;
mod prompts;
mod resources;
mod substack;
mod tools;

#[cfg(test)]
mod tests_stdio_session;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use error::AppError;
use mcp::ToolResult;
use tools::ToolContext;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.global.to_config();

    match cli.command {
        Some(command) => {
            init_logging(if cli.quiet {
                "error"
            } else if cli.verbose {
                "debug"
            } else {
                "info"
            });
            run_cli_mode(command, config).await
        }
        None => {
            init_logging(if cli.verbose { "debug" } else { "info" });
            run_mcp_mode(config).await
        }
    }
}

/// Log to stderr so stdout stays a clean protocol / output channel.
/// `RUST_LOG` takes precedence over the flag-derived level.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run in CLI mode
async fn run_cli_mode(command: Commands, config: config::Config) -> Result<()> {
    let limit = config.tool_timeout;
    let result = match ToolContext::new(config) {
        Ok(ctx) => {
            match tokio::time::timeout(limit, execute_command(&ctx, command)).await {
                Ok(result) => result,
                Err(_) => Err(AppError::Timeout(format!(
                    "Request exceeded {} second timeout",
                    limit.as_secs()
                ))),
            }
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => {
            println!("{}", output.joined_text());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn execute_command(ctx: &ToolContext, command: Commands) -> Result<ToolResult, AppError> {
    match command {
        Commands::Posts(args) => tools::posts::execute_posts(ctx, args).await,
        Commands::Post(args) => tools::post::execute_post_content(ctx, args).await,
        Commands::Search(args) => tools::search::execute_search(ctx, args).await,
        Commands::SearchAcross(args) => tools::search_across::execute_search_across(ctx, args).await,
        Commands::Discover(args) => tools::discover::execute_discover(ctx, args).await,
        Commands::Author(args) => tools::author::execute_author(ctx, args).await,
        Commands::Recommendations(args) => tools::newsletter::execute_recommendations(ctx, args).await,
        Commands::Authors(args) => tools::newsletter::execute_authors(ctx, args).await,
    }
}

/// Run in MCP server mode
async fn run_mcp_mode(config: config::Config) -> Result<()> {
    let ctx = ToolContext::new(config)?;
    info!(
        "Starting substack-mcp MCP Server (cache: {})",
        ctx.cache.path().display()
    );

    mcp::handle_stdio(ctx).await?;

    Ok(())
}
