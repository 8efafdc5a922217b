//! MCP (Model Context Protocol) handling module
//!
//! This module implements line-delimited JSON-RPC 2.0 over stdio.

use crate::error::AppError;
use crate::tools::{self, ToolContext};
use crate::{prompts, resources};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tracing::{debug, error, info};

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Protocol revision offered when the client does not ask for one
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server context for tracking client information
pub struct ServerContext {
    pub client_info: Option<ClientInfo>,
    pub tools: ToolContext,
}

impl ServerContext {
    pub fn new(tools: ToolContext) -> Self {
        Self {
            client_info: None,
            tools,
        }
    }

    pub fn get_client_name(&self) -> String {
        self.client_info
            .as_ref()
            .and_then(|info| info.name.as_ref())
            .cloned()
            .unwrap_or_else(|| "Unknown Client".to_string())
    }
}

/// MCP JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// Initialize request parameters
#[derive(Debug, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientInfo {
    pub name: Option<String>,
    #[allow(dead_code)]
    pub version: Option<String>,
}

/// MCP JSON-RPC 2.0 response structure
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ToolCallArgs {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Deserialize)]
struct PromptGetParams {
    name: String,
    #[serde(default)]
    arguments: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ResourceReadParams {
    uri: String,
}

/// MCP Content item
#[derive(Debug, Serialize)]
pub struct ContentItem {
    pub r#type: String,
    pub text: String,
}

/// MCP Tool result
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
}

impl McpResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i64, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code,
                message: message.to_string(),
                data: None,
            }),
        }
    }

    /// Error response carrying the application error kind in `data`
    pub fn app_error(id: Option<Value>, err: &AppError) -> Self {
        let mut response = Self::error(id, err.rpc_code(), &err.message());
        if let Some(e) = response.error.as_mut() {
            e.data = Some(json!({ "kind": err.error_code() }));
        }
        response
    }

    pub fn tool_result(id: Option<Value>, result: &ToolResult) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self::success(id, value),
            Err(e) => Self::error(id, INTERNAL_ERROR, &format!("Failed to encode result: {}", e)),
        }
    }
}

impl ToolResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(content)],
        }
    }

    /// Concatenated text of all content items
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ContentItem {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            r#type: "text".to_string(),
            text: content.into(),
        }
    }
}

pub fn parse_request(json: &str) -> Result<McpRequest> {
    let request: McpRequest = serde_json::from_str(json)?;
    Ok(request)
}

pub fn serialize_response(response: &McpResponse) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Serve MCP on stdio until stdin closes
pub async fn handle_stdio(tools: ToolContext) -> Result<()> {
    info!("Starting substack-mcp server on stdio");

    let stdin = tokio::io::stdin();
    let mut reader = AsyncBufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    let mut context = ServerContext::new(tools);

    while let Some(line) = reader.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received request: {}", line);

        let response = match parse_request(&line) {
            Ok(request) => handle_request(request, &mut context).await,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                Some(McpResponse::error(None, PARSE_ERROR, &format!("Invalid JSON: {}", e)))
            }
        };

        let Some(response) = response else {
            continue;
        };

        let response_json = serialize_response(&response)?;
        debug!("Sending response: {}", response_json);

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Handle a single MCP message; messages without an id are notifications and get no response
pub async fn handle_request(request: McpRequest, context: &mut ServerContext) -> Option<McpResponse> {
    if request.id.is_none() {
        debug!("Notification: {}", request.method);
        return None;
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(request, context),
        "ping" => McpResponse::success(request.id, json!({})),
        "tools/list" => McpResponse::success(request.id, json!({ "tools": build_tools_array() })),
        "tools/call" => handle_tool_call(request, context).await,
        "prompts/list" => handle_prompts_list(request),
        "prompts/get" => handle_prompt_get(request),
        "resources/list" => McpResponse::success(request.id, json!({ "resources": [] })),
        "resources/templates/list" => McpResponse::success(
            request.id,
            json!({ "resourceTemplates": resources::templates() }),
        ),
        "resources/read" => handle_resource_read(request, context).await,
        _ => McpResponse::error(
            request.id,
            METHOD_NOT_FOUND,
            &format!("Method '{}' not found", request.method),
        ),
    };
    Some(response)
}

fn handle_initialize(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    let params = request
        .params
        .and_then(|p| serde_json::from_value::<InitializeParams>(p).ok());

    let protocol_version = params
        .as_ref()
        .and_then(|p| p.protocol_version.clone())
        .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string());

    if let Some(params) = params {
        context.client_info = params.client_info;
    }
    info!("Initialized by {}", context.get_client_name());

    McpResponse::success(
        request.id,
        json!({
            "protocolVersion": protocol_version,
            "serverInfo": {
                "name": "substack-mcp",
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {
                "tools": { "listChanged": false },
                "prompts": { "listChanged": false },
                "resources": { "listChanged": false, "subscribe": false }
            }
        }),
    )
}

async fn handle_tool_call(request: McpRequest, context: &ServerContext) -> McpResponse {
    let args: ToolCallArgs = match serde_json::from_value(request.params.unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            return McpResponse::error(
                request.id,
                INVALID_PARAMS,
                &format!("Invalid parameters: {}", e),
            )
        }
    };

    debug!("Tool call: {}", args.name);
    let id = request.id;
    match tools::call_tool(&context.tools, id.clone(), &args.name, args.arguments).await {
        Some(response) => response,
        None => McpResponse::error(id, INVALID_PARAMS, &format!("Tool '{}' not found", args.name)),
    }
}

fn handle_prompts_list(request: McpRequest) -> McpResponse {
    let prompts: Vec<Value> = prompts::PROMPTS.iter().map(|p| p.descriptor()).collect();
    McpResponse::success(request.id, json!({ "prompts": prompts }))
}

fn handle_prompt_get(request: McpRequest) -> McpResponse {
    let params: PromptGetParams = match serde_json::from_value(request.params.unwrap_or_default()) {
        Ok(params) => params,
        Err(e) => {
            return McpResponse::error(request.id, INVALID_PARAMS, &format!("Invalid parameters: {}", e))
        }
    };

    let Some(prompt) = prompts::find(&params.name) else {
        return McpResponse::error(
            request.id,
            INVALID_PARAMS,
            &format!("Prompt '{}' not found", params.name),
        );
    };

    McpResponse::success(
        request.id,
        json!({
            "description": prompt.description,
            "messages": [{
                "role": "user",
                "content": { "type": "text", "text": prompt.render(&params.arguments) }
            }]
        }),
    )
}

async fn handle_resource_read(request: McpRequest, context: &ServerContext) -> McpResponse {
    let params: ResourceReadParams = match serde_json::from_value(request.params.unwrap_or_default()) {
        Ok(params) => params,
        Err(e) => {
            return McpResponse::error(request.id, INVALID_PARAMS, &format!("Invalid parameters: {}", e))
        }
    };

    let read = async {
        let post_url = resources::post_url_from_uri(&params.uri)?;
        resources::read_post_content(&context.tools, &post_url).await
    };

    let outcome = tokio::time::timeout(context.tools.config.tool_timeout, read).await;
    match outcome {
        Ok(Ok(text)) => McpResponse::success(
            request.id,
            json!({
                "contents": [{ "uri": params.uri, "mimeType": "text/html", "text": text }]
            }),
        ),
        Ok(Err(e)) => McpResponse::app_error(request.id, &e),
        Err(_) => McpResponse::app_error(
            request.id,
            &AppError::Timeout("Resource read exceeded the tool timeout".to_string()),
        ),
    }
}

/// Build the tools array returned from tools/list
pub fn build_tools_array() -> Value {
    use crate::cli::{
        AuthorInfoArgs, DiscoverArgs, GetPostsArgs, NewsletterArgs, PostContentArgs,
        SearchAcrossArgs, SearchNewsletterArgs,
    };
    use schemars::schema_for;

    json!([
        {
            "name": "get_newsletter_posts",
            "description": "Get recent posts from a Substack newsletter.",
            "inputSchema": schema_for!(GetPostsArgs)
        },
        {
            "name": "get_post_content",
            "description": "Get the content of a Substack post.",
            "inputSchema": schema_for!(PostContentArgs)
        },
        {
            "name": "search_newsletter",
            "description": "Search for posts within a Substack newsletter.",
            "inputSchema": schema_for!(SearchNewsletterArgs)
        },
        {
            "name": "search_across_substacks",
            "description": "Search for posts across multiple Substack newsletters at once. \
                            Uses the given newsletters, otherwise the ones found by the last discovery, \
                            otherwise a built-in list of popular newsletters.",
            "inputSchema": schema_for!(SearchAcrossArgs)
        },
        {
            "name": "discover_popular_substacks",
            "description": "Discover popular Substack newsletters, optionally within a category. \
                            The result becomes the default set for cross-newsletter searches.",
            "inputSchema": schema_for!(DiscoverArgs)
        },
        {
            "name": "get_author_info",
            "description": "Get information about a Substack author.",
            "inputSchema": schema_for!(AuthorInfoArgs)
        },
        {
            "name": "get_newsletter_recommendations",
            "description": "Get recommended newsletters for a Substack publication.",
            "inputSchema": schema_for!(NewsletterArgs)
        },
        {
            "name": "get_newsletter_authors",
            "description": "Get authors of a Substack newsletter.",
            "inputSchema": schema_for!(NewsletterArgs)
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::substack::fake::FakeSource;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> ServerContext {
        let config = Config {
            cache_file: dir.path().join("cache.json"),
            ..Config::default()
        };
        ServerContext::new(ToolContext::with_source(config, Arc::new(FakeSource::new())))
    }

    fn request(id: Option<Value>, method: &str, params: Option<Value>) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".into(),
            id,
            method: method.into(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize_response_contains_fields() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let params = json!({
            "protocolVersion": "2025-03-26",
            "clientInfo": { "name": "inspector", "version": "1.0" }
        });
        let resp = handle_request(request(Some(json!(1)), "initialize", Some(params)), &mut ctx)
            .await
            .expect("response");

        assert!(resp.error.is_none());
        let result = resp.result.expect("result present");
        assert_eq!(result["serverInfo"]["name"], "substack-mcp");
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert!(result["capabilities"].get("tools").is_some());
        assert_eq!(ctx.get_client_name(), "inspector");
    }

    #[tokio::test]
    async fn test_tools_list_contains_every_tool() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let resp = handle_request(request(Some(json!(2)), "tools/list", None), &mut ctx)
            .await
            .expect("response");
        let result = resp.result.expect("result present");
        let names: Vec<&str> = result["tools"]
            .as_array()
            .expect("tools array")
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();

        for expected in [
            "get_newsletter_posts",
            "get_post_content",
            "search_newsletter",
            "search_across_substacks",
            "discover_popular_substacks",
            "get_author_info",
            "get_newsletter_recommendations",
            "get_newsletter_authors",
        ] {
            assert!(names.contains(&expected), "missing tool {}", expected);
        }
    }

    #[test]
    fn test_search_across_schema_requires_only_query() {
        let tools = build_tools_array();
        let tool = tools
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["name"] == "search_across_substacks")
            .expect("tool present");
        let required: Vec<&str> = tool["inputSchema"]["required"]
            .as_array()
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(required, vec!["query"]);
        assert!(tool["inputSchema"]["properties"].get("popular_only").is_some());
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let resp = handle_request(request(None, "notifications/initialized", None), &mut ctx).await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_request_without_id_gets_no_response() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);

        let resp = handle_request(request(None, "ping", None), &mut ctx).await;
        assert!(resp.is_none());

        let params = json!({ "name": "discover_popular_substacks", "arguments": {} });
        let resp = handle_request(request(None, "tools/call", Some(params)), &mut ctx).await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method_and_tool() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);

        let resp = handle_request(request(Some(json!(3)), "bogus", None), &mut ctx)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);

        let params = json!({ "name": "nope", "arguments": {} });
        let resp = handle_request(request(Some(json!(4)), "tools/call", Some(params)), &mut ctx)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_prompt_get_substitutes_arguments() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let params = json!({ "name": "cross_substack_research", "arguments": { "topic": "housing" } });
        let resp = handle_request(request(Some(json!(5)), "prompts/get", Some(params)), &mut ctx)
            .await
            .unwrap();
        let text = resp.result.unwrap()["messages"][0]["content"]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(text.contains("research housing across"));
    }

    #[tokio::test]
    async fn test_resource_read_without_content() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let params = json!({ "uri": "substack://post/https://x.substack.com/p/missing" });
        let resp = handle_request(request(Some(json!(6)), "resources/read", Some(params)), &mut ctx)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["contents"][0]["text"], "No content available");
    }

    #[test]
    fn test_parse_error_serializes_with_null_id() {
        let resp = McpResponse::error(None, PARSE_ERROR, "Invalid JSON");
        let json = serialize_response(&resp).unwrap();
        assert!(json.contains("\"id\":null"));
        assert!(json.contains("-32700"));
        assert!(parse_request("{oops").is_err());
    }
}
