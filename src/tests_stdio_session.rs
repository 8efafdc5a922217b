//! Multi-request sessions driven through the MCP dispatcher, the way a
//! client talks to the server over stdio.

use crate::config::Config;
use crate::discovery;
use crate::mcp::{handle_request, parse_request, serialize_response, ServerContext};
use crate::substack::fake::FakeSource;
use crate::tools::ToolContext;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

async fn send(context: &mut ServerContext, line: &str) -> Option<Value> {
    let request = parse_request(line).unwrap();
    let response = handle_request(request, context).await?;
    let wire = serialize_response(&response).unwrap();
    Some(serde_json::from_str(&wire).unwrap())
}

fn tool_text(response: &Value) -> String {
    response["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_discover_then_search_uses_cached_newsletters() {
    let dir = TempDir::new().unwrap();
    let tech = discovery::discover(Some("technology"), 2).newsletters;

    let mut source = FakeSource::new();
    for newsletter in &tech {
        source = source.with_posts(newsletter, &["Agents everywhere", "Compilers"]);
    }
    let source = Arc::new(source);

    let config = Config {
        cache_file: dir.path().join("cache.json"),
        ..Config::default()
    };
    let mut context = ServerContext::new(ToolContext::with_source(config, source.clone()));

    let init = send(
        &mut context,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"session-test"}}}"#,
    )
    .await
    .unwrap();
    assert_eq!(init["result"]["serverInfo"]["name"], "substack-mcp");

    let initialized = send(
        &mut context,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    )
    .await;
    assert!(initialized.is_none());

    let discover = send(
        &mut context,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"discover_popular_substacks","arguments":{"category":"technology","limit":2}}}"#,
    )
    .await
    .unwrap();
    assert!(tool_text(&discover).starts_with("Popular newsletters in technology:"));

    let search = send(
        &mut context,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"search_across_substacks","arguments":{"query":"agents"}}}"#,
    )
    .await
    .unwrap();

    let text = tool_text(&search);
    assert!(text.starts_with("Search results for 'agents' across 2 newsletters:"));
    for newsletter in &tech {
        assert!(text.contains(&format!("## {}", newsletter)));
    }
    assert!(!text.contains("Compilers"));

    let mut searched = source.searched();
    searched.sort();
    let mut expected = tech.clone();
    expected.sort();
    assert_eq!(searched, expected);
}

#[tokio::test]
async fn test_session_errors_keep_connection_usable() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        cache_file: dir.path().join("cache.json"),
        ..Config::default()
    };
    let mut context = ServerContext::new(ToolContext::with_source(config, Arc::new(FakeSource::new())));

    let unknown = send(&mut context, r#"{"jsonrpc":"2.0","id":1,"method":"bogus/method"}"#)
        .await
        .unwrap();
    assert_eq!(unknown["error"]["code"], -32601);

    let invalid = send(
        &mut context,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"search_newsletter","arguments":{"newsletter_url":"example.substack.com","search_query":""}}}"#,
    )
    .await
    .unwrap();
    assert_eq!(invalid["error"]["code"], -32602);
    assert_eq!(invalid["error"]["data"]["kind"], "invalid_input");

    let ping = send(&mut context, r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#)
        .await
        .unwrap();
    assert_eq!(ping["id"], 3);
    assert!(ping.get("error").is_none());
}
