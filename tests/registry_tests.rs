//! Tests for the tool registry: registration semantics, provider-format
//! exports, and the execute boundary.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use modulle::provider::ProviderKind;
use modulle::tools::tool::{FnTool, Tool};
use modulle::tools::{ToolParameters, ToolRegistry};

fn text_tool(name: &str, description: &str, reply: &'static str) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        name,
        description,
        ToolParameters::object()
            .string("query", "The query", true)
            .build(),
        move |_args, _ctx| async move { Ok(serde_json::Value::String(reply.to_string())) },
    ))
}

#[test]
fn registration_preserves_order() {
    let mut registry = ToolRegistry::new();
    registry.register(text_tool("alpha", "first", "a"));
    registry.register(text_tool("beta", "second", "b"));
    registry.register(text_tool("gamma", "third", "c"));

    assert_eq!(registry.names(), vec!["alpha", "beta", "gamma"]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn reregistering_replaces_without_growing() {
    let mut registry = ToolRegistry::new();
    registry.register(text_tool("alpha", "first", "a"));
    registry.register(text_tool("beta", "second", "b"));
    registry.register(text_tool("alpha", "replacement", "a2"));

    assert_eq!(registry.len(), 2);
    // Position preserved, description replaced
    assert_eq!(registry.names(), vec!["alpha", "beta"]);
    assert_eq!(registry.get("alpha").unwrap().description(), "replacement");
}

#[test]
fn unregister_removes_the_tool() {
    let mut registry = ToolRegistry::new();
    registry.register(text_tool("alpha", "first", "a"));
    assert!(registry.contains("alpha"));

    let removed = registry.unregister("alpha");
    assert!(removed.is_some());
    assert!(registry.is_empty());
    assert!(registry.unregister("alpha").is_none());
}

#[test]
fn every_provider_format_preserves_name_description_and_schema() {
    let mut registry = ToolRegistry::new();
    registry.register(text_tool("search_web", "Search the web", "ok"));
    registry.register(text_tool("fetch_page", "Fetch a page", "ok"));

    let expected_schema = ToolParameters::object()
        .string("query", "The query", true)
        .build()
        .schema;

    for kind in [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Ollama,
        ProviderKind::LmStudio,
    ] {
        let exported = registry.to_provider_format(kind);
        assert_eq!(exported.len(), 2, "{kind}: registration order and count");

        for (value, (name, description)) in exported.iter().zip([
            ("search_web", "Search the web"),
            ("fetch_page", "Fetch a page"),
        ]) {
            // Name and description reachable via the provider's documented path
            let (got_name, got_description, got_schema) = match kind {
                ProviderKind::Anthropic => (
                    &value["name"],
                    &value["description"],
                    &value["input_schema"],
                ),
                ProviderKind::Gemini => {
                    (&value["name"], &value["description"], &value["parameters"])
                }
                _ => (
                    &value["function"]["name"],
                    &value["function"]["description"],
                    &value["function"]["parameters"],
                ),
            };
            assert_eq!(got_name, name, "{kind}: name verbatim");
            assert_eq!(got_description, description, "{kind}: description verbatim");
            assert_eq!(got_schema, &expected_schema, "{kind}: schema unchanged");
        }
    }
}

#[test]
fn convenience_exports_match_provider_format() {
    let mut registry = ToolRegistry::new();
    registry.register(text_tool("alpha", "first", "a"));

    assert_eq!(
        registry.to_openai_format(),
        registry.to_provider_format(ProviderKind::OpenAi)
    );
    assert_eq!(
        registry.to_anthropic_format(),
        registry.to_provider_format(ProviderKind::Anthropic)
    );
    assert_eq!(
        registry.to_gemini_format(),
        registry.to_provider_format(ProviderKind::Gemini)
    );
    assert_eq!(
        registry.to_ollama_format(),
        registry.to_provider_format(ProviderKind::Ollama)
    );
    assert_eq!(
        registry.to_lmstudio_format(),
        registry.to_provider_format(ProviderKind::LmStudio)
    );
}

#[tokio::test]
async fn execute_returns_tool_output_as_string() {
    let mut registry = ToolRegistry::new();
    registry.register(text_tool("alpha", "first", "the answer"));

    let result = registry
        .execute("alpha", serde_json::json!({"query": "x"}))
        .await;
    assert_eq!(result, "the answer");
}

#[tokio::test]
async fn execute_unknown_tool_returns_error_string() {
    let registry = ToolRegistry::new();
    let result = registry.execute("nope", serde_json::json!({})).await;
    assert_eq!(result, "Error executing nope: tool not found");
}

#[tokio::test]
async fn execute_rejects_invalid_arguments_before_running() {
    let mut registry = ToolRegistry::new();
    registry.register(text_tool("alpha", "first", "never"));

    // Missing required "query"
    let result = registry.execute("alpha", serde_json::json!({})).await;
    assert!(result.starts_with("Error executing alpha: invalid arguments"));
    assert!(result.contains("missing required field 'query'"));

    // Wrong type for "query"
    let result = registry
        .execute("alpha", serde_json::json!({"query": 5}))
        .await;
    assert!(result.contains("expected type 'string'"));
}

#[tokio::test]
async fn failing_tool_surfaces_as_error_string_not_fault() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(FnTool::new(
        "flaky",
        "Always fails",
        ToolParameters::empty(),
        |_args, _ctx| async move {
            Err(modulle::error::ModulleError::ToolExecution {
                tool_name: "flaky".into(),
                message: "connection reset".into(),
            })
        },
    )));

    let result = registry.execute("flaky", serde_json::json!({})).await;
    assert!(result.starts_with("Error executing flaky:"));
    assert!(result.contains("connection reset"));
}

#[tokio::test]
async fn object_results_are_serialized_compactly() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(FnTool::new(
        "structured",
        "Returns JSON",
        ToolParameters::empty(),
        |_args, _ctx| async move { Ok(serde_json::json!({"count": 2})) },
    )));

    let result = registry.execute("structured", serde_json::json!({})).await;
    assert_eq!(result, r#"{"count":2}"#);
}
