//! Tests for the tool system.

use modulle::tools::tool::{FnTool, Tool, ToolContext};
use modulle::tools::*;

#[test]
fn parameter_builder_constructs_schema() {
    let params = ToolParameters::object()
        .string("query", "Search query", true)
        .integer("limit", "Max results", false)
        .boolean("verbose", "Enable verbose output", false)
        .build();

    let schema = &params.schema;
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["query"]["type"], "string");
    assert_eq!(schema["properties"]["limit"]["type"], "integer");
    assert_eq!(schema["required"].as_array().unwrap().len(), 1);
}

#[test]
fn parameter_builder_string_enum() {
    let params = ToolParameters::object()
        .string_enum("format", "Output format", &["text", "markdown"], true)
        .build();

    let enums = params.schema["properties"]["format"]["enum"]
        .as_array()
        .unwrap();
    assert_eq!(enums.len(), 2);
}

#[test]
fn empty_parameters() {
    let params = ToolParameters::empty();
    assert_eq!(params.schema["type"], "object");
}

#[test]
fn tool_arguments_get_str() {
    let args = ToolArguments::new(serde_json::json!({"name": "Alice", "age": 30}));
    assert_eq!(args.get_str("name").unwrap(), "Alice");
    assert!(args.get_str("missing").is_err());
}

#[test]
fn tool_arguments_get_i64() {
    let args = ToolArguments::new(serde_json::json!({"count": 42}));
    assert_eq!(args.get_i64("count").unwrap(), 42);
    assert_eq!(args.get_i64_opt("count"), Some(42));
    assert_eq!(args.get_i64_opt("missing"), None);
}

#[test]
fn tool_arguments_get_bool() {
    let args = ToolArguments::new(serde_json::json!({"active": true}));
    assert!(args.get_bool("active").unwrap());
}

#[test]
fn tool_arguments_optional() {
    let args = ToolArguments::new(serde_json::json!({"name": "test"}));
    assert_eq!(args.get_str_opt("name"), Some("test"));
    assert_eq!(args.get_str_opt("missing"), None);
}

#[test]
fn tool_arguments_deserialize() {
    #[derive(serde::Deserialize, PartialEq, Debug)]
    struct Params {
        query: String,
        limit: Option<u32>,
    }

    let args = ToolArguments::new(serde_json::json!({"query": "rust", "limit": 10}));
    let params: Params = args.deserialize().unwrap();
    assert_eq!(params.query, "rust");
    assert_eq!(params.limit, Some(10));
}

#[test]
fn tool_arguments_deserialize_from_json_string() {
    #[derive(serde::Deserialize, PartialEq, Debug)]
    struct Params {
        url: String,
    }

    let args = ToolArguments::new(serde_json::json!(r#"{"url": "https://example.com"}"#));
    let params: Params = args.deserialize().unwrap();
    assert_eq!(params.url, "https://example.com");
}

#[tokio::test]
async fn fn_tool_executes() {
    let tool = FnTool::new(
        "greet",
        "Greet a person",
        ToolParameters::object().string("name", "Name", true).build(),
        |args, _ctx| async move {
            let name = args.get_str("name")?;
            Ok(serde_json::json!({"greeting": format!("Hello, {}!", name)}))
        },
    );

    assert_eq!(tool.name(), "greet");
    assert_eq!(tool.description(), "Greet a person");

    let args = ToolArguments::new(serde_json::json!({"name": "World"}));
    let result = tool.execute(&args, &ToolContext::default()).await.unwrap();
    assert_eq!(result["greeting"], "Hello, World!");
}

#[test]
fn tool_definition_reflects_trait_getters() {
    let tool = FnTool::new(
        "noop",
        "Does nothing",
        ToolParameters::empty(),
        |_args, _ctx| async move { Ok(serde_json::Value::Null) },
    );
    let def = tool.definition();
    assert_eq!(def.name, "noop");
    assert_eq!(def.description, "Does nothing");
    assert_eq!(def.parameters, ToolParameters::empty().schema);
}
