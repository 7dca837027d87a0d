//! Tool description converters, one per provider wire format.
//!
//! Each converter is a pure function from the internal [`ToolDefinition`]
//! to the JSON fragment that provider expects in its tool/function
//! declaration list. Name, description, and the parameter schema pass
//! through verbatim; only the envelope differs.

use serde_json::{json, Value};

use super::{ProviderKind, ToolDefinition};

/// OpenAI function-calling format.
pub fn openai_tool(def: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": def.name,
            "description": def.description,
            "parameters": def.parameters,
        }
    })
}

/// Anthropic tool format (`input_schema` instead of `parameters`).
pub fn anthropic_tool(def: &ToolDefinition) -> Value {
    json!({
        "name": def.name,
        "description": def.description,
        "input_schema": def.parameters,
    })
}

/// Gemini function declaration format (bare, no envelope).
///
/// Declarations are wrapped in `{"functionDeclarations": [...]}` when the
/// request body is built.
pub fn gemini_tool(def: &ToolDefinition) -> Value {
    json!({
        "name": def.name,
        "description": def.description,
        "parameters": def.parameters,
    })
}

/// Ollama tool format (same envelope as OpenAI).
pub fn ollama_tool(def: &ToolDefinition) -> Value {
    openai_tool(def)
}

/// LM Studio tool format (OpenAI-compatible).
pub fn lmstudio_tool(def: &ToolDefinition) -> Value {
    openai_tool(def)
}

/// Convert a tool definition to the given provider's format.
pub fn tool_definition(kind: ProviderKind, def: &ToolDefinition) -> Value {
    match kind {
        ProviderKind::OpenAi => openai_tool(def),
        ProviderKind::Anthropic => anthropic_tool(def),
        ProviderKind::Gemini => gemini_tool(def),
        ProviderKind::Ollama => ollama_tool(def),
        ProviderKind::LmStudio => lmstudio_tool(def),
    }
}

/// Convert a tool result JSON value into the string payload providers expect.
pub(crate) fn tool_result_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
