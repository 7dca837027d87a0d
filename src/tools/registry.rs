//! Tool registry: registration, provider-format export, and execution.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolContext};
use super::validation::validate_arguments;
use crate::provider::{format, ProviderKind, ToolDefinition};

/// Registry of tools available to a model.
///
/// Insertion-ordered: provider-format exports list tools in registration
/// order. Registering a name that already exists replaces the entry in
/// place (last write wins, position preserved).
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if let Some(existing) = self.tools.iter_mut().find(|t| t.name() == name) {
            warn!(tool = %name, "tool already registered, replacing");
            *existing = tool;
        } else {
            debug!(tool = %name, "registered tool");
            self.tools.push(tool);
        }
    }

    /// Remove a tool by name. Returns the removed tool, or `None` if absent.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        let idx = self.tools.iter().position(|t| t.name() == name)?;
        debug!(tool = %name, "unregistered tool");
        Some(self.tools.remove(idx))
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// List registered tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Check if a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Provider-neutral definitions of all tools, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Convert all tools to the given provider's format, preserving
    /// registration order.
    pub fn to_provider_format(&self, kind: ProviderKind) -> Vec<serde_json::Value> {
        self.tools
            .iter()
            .map(|t| format::tool_definition(kind, &t.definition()))
            .collect()
    }

    /// Convert all tools to OpenAI format.
    pub fn to_openai_format(&self) -> Vec<serde_json::Value> {
        self.to_provider_format(ProviderKind::OpenAi)
    }

    /// Convert all tools to Anthropic format.
    pub fn to_anthropic_format(&self) -> Vec<serde_json::Value> {
        self.to_provider_format(ProviderKind::Anthropic)
    }

    /// Convert all tools to Gemini format.
    pub fn to_gemini_format(&self) -> Vec<serde_json::Value> {
        self.to_provider_format(ProviderKind::Gemini)
    }

    /// Convert all tools to Ollama format.
    pub fn to_ollama_format(&self) -> Vec<serde_json::Value> {
        self.to_provider_format(ProviderKind::Ollama)
    }

    /// Convert all tools to LM Studio format.
    pub fn to_lmstudio_format(&self) -> Vec<serde_json::Value> {
        self.to_provider_format(ProviderKind::LmStudio)
    }

    /// Execute a tool by name.
    ///
    /// Always returns a string: the tool's output on success, or a
    /// descriptive error message on any failure (unknown tool, invalid
    /// arguments, execution error). The calling model sees failures as
    /// conversational content and may retry.
    pub async fn execute(&self, name: &str, arguments: serde_json::Value) -> String {
        let tool = match self.get(name) {
            Some(tool) => tool,
            None => {
                warn!(tool = %name, "tool not found");
                return format!("Error executing {name}: tool not found");
            }
        };

        if let Err(msg) = validate_arguments(&arguments, &tool.parameters().schema) {
            warn!(tool = %name, error = %msg, "invalid tool arguments");
            return format!("Error executing {name}: invalid arguments: {msg}");
        }

        info!(tool = %name, "executing tool");
        let args = ToolArguments::new(arguments);
        match tool.execute(&args, &ToolContext::default()).await {
            Ok(value) => {
                debug!(tool = %name, "tool completed");
                format::tool_result_to_string(&value)
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "tool failed");
                format!("Error executing {name}: {e}")
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
