//! Chat provider trait and implementations.

pub mod format;
pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "lmstudio")]
pub mod lmstudio;

use async_trait::async_trait;
use strum::{Display, EnumString};

use crate::error::{ModulleError, Result};
use crate::types::{ChatMessage, FinishReason, GenerationSettings, ToolCall, Usage};

/// The supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Ollama,
    LmStudio,
}

/// Internal, provider-neutral description of a callable tool.
///
/// `parameters` is a JSON Schema object (`type`/`properties`/`required`).
/// It is passed through to the provider structurally unchanged.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A request sent to a chat provider.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

impl ChatRequest {
    /// Request with messages only.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Attach a tools payload.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Attach generation settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Response from a chat provider.
///
/// Either `text` is the assistant's reply, or `tool_calls` is non-empty
/// and the caller must execute the named tools and feed their results
/// back into the conversation before re-querying.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<FinishReason>,
    pub usage: Usage,
}

impl ChatResponse {
    /// Whether the model requested any tool calls.
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Core trait implemented by all chat providers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name (e.g., "openai", "gemini").
    fn provider_name(&self) -> &str;

    /// The model id this provider instance serves.
    fn model_id(&self) -> &str;

    /// Send one chat request and return the response.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// List model ids available at this provider.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Check whether the provider is reachable and credentials are valid.
    async fn health_check(&self) -> bool {
        self.list_models().await.is_ok()
    }
}

/// Create a provider for the given backend and model, using the provided config.
#[allow(unused_variables)]
pub fn create_provider(
    kind: ProviderKind,
    model: impl Into<String>,
    config: &crate::config::ModulleConfig,
) -> Result<Box<dyn ChatProvider>> {
    let model = model.into();
    match kind {
        #[cfg(feature = "openai")]
        ProviderKind::OpenAi => {
            let api_key = config
                .get_api_key("openai")
                .ok_or_else(|| ModulleError::Authentication("Missing OPENAI_API_KEY".into()))?;
            Ok(Box::new(openai::OpenAiProvider::new(
                model,
                api_key,
                config.get_base_url("openai"),
            )))
        }
        #[cfg(feature = "anthropic")]
        ProviderKind::Anthropic => {
            let api_key = config
                .get_api_key("anthropic")
                .ok_or_else(|| ModulleError::Authentication("Missing ANTHROPIC_API_KEY".into()))?;
            Ok(Box::new(anthropic::AnthropicProvider::new(
                model,
                api_key,
                config.get_base_url("anthropic"),
            )))
        }
        #[cfg(feature = "gemini")]
        ProviderKind::Gemini => {
            let api_key = config.get_api_key("gemini").ok_or_else(|| {
                ModulleError::Authentication("Missing GEMINI_API_KEY or GOOGLE_API_KEY".into())
            })?;
            Ok(Box::new(gemini::GeminiProvider::new(
                model,
                api_key,
                config.get_base_url("gemini"),
            )))
        }
        #[cfg(feature = "ollama")]
        ProviderKind::Ollama => {
            let base_url = config
                .get_base_url("ollama")
                .unwrap_or_else(|| "http://localhost:11434".to_string());
            Ok(Box::new(ollama::OllamaProvider::new(model, base_url)))
        }
        #[cfg(feature = "lmstudio")]
        ProviderKind::LmStudio => {
            let base_url = config
                .get_base_url("lmstudio")
                .unwrap_or_else(|| "http://localhost:1234".to_string());
            Ok(Box::new(lmstudio::LmStudioProvider::new(model, base_url)))
        }
        #[allow(unreachable_patterns)]
        _ => Err(ModulleError::Configuration(format!(
            "Provider '{kind}' not enabled via feature flags"
        ))),
    }
}
