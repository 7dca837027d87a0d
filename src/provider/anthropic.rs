//! Anthropic Messages API provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::CHAT_TIMEOUT;
use crate::error::Result;
use crate::types::{ContentPart, FinishReason, Role, ToolCall, Usage};

use super::http::{anthropic_headers, shared_client, status_to_error};
use super::{format, ChatProvider, ChatRequest, ChatResponse};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// The Messages API requires max_tokens; used when the caller sets none.
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct AnthropicProvider {
    model: String,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(model: String, api_key: String, base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            api_key,
        }
    }

    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut system_parts = Vec::new();
        let mut messages = Vec::new();

        for msg in &request.messages {
            match msg.role {
                Role::System => {
                    system_parts.push(msg.text());
                }
                Role::User => {
                    messages.push(serde_json::json!({
                        "role": "user",
                        "content": build_anthropic_content(&msg.content),
                    }));
                }
                Role::Assistant => {
                    let mut content: Vec<serde_json::Value> = Vec::new();
                    for part in &msg.content {
                        match part {
                            ContentPart::Text { text } => {
                                if !text.is_empty() {
                                    content.push(
                                        serde_json::json!({"type": "text", "text": text}),
                                    );
                                }
                            }
                            ContentPart::ToolCall(tc) => {
                                content.push(serde_json::json!({
                                    "type": "tool_use",
                                    "id": tc.id,
                                    "name": tc.name,
                                    "input": tc.arguments,
                                }));
                            }
                            _ => {}
                        }
                    }
                    if content.is_empty() {
                        let text = msg.text();
                        if !text.is_empty() {
                            messages.push(serde_json::json!({
                                "role": "assistant",
                                "content": text,
                            }));
                        }
                    } else {
                        messages.push(serde_json::json!({
                            "role": "assistant",
                            "content": content,
                        }));
                    }
                }
                Role::Tool => {
                    // Tool results go back as user-role tool_result blocks
                    for part in &msg.content {
                        if let ContentPart::ToolResult(tr) = part {
                            messages.push(serde_json::json!({
                                "role": "user",
                                "content": [{
                                    "type": "tool_result",
                                    "tool_use_id": tr.tool_call_id,
                                    "content": tr.result,
                                    "is_error": tr.is_error,
                                }],
                            }));
                        }
                    }
                }
            }
        }

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });

        let obj = body.as_object_mut().unwrap();

        if !system_parts.is_empty() {
            obj.insert("system".into(), system_parts.join("\n").into());
        }
        if let Some(temp) = request.settings.temperature {
            obj.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.settings.top_p {
            obj.insert("top_p".into(), top_p.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            obj.insert("stop_sequences".into(), serde_json::json!(stops));
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let tool_defs: Vec<serde_json::Value> =
                    tools.iter().map(format::anthropic_tool).collect();
                obj.insert("tools".into(), tool_defs.into());
            }
        }

        body
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let body = self.build_request_body(request);
        let url = format!("{}/messages", self.base_url);

        debug!(model = %self.model, provider = "anthropic", "chat request");

        let resp = shared_client()
            .post(&url)
            .headers(anthropic_headers(&self.api_key, API_VERSION))
            .timeout(CHAT_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: AnthropicResponse = resp.json().await?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for block in data.content {
            match block.r#type.as_str() {
                "text" => {
                    if let Some(t) = block.text {
                        text.push_str(&t);
                    }
                }
                "tool_use" => {
                    if let (Some(id), Some(name)) = (block.id, block.name) {
                        tool_calls.push(ToolCall {
                            id,
                            name,
                            arguments: block
                                .input
                                .unwrap_or(serde_json::Value::Object(Default::default())),
                        });
                    }
                }
                _ => {}
            }
        }

        let finish_reason = match data.stop_reason.as_deref() {
            Some("end_turn") => Some(FinishReason::Stop),
            Some("max_tokens") => Some(FinishReason::Length),
            Some("tool_use") => Some(FinishReason::ToolCalls),
            _ => None,
        };

        Ok(ChatResponse {
            text,
            tool_calls,
            finish_reason,
            usage: Usage::new(data.usage.input_tokens, data.usage.output_tokens),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.base_url);
        let resp = shared_client()
            .get(&url)
            .headers(anthropic_headers(&self.api_key, API_VERSION))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: AnthropicModelList = resp.json().await?;
        Ok(data.data.into_iter().map(|m| m.id).collect())
    }
}

fn build_anthropic_content(content: &[ContentPart]) -> serde_json::Value {
    // Single text part collapses to a plain string
    if content.len() == 1 {
        if let ContentPart::Text { ref text } = content[0] {
            return serde_json::Value::String(text.clone());
        }
    }

    let parts: Vec<serde_json::Value> = content
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => Some(serde_json::json!({
                "type": "text",
                "text": text,
            })),
            ContentPart::Image(img) => Some(serde_json::json!({
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": img.mime_type,
                    "data": img.data,
                }
            })),
            _ => None,
        })
        .collect();

    serde_json::Value::Array(parts)
}

// Anthropic API response types (internal)

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    r#type: String,
    text: Option<String>,
    id: Option<String>,
    name: Option<String>,
    input: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct AnthropicModelList {
    data: Vec<AnthropicModelEntry>,
}

#[derive(Deserialize)]
struct AnthropicModelEntry {
    id: String,
}
