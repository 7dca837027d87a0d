//! Ollama local provider (native `/api/chat` API).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::CHAT_TIMEOUT;
use crate::error::{ModulleError, Result};
use crate::types::{ChatMessage, ContentPart, FinishReason, Role, ToolCall, Usage};

use super::http::{shared_client, status_to_error};
use super::{format, ChatProvider, ChatRequest, ChatResponse};

pub struct OllamaProvider {
    model: String,
    base_url: String,
}

impl OllamaProvider {
    pub fn new(model: String, base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let messages = request
            .messages
            .iter()
            .map(message_to_ollama)
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        let obj = body.as_object_mut().unwrap();

        // Generation parameters live under "options" in the native API
        let mut options = serde_json::Map::new();
        if let Some(temp) = request.settings.temperature {
            options.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.settings.top_p {
            options.insert("top_p".into(), top_p.into());
        }
        if let Some(max) = request.settings.max_tokens {
            options.insert("num_predict".into(), max.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            options.insert("stop".into(), serde_json::json!(stops));
        }
        if !options.is_empty() {
            obj.insert("options".into(), serde_json::Value::Object(options));
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let tool_defs: Vec<serde_json::Value> =
                    tools.iter().map(format::ollama_tool).collect();
                obj.insert("tools".into(), tool_defs.into());
            }
        }

        body
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let body = self.build_request_body(request);
        let url = format!("{}/api/chat", self.base_url);

        debug!(model = %self.model, provider = "ollama", "chat request");

        let resp = shared_client()
            .post(&url)
            .timeout(CHAT_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            // Ollama reports errors as {"error": "..."}
            let message = serde_json::from_str::<serde_json::Value>(&body_text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body_text);
            return Err(match status {
                401 | 403 | 429 => status_to_error(status, &message),
                _ => ModulleError::Provider {
                    provider: "ollama".into(),
                    message: format!("HTTP {status}: {message}"),
                },
            });
        }

        let data: OllamaChatResponse = resp.json().await?;
        let message = data.message.unwrap_or_default();

        let tool_calls = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, tc)| ToolCall {
                id: tc.id.unwrap_or_else(|| format!("call_{i}")),
                name: tc.function.name,
                // Native API sends arguments as a JSON object already
                arguments: tc.function.arguments,
            })
            .collect::<Vec<_>>();

        let finish_reason = if !tool_calls.is_empty() {
            Some(FinishReason::ToolCalls)
        } else if data.done {
            Some(FinishReason::Stop)
        } else {
            None
        };

        let usage = match (data.prompt_eval_count, data.eval_count) {
            (Some(input), Some(output)) => Usage::new(input, output),
            _ => Usage::default(),
        };

        Ok(ChatResponse {
            text: message.content.unwrap_or_default(),
            tool_calls,
            finish_reason,
            usage,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = shared_client().get(&url).send().await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: OllamaTagList = resp.json().await?;
        Ok(data.models.into_iter().map(|m| m.name).collect())
    }
}

fn message_to_ollama(msg: &ChatMessage) -> serde_json::Value {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };

    if msg.role == Role::Tool {
        if let Some(ContentPart::ToolResult(tr)) = msg.content.first() {
            return serde_json::json!({
                "role": "tool",
                "content": tr.result,
            });
        }
    }

    let tool_calls = msg.tool_calls();
    if !tool_calls.is_empty() {
        let tc_json: Vec<serde_json::Value> = tool_calls
            .iter()
            .map(|tc| {
                serde_json::json!({
                    "function": {
                        "name": tc.name,
                        "arguments": tc.arguments,
                    }
                })
            })
            .collect();
        return serde_json::json!({
            "role": role,
            "content": msg.text(),
            "tool_calls": tc_json,
        });
    }

    // Images ride alongside text as a base64 array in the native API
    let images: Vec<&str> = msg
        .content
        .iter()
        .filter_map(|part| match part {
            ContentPart::Image(img) => Some(img.data.as_str()),
            _ => None,
        })
        .collect();
    if !images.is_empty() {
        return serde_json::json!({
            "role": role,
            "content": msg.text(),
            "images": images,
        });
    }

    serde_json::json!({ "role": role, "content": msg.text() })
}

// Ollama API response types (internal)

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    done: bool,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[derive(Deserialize, Default)]
struct OllamaMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OllamaToolCall>>,
}

#[derive(Deserialize)]
struct OllamaToolCall {
    id: Option<String>,
    function: OllamaFunction,
}

#[derive(Deserialize)]
struct OllamaFunction {
    name: String,
    arguments: serde_json::Value,
}

#[derive(Deserialize)]
struct OllamaTagList {
    models: Vec<OllamaTagEntry>,
}

#[derive(Deserialize)]
struct OllamaTagEntry {
    name: String,
}
