//! Shared test helpers and mock provider.

use async_trait::async_trait;

use modulle::error::Result;
use modulle::provider::{ChatProvider, ChatRequest, ChatResponse};
use modulle::types::{FinishReason, ToolCall, Usage};

/// A mock provider that returns canned responses and captures requests.
pub struct MockProvider {
    model_id: String,
    responses: std::sync::Mutex<Vec<ChatResponse>>,
    requests: std::sync::Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: std::sync::Mutex::new(Vec::new()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(ChatResponse {
            text: text.to_string(),
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
            usage: Usage::new(10, 20),
        });
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.responses.lock().unwrap().push(ChatResponse {
            text: String::new(),
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args,
            }],
            finish_reason: Some(FinishReason::ToolCalls),
            usage: Usage::new(10, 5),
        });
    }

    /// The last request this provider saw.
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ChatResponse {
                text: "Mock response".to_string(),
                tool_calls: vec![],
                finish_reason: Some(FinishReason::Stop),
                usage: Usage::default(),
            });
        }
        Ok(responses.remove(0))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(vec![self.model_id.clone()])
    }
}
