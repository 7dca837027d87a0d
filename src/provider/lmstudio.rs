//! LM Studio local provider (OpenAI-compatible).

use async_trait::async_trait;

use crate::error::Result;

use super::openai::OpenAiProvider;
use super::{ChatProvider, ChatRequest, ChatResponse};

pub struct LmStudioProvider {
    inner: OpenAiProvider,
}

impl LmStudioProvider {
    pub fn new(model: String, base_url: String) -> Self {
        Self {
            inner: OpenAiProvider::new(
                model,
                String::new(), // no API key for local
                Some(format!("{}/v1", base_url.trim_end_matches('/'))),
            )
            .with_name("lmstudio"),
        }
    }
}

#[async_trait]
impl ChatProvider for LmStudioProvider {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.inner.chat(request).await
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        self.inner.list_models().await
    }
}
