//! modulle — uniform chat-with-tools interface over multiple LLM providers.
//!
//! Wraps the OpenAI, Anthropic, Gemini, Ollama, and LM Studio HTTP APIs
//! behind one [`provider::ChatProvider`] trait, describes callable tools
//! once in a [`tools::ToolRegistry`], converts them to each provider's
//! wire format, and ships web search/fetch helpers ready to register as
//! tools.
//!
//! # Quick Start
//!
//! ```no_run
//! use modulle::prelude::*;
//!
//! # async fn example() -> modulle::error::Result<()> {
//! let config = ModulleConfig::from_env();
//! let provider = create_provider(ProviderKind::OpenAi, "gpt-4o-mini", &config)?;
//!
//! let mut registry = ToolRegistry::new();
//! modulle::web::tools::register_web_tools(&mut registry, std::sync::Arc::new(WebAccessor::new()));
//!
//! let request = ChatRequest::new(vec![ChatMessage::user("What's new in Rust?")])
//!     .with_tools(registry.definitions());
//! let response = provider.chat(&request).await?;
//!
//! for call in &response.tool_calls {
//!     let result = registry.execute(&call.name, call.arguments.clone()).await;
//!     println!("{}: {}", call.name, result);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;
pub mod web;
