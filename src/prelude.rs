//! Convenience re-exports for common use.

pub use crate::config::ModulleConfig;
pub use crate::error::{ModulleError, Result};
pub use crate::provider::{
    create_provider, ChatProvider, ChatRequest, ChatResponse, ProviderKind, ToolDefinition,
};
pub use crate::tools::{FnTool, Tool, ToolArguments, ToolParameters, ToolRegistry};
pub use crate::types::{ChatMessage, FinishReason, GenerationSettings, Role, ToolCall, Usage};
pub use crate::web::{PageFormat, SearchBackend, SearchResult, WebAccessor};
