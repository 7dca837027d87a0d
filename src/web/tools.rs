//! Web access tools for LLM tool calling.
//!
//! Wraps [`WebAccessor`] as two registry tools, `search_web` and
//! `fetch_page`. Each tool is constructed via [`FnTool::new`] and returned
//! as `Arc<dyn Tool>`.

use std::sync::Arc;

use tracing::info;

use crate::tools::tool::{execution_error, FnTool, Tool};
use crate::tools::types::ToolParameters;

use super::{truncate_chars, PageFormat, WebAccessor};

const FETCH_MAX_CHARS: usize = 8000;

/// Create the `search_web` tool.
pub fn search_web_tool(web: Arc<WebAccessor>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "search_web",
        "Search the web for information. Use this tool when you need to find \
         current information, news, articles, documentation, or any external knowledge. \
         Returns a list of search results with titles, URLs, and brief snippets. \
         Each result provides enough context to decide if you should fetch the full page.",
        ToolParameters::from_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query. Be specific and use relevant keywords."
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default: 5, max: 10)",
                    "default": 5,
                    "minimum": 1,
                    "maximum": 10
                }
            },
            "required": ["query"]
        })),
        move |args, _ctx| {
            let web = web.clone();
            async move {
                let query = args.get_str("query")?.to_string();
                let max_results = args.get_i64_opt("max_results").unwrap_or(5).clamp(1, 10) as usize;

                info!(query = %query, "searching web");
                let results = web
                    .search_web(&query, max_results)
                    .await
                    .map_err(|e| execution_error("search_web", e.to_string()))?;

                if results.is_empty() {
                    return Ok(serde_json::Value::String(format!(
                        "No results found for query: {query}"
                    )));
                }

                let mut formatted = format!("Search results for '{query}':\n\n");
                for (i, result) in results.iter().enumerate() {
                    formatted.push_str(&format!("{}. {}\n", i + 1, result.title));
                    formatted.push_str(&format!("   URL: {}\n", result.url));
                    formatted.push_str(&format!("   Snippet: {}\n\n", result.snippet));
                }

                info!(count = results.len(), "search complete");
                Ok(serde_json::Value::String(formatted))
            }
        },
    ))
}

/// Create the `fetch_page` tool.
pub fn fetch_page_tool(web: Arc<WebAccessor>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "fetch_page",
        "Fetch and return the full content of a web page. Use this tool when you need \
         to read the complete text of a specific URL, such as an article, documentation, \
         or blog post. The content is returned as clean text suitable for analysis. \
         Note: Content may be truncated if very long to fit within context limits.",
        ToolParameters::from_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The full URL of the web page to fetch. Must be a valid HTTPS URL."
                },
                "format": {
                    "type": "string",
                    "enum": ["text", "markdown"],
                    "description": "Output format: 'text' for plain text, 'markdown' for formatted markdown (default: text)",
                    "default": "text"
                }
            },
            "required": ["url"]
        })),
        move |args, _ctx| {
            let web = web.clone();
            async move {
                let url = args.get_str("url")?.to_string();
                // Unknown formats fall back to text
                let format = args
                    .get_str_opt("format")
                    .and_then(|f| f.parse::<PageFormat>().ok())
                    .unwrap_or(PageFormat::Text);

                info!(url = %url, "fetching page");
                let content = web
                    .fetch_page(&url, format)
                    .await
                    .map_err(|e| execution_error("fetch_page", e.to_string()))?;

                if content.is_empty() {
                    return Ok(serde_json::Value::String(format!(
                        "Failed to fetch content from {url}. The page may be unavailable or blocked."
                    )));
                }

                let mut content = content;
                if content.chars().count() > FETCH_MAX_CHARS {
                    content = truncate_chars(&content, FETCH_MAX_CHARS);
                    content.push_str(&format!(
                        "\n\n[Content truncated to {FETCH_MAX_CHARS} characters]"
                    ));
                }

                info!(url = %url, chars = content.chars().count(), "fetch complete");
                Ok(serde_json::Value::String(content))
            }
        },
    ))
}

/// Register both web tools on a registry, sharing one accessor.
pub fn register_web_tools(registry: &mut crate::tools::ToolRegistry, web: Arc<WebAccessor>) {
    registry.register(search_web_tool(web.clone()));
    registry.register(fetch_page_tool(web));
}
