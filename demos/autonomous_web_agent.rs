//! Autonomous web agent example: the model drives `search_web` and
//! `fetch_page` itself through a bounded tool-call loop.
//!
//! ```sh
//! OPENAI_API_KEY=sk-... cargo run --example autonomous_web_agent
//! ```

use std::sync::Arc;

use modulle::prelude::*;
use modulle::web::tools::register_web_tools;

const MAX_ITERATIONS: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = ModulleConfig::from_env();
    let kind = if config.has_credentials("openai") {
        ProviderKind::OpenAi
    } else {
        ProviderKind::Ollama
    };
    let model = config.default_model(&kind.to_string());
    let provider = create_provider(kind, model, &config)?;

    println!("modulle autonomous web agent ({kind})");
    println!("{}", "=".repeat(80));

    let mut registry = ToolRegistry::new();
    register_web_tools(&mut registry, Arc::new(WebAccessor::new()));
    println!("Registered tools: {:?}", registry.names());

    let mut messages = vec![
        ChatMessage::system(
            "You are a research assistant with web access. \
             Search for relevant information, fetch pages to read them, \
             and synthesize what you learn into a clear answer.",
        ),
        ChatMessage::user(
            "What are the main differences between async runtimes in Rust? \
             Search for recent articles and provide a detailed comparison.",
        ),
    ];

    let mut search_count = 0usize;
    let mut fetch_count = 0usize;

    for iteration in 1..=MAX_ITERATIONS {
        println!("\n--- iteration {iteration} ---");

        let request = ChatRequest::new(messages.clone())
            .with_tools(registry.definitions())
            .with_settings(GenerationSettings::with_temperature(0.7));
        let response = provider.chat(&request).await?;

        if !response.wants_tools() {
            println!("\nFinal answer:\n{}", response.text);
            println!(
                "\n({search_count} searches, {fetch_count} fetches, {} iterations)",
                iteration
            );
            return Ok(());
        }

        messages.push(ChatMessage::assistant_tool_calls(
            response.text.clone(),
            response.tool_calls.clone(),
        ));

        for call in &response.tool_calls {
            println!("Tool call: {}({})", call.name, call.arguments);
            match call.name.as_str() {
                "search_web" => search_count += 1,
                "fetch_page" => fetch_count += 1,
                _ => {}
            }
            let result = registry.execute(&call.name, call.arguments.clone()).await;
            messages.push(ChatMessage::tool_result(&call.id, &call.name, result, false));
        }
    }

    println!("\nStopped after {MAX_ITERATIONS} iterations without a final answer.");
    Ok(())
}
