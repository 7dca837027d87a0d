//! Web research example: search the web, fetch a page, and have a model
//! summarize it.
//!
//! ```sh
//! OLLAMA_BASE_URL=http://localhost:11434 cargo run --example web_research
//! ```

use modulle::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = ModulleConfig::from_env();
    let kind = ProviderKind::Ollama;
    let model = config.default_model("ollama");

    println!("modulle web research example");
    println!("{}", "=".repeat(80));

    let web = WebAccessor::new();

    println!("Connecting to {kind} with model {model}...");
    let provider = create_provider(kind, model, &config)?;
    if !provider.health_check().await {
        eprintln!("Provider is not reachable. For Ollama: `ollama serve`.");
        std::process::exit(1);
    }
    println!("Connected.");

    // Step 1: search the web
    let query = "Rust async programming best practices";
    println!("\nSearching for: '{query}'");
    let results = web.search_web(query, 5).await?;
    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }
    for (i, result) in results.iter().enumerate() {
        println!("{}. {}\n   {}", i + 1, result.title, result.url);
    }

    // Step 2: fetch the top result
    let top = &results[0];
    println!("\nFetching: {}", top.url);
    let content = web.fetch_page(&top.url, PageFormat::Text).await?;
    let excerpt: String = content.chars().take(3000).collect();

    // Step 3: summarize with the model
    println!("\nSummarizing with {}...", provider.model_id());
    let request = ChatRequest::new(vec![
        ChatMessage::system("You summarize web pages in three short bullet points."),
        ChatMessage::user(format!("Summarize this page:\n\n{excerpt}")),
    ])
    .with_settings(GenerationSettings::with_temperature(0.3));

    let response = provider.chat(&request).await?;
    println!("\n{}", response.text);
    Ok(())
}
