//! Web access: page fetching, search, and tool wrappers.

pub mod convert;
pub mod fetch;
pub mod search;
pub mod tools;

pub use fetch::{PageData, WebFetcher};
pub use search::{SearchBackend, SearchResult, Searcher};

use strum::{Display, EnumString};
use tracing::warn;

use crate::error::Result;

/// Output format for fetched pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PageFormat {
    #[default]
    Text,
    Markdown,
    Html,
}

/// A search hit with its fetched content.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// High-level interface for web access.
///
/// Users call these methods directly and hand the results to an LLM, or
/// wrap them as registry tools via [`tools`].
pub struct WebAccessor {
    fetcher: WebFetcher,
    searcher: Box<dyn Searcher>,
}

impl Default for WebAccessor {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAccessor {
    /// Accessor with the default (DuckDuckGo) search backend.
    pub fn new() -> Self {
        Self {
            fetcher: WebFetcher::new(),
            searcher: Box::new(search::DuckDuckGoSearcher::new()),
        }
    }

    /// Accessor with a specific search backend.
    pub fn with_backend(backend: SearchBackend, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            fetcher: WebFetcher::new(),
            searcher: search::create_searcher(backend, api_key)?,
        })
    }

    /// Accessor built from explicit parts (useful for tests).
    pub fn from_parts(fetcher: WebFetcher, searcher: Box<dyn Searcher>) -> Self {
        Self { fetcher, searcher }
    }

    /// Fetch a page and return its content in the requested format.
    pub async fn fetch_page(&self, url: &str, format: PageFormat) -> Result<String> {
        let page = self.fetcher.fetch_page(url).await?;
        Ok(match format {
            PageFormat::Text => page.text,
            PageFormat::Markdown => convert::html_to_markdown(&page.html),
            PageFormat::Html => page.html,
        })
    }

    /// Fetch the main article content from a page.
    pub async fn fetch_article(&self, url: &str, format: PageFormat) -> Result<String> {
        match format {
            PageFormat::Text => self.fetcher.fetch_article(url).await,
            // Markdown and raw HTML need the full page body
            PageFormat::Markdown | PageFormat::Html => self.fetch_page(url, format).await,
        }
    }

    /// Search the web.
    pub async fn search_web(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        self.searcher.search(query, max_results).await
    }

    /// Search and fetch content from the top results.
    ///
    /// Pages that fail to fetch are skipped; content is truncated to
    /// `max_content_length` characters to keep LLM context bounded.
    pub async fn search_and_fetch(
        &self,
        query: &str,
        num_pages: usize,
        format: PageFormat,
        max_content_length: usize,
    ) -> Result<Vec<FetchedPage>> {
        let results = self.search_web(query, num_pages).await?;

        let mut fetched = Vec::new();
        for result in results {
            match self.fetch_page(&result.url, format).await {
                Ok(content) => fetched.push(FetchedPage {
                    url: result.url,
                    title: result.title,
                    content: truncate_chars(&content, max_content_length),
                }),
                Err(e) => {
                    warn!(url = %result.url, error = %e, "skipping unfetchable result");
                }
            }
        }
        Ok(fetched)
    }
}

/// Truncate a string to at most `max_chars` characters.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
