//! Web search with pluggable backends.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, error};
use url::Url;

use crate::error::{ModulleError, Result};
use crate::provider::http::{shared_client, status_to_error};

use super::convert;

/// Available search backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SearchBackend {
    DuckDuckGo,
    SerpApi,
}

/// A single search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Trait implemented by search backends.
#[async_trait]
pub trait Searcher: Send + Sync + std::fmt::Debug {
    /// Search the web, returning at most `max_results` results in rank
    /// order. Zero results is an empty vec, not an error.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

/// DuckDuckGo search via the HTML endpoint (no API key required).
#[derive(Debug)]
pub struct DuckDuckGoSearcher {
    endpoint: String,
}

impl Default for DuckDuckGoSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoSearcher {
    pub fn new() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
        }
    }

    /// Override the endpoint. Intended for tests against a mock server.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    fn parse_results(html: &str, max_results: usize) -> Vec<SearchResult> {
        static RESULT_LINK: OnceLock<Regex> = OnceLock::new();
        static RESULT_SNIPPET: OnceLock<Regex> = OnceLock::new();
        let link_re = RESULT_LINK.get_or_init(|| {
            Regex::new(r#"(?is)<a[^>]*class="[^"]*result__a[^"]*"[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
                .expect("valid regex")
        });
        let snippet_re = RESULT_SNIPPET.get_or_init(|| {
            Regex::new(r#"(?is)<a[^>]*class="[^"]*result__snippet[^"]*"[^>]*>(.*?)</a>"#)
                .expect("valid regex")
        });

        let snippets: Vec<String> = snippet_re
            .captures_iter(html)
            .map(|c| convert::html_to_text(&c[1]))
            .collect();

        link_re
            .captures_iter(html)
            .take(max_results)
            .enumerate()
            .map(|(i, c)| SearchResult {
                title: convert::html_to_text(&c[2]),
                url: decode_redirect_url(&c[1]),
                snippet: snippets.get(i).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

/// DuckDuckGo result links are redirect URLs carrying the target in the
/// `uddg` query parameter; unwrap it when present.
fn decode_redirect_url(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    if let Ok(parsed) = Url::parse(&absolute) {
        if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
            return target.into_owned();
        }
    }
    absolute
}

#[async_trait]
impl Searcher for DuckDuckGoSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        debug!(query, max_results, backend = "duckduckgo", "searching web");

        let resp = shared_client()
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            error!(query, status, "search request failed");
            return Err(status_to_error(status, &body));
        }

        let html = resp.text().await?;
        Ok(Self::parse_results(&html, max_results))
    }
}

/// SerpAPI search (requires an API key).
#[derive(Debug)]
pub struct SerpApiSearcher {
    api_key: String,
    endpoint: String,
}

impl SerpApiSearcher {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: "https://serpapi.com/search.json".to_string(),
        }
    }

    /// Override the endpoint. Intended for tests against a mock server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SerpApiResult>,
}

#[derive(Deserialize)]
struct SerpApiResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[async_trait]
impl Searcher for SerpApiSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        debug!(query, max_results, backend = "serpapi", "searching web");

        let num = max_results.to_string();
        let resp = shared_client()
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("num", num.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            error!(query, status, "search request failed");
            return Err(status_to_error(status, &body));
        }

        let data: SerpApiResponse = resp.json().await?;
        Ok(data
            .organic_results
            .into_iter()
            .take(max_results)
            .map(|r| SearchResult {
                title: r.title,
                url: r.link,
                snippet: r.snippet,
            })
            .collect())
    }
}

/// Create a search backend instance.
///
/// SerpAPI requires an API key; passing none is a configuration error.
pub fn create_searcher(
    backend: SearchBackend,
    api_key: Option<String>,
) -> Result<Box<dyn Searcher>> {
    match backend {
        SearchBackend::DuckDuckGo => Ok(Box::new(DuckDuckGoSearcher::new())),
        SearchBackend::SerpApi => {
            let api_key = api_key.ok_or_else(|| {
                ModulleError::Configuration("SerpAPI backend requires an API key".into())
            })?;
            Ok(Box::new(SerpApiSearcher::new(api_key)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDG_PAGE: &str = r##"
        <div class="result">
            <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Ffirst&amp;rut=abc">First <b>Result</b></a>
            <a class="result__snippet" href="#">The first snippet.</a>
        </div>
        <div class="result">
            <a rel="nofollow" class="result__a" href="https://example.org/second">Second Result</a>
            <a class="result__snippet" href="#">The second snippet.</a>
        </div>
    "##;

    #[test]
    fn parses_titles_urls_and_snippets() {
        let results = DuckDuckGoSearcher::parse_results(DDG_PAGE, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First Result");
        assert_eq!(results[0].url, "https://example.com/first");
        assert_eq!(results[0].snippet, "The first snippet.");
        assert_eq!(results[1].url, "https://example.org/second");
    }

    #[test]
    fn respects_max_results() {
        let results = DuckDuckGoSearcher::parse_results(DDG_PAGE, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn empty_page_yields_no_results() {
        let results = DuckDuckGoSearcher::parse_results("<html></html>", 10);
        assert!(results.is_empty());
    }

    #[test]
    fn serpapi_without_key_is_a_config_error() {
        let err = create_searcher(SearchBackend::SerpApi, None).unwrap_err();
        assert!(matches!(err, ModulleError::Configuration(_)));
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!(
            "duckduckgo".parse::<SearchBackend>().unwrap(),
            SearchBackend::DuckDuckGo
        );
        assert_eq!(
            "serpapi".parse::<SearchBackend>().unwrap(),
            SearchBackend::SerpApi
        );
    }
}
