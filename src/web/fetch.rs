//! Web page fetching.

use tracing::{debug, error};
use url::Url;

use crate::error::{ModulleError, Result};
use crate::provider::http::{shared_client, status_to_error};
use crate::util::retry::RetryPolicy;

use super::convert;

/// A fetched, parsed page.
#[derive(Debug, Clone)]
pub struct PageData {
    /// Final URL after redirects.
    pub url: String,
    pub title: String,
    /// Visible text with scripts, styles, and page chrome removed.
    pub text: String,
    /// Raw HTML body.
    pub html: String,
    pub status: u16,
}

/// Fetches and parses web pages.
///
/// HTTPS-only by default: scheme-less URLs are normalized to `https://`,
/// explicit non-HTTPS schemes are rejected. Transient failures are retried
/// with exponential backoff.
pub struct WebFetcher {
    retry: RetryPolicy,
    allow_http: bool,
}

impl Default for WebFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl WebFetcher {
    pub fn new() -> Self {
        Self {
            retry: RetryPolicy::default(),
            allow_http: false,
        }
    }

    /// Permit plain `http://` URLs. Intended for tests against local servers.
    pub fn allow_http(mut self) -> Self {
        self.allow_http = true;
        self
    }

    /// Normalize and validate a URL under the HTTPS-only policy.
    pub fn normalize_url(&self, raw: &str) -> Result<Url> {
        let parsed = match Url::parse(raw) {
            Ok(url) => url,
            // Scheme-less input ("example.com/page") is assumed HTTPS
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(&format!("https://{raw}"))
                    .map_err(|e| ModulleError::InvalidUrl(format!("{raw}: {e}")))?
            }
            Err(e) => return Err(ModulleError::InvalidUrl(format!("{raw}: {e}"))),
        };

        match parsed.scheme() {
            "https" => Ok(parsed),
            "http" if self.allow_http => Ok(parsed),
            scheme => Err(ModulleError::InvalidUrl(format!(
                "{raw}: scheme '{scheme}' not allowed, use https"
            ))),
        }
    }

    /// Fetch a page and return its parsed content.
    pub async fn fetch_page(&self, url: &str) -> Result<PageData> {
        let target = self.normalize_url(url)?;
        debug!(url = %target, "fetching page");

        let (final_url, status, html) = self
            .retry
            .execute(|| async {
                let resp = shared_client().get(target.clone()).send().await?;
                let status = resp.status().as_u16();
                let final_url = resp.url().to_string();
                if status != 200 {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(status_to_error(status, &body));
                }
                let html = resp.text().await?;
                Ok((final_url, status, html))
            })
            .await
            .map_err(|e| {
                error!(url = %target, error = %e, "failed to fetch page");
                e
            })?;

        let title = convert::extract_title(&html).unwrap_or_default();
        let text = convert::html_to_text(&html);

        Ok(PageData {
            url: final_url,
            title,
            text,
            html,
            status,
        })
    }

    /// Fetch the main article content from a page, using container
    /// heuristics: `<article>`, then `<main>`, then common content div
    /// classes, then the full page text.
    pub async fn fetch_article(&self, url: &str) -> Result<String> {
        let page = self.fetch_page(url).await?;

        if let Some(inner) = convert::extract_container(&page.html, "article") {
            return Ok(convert::html_to_text(&inner));
        }
        if let Some(inner) = convert::extract_container(&page.html, "main") {
            return Ok(convert::html_to_text(&inner));
        }
        for class_name in ["content", "article-content", "post-content", "entry-content"] {
            if let Some(inner) = convert::extract_div_with_class(&page.html, class_name) {
                return Ok(convert::html_to_text(&inner));
            }
        }

        Ok(page.text)
    }
}
