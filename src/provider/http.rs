//! Shared HTTP client and auth header utilities.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::{REQUEST_TIMEOUT, USER_AGENT};
use crate::error::ModulleError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if !api_key.is_empty() {
        if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
            headers.insert(AUTHORIZATION, val);
        }
    }
    headers
}

/// Build Anthropic-style headers (x-api-key + anthropic-version).
pub fn anthropic_headers(api_key: &str, version: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(api_key) {
        headers.insert("x-api-key", val);
    }
    if let Ok(val) = HeaderValue::from_str(version) {
        headers.insert("anthropic-version", val);
    }
    headers
}

/// Map a non-2xx HTTP status to a typed error.
pub fn status_to_error(status: u16, body: &str) -> ModulleError {
    match status {
        401 | 403 => ModulleError::Authentication(body.to_string()),
        429 => ModulleError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => ModulleError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    // Try to parse retry-after from a JSON error body
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn status_401_maps_to_authentication() {
        let err = status_to_error(401, "invalid key");
        assert_eq!(err.category(), ErrorCategory::Authentication);
    }

    #[test]
    fn status_429_extracts_retry_after() {
        let err = status_to_error(429, r#"{"error": {"retry_after": 1.5}}"#);
        match err {
            ModulleError::RateLimited { retry_after_ms } => {
                assert_eq!(retry_after_ms, Some(1500));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn empty_api_key_omits_authorization_header() {
        let headers = bearer_headers("");
        assert!(!headers.contains_key(AUTHORIZATION));
    }
}
