//! Configuration (layered: explicit setters > environment).

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = "modulle/0.2.0 (AI Provider Abstraction)";

/// Timeout for ordinary HTTP requests (model listing, page fetches).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for chat generation requests.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(90);

/// Global default config (lazy-initialized from env).
static DEFAULT_CONFIG: OnceLock<ModulleConfig> = OnceLock::new();

/// Layered configuration for modulle.
///
/// API keys, base URLs, and default model ids are resolved per provider
/// name ("openai", "anthropic", "gemini", "ollama", "lmstudio"). Explicit
/// setters win over values loaded from the environment.
#[derive(Debug, Clone, Default)]
pub struct ModulleConfig {
    api_keys: Arc<RwLock<HashMap<String, String>>>,
    base_urls: Arc<RwLock<HashMap<String, String>>>,
    default_models: Arc<RwLock<HashMap<String, String>>>,
}

impl ModulleConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables (OPENAI_API_KEY, ANTHROPIC_API_KEY, etc.).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let config = Self::new();

        let key_mappings = [
            ("OPENAI_API_KEY", "openai"),
            ("ANTHROPIC_API_KEY", "anthropic"),
            ("GEMINI_API_KEY", "gemini"),
            ("GOOGLE_API_KEY", "gemini"),
            ("SERPAPI_API_KEY", "serpapi"),
        ];
        for (env_var, provider) in &key_mappings {
            if let Ok(key) = std::env::var(env_var) {
                // GEMINI_API_KEY takes precedence over GOOGLE_API_KEY
                if config.get_api_key(provider).is_none() {
                    config.set_api_key(provider, key);
                }
            }
        }

        let url_mappings = [
            ("OPENAI_BASE_URL", "openai"),
            ("ANTHROPIC_BASE_URL", "anthropic"),
            ("GEMINI_BASE_URL", "gemini"),
            ("OLLAMA_BASE_URL", "ollama"),
            ("LM_STUDIO_BASE_URL", "lmstudio"),
        ];
        for (env_var, provider) in &url_mappings {
            if let Ok(url) = std::env::var(env_var) {
                config.set_base_url(provider, url);
            }
        }

        let model_mappings = [
            ("OPENAI_TEXT_MODEL", "openai"),
            ("CLAUDE_TEXT_MODEL", "anthropic"),
            ("GEMINI_TEXT_MODEL", "gemini"),
            ("OLLAMA_TEXT_MODEL", "ollama"),
            ("LM_STUDIO_TEXT_MODEL", "lmstudio"),
        ];
        for (env_var, provider) in &model_mappings {
            if let Ok(model) = std::env::var(env_var) {
                config.set_default_model(provider, model);
            }
        }

        config
    }

    /// Get (or create) the global default config.
    pub fn global() -> &'static ModulleConfig {
        DEFAULT_CONFIG.get_or_init(Self::from_env)
    }

    pub fn set_api_key(&self, provider: &str, key: impl Into<String>) {
        self.api_keys
            .write()
            .unwrap()
            .insert(provider.to_string(), key.into());
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.api_keys.read().unwrap().get(provider).cloned()
    }

    pub fn set_base_url(&self, provider: &str, url: impl Into<String>) {
        self.base_urls
            .write()
            .unwrap()
            .insert(provider.to_string(), url.into());
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls.read().unwrap().get(provider).cloned()
    }

    pub fn set_default_model(&self, provider: &str, model: impl Into<String>) {
        self.default_models
            .write()
            .unwrap()
            .insert(provider.to_string(), model.into());
    }

    /// Default model for a provider, falling back to built-in defaults.
    pub fn default_model(&self, provider: &str) -> String {
        if let Some(model) = self.default_models.read().unwrap().get(provider) {
            return model.clone();
        }
        match provider {
            "openai" => "gpt-4o-mini",
            "anthropic" => "claude-3-5-haiku-20241022",
            "gemini" => "gemini-1.5-flash",
            "ollama" => "llama2",
            "lmstudio" => "local-model",
            _ => "",
        }
        .to_string()
    }

    /// Check if a provider has an API key configured.
    pub fn has_credentials(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_is_returned() {
        let config = ModulleConfig::new();
        config.set_api_key("openai", "sk-test");
        assert_eq!(config.get_api_key("openai"), Some("sk-test".to_string()));
        assert!(config.has_credentials("openai"));
        assert!(!config.has_credentials("anthropic"));
    }

    #[test]
    fn base_url_overrides_are_per_provider() {
        let config = ModulleConfig::new();
        config.set_base_url("ollama", "http://192.168.1.10:11434");
        assert_eq!(
            config.get_base_url("ollama"),
            Some("http://192.168.1.10:11434".to_string())
        );
        assert_eq!(config.get_base_url("lmstudio"), None);
    }

    #[test]
    fn default_model_falls_back_to_builtin() {
        let config = ModulleConfig::new();
        assert_eq!(config.default_model("openai"), "gpt-4o-mini");
        config.set_default_model("openai", "gpt-4o");
        assert_eq!(config.default_model("openai"), "gpt-4o");
    }
}
