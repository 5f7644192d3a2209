use serde::{Deserialize, Serialize};

/// Upper bound for the provider request timeout.
const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Generative AI provider configuration
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL for the Gemini API
    pub base_url: String,
    /// Model identifier used for every search
    pub model: String,
    /// API key. Searches fail with a configuration error while this is unset.
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9000".to_string(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl ProviderConfig {
    /// The configured credential, ignoring blank values.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. `from_env` is the
    /// process-environment case.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("GROUNDED_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            config.provider.api_key = Some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            config.provider.model = model;
        }
        if let Some(url) = lookup("GEMINI_BASE_URL") {
            config.provider.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(val) = lookup("GEMINI_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.provider.timeout_secs = v.min(MAX_TIMEOUT_SECS);
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.provider.model, "gemini-2.5-flash");
        assert!(config.provider.credential().is_none());
    }

    #[test]
    fn test_gemini_key_takes_precedence_over_api_key() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "primary"),
            ("API_KEY", "fallback"),
        ]));
        assert_eq!(config.provider.credential(), Some("primary"));
    }

    #[test]
    fn test_api_key_fallback() {
        let config = Config::from_lookup(lookup_from(&[("API_KEY", "fallback")]));
        assert_eq!(config.provider.credential(), Some("fallback"));
    }

    #[test]
    fn test_blank_key_is_not_a_credential() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "   ")]));
        assert!(config.provider.credential().is_none());
    }

    #[test]
    fn test_timeout_is_capped() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_TIMEOUT_SECS", "9000")]));
        assert_eq!(config.provider.timeout_secs, 300);
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.provider.timeout_secs, 60);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config =
            Config::from_lookup(lookup_from(&[("GEMINI_BASE_URL", "http://localhost:8080/")]));
        assert_eq!(config.provider.base_url, "http://localhost:8080");
    }
}
