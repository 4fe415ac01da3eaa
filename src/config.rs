use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::locale::{FormatConfig, Locale};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "LENDING_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "LENDING_API_TIMEOUT_SECS";
pub const ENV_LOCALE: &str = "LENDING_LOCALE";
pub const ENV_AUTH_TOKEN: &str = "LENDING_AUTH_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub locale: Locale,
    pub auth_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            locale: Locale::default(),
            auth_token: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: ENV_BASE_URL,
                    value: base_url,
                });
            }
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: timeout.clone(),
            })?;
        }
        if let Some(locale) = lookup(ENV_LOCALE) {
            config.locale = locale.parse()?;
        }
        config.auth_token = lookup(ENV_AUTH_TOKEN).filter(|t| !t.is_empty());

        Ok(config)
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn format_config(&self) -> FormatConfig {
        FormatConfig::new(self.locale)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://lending.example.com/api/"),
            (ENV_TIMEOUT_SECS, "10"),
            (ENV_LOCALE, "en"),
            (ENV_AUTH_TOKEN, "token-1"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://lending.example.com/api");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.format_config().locale, Locale::En);
        assert_eq!(config.auth_token.as_deref(), Some("token-1"));
    }

    #[test]
    fn rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: "soon".into()
            }
        );
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "ftp://x")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_LOCALE, "de")])).is_err());
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ClientConfig = serde_json::from_str(r#"{ "locale": "en" }"#).unwrap();
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
