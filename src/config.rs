//! Client configuration
//!
//! Defaults point at the hosted backend. Values can come from the
//! environment (`AI_JOURNALIST_*`), from a YAML file, or be set directly.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{JournalistError, JournalistResult};

pub const DEFAULT_BASE_URL: &str = "https://ai-news-assistant-6gwu.onrender.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_BASE_URL: &str = "AI_JOURNALIST_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "AI_JOURNALIST_TIMEOUT_SECS";
pub const ENV_WITH_CREDENTIALS: &str = "AI_JOURNALIST_WITH_CREDENTIALS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin every endpoint is rooted at
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Keep cookies between requests
    pub with_credentials: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            with_credentials: true,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Build from `AI_JOURNALIST_*` environment variables, falling back to defaults
    pub fn from_env() -> JournalistResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> JournalistResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                JournalistError::Config(format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_SECS, raw))
            })?;
        }

        if let Some(raw) = lookup(ENV_WITH_CREDENTIALS) {
            config.with_credentials = parse_bool(&raw).ok_or_else(|| {
                JournalistError::Config(format!("{} must be true or false, got '{}'", ENV_WITH_CREDENTIALS, raw))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file; missing keys keep their defaults
    pub fn from_yaml_file(path: impl AsRef<Path>) -> JournalistResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| JournalistError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: ClientConfig = serde_yaml::from_str(&content)
            .map_err(|e| JournalistError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> JournalistResult<()> {
        if self.timeout_secs == 0 {
            return Err(JournalistError::Config("timeout must be greater than zero".into()));
        }
        url::Url::parse(&self.base_url).map_err(|e| JournalistError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.with_credentials);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://localhost:8000/api/v1"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_WITH_CREDENTIALS, "no"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.with_credentials);
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, JournalistError::Config(_)));
    }

    #[test]
    fn test_rejects_relative_base_url() {
        let err = ClientConfig::new("not a url").validate().unwrap_err();
        assert!(matches!(err, JournalistError::InvalidUrl { .. }));
    }

    #[test]
    fn test_from_yaml_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: http://127.0.0.1:9000/api").unwrap();
        writeln!(file, "timeout_secs: 12").unwrap();

        let config = ClientConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.timeout_secs, 12);
        assert!(config.with_credentials);
    }
}
