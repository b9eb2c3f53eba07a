use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Mock,
    Generative,
}

impl SourceKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Some(SourceKind::Mock),
            "generative" | "gemini" => Some(SourceKind::Generative),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_store_path")]
    pub store_path: String,

    #[serde(default)]
    pub source: SourceKind,

    pub gemini_api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_breaking_news_delay")]
    pub breaking_news_delay_secs: u64,

    #[serde(default = "default_content_update_delay")]
    pub content_update_delay_secs: u64,

    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_store_path() -> String {
    Config::data_dir()
        .join("store.db")
        .to_string_lossy()
        .to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_breaking_news_delay() -> u64 {
    8
}

fn default_content_update_delay() -> u64 {
    20
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            source: SourceKind::default(),
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            breaking_news_delay_secs: default_breaking_news_delay(),
            content_update_delay_secs: default_content_update_delay(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl Config {
    /// Parse config from a TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Serialize config to a TOML string
    pub fn to_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_str(&content)?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        // Environment variables override config file values
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                config.gemini_api_key = Some(key);
            }
        }
        if let Ok(source) = std::env::var("NEWSDESK_SOURCE") {
            match SourceKind::parse(&source) {
                Some(kind) => config.source = kind,
                None => tracing::warn!("Ignoring unknown NEWSDESK_SOURCE value: {}", source),
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, self.to_string()?)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newsdesk")
            .join("config.toml")
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newsdesk")
    }

    pub fn log_path() -> PathBuf {
        Self::data_dir().join("newsdesk.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Default values ====================

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.store_path.contains("newsdesk"));
        assert!(config.store_path.ends_with("store.db"));
        assert_eq!(config.source, SourceKind::Mock);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.breaking_news_delay_secs, 8);
        assert_eq!(config.content_update_delay_secs, 20);
        assert_eq!(config.tick_rate_ms, 250);
    }

    // ==================== TOML parsing ====================

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
store_path = "/custom/path/store.db"
source = "generative"
gemini_api_key = "AIza-test-key"
gemini_model = "gemini-2.0-pro"
breaking_news_delay_secs = 3
content_update_delay_secs = 5
tick_rate_ms = 100
"#;

        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.store_path, "/custom/path/store.db");
        assert_eq!(config.source, SourceKind::Generative);
        assert_eq!(config.gemini_api_key, Some("AIza-test-key".to_string()));
        assert_eq!(config.gemini_model, "gemini-2.0-pro");
        assert_eq!(config.breaking_news_delay_secs, 3);
        assert_eq!(config.content_update_delay_secs, 5);
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = Config::from_str("").unwrap();

        assert!(config.store_path.contains("newsdesk"));
        assert_eq!(config.source, SourceKind::Mock);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.breaking_news_delay_secs, 8);
        assert_eq!(config.content_update_delay_secs, 20);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
tick_rate_ms = 500
"#;

        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.tick_rate_ms, 500);
        assert_eq!(config.source, SourceKind::Mock);
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_parse_unknown_source_is_error() {
        let toml = r#"
source = "carrier-pigeon"
"#;

        assert!(Config::from_str(toml).is_err());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = Config::from_str("this is not valid toml [[[");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_wrong_type() {
        let toml = r#"
breaking_news_delay_secs = "soon"
"#;

        assert!(Config::from_str(toml).is_err());
    }

    // ==================== Serialization ====================

    #[test]
    fn test_roundtrip_serialization() {
        let original = Config {
            store_path: "/my/store.db".to_string(),
            source: SourceKind::Generative,
            gemini_api_key: Some("key123".to_string()),
            gemini_model: "gemini-x".to_string(),
            breaking_news_delay_secs: 1,
            content_update_delay_secs: 2,
            tick_rate_ms: 50,
        };

        let toml = original.to_string().unwrap();
        assert!(toml.contains("source = \"generative\""));

        let parsed = Config::from_str(&toml).unwrap();
        assert_eq!(parsed.store_path, original.store_path);
        assert_eq!(parsed.source, original.source);
        assert_eq!(parsed.gemini_api_key, original.gemini_api_key);
        assert_eq!(parsed.tick_rate_ms, original.tick_rate_ms);
    }

    // ==================== Source kind ====================

    #[test]
    fn test_source_kind_parse() {
        assert_eq!(SourceKind::parse("mock"), Some(SourceKind::Mock));
        assert_eq!(SourceKind::parse(" Generative "), Some(SourceKind::Generative));
        assert_eq!(SourceKind::parse("gemini"), Some(SourceKind::Generative));
        assert_eq!(SourceKind::parse("rss"), None);
    }

    #[test]
    fn test_paths_contain_newsdesk() {
        let path = Config::config_path();
        assert!(path.to_string_lossy().contains("newsdesk"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
        assert!(Config::log_path().to_string_lossy().ends_with("newsdesk.log"));
    }
}
