//! Article providers. The UI only ever talks to [`ArticleSource`], so the
//! bundled mock dataset and the generative API are interchangeable.

mod generative;
mod mock;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, SourceKind};
use crate::error::{AppError, Result};
use crate::models::{Article, Category};

pub use generative::GenerativeSource;
pub use mock::MockSource;

const GENERIC_FAILURE: &str =
    "Failed to fetch articles. The AI might be taking a coffee break. Please try again later.";

#[async_trait]
pub trait ArticleSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Articles for one category, in provider order.
    async fn fetch(&self, category: Category) -> Result<Vec<Article>>;
}

pub fn from_config(config: &Config) -> Result<Arc<dyn ArticleSource>> {
    let source: Arc<dyn ArticleSource> = match config.source {
        SourceKind::Mock => Arc::new(MockSource::new()?),
        SourceKind::Generative => Arc::new(GenerativeSource::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )?),
    };
    tracing::info!("Using {} article source", source.name());
    Ok(source)
}

/// Text for the error panel. Key, quota and network problems are shown as
/// reported; anything else gets the generic retry message.
pub fn user_message(err: &AppError) -> String {
    let message = err.to_string();
    if message.contains("API key") || message.contains("quota") || message.contains("Network") {
        message
    } else {
        GENERIC_FAILURE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_passes_known_failures_through() {
        let err = AppError::Source("API quota exceeded. Please try again later.".to_string());
        assert_eq!(user_message(&err), "API quota exceeded. Please try again later.");

        let err = AppError::Source("Network error: connection refused".to_string());
        assert!(user_message(&err).starts_with("Network error"));

        let err = AppError::Source("Invalid API key".to_string());
        assert_eq!(user_message(&err), "Invalid API key");
    }

    #[test]
    fn test_user_message_generic_fallback() {
        let err = AppError::Source("unexpected token at line 3".to_string());
        assert_eq!(user_message(&err), GENERIC_FAILURE);
    }

    #[test]
    fn test_from_config_selects_source() {
        let config = Config::default();
        assert_eq!(from_config(&config).unwrap().name(), "mock");

        let config = Config {
            source: SourceKind::Generative,
            ..Config::default()
        };
        assert_eq!(from_config(&config).unwrap().name(), "generative");
    }
}
