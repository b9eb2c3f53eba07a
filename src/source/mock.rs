use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;

use super::ArticleSource;
use crate::error::Result;
use crate::models::{Article, Category};

const DATASET: &str = include_str!("../../data/mock_articles.json");

/// Bundled articles served with a short artificial delay.
pub struct MockSource {
    by_category: HashMap<Category, Vec<Article>>,
    latency_ms: (u64, u64),
}

impl MockSource {
    pub fn new() -> Result<Self> {
        let raw: HashMap<Category, Vec<Article>> = serde_json::from_str(DATASET)?;
        let by_category = raw
            .into_iter()
            .map(|(category, articles)| {
                let articles = articles
                    .into_iter()
                    .map(|a| {
                        let image_url = format!("/placeholder-{}.jpg", a.id);
                        Article { image_url, ..a }.with_derived_fields()
                    })
                    .collect();
                (category, articles)
            })
            .collect();

        Ok(Self {
            by_category,
            latency_ms: (50, 200),
        })
    }

    /// Same dataset, no simulated network delay.
    #[cfg(test)]
    pub fn instant() -> Result<Self> {
        Ok(Self {
            latency_ms: (0, 0),
            ..Self::new()?
        })
    }

    fn articles_for(&self, category: Category) -> Vec<Article> {
        self.by_category
            .get(&category)
            .or_else(|| self.by_category.get(&Category::Latest))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ArticleSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, category: Category) -> Result<Vec<Article>> {
        tracing::debug!("Fetching articles for category: {}", category.label());
        let started = Instant::now();

        let (min, max) = self.latency_ms;
        if max > 0 {
            let delay = rand::rng().random_range(min..=max);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let articles = self.articles_for(category);
        tracing::debug!(
            "Fetched {} articles in {}ms",
            articles.len(),
            started.elapsed().as_millis()
        );
        Ok(articles)
    }
}
