use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::ArticleSource;
use crate::content::slugify;
use crate::error::{AppError, Result};
use crate::models::{Article, Category, FactCheck};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const ARTICLES_PER_REQUEST: usize = 6;

/// Articles written on demand by the Gemini API.
pub struct GenerativeSource {
    client: Client,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedArticle {
    title: String,
    excerpt: String,
    content: String,
    #[serde(default)]
    tags: Vec<String>,
    author: String,
    date: String,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    fact_checks: Vec<FactCheck>,
}

impl GenerativeSource {
    pub fn new(api_key: Option<String>, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
        })
    }

    fn prompt(category: Category) -> String {
        format!(
            "Write {count} realistic, recent technology news articles for the \"{category}\" section \
             of a news site. Each article needs a title, a one or two sentence excerpt, a markdown body \
             of 400-700 words that starts with a '# ' title line and uses '## ' and '### ' section \
             headings, 3-5 hashtag tags such as \"#AI\", an author name, a date formatted like \
             \"December 15, 2024\", a popularity score from 0 to 100, and optionally fact checks \
             with a claim, a verdict (one of Verified, Likely True, Needs Context, Misleading) and \
             an explanation.",
            count = ARTICLES_PER_REQUEST,
            category = category.label(),
        )
    }

    fn request_body(category: Category) -> serde_json::Value {
        json!({
            "contents": [{ "parts": [{ "text": Self::prompt(category) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": { "type": "STRING" },
                            "excerpt": { "type": "STRING" },
                            "content": { "type": "STRING" },
                            "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
                            "author": { "type": "STRING" },
                            "date": { "type": "STRING" },
                            "popularity": { "type": "INTEGER" },
                            "factChecks": {
                                "type": "ARRAY",
                                "items": {
                                    "type": "OBJECT",
                                    "properties": {
                                        "claim": { "type": "STRING" },
                                        "verdict": { "type": "STRING" },
                                        "explanation": { "type": "STRING" }
                                    },
                                    "required": ["claim", "verdict", "explanation"]
                                }
                            }
                        },
                        "required": ["title", "excerpt", "content", "tags", "author", "date", "popularity"]
                    }
                }
            }
        })
    }

    fn status_error(status: StatusCode, body: &str) -> AppError {
        let message = match status {
            StatusCode::TOO_MANY_REQUESTS => "API quota exceeded. Please try again later.".to_string(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                "Invalid API key. Check GEMINI_API_KEY.".to_string()
            }
            StatusCode::BAD_REQUEST if body.contains("API key") => {
                "Invalid API key. Check GEMINI_API_KEY.".to_string()
            }
            _ => format!("Content service returned HTTP {}", status),
        };
        AppError::Source(message)
    }

    fn transport_error(err: reqwest::Error) -> AppError {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            AppError::Source(format!("Network error: could not reach the content service ({})", err))
        } else {
            AppError::Http(err)
        }
    }
}

/// Extract articles from a `generateContent` response body.
fn parse_response(body: &str, category: Category) -> Result<Vec<Article>> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    let text = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .collect::<String>();

    if text.trim().is_empty() {
        return Err(AppError::Source("The content service returned no articles".to_string()));
    }

    let json = strip_code_fence(&text);
    let generated: Vec<GeneratedArticle> = serde_json::from_str(json)
        .map_err(|e| AppError::Source(format!("Failed to parse generated articles: {}", e)))?;

    let articles = generated
        .into_iter()
        .enumerate()
        .map(|(i, g)| {
            let id = format!("gen-{}-{}-{}", slugify(category.label()), i + 1, slugify(&g.title));
            Article {
                image_url: format!("/placeholder-{}.jpg", id),
                id,
                title: g.title,
                excerpt: g.excerpt,
                content: g.content,
                category,
                tags: g.tags,
                author: g.author,
                date: g.date,
                reading_time: 0,
                popularity: g.popularity.min(100) as u8,
                fact_checks: g.fact_checks,
                poll: None,
            }
            .with_derived_fields()
        })
        .collect();

    Ok(articles)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
impl ArticleSource for GenerativeSource {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn fetch(&self, category: Category) -> Result<Vec<Article>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Source("API key is missing. Set GEMINI_API_KEY or gemini_api_key in config.toml.".to_string())
        })?;

        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        tracing::info!("Requesting {} articles from {}", category.label(), self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(category))
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(Self::transport_error)?;

        if !status.is_success() {
            tracing::warn!("Content service error {}: {}", status, body);
            return Err(Self::status_error(status, &body));
        }

        let articles = parse_response(&body, category)?;
        tracing::info!("Generated {} articles", articles.len());
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        })
        .to_string()
    }

    const GENERATED: &str = r##"[
        {
            "title": "Chips Get Faster",
            "excerpt": "A new process node.",
            "content": "# Chips Get Faster\n\n## Why\n\nBecause.",
            "tags": ["#Hardware"],
            "author": "Sam Lee",
            "date": "December 3, 2024",
            "popularity": 140,
            "factChecks": [
                { "claim": "Faster", "verdict": "Verified", "explanation": "Benchmarks." }
            ]
        }
    ]"##;

    #[test]
    fn test_parse_response() {
        let articles = parse_response(&wrap(GENERATED), Category::Hardware).unwrap();

        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.id, "gen-hardware-1-chips-get-faster");
        assert_eq!(a.category, Category::Hardware);
        assert_eq!(a.reading_time, 1);
        assert_eq!(a.popularity, 100);
        assert_eq!(a.fact_checks.len(), 1);
        assert!(a.poll.is_none());
    }

    #[test]
    fn test_parse_response_with_code_fence() {
        let fenced = format!("```json\n{}\n```", GENERATED);
        let articles = parse_response(&wrap(&fenced), Category::Ai).unwrap();
        assert_eq!(articles.len(), 1);
    }

    #[test]
    fn test_parse_empty_candidates() {
        let err = parse_response(r#"{"candidates": []}"#, Category::Ai).unwrap_err();
        assert!(matches!(err, AppError::Source(_)));
    }

    #[test]
    fn test_parse_garbage_text() {
        let err = parse_response(&wrap("Sorry, I can't help with that."), Category::Ai).unwrap_err();
        assert!(err.to_string().contains("Failed to parse generated articles"));
    }

    #[test]
    fn test_status_errors_mention_cause() {
        let quota = GenerativeSource::status_error(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(quota.to_string().contains("quota"));

        let key = GenerativeSource::status_error(StatusCode::BAD_REQUEST, "API key not valid");
        assert!(key.to_string().contains("API key"));

        let other = GenerativeSource::status_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(other.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let source = GenerativeSource::new(Some("  ".to_string()), "gemini-test".to_string()).unwrap();
        let err = source.fetch(Category::Ai).await.unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_prompt_names_category() {
        assert!(GenerativeSource::prompt(Category::Cybersecurity).contains("\"Cybersecurity\""));
        let body = GenerativeSource::request_body(Category::Ai);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }
}
