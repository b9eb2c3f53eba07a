use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::content;
use crate::models::Poll;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    Latest,
    Ai,
    Software,
    Hardware,
    Cybersecurity,
    Startups,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Latest,
        Category::Ai,
        Category::Software,
        Category::Hardware,
        Category::Cybersecurity,
        Category::Startups,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Latest => "Latest",
            Category::Ai => "AI",
            Category::Software => "Software",
            Category::Hardware => "Hardware",
            Category::Cybersecurity => "Cybersecurity",
            Category::Startups => "Startups",
        }
    }

    /// Case-insensitive lookup; unknown names map to `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(name))
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse(&value).unwrap_or_default()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Verified,
    LikelyTrue,
    NeedsContext,
    Misleading,
    Unrated,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Verified => "Verified",
            Verdict::LikelyTrue => "Likely True",
            Verdict::NeedsContext => "Needs Context",
            Verdict::Misleading => "Misleading",
            Verdict::Unrated => "Fact-Check",
        }
    }
}

impl From<String> for Verdict {
    fn from(value: String) -> Self {
        match value.trim() {
            "Verified" => Verdict::Verified,
            "Likely True" => Verdict::LikelyTrue,
            "Needs Context" => Verdict::NeedsContext,
            "Misleading" => Verdict::Misleading,
            _ => Verdict::Unrated,
        }
    }
}

impl From<Verdict> for String {
    fn from(value: Verdict) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheck {
    pub claim: String,
    pub verdict: Verdict,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    /// Markdown body.
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    /// Display date, e.g. `December 15, 2024`.
    pub date: String,
    #[serde(default)]
    pub reading_time: u32,
    /// Engagement score, 0-100.
    #[serde(default)]
    pub popularity: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fact_checks: Vec<FactCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<Poll>,
}

impl Article {
    /// Recompute fields derived from the body and clamp the popularity score.
    pub fn with_derived_fields(mut self) -> Self {
        self.reading_time = content::calculate_reading_time(&self.content);
        self.popularity = self.popularity.min(100);
        self
    }

    /// Parse the display date. Accepts `December 15, 2024` and `2024-12-15`.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let date = self.date.trim();
        NaiveDate::parse_from_str(date, "%B %d, %Y")
            .or_else(|_| NaiveDate::parse_from_str(date, "%b %d, %Y"))
            .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"))
            .ok()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive substring match against title or excerpt.
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.excerpt.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    #[default]
    Home,
    Saved,
}

impl AppView {
    pub fn cycle(&self) -> Self {
        match self {
            AppView::Home => AppView::Saved,
            AppView::Saved => AppView::Home,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppView::Home => "Home",
            AppView::Saved => "Saved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Popular,
}

impl SortOrder {
    pub fn cycle(&self) -> Self {
        match self {
            SortOrder::Newest => SortOrder::Popular,
            SortOrder::Popular => SortOrder::Newest,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest",
            SortOrder::Popular => "Popular",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_with_date(date: &str) -> Article {
        Article {
            id: "1".to_string(),
            title: "Title".to_string(),
            excerpt: "Excerpt".to_string(),
            content: String::new(),
            image_url: String::new(),
            category: Category::Ai,
            tags: vec!["#AI".to_string()],
            author: "Alex Chen".to_string(),
            date: date.to_string(),
            reading_time: 0,
            popularity: 50,
            fact_checks: Vec::new(),
            poll: None,
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("ai"), Some(Category::Ai));
        assert_eq!(Category::parse("Cybersecurity"), Some(Category::Cybersecurity));
        assert_eq!(Category::parse("gardening"), None);
    }

    #[test]
    fn test_category_cycle_wraps() {
        assert_eq!(Category::Startups.next(), Category::Latest);
        assert_eq!(Category::Latest.prev(), Category::Startups);
    }

    #[test]
    fn test_unknown_category_deserializes_to_latest() {
        let category: Category = serde_json::from_str("\"Gardening\"").unwrap();
        assert_eq!(category, Category::Latest);
    }

    #[test]
    fn test_verdict_from_string() {
        assert_eq!(Verdict::from("Likely True".to_string()), Verdict::LikelyTrue);
        assert_eq!(Verdict::from("Pants on fire".to_string()), Verdict::Unrated);
    }

    #[test]
    fn test_published_on_parses_display_dates() {
        let a = article_with_date("December 15, 2024");
        assert_eq!(a.published_on(), NaiveDate::from_ymd_opt(2024, 12, 15));

        let b = article_with_date("December 9, 2024");
        assert_eq!(b.published_on(), NaiveDate::from_ymd_opt(2024, 12, 9));

        let c = article_with_date("2024-01-02");
        assert_eq!(c.published_on(), NaiveDate::from_ymd_opt(2024, 1, 2));

        assert_eq!(article_with_date("yesterday").published_on(), None);
    }

    #[test]
    fn test_article_json_uses_camel_case() {
        let json = r##"{
            "id": "7",
            "title": "T",
            "excerpt": "E",
            "content": "one two three",
            "imageUrl": "/placeholder-7.jpg",
            "category": "Hardware",
            "tags": ["#CPU"],
            "author": "A",
            "date": "December 9, 2024",
            "readingTime": 99,
            "popularity": 88
        }"##;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.image_url, "/placeholder-7.jpg");
        assert_eq!(article.category, Category::Hardware);
        assert_eq!(article.reading_time, 99);

        let derived = article.with_derived_fields();
        assert_eq!(derived.reading_time, 1);
    }

    #[test]
    fn test_view_and_sort_cycle() {
        assert_eq!(AppView::Home.cycle(), AppView::Saved);
        assert_eq!(AppView::Saved.cycle(), AppView::Home);
        assert_eq!(SortOrder::Newest.cycle(), SortOrder::Popular);
        assert_eq!(SortOrder::Popular.label(), "Popular");
    }
}
