use std::cmp::Reverse;
use std::collections::HashMap;

use crate::models::{AppView, Article, SortOrder};

pub const TRENDING_COUNT: usize = 4;
pub const RELATED_COUNT: usize = 3;
pub const SUGGESTION_COUNT: usize = 5;
pub const POPULAR_TAG_COUNT: usize = 10;

/// Everything that narrows the feed down to what is on screen.
#[derive(Debug, Clone, Copy)]
pub struct FeedQuery<'a> {
    pub view: AppView,
    pub saved_ids: &'a [String],
    pub search: &'a str,
    pub tag: Option<&'a str>,
    pub sort: SortOrder,
}

/// Filter by view, search term and tag, then sort. The input is left untouched.
pub fn visible_articles<'a>(articles: &'a [Article], query: &FeedQuery<'_>) -> Vec<&'a Article> {
    let needle = query.search.to_lowercase();

    let mut visible: Vec<&Article> = articles
        .iter()
        .filter(|a| match query.view {
            AppView::Saved => query.saved_ids.iter().any(|id| *id == a.id),
            AppView::Home => true,
        })
        .filter(|a| a.matches_lowercase(&needle))
        .filter(|a| query.tag.map_or(true, |tag| a.has_tag(tag)))
        .collect();

    match query.sort {
        // Unparseable dates sort after every real one
        SortOrder::Newest => visible.sort_by_key(|a| Reverse(a.published_on())),
        SortOrder::Popular => visible.sort_by_key(|a| Reverse(a.popularity)),
    }

    visible
}

/// Most used tags first; ties keep the order in which tags first appear.
pub fn popular_tags(articles: &[Article], limit: usize) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for tag in articles.iter().flat_map(|a| a.tags.iter()) {
        let count = counts.entry(tag.as_str()).or_insert_with(|| {
            order.push(tag.as_str());
            0
        });
        *count += 1;
    }

    order.sort_by_key(|tag| Reverse(counts[tag]));
    order.into_iter().take(limit).map(str::to_string).collect()
}

pub fn trending(articles: &[Article]) -> &[Article] {
    &articles[..articles.len().min(TRENDING_COUNT)]
}

/// Other articles from the same category.
pub fn related<'a>(article: &Article, all: &'a [Article]) -> Vec<&'a Article> {
    all.iter()
        .filter(|a| a.category == article.category && a.id != article.id)
        .take(RELATED_COUNT)
        .collect()
}

/// Title matches offered while typing in the search box.
pub fn suggestions<'a>(term: &str, all: &'a [Article]) -> Vec<&'a Article> {
    if term.trim().is_empty() {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    all.iter()
        .filter(|a| a.title.to_lowercase().contains(&needle))
        .take(SUGGESTION_COUNT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn article(id: &str, title: &str, excerpt: &str, date: &str, popularity: u8) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            content: String::new(),
            image_url: String::new(),
            category: Category::Ai,
            tags: Vec::new(),
            author: "Alex Chen".to_string(),
            date: date.to_string(),
            reading_time: 1,
            popularity,
            fact_checks: Vec::new(),
            poll: None,
        }
    }

    fn query<'a>(view: AppView, saved: &'a [String], search: &'a str) -> FeedQuery<'a> {
        FeedQuery {
            view,
            saved_ids: saved,
            search,
            tag: None,
            sort: SortOrder::Newest,
        }
    }

    fn ids(articles: &[&Article]) -> Vec<String> {
        articles.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_saved_view_keeps_only_saved() {
        let articles = vec![
            article("A", "Alpha", "first", "December 15, 2024", 10),
            article("B", "Beta", "second", "December 14, 2024", 20),
        ];
        let saved = vec!["A".to_string()];

        let result = visible_articles(&articles, &query(AppView::Saved, &saved, ""));
        assert_eq!(ids(&result), vec!["A"]);
    }

    #[test]
    fn test_search_matches_excerpt_case_insensitively() {
        let articles = vec![
            article("A", "Alpha", "about chips", "December 15, 2024", 10),
            article("B", "Beta", "All About QUANTUM", "December 14, 2024", 20),
        ];
        let saved = vec!["A".to_string()];

        let result = visible_articles(&articles, &query(AppView::Home, &saved, "quantum"));
        assert_eq!(ids(&result), vec!["B"]);
    }

    #[test]
    fn test_search_matches_title() {
        let articles = vec![
            article("A", "Rust 2.0 Released", "", "December 15, 2024", 10),
            article("B", "Beta", "", "December 14, 2024", 20),
        ];

        let result = visible_articles(&articles, &query(AppView::Home, &[], "RUST"));
        assert_eq!(ids(&result), vec!["A"]);
    }

    #[test]
    fn test_tag_filter() {
        let mut a = article("A", "Alpha", "", "December 15, 2024", 10);
        a.tags = vec!["#AI".to_string()];
        let mut b = article("B", "Beta", "", "December 14, 2024", 20);
        b.tags = vec!["#Hardware".to_string()];
        let articles = vec![a, b];

        let mut q = query(AppView::Home, &[], "");
        q.tag = Some("#Hardware");

        assert_eq!(ids(&visible_articles(&articles, &q)), vec!["B"]);
    }

    #[test]
    fn test_sort_popular() {
        let articles = vec![
            article("low", "Low", "", "December 15, 2024", 10),
            article("high", "High", "", "December 14, 2024", 90),
        ];
        let mut q = query(AppView::Home, &[], "");
        q.sort = SortOrder::Popular;

        assert_eq!(ids(&visible_articles(&articles, &q)), vec!["high", "low"]);
    }

    #[test]
    fn test_sort_newest_by_parsed_date() {
        let articles = vec![
            article("old", "Old", "", "November 30, 2024", 10),
            article("bad", "Bad", "", "sometime", 10),
            article("new", "New", "", "December 2, 2024", 10),
            article("mid", "Mid", "", "December 1, 2024", 10),
        ];

        let result = visible_articles(&articles, &query(AppView::Home, &[], ""));
        assert_eq!(ids(&result), vec!["new", "mid", "old", "bad"]);
    }

    #[test]
    fn test_sorting_does_not_mutate_input() {
        let articles = vec![
            article("low", "Low", "", "December 15, 2024", 10),
            article("high", "High", "", "December 14, 2024", 90),
        ];
        let mut q = query(AppView::Home, &[], "");
        q.sort = SortOrder::Popular;

        let _ = visible_articles(&articles, &q);
        assert_eq!(articles[0].id, "low");
        assert_eq!(articles[1].id, "high");
    }

    #[test]
    fn test_popular_tags_ordering() {
        let mut a = article("A", "", "", "", 0);
        a.tags = vec!["#x".to_string(), "#y".to_string()];
        let mut b = article("B", "", "", "", 0);
        b.tags = vec!["#z".to_string(), "#y".to_string()];
        let mut c = article("C", "", "", "", 0);
        c.tags = vec!["#z".to_string()];

        let tags = popular_tags(&[a, b, c], 10);
        assert_eq!(tags, vec!["#y", "#z", "#x"]);

        let mut d = article("D", "", "", "", 0);
        d.tags = vec!["#q".to_string(), "#r".to_string()];
        assert_eq!(popular_tags(&[d], 1), vec!["#q"]);
    }

    #[test]
    fn test_related_same_category_excluding_self() {
        let mut all: Vec<Article> = (0..6)
            .map(|i| article(&i.to_string(), "", "", "", 0))
            .collect();
        all[1].category = Category::Hardware;

        let related = related(&all[0], &all);
        assert_eq!(ids(&related), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_suggestions() {
        let all: Vec<Article> = (0..8)
            .map(|i| article(&i.to_string(), &format!("Quantum {}", i), "", "", 0))
            .collect();

        assert_eq!(suggestions("quant", &all).len(), 5);
        assert!(suggestions("   ", &all).is_empty());
        assert!(suggestions("nothing", &all).is_empty());
    }

    #[test]
    fn test_trending_takes_first_four() {
        let all: Vec<Article> = (0..6).map(|i| article(&i.to_string(), "", "", "", 0)).collect();
        assert_eq!(trending(&all).len(), 4);
        assert_eq!(trending(&all[..2]).len(), 2);
    }
}
