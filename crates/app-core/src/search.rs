//! Catalog search
//!
//! Case-insensitive substring search over line text, with optional category
//! scoping and relevance ranking.

use crate::catalog::CatalogItem;

/// Parameters for a catalog search
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Text to look for (case-insensitive); blank matches nothing
    pub query: String,

    /// Restrict results to one category
    pub category: Option<String>,

    /// Maximum number of results
    pub limit: Option<usize>,

    /// Order results by relevance instead of catalog order
    pub ranked: bool,
}

impl SearchParams {
    /// Search for `query` across every category
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Default::default() }
    }

    /// Restrict to one category
    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category = Some(category_id.into());
        self
    }

    /// Cap the number of results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Rank results by relevance
    pub fn ranked(mut self) -> Self {
        self.ranked = true;
        self
    }
}

/// Search `items` according to `params`
pub fn search_items<'a>(items: &'a [CatalogItem], params: &SearchParams) -> Vec<&'a CatalogItem> {
    let query = params.query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<&CatalogItem> = items
        .iter()
        .filter(|item| params.category.as_deref().map_or(true, |c| item.category_id == c))
        .filter(|item| item.text.to_lowercase().contains(&query))
        .collect();

    if params.ranked {
        results = SearchRanking::rank_by_relevance(results, &query);
    }
    if let Some(limit) = params.limit {
        results.truncate(limit);
    }

    tracing::debug!(query = %query, results = results.len(), "Catalog search");
    results
}

/// Relevance ranking for search results
pub struct SearchRanking;

impl SearchRanking {
    /// Rank results by relevance, keeping catalog order among equals
    ///
    /// Ranks results based on:
    /// - Exact matches (text equals query)
    /// - Prefix matches (text starts with query)
    /// - Word matches (a word in the text starts with query)
    /// - Popularity rating as a tie-breaker
    pub fn rank_by_relevance<'a>(items: Vec<&'a CatalogItem>, query: &str) -> Vec<&'a CatalogItem> {
        let query_lower = query.to_lowercase();
        let mut results = items;

        results.sort_by(|a, b| {
            let a_score = Self::calculate_score(a, &query_lower);
            let b_score = Self::calculate_score(b, &query_lower);
            b_score.cmp(&a_score) // Higher scores first
        });

        results
    }

    fn calculate_score(item: &CatalogItem, query: &str) -> u32 {
        let text_lower = item.text.to_lowercase();
        let mut score = 0u32;

        if text_lower == query {
            score += 1000;
        } else if text_lower.starts_with(query) {
            score += 500;
        } else if text_lower.split_whitespace().any(|word| word.starts_with(query)) {
            score += 200;
        } else if text_lower.contains(query) {
            score += 100;
        }

        // Rating in tenths, 0..=50
        score + (item.rating.clamp(0.0, 5.0) * 10.0).round() as u32
    }
}
