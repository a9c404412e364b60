//! Recent search queries

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of remembered queries
pub const MAX_RECENT_SEARCHES: usize = 10;

/// Most-recent-first list of search queries
///
/// Re-issuing a query moves it to the front instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SearchHistory {
    queries: VecDeque<String>,
    max_size: usize,
}

impl SearchHistory {
    /// Create an empty history with the given bound
    pub fn new(max_size: usize) -> Self {
        Self {
            queries: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a query at the front
    ///
    /// Blank queries are ignored.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.queries.retain(|q| q != query);
        self.queries.push_front(query.to_string());
        self.queries.truncate(self.max_size);
    }

    /// Query at a position (0 = most recent)
    pub fn get(&self, index: usize) -> Option<&str> {
        self.queries.get(index).map(String::as_str)
    }

    /// Iterate most recent first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(String::as_str)
    }

    /// Number of remembered queries
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.queries.clear();
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(MAX_RECENT_SEARCHES)
    }
}

impl From<Vec<String>> for SearchHistory {
    fn from(queries: Vec<String>) -> Self {
        let mut history = Self::default();
        // Oldest first so the persisted front stays at the front
        for query in queries.iter().rev() {
            history.record(query);
        }
        history
    }
}

impl From<SearchHistory> for Vec<String> {
    fn from(history: SearchHistory) -> Self {
        history.queries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_first() {
        let mut history = SearchHistory::default();
        history.record("a");
        history.record("b");
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn reissue_moves_to_front() {
        let mut history = SearchHistory::default();
        history.record("a");
        history.record("b");
        history.record("a");
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn bounded_to_max_size() {
        let mut history = SearchHistory::default();
        for i in 0..15 {
            history.record(&format!("q{}", i));
        }
        assert_eq!(history.len(), MAX_RECENT_SEARCHES);
        assert_eq!(history.get(0), Some("q14"));
        assert_eq!(history.get(9), Some("q5"));
    }

    #[test]
    fn blank_query_ignored() {
        let mut history = SearchHistory::default();
        history.record("   ");
        assert!(history.is_empty());
    }

    #[test]
    fn persisted_order_survives_reload() {
        let mut history = SearchHistory::default();
        history.record("old");
        history.record("new");

        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#"["new","old"]"#);

        let restored: SearchHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, history);
    }
}
