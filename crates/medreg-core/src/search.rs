//! Tokenized full-name search.

/// A parsed free-text name query.
///
/// Matching is conjunctive substring search: every token must occur in at
/// least one of the candidate's three name fields. No ranking, no fuzzy
/// matching, no stemming.
#[derive(Debug, Clone, Default)]
pub struct NameQuery {
    tokens: Vec<String>,
}

impl NameQuery {
    /// Tokenize a query: lowercase, split on whitespace runs, drop empty
    /// tokens. Lowercasing is Unicode-aware, so Cyrillic queries work.
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    /// A query with no tokens applies no filtering.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check a candidate's name fields against every token.
    ///
    /// AND across tokens, OR across fields per token. Vacuously true for an
    /// empty query.
    pub fn matches(&self, first_name: &str, last_name: &str, middle_name: Option<&str>) -> bool {
        if self.tokens.is_empty() {
            return true;
        }
        let first = first_name.to_lowercase();
        let last = last_name.to_lowercase();
        let middle = middle_name.map(str::to_lowercase);

        self.tokens.iter().all(|token| {
            first.contains(token.as_str())
                || last.contains(token.as_str())
                || middle.as_deref().map_or(false, |m| m.contains(token.as_str()))
        })
    }
}
