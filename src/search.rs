//! Payer-name search
//!
//! The search box takes comma-separated terms. A payer matches when any term
//! is a case-insensitive substring of its name. Blank terms are dropped, and a
//! query with no terms matches everything. A stray comma (`"acme,"`) therefore
//! narrows to Acme instead of widening the search to every payer.

/// Separator between search terms
pub const TERM_SEPARATOR: char = ',';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    pub fn parse(input: &str) -> Self {
        let terms = input
            .split(TERM_SEPARATOR)
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        Self { terms }
    }

    /// Lowercased terms
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let name = name.to_lowercase();
        self.terms.iter().any(|term| name.contains(term.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_and_trims() {
        let query = SearchQuery::parse(" Acme ,beta,  GAMA ");
        assert_eq!(query.terms(), &["acme", "beta", "gama"]);
    }

    #[test]
    fn test_blank_terms_are_dropped() {
        let query = SearchQuery::parse("acme, , ,");
        assert_eq!(query.terms(), &["acme"]);
        assert!(SearchQuery::parse("  ,  ").is_empty());
    }

    #[test]
    fn test_trailing_comma_does_not_match_everyone() {
        let query = SearchQuery::parse("acme,");
        assert!(query.matches("Acme Ltda"));
        assert!(!query.matches("Beta S.A."));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let query = SearchQuery::parse("");
        assert!(query.matches("Acme Ltda"));
        assert!(query.matches(""));
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let query = SearchQuery::parse("acme");
        assert!(query.matches("ACME Comércio Ltda"));
        assert!(query.matches("Grupo Acme"));
        assert!(!query.matches("Beta S.A."));
    }

    #[test]
    fn test_any_term_matches() {
        let query = SearchQuery::parse("beta, gama");
        assert!(query.matches("Beta S.A."));
        assert!(query.matches("Gama Energia"));
        assert!(!query.matches("Acme"));
    }

    #[test]
    fn test_accented_names_match_case_insensitively() {
        let query = SearchQuery::parse("ÓTICA");
        assert!(query.matches("Ótica São João"));
    }
}
