//! Site-wide service search.
//!
//! The index owns the full service list (seeded once from the CMS fetch)
//! and the current query; results are always derived, never stored.

use serde::{Deserialize, Serialize};

use crate::services::ServiceSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub all_services: Vec<ServiceSummary>,
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    state: SearchState,
    seeded: bool,
}

impl SearchIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the searchable list. An empty list (e.g. after a failed
    /// fetch) is accepted; every non-blank query then yields no results.
    pub fn set_all(&mut self, services: Vec<ServiceSummary>) {
        self.state.all_services = services;
        self.seeded = true;
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.state.query = text.into();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.state.query
    }

    #[must_use]
    pub fn all(&self) -> &[ServiceSummary] {
        &self.state.all_services
    }

    /// Whether [`Self::set_all`] has been called at least once.
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Services matching the current query.
    #[must_use]
    pub fn results(&self) -> Vec<&ServiceSummary> {
        self.search(&self.state.query)
    }

    /// Services whose title or description contains `query`, ignoring case
    /// and surrounding whitespace, in list order.
    ///
    /// A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ServiceSummary> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.state
            .all_services
            .iter()
            .filter(|service| {
                service.title.to_lowercase().contains(&needle)
                    || service.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceId;

    fn service(id: i64, title: &str, description: &str) -> ServiceSummary {
        ServiceSummary {
            id: ServiceId::Int(id),
            title: title.to_owned(),
            description: description.to_owned(),
            slug: format!("service-{id}"),
            image: Vec::new(),
        }
    }

    fn seeded() -> SearchIndex {
        let mut index = SearchIndex::new();
        index.set_all(vec![
            service(1, "Чистка лица", "Ультразвуковая и механическая"),
            service(2, "Массаж", "Скульптурирующий массаж лица"),
        ]);
        index
    }

    fn titles<'a>(results: &[&'a ServiceSummary]) -> Vec<&'a str> {
        results.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn empty_query_matches_nothing() {
        let mut index = seeded();
        index.set_query("");
        assert!(index.results().is_empty());
    }

    #[test]
    fn whitespace_query_matches_nothing() {
        let mut index = seeded();
        index.set_query("   ");
        assert!(index.results().is_empty());
    }

    #[test]
    fn title_prefix_matches() {
        let mut index = seeded();
        index.set_query("масс");
        assert_eq!(titles(&index.results()), vec!["Массаж"]);
    }

    #[test]
    fn matching_ignores_case() {
        let mut index = seeded();
        index.set_query("ЧИСТКА");
        assert_eq!(titles(&index.results()), vec!["Чистка лица"]);
    }

    #[test]
    fn description_matches_preserve_list_order() {
        let mut index = seeded();
        index.set_query("ЛИЦА");
        assert_eq!(titles(&index.results()), vec!["Чистка лица", "Массаж"]);
    }

    #[test]
    fn uppercase_query_finds_lowercase_title() {
        let mut index = SearchIndex::new();
        index.set_all(vec![
            service(1, "Чистка лица", "..."),
            service(2, "Массаж", "..."),
        ]);
        index.set_query("ЛИЦА");
        assert_eq!(titles(&index.results()), vec!["Чистка лица"]);
    }

    #[test]
    fn query_is_trimmed() {
        let mut index = seeded();
        index.set_query("  массаж ");
        assert_eq!(titles(&index.results()), vec!["Массаж"]);
    }

    #[test]
    fn unknown_query_matches_nothing() {
        let mut index = seeded();
        index.set_query("zzz");
        assert!(index.results().is_empty());
    }

    #[test]
    fn empty_seed_yields_no_results() {
        let mut index = SearchIndex::new();
        index.set_all(Vec::new());
        index.set_query("массаж");
        assert!(index.is_seeded());
        assert!(index.results().is_empty());
    }

    #[test]
    fn search_does_not_touch_stored_query() {
        let mut index = seeded();
        index.set_query("чистка");
        assert_eq!(titles(&index.search("массаж")), vec!["Массаж"]);
        assert_eq!(index.query(), "чистка");
    }

    #[test]
    fn reseeding_replaces_the_list() {
        let mut index = seeded();
        index.set_all(vec![service(3, "Пилинг", "")]);
        index.set_query("массаж");
        assert!(index.results().is_empty());
        assert_eq!(index.all().len(), 1);
    }
}
