use std::collections::BTreeSet;

use super::pager::Pager;
use crate::models::{LeaderField, LeaderRole, TraditionalLeader};

/// Headline counts over every loaded record, regardless of filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub provinces: Vec<String>,
}

/// Searchable, paged list of one role's records.
#[derive(Debug, Clone)]
pub struct LeaderListView {
    role: LeaderRole,
    records: Vec<TraditionalLeader>,
    search: String,
    province: String,
    pager: Pager,
}

impl LeaderListView {
    pub fn new(role: LeaderRole, records: Vec<TraditionalLeader>) -> Self {
        Self {
            role,
            records,
            search: String::new(),
            province: "all".to_string(),
            pager: Pager::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pager = Pager::new(page_size);
        self
    }

    pub fn role(&self) -> LeaderRole {
        self.role
    }

    pub fn records(&self) -> &[TraditionalLeader] {
        &self.records
    }

    pub fn replace_records(&mut self, records: Vec<TraditionalLeader>) {
        self.records = records;
        self.pager.reset();
    }

    /// Changing the search returns to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.pager.reset();
    }

    /// `"all"` disables the province filter.
    pub fn set_province(&mut self, province: impl Into<String>) {
        self.province = province.into();
        self.pager.reset();
    }

    pub fn filtered(&self) -> Vec<&TraditionalLeader> {
        let needle = self.search.trim().to_lowercase();
        self.records
            .iter()
            .filter(|leader| {
                needle.is_empty()
                    || self.role.search_fields().iter().any(|field| {
                        leader
                            .get(*field)
                            .map(|value| value.to_lowercase().contains(&needle))
                            .unwrap_or(false)
                    })
            })
            .filter(|leader| {
                self.province.eq_ignore_ascii_case("all") || leader.province.eq_ignore_ascii_case(&self.province)
            })
            .collect()
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered().len())
    }

    pub fn set_page(&mut self, page: usize) -> usize {
        let total = self.filtered().len();
        self.pager.set_page(page, total)
    }

    pub fn page_items(&self) -> Vec<&TraditionalLeader> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).to_vec()
    }

    pub fn stats(&self) -> LeaderStats {
        let active = self
            .records
            .iter()
            .filter(|leader| {
                leader
                    .get(LeaderField::Status)
                    .map(|status| status.eq_ignore_ascii_case("active"))
                    .unwrap_or(false)
            })
            .count();
        let provinces: BTreeSet<String> = self
            .records
            .iter()
            .filter(|leader| !leader.province.is_empty())
            .map(|leader| leader.province.clone())
            .collect();

        LeaderStats {
            total: self.records.len(),
            active,
            inactive: self.records.len() - active,
            provinces: provinces.into_iter().collect(),
        }
    }

    /// Apply a saved change to the local copy so the list reflects it
    /// without a refetch.
    pub fn apply(&mut self, id: &str, field: LeaderField, value: Option<String>) -> bool {
        let role = self.role;
        match self
            .records
            .iter_mut()
            .find(|leader| leader.record_id(role) == Some(id))
        {
            Some(leader) => {
                leader.set(field, value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headman(id: &str, incumbent: &str, headmanship: &str, province: &str, status: &str) -> TraditionalLeader {
        let mut leader = TraditionalLeader {
            incumbent: incumbent.to_string(),
            province: province.to_string(),
            ..Default::default()
        };
        leader.set(LeaderField::HeadmanId, Some(id.to_string()));
        leader.set(LeaderField::Headmanship, Some(headmanship.to_string()));
        leader.set(LeaderField::Status, Some(status.to_string()));
        leader
    }

    fn view() -> LeaderListView {
        LeaderListView::new(
            LeaderRole::Headman,
            vec![
                headman("1", "Tawanda Dube", "Nyamande", "Masvingo", "Active"),
                headman("2", "Rudo Ncube", "Gwebi", "midlands", "INACTIVE"),
                headman("3", "Farai Sibanda", "Dube", "Midlands", "active"),
            ],
        )
    }

    #[test]
    fn search_covers_incumbent_and_headmanship() {
        let mut view = view();
        view.set_search("dube");
        let ids: Vec<_> = view.filtered().iter().filter_map(|l| l.record_id(LeaderRole::Headman)).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn province_filter_is_case_insensitive() {
        let mut view = view();
        view.set_province("MIDLANDS");
        assert_eq!(view.filtered().len(), 2);
        view.set_province("all");
        assert_eq!(view.filtered().len(), 3);
    }

    #[test]
    fn stats_ignore_filters() {
        let mut view = view();
        view.set_search("nothing matches");
        let stats = view.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.provinces, vec!["Masvingo", "Midlands", "midlands"]);
    }

    #[test]
    fn paging_clamps() {
        let mut view = view().with_page_size(2);
        assert_eq!(view.total_pages(), 2);
        assert_eq!(view.set_page(5), 2);
        assert_eq!(view.page_items().len(), 1);
        view.set_search("rudo");
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn apply_updates_local_copy() {
        let mut view = view();
        assert!(view.apply("2", LeaderField::Status, Some("Active".into())));
        assert_eq!(view.stats().active, 3);
        assert!(!view.apply("99", LeaderField::Status, None));
    }
}
