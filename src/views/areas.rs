use super::pager::Pager;
use crate::models::{AreaKind, TraditionalArea};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub households: i64,
}

/// Searchable, paged list of chieftainships, headmanships or villageships.
#[derive(Debug, Clone)]
pub struct AreaListView {
    kind: AreaKind,
    areas: Vec<TraditionalArea>,
    search: String,
    province: String,
    pager: Pager,
}

impl AreaListView {
    pub fn new(kind: AreaKind, areas: Vec<TraditionalArea>) -> Self {
        Self {
            kind,
            areas,
            search: String::new(),
            province: "all".to_string(),
            pager: Pager::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pager = Pager::new(page_size);
        self
    }

    pub fn kind(&self) -> AreaKind {
        self.kind
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.pager.reset();
    }

    pub fn set_province(&mut self, province: impl Into<String>) {
        self.province = province.into();
        self.pager.reset();
    }

    /// Matches the search against the area name and the kind's own name field.
    pub fn filtered(&self) -> Vec<&TraditionalArea> {
        let needle = self.search.trim().to_lowercase();
        self.areas
            .iter()
            .filter(|area| {
                if needle.is_empty() {
                    return true;
                }
                let own = match self.kind {
                    AreaKind::Chieftainship => area.chieftainship.as_deref(),
                    AreaKind::Headmanship => area.headmanship.as_deref(),
                    AreaKind::Villageship => area.villageship.as_deref(),
                };
                [area.name.as_deref(), own]
                    .into_iter()
                    .flatten()
                    .any(|value| value.to_lowercase().contains(&needle))
            })
            .filter(|area| {
                self.province.eq_ignore_ascii_case("all")
                    || area
                        .province
                        .as_deref()
                        .map(|p| p.eq_ignore_ascii_case(&self.province))
                        .unwrap_or(false)
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

    pub fn page_items(&self) -> Vec<&TraditionalArea> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).to_vec()
    }

    /// Area status is stored capitalised; only an exact "Active" counts.
    pub fn stats(&self) -> AreaStats {
        let active = self
            .areas
            .iter()
            .filter(|area| area.status.as_deref() == Some("Active"))
            .count();
        AreaStats {
            total: self.areas.len(),
            active,
            inactive: self.areas.len() - active,
            households: self.areas.iter().filter_map(|area| area.households).sum(),
        }
    }
}
