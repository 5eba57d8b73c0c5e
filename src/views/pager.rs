pub const DEFAULT_PAGE_SIZE: usize = 20;

/// 1-based page cursor over a filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// Move to `page`, clamped to the pages that exist (page 1 when empty).
    pub fn set_page(&mut self, page: usize, total_items: usize) -> usize {
        let last = self.total_pages(total_items).max(1);
        self.page = page.clamp(1, last);
        self.page
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page - 1).saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_and_clamping() {
        let items: Vec<usize> = (0..45).collect();
        let mut pager = Pager::default();
        assert_eq!(pager.total_pages(items.len()), 3);
        assert_eq!(pager.slice(&items).len(), 20);

        assert_eq!(pager.set_page(3, items.len()), 3);
        assert_eq!(pager.slice(&items), &items[40..45]);

        assert_eq!(pager.set_page(9, items.len()), 3);
        assert_eq!(pager.set_page(0, items.len()), 1);
        assert_eq!(pager.set_page(4, 0), 1);
        assert!(pager.slice::<usize>(&[]).is_empty());
    }
}
