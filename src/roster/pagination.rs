//! Server-side pagination state.

/// Page index, page size and the server-reported total.
///
/// Rows are never sliced locally; `total_elements` only drives the page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    total_elements: u64,
}

impl Pagination {
    /// Create pagination at the first page. A zero size is bumped to 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            total_elements: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Number of pages for the current total, at least 1.
    pub fn page_count(&self) -> u32 {
        let pages = self.total_elements.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    pub fn last_page(&self) -> u32 {
        self.page_count() - 1
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    /// Move to `page`, clamped to the last known page.
    ///
    /// Returns `true` if the index changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = if self.total_elements > 0 {
            page.min(self.last_page())
        } else {
            page
        };
        let changed = page != self.page;
        self.page = page;
        changed
    }

    /// Change rows per page and go back to the first page.
    ///
    /// Returns `true` if either value changed.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        let page_size = page_size.max(1);
        let changed = page_size != self.page_size || self.page != 0;
        self.page_size = page_size;
        self.page = 0;
        changed
    }

    /// Reset to the first page. Returns `true` if the index changed.
    pub fn reset_page(&mut self) -> bool {
        let changed = self.page != 0;
        self.page = 0;
        changed
    }

    /// Record the server total. The page index is pulled back onto the last page.
    pub fn set_total(&mut self, total_elements: u64) {
        self.total_elements = total_elements;
        self.page = self.page.min(self.last_page());
    }

    /// Range label in the form `1-5 of 12`.
    pub fn range_label(&self) -> String {
        if self.total_elements == 0 {
            return "0-0 of 0".to_string();
        }
        let size = u64::from(self.page_size);
        let start = u64::from(self.page) * size;
        let first = (start + 1).min(self.total_elements);
        let last = (start + size).min(self.total_elements);
        format!("{first}-{last} of {total}", total = self.total_elements)
    }
}
