//! Page-number pagination for list endpoints

use serde::Serialize;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// Normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    page: u32,
    per_page: u32,
}

impl PageQuery {
    /// Clamp raw query values: page starts at 1, per_page is 1..=100
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub pages: i64,
    pub current_page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, query: PageQuery) -> Self {
        let per_page = i64::from(query.per_page());
        let pages = if total <= 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            items,
            total,
            pages,
            current_page: query.page(),
            per_page: query.per_page(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pages: self.pages,
            current_page: self.current_page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let q = PageQuery::new(None, None);
        assert_eq!((q.page(), q.per_page()), (1, DEFAULT_PER_PAGE));

        let q = PageQuery::new(Some(0), Some(1000));
        assert_eq!((q.page(), q.per_page()), (1, MAX_PER_PAGE));
    }

    #[test]
    fn test_offset() {
        let q = PageQuery::new(Some(3), Some(20));
        assert_eq!(q.limit(), 20);
        assert_eq!(q.offset(), 40);
    }

    #[test]
    fn test_page_count_rounds_up() {
        let q = PageQuery::new(Some(1), Some(10));
        assert_eq!(Page::new(Vec::<u8>::new(), 0, q).pages, 0);
        assert_eq!(Page::new(Vec::<u8>::new(), 10, q).pages, 1);
        assert_eq!(Page::new(Vec::<u8>::new(), 11, q).pages, 2);
    }

    #[test]
    fn test_map_keeps_counts() {
        let q = PageQuery::new(Some(2), Some(2));
        let page = Page::new(vec![1, 2], 5, q).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
        assert_eq!(page.current_page, 2);
    }
}
