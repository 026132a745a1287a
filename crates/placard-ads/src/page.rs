//! Pagination.

use serde::{Deserialize, Serialize};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Which slice of a result to return. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPageRequest")]
pub struct PageRequest {
    page: usize,
    size: usize,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: usize,
    size: usize,
}

impl From<RawPageRequest> for PageRequest {
    fn from(raw: RawPageRequest) -> Self {
        Self::new(raw.page, raw.size)
    }
}

impl PageRequest {
    /// A request for `page` with `size` items; a zero size is raised to one.
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    /// Zero-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Maximum number of items per page; never zero.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The first page with the default size.
    pub fn first() -> Self {
        Self::default()
    }

    fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus enough to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub content: Vec<T>,
    /// The request that produced this page.
    pub request: PageRequest,
    /// Number of items across all pages.
    pub total_elements: usize,
}

impl<T> Page<T> {
    /// Cut one page out of an already ordered result.
    pub fn of(items: Vec<T>, request: PageRequest) -> Self {
        let total_elements = items.len();
        let content = items
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        Self {
            content,
            request,
            total_elements,
        }
    }

    /// Number of pages needed for all elements.
    pub fn total_pages(&self) -> usize {
        self.total_elements.div_ceil(self.request.size)
    }

    /// Whether a page follows this one.
    pub fn has_next(&self) -> bool {
        self.request.page.saturating_add(1) < self.total_pages()
    }

    /// Transform the items, keeping the paging information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            request: self.request,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_pages() {
        let items: Vec<u32> = (1..=45).collect();
        let first = Page::of(items.clone(), PageRequest::first());
        assert_eq!(first.content.len(), 20);
        assert_eq!(first.total_pages(), 3);
        assert!(first.has_next());

        let last = Page::of(items, PageRequest::new(2, 20));
        assert_eq!(last.content, (41..=45).collect::<Vec<_>>());
        assert!(!last.has_next());
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let page = Page::of(vec![1, 2, 3], PageRequest::new(5, 2));
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 3);
    }

    #[test]
    fn test_zero_size_raised() {
        assert_eq!(PageRequest::new(0, 0).size(), 1);
        let empty: Page<u8> = Page::of(Vec::new(), PageRequest::first());
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn test_deserialized_zero_size_raised() {
        let request: PageRequest = serde_json::from_str(r#"{"page":0,"size":0}"#).unwrap();
        assert_eq!(request.size(), 1);

        let page: Page<u8> = serde_json::from_str(
            r#"{"content":[],"request":{"page":3,"size":0},"total_elements":4}"#,
        )
        .unwrap();
        assert_eq!(page.request.size(), 1);
        assert_eq!(page.total_pages(), 4);
        assert!(!page.has_next());
    }

    #[test]
    fn test_last_possible_page_has_no_next() {
        let page = Page::of(vec![1, 2, 3], PageRequest::new(usize::MAX, 1));
        assert!(page.content.is_empty());
        assert!(!page.has_next());
    }
}
