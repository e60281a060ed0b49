//! # Pagination Windows
//!
//! Every list in the registry is windowed the same way: compute a start
//! offset from the page number, fetch **one more** item than the page holds,
//! and let the surplus item prove that a next page exists. That keeps the
//! `next` flag correct without a second count query, and [`PageWindow`]
//! keeps the arithmetic in one place so the gateway and the storage service
//! cannot drift.

/// Items per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    size: usize,
}

impl PageWindow {
    /// Create a window for a zero-based page number.
    ///
    /// A size of `0` is replaced with [`DEFAULT_PAGE_SIZE`]; a zero-item
    /// page has no meaningful window.
    pub fn new(page: u32, size: usize) -> Self {
        let size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
        Self { page, size }
    }

    /// The zero-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// The number of items a full page holds.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the first item in the window.
    pub fn start(&self) -> usize {
        (self.page as usize).saturating_mul(self.size)
    }

    /// One past the last index to fetch, including the probe item.
    pub fn probe_end(&self) -> usize {
        self.start().saturating_add(self.size).saturating_add(1)
    }

    /// Whether a previous page exists.
    pub fn has_prev(&self) -> bool {
        self.start() > 0
    }

    /// Whether a next page exists, judged from how many items the fetch
    /// actually returned.
    pub fn has_next(&self, fetched: usize) -> bool {
        fetched > self.size
    }

    /// Trim a fetched window down to the page size.
    ///
    /// Returns the trimmed items and whether the probe item was present
    /// (i.e. whether a next page exists).
    pub fn trim<T>(&self, mut items: Vec<T>) -> (Vec<T>, bool) {
        let next = self.has_next(items.len());
        items.truncate(self.size);
        (items, next)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        let window = PageWindow::new(0, 100);
        assert_eq!(window.start(), 0);
        assert_eq!(window.probe_end(), 101);
        assert!(!window.has_prev());
    }

    #[test]
    fn later_pages_offset_by_whole_pages() {
        let window = PageWindow::new(2, 100);
        assert_eq!(window.start(), 200);
        assert_eq!(window.probe_end(), 301);
        assert!(window.has_prev());
    }

    #[test]
    fn zero_size_falls_back_to_default() {
        let window = PageWindow::new(0, 0);
        assert_eq!(window.size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn trim_keeps_a_short_window_whole() {
        let window = PageWindow::new(0, 3);
        let (items, next) = window.trim(vec![1, 2]);
        assert_eq!(items, vec![1, 2]);
        assert!(!next);
    }

    #[test]
    fn trim_of_exactly_full_page_has_no_next() {
        let window = PageWindow::new(0, 3);
        let (items, next) = window.trim(vec![1, 2, 3]);
        assert_eq!(items, vec![1, 2, 3]);
        assert!(!next);
    }

    #[test]
    fn probe_item_proves_next_page_and_is_trimmed() {
        let window = PageWindow::new(0, 3);
        let (items, next) = window.trim(vec![1, 2, 3, 4]);
        assert_eq!(items, vec![1, 2, 3]);
        assert!(next);
    }

    #[test]
    fn absurd_page_numbers_saturate_instead_of_overflowing() {
        let window = PageWindow::new(u32::MAX, usize::MAX);
        assert_eq!(window.start(), usize::MAX);
        assert_eq!(window.probe_end(), usize::MAX);
        assert!(window.has_prev());
    }

    proptest! {
        #[test]
        fn trim_never_exceeds_page_size(
            page in 0u32..1_000,
            size in 1usize..200,
            fetched in 0usize..500,
        ) {
            let window = PageWindow::new(page, size);
            let (items, next) = window.trim(vec![0u8; fetched]);
            prop_assert!(items.len() <= size);
            prop_assert_eq!(next, fetched > size);
            prop_assert_eq!(window.has_prev(), page > 0);
        }
    }
}
