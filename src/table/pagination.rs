//! Page position and page size tracking.

use crate::reactive::Signal;
use serde::{Deserialize, Serialize};

/// Page sizes offered when none are configured.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Construction-time pagination settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Sizes offered by the page-size selector. Default `[10, 25, 50, 100]`.
    pub page_size_options: Vec<usize>,
    /// Initial page size. Default 50.
    pub default_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginator event, as emitted by a page navigation widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEvent {
    pub page_index: usize,
    pub page_size: usize,
}

/// Change descriptor returned by [`PaginationManager::handle_page_change`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageChange {
    pub page_changed: bool,
    pub size_changed: bool,
}

impl PageChange {
    #[must_use]
    pub const fn any(self) -> bool {
        self.page_changed || self.size_changed
    }
}

/// Tracks the current page index and page size.
///
/// Invariant: whenever the page size changes, the page index goes back to 0.
///
/// # Examples
///
/// ```
/// use tablestate::table::{PageEvent, PaginationManager};
///
/// let mut pager = PaginationManager::default();
/// let change = pager.handle_page_change(PageEvent { page_index: 5, page_size: 100 });
///
/// assert!(change.size_changed);
/// assert_eq!(pager.page_index(), 0);
/// assert_eq!(pager.page_size(), 100);
/// ```
#[derive(Debug)]
pub struct PaginationManager {
    page_index: Signal<usize>,
    page_size: Signal<usize>,
    page_size_options: Vec<usize>,
}

impl PaginationManager {
    #[must_use]
    pub fn new(config: PaginationConfig) -> Self {
        let page_size = if config.default_page_size > 0 {
            config.default_page_size
        } else {
            DEFAULT_PAGE_SIZE
        };

        Self {
            page_index: Signal::new(0),
            page_size: Signal::new(page_size),
            page_size_options: config.page_size_options,
        }
    }

    /// Applies a paginator event.
    ///
    /// A size change wins over the event's own index: the index is reset to 0.
    /// A zero size counts as "no size change".
    pub fn handle_page_change(&mut self, event: PageEvent) -> PageChange {
        let size_changed = event.page_size > 0 && event.page_size != self.page_size.get();
        let page_changed = event.page_index != self.page_index.get();

        if size_changed {
            self.page_size.set(event.page_size);
            self.page_index.set(0);
        } else if page_changed {
            self.page_index.set(event.page_index);
        }

        tracing::trace!(
            page_index = self.page_index.get(),
            page_size = self.page_size.get(),
            page_changed,
            size_changed,
            "page change handled"
        );

        PageChange {
            page_changed,
            size_changed,
        }
    }

    /// Sets the page index; negative values are ignored.
    pub fn set_page_index(&mut self, index: i64) {
        if let Ok(index) = usize::try_from(index) {
            self.page_index.set(index);
        }
    }

    /// Sets the page size; zero and negative values are ignored.
    ///
    /// An effective size change sends the index back to the first page.
    pub fn set_page_size(&mut self, size: i64) {
        match usize::try_from(size) {
            Ok(size) if size > 0 && size != self.page_size.get() => {
                self.page_size.set(size);
                self.page_index.set(0);
            }
            _ => {}
        }
    }

    pub fn reset_to_first_page(&mut self) {
        self.page_index.set(0);
    }

    #[must_use]
    pub fn page_index(&self) -> usize {
        self.page_index.get()
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Reactive handle to the page index.
    #[must_use]
    pub fn page_index_signal(&self) -> &Signal<usize> {
        &self.page_index
    }

    /// Reactive handle to the page size.
    #[must_use]
    pub fn page_size_signal(&self) -> &Signal<usize> {
        &self.page_size
    }

    #[must_use]
    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Number of pages needed for `total` rows; at least 1.
    #[must_use]
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size()).max(1)
    }

    /// Row range `start..end` covered by the current page, clamped to `total`.
    #[must_use]
    pub fn page_bounds(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.page_index().saturating_mul(self.page_size()).min(total);
        let end = start.saturating_add(self.page_size()).min(total);
        start..end
    }

    /// Paginator caption such as `"51 - 100 of 230"`, or `"0 of 0"` when empty.
    #[must_use]
    pub fn range_label(&self, total: usize) -> String {
        let bounds = self.page_bounds(total);
        if bounds.is_empty() {
            format!("0 of {total}")
        } else {
            format!("{} - {} of {total}", bounds.start + 1, bounds.end)
        }
    }
}

impl Default for PaginationManager {
    fn default() -> Self {
        Self::new(PaginationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let pager = PaginationManager::default();
        assert_eq!(pager.page_index(), 0);
        assert_eq!(pager.page_size(), 50);
        assert_eq!(pager.page_size_options(), &[10, 25, 50, 100]);
    }

    #[test]
    fn size_change_resets_index_even_when_event_carries_one() {
        let mut pager = PaginationManager::default();
        pager.set_page_index(3);

        let change = pager.handle_page_change(PageEvent { page_index: 5, page_size: 100 });

        assert_eq!(change, PageChange { page_changed: true, size_changed: true });
        assert_eq!(pager.page_index(), 0);
        assert_eq!(pager.page_size(), 100);
    }

    #[test]
    fn index_only_change() {
        let mut pager = PaginationManager::default();
        let change = pager.handle_page_change(PageEvent { page_index: 2, page_size: 50 });

        assert_eq!(change, PageChange { page_changed: true, size_changed: false });
        assert_eq!(pager.page_index(), 2);
    }

    #[test]
    fn unchanged_event_reports_nothing() {
        let mut pager = PaginationManager::default();
        let change = pager.handle_page_change(PageEvent { page_index: 0, page_size: 50 });
        assert!(!change.any());
        assert_eq!(pager.page_index_signal().version(), 0);
    }

    #[test]
    fn zero_size_in_event_is_not_a_size_change() {
        let mut pager = PaginationManager::default();
        let change = pager.handle_page_change(PageEvent { page_index: 1, page_size: 0 });
        assert!(!change.size_changed);
        assert_eq!(pager.page_size(), 50);
        assert_eq!(pager.page_index(), 1);
    }

    #[test]
    fn invalid_setters_are_ignored() {
        let mut pager = PaginationManager::default();
        pager.set_page_size(25);
        pager.set_page_index(4);

        pager.set_page_index(-1);
        pager.set_page_size(0);
        pager.set_page_size(-10);

        assert_eq!(pager.page_index(), 4);
        assert_eq!(pager.page_size(), 25);
    }

    #[test]
    fn set_page_size_resets_index_only_on_change() {
        let mut pager = PaginationManager::default();
        pager.set_page_index(3);
        pager.set_page_size(50);
        assert_eq!(pager.page_index(), 3);

        pager.set_page_size(10);
        assert_eq!(pager.page_index(), 0);
        assert_eq!(pager.page_size(), 10);
    }

    #[test]
    fn reset_to_first_page() {
        let mut pager = PaginationManager::default();
        pager.set_page_index(7);
        pager.reset_to_first_page();
        assert_eq!(pager.page_index(), 0);
    }

    #[test]
    fn bounds_and_labels() {
        let mut pager = PaginationManager::default();
        assert_eq!(pager.page_count(0), 1);
        assert_eq!(pager.page_count(230), 5);
        assert_eq!(pager.range_label(0), "0 of 0");

        pager.set_page_index(1);
        assert_eq!(pager.page_bounds(230), 50..100);
        assert_eq!(pager.range_label(230), "51 - 100 of 230");

        pager.set_page_index(4);
        assert_eq!(pager.page_bounds(230), 200..230);

        pager.set_page_index(9);
        assert!(pager.page_bounds(230).is_empty());
    }

    #[test]
    fn non_positive_default_size_falls_back() {
        let pager = PaginationManager::new(PaginationConfig {
            page_size_options: vec![5],
            default_page_size: 0,
        });
        assert_eq!(pager.page_size(), DEFAULT_PAGE_SIZE);
    }
}
