//! Page/size/total bookkeeping for server-side paginated lists.
//!
//! `PaginationState` never rejects input. Out-of-range navigation is a
//! no-op and every mutation leaves `1 <= current_page <= max(total_pages, 1)`.

use serde::{Deserialize, Serialize};

use crate::api::PaginationMeta;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query parameters for one list request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
}

/// A state change queued during one turn of the caller's event loop.
///
/// Batches are applied by [`PaginationState::apply`] in a fixed order:
/// size changes, then total changes, then navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageUpdate {
    SetPageSize(u32),
    SetTotalItems(u64),
    GoToPage(u32),
    Next,
    Previous,
    First,
    Last,
}

impl PageUpdate {
    fn rank(&self) -> u8 {
        match self {
            PageUpdate::SetPageSize(_) => 0,
            PageUpdate::SetTotalItems(_) => 1,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u32,
    page_size: u32,
    total_items: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_items: 0,
        }
    }
}

impl PaginationState {
    pub fn new(page_size: u32) -> Self {
        Self::with_total(page_size, 0)
    }

    pub fn with_total(page_size: u32, total_items: u64) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// `ceil(total_items / page_size)`, 0 for an empty list
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_items.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// 1-based index of the first item on the current page
    pub fn start_index(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.page_size) + 1
    }

    /// 1-based index of the last item on the current page
    pub fn end_index(&self) -> u64 {
        (u64::from(self.current_page) * u64::from(self.page_size)).min(self.total_items)
    }

    pub fn query(&self) -> PageQuery {
        PageQuery {
            page: self.current_page,
            limit: self.page_size,
        }
    }

    pub fn go_to_page(&mut self, page: u32) {
        if page < 1 || page > self.max_page() {
            return;
        }
        self.current_page = page;
    }

    pub fn go_to_next_page(&mut self) {
        if self.has_next_page() {
            self.current_page += 1;
        }
    }

    pub fn go_to_previous_page(&mut self) {
        if self.has_previous_page() {
            self.current_page -= 1;
        }
    }

    pub fn go_to_first_page(&mut self) {
        self.current_page = 1;
    }

    pub fn go_to_last_page(&mut self) {
        self.current_page = self.max_page();
    }

    /// Changing density invalidates position, so the page resets to 1
    pub fn set_page_size(&mut self, size: u32) {
        self.page_size = size.max(1);
        self.current_page = 1;
    }

    /// Replace the total and pull the current page back into range
    pub fn set_total_items(&mut self, total: u64) {
        self.total_items = total;
        let max_page = self.max_page();
        if self.current_page > max_page {
            tracing::debug!(
                "Clamping page {} to {} after total changed to {}",
                self.current_page,
                max_page,
                total
            );
            self.current_page = max_page;
        }
    }

    /// Adopt the `pagination` block of a list response
    pub fn sync_from(&mut self, meta: &PaginationMeta) {
        if meta.limit > 0 && meta.limit != self.page_size {
            self.set_page_size(meta.limit);
        }
        self.set_total_items(meta.total);
        self.go_to_page(meta.page);
    }

    /// Apply updates queued in the same turn. Size changes land first, then
    /// total changes, then navigation; within a group submission order holds.
    pub fn apply(&mut self, updates: impl IntoIterator<Item = PageUpdate>) {
        let mut updates: Vec<PageUpdate> = updates.into_iter().collect();
        updates.sort_by_key(PageUpdate::rank);

        for update in updates {
            match update {
                PageUpdate::SetPageSize(size) => self.set_page_size(size),
                PageUpdate::SetTotalItems(total) => self.set_total_items(total),
                PageUpdate::GoToPage(page) => self.go_to_page(page),
                PageUpdate::Next => self.go_to_next_page(),
                PageUpdate::Previous => self.go_to_previous_page(),
                PageUpdate::First => self.go_to_first_page(),
                PageUpdate::Last => self.go_to_last_page(),
            }
        }
    }

    fn max_page(&self) -> u32 {
        self.total_pages().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariant(state: &PaginationState) {
        assert!(state.current_page() >= 1);
        assert!(state.current_page() <= state.total_pages().max(1));
    }

    #[test]
    fn test_defaults() {
        let state = PaginationState::default();
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_size(), 10);
        assert_eq!(state.total_items(), 0);
        assert_eq!(state.total_pages(), 0);
        assert!(!state.has_next_page());
        assert!(!state.has_previous_page());
    }

    #[test]
    fn test_ninety_five_items_walkthrough() {
        let mut state = PaginationState::with_total(10, 95);
        assert_eq!(state.total_pages(), 10);
        assert_eq!(state.start_index(), 1);
        assert_eq!(state.end_index(), 10);

        state.go_to_last_page();
        assert_eq!(state.current_page(), 10);
        assert_eq!(state.start_index(), 91);
        assert_eq!(state.end_index(), 95);

        state.set_total_items(45);
        assert_eq!(state.current_page(), 5);
        assert_eq!(state.total_pages(), 5);
    }

    #[test]
    fn test_boundaries_are_no_ops() {
        let mut state = PaginationState::with_total(10, 15);
        state.go_to_previous_page();
        assert_eq!(state.current_page(), 1);

        state.go_to_last_page();
        assert_eq!(state.current_page(), 2);
        state.go_to_next_page();
        assert_eq!(state.current_page(), 2);
        assert!(!state.has_next_page());
        assert!(state.has_previous_page());
    }

    #[test]
    fn test_go_to_page_ignores_out_of_range() {
        let mut state = PaginationState::with_total(10, 50);
        state.go_to_page(3);
        assert_eq!(state.current_page(), 3);
        state.go_to_page(3);
        assert_eq!(state.current_page(), 3);

        state.go_to_page(0);
        assert_eq!(state.current_page(), 3);
        state.go_to_page(6);
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn test_empty_list_caps_page_at_one() {
        let mut state = PaginationState::new(10);
        state.go_to_page(2);
        assert_eq!(state.current_page(), 1);
        state.go_to_last_page();
        assert_eq!(state.current_page(), 1);
        state.go_to_next_page();
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut state = PaginationState::with_total(10, 100);
        state.go_to_page(7);
        state.set_page_size(25);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 4);

        state.set_page_size(0);
        assert_eq!(state.page_size(), 1);
        assert_eq!(state.total_pages(), 100);
    }

    #[test]
    fn test_set_total_items_keeps_page_in_range() {
        let mut state = PaginationState::with_total(10, 100);
        state.go_to_page(4);
        state.set_total_items(60);
        assert_eq!(state.current_page(), 4);

        state.set_total_items(0);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 0);
    }

    #[test]
    fn test_end_index_on_partial_page() {
        let mut state = PaginationState::with_total(20, 45);
        state.go_to_page(3);
        assert_eq!(state.start_index(), 41);
        assert_eq!(state.end_index(), 45);
        assert_eq!(state.query(), PageQuery { page: 3, limit: 20 });
    }

    #[test]
    fn test_apply_orders_size_before_total() {
        let mut state = PaginationState::with_total(10, 100);
        state.go_to_page(5);

        // In submission order this would end on page 1
        state.apply([
            PageUpdate::GoToPage(6),
            PageUpdate::SetTotalItems(30),
            PageUpdate::SetPageSize(5),
        ]);
        assert_eq!(state.page_size(), 5);
        assert_eq!(state.total_items(), 30);
        assert_eq!(state.current_page(), 6);
    }

    #[test]
    fn test_apply_navigation_in_submission_order() {
        let mut state = PaginationState::with_total(10, 50);
        state.apply([PageUpdate::Last, PageUpdate::Previous, PageUpdate::Previous]);
        assert_eq!(state.current_page(), 3);
        state.apply([PageUpdate::First, PageUpdate::Next]);
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn test_sync_from_server_meta() {
        let mut state = PaginationState::new(10);
        state.sync_from(&PaginationMeta {
            total: 95,
            page: 3,
            limit: 20,
            total_pages: 5,
            has_next: true,
            has_prev: true,
        });
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.total_pages(), 5);
        assert_eq!(state.current_page(), 3);

        // Server page past the end is ignored, not adopted
        state.sync_from(&PaginationMeta {
            total: 10,
            page: 9,
            limit: 20,
            total_pages: 1,
            has_next: false,
            has_prev: true,
        });
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_invariant_holds_over_operation_sequences() {
        let sizes = [1u32, 3, 7, 10, 25];
        let totals = [0u64, 1, 9, 10, 11, 95, 250];

        for &size in &sizes {
            for &total in &totals {
                let mut state = PaginationState::with_total(size, total);
                assert_eq!(
                    u64::from(state.total_pages()),
                    total.div_ceil(u64::from(size))
                );

                let script = [
                    PageUpdate::Last,
                    PageUpdate::Next,
                    PageUpdate::GoToPage(4),
                    PageUpdate::SetTotalItems(total / 2),
                    PageUpdate::Previous,
                    PageUpdate::SetPageSize(size + 2),
                    PageUpdate::Last,
                    PageUpdate::SetTotalItems(total * 3),
                    PageUpdate::GoToPage(u32::MAX),
                    PageUpdate::Next,
                ];
                for update in script {
                    state.apply([update]);
                    assert_invariant(&state);
                }
            }
        }
    }
}
