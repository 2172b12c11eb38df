//! List selection and scroll position.
//!
//! Shared by every scrollable list in the dashboard (inbox, workspace,
//! seller cards, rules, report templates). Pure state, no I/O.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    selected_index: usize,
    scroll_offset: usize,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Set selected index with bounds checking.
    pub fn set_selected_index(&mut self, index: usize, item_count: usize) {
        self.selected_index = clamp_selection(index, item_count);
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn select_next(&mut self, item_count: usize) {
        self.set_selected_index(self.selected_index.saturating_add(1), item_count);
    }

    pub fn select_previous(&mut self, item_count: usize) {
        self.set_selected_index(self.selected_index.saturating_sub(1), item_count);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self, item_count: usize) {
        self.set_selected_index(item_count.saturating_sub(1), item_count);
    }

    /// Moves the viewport so the selection is visible.
    pub fn ensure_visible(&mut self, viewport_height: usize) {
        self.scroll_offset = scroll_to_show(self.selected_index, self.scroll_offset, viewport_height);
    }

    /// Reset selection and scroll to top.
    pub fn reset(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Clamps selection index to valid range (pure).
pub fn clamp_selection(index: usize, item_count: usize) -> usize {
    if item_count == 0 {
        0
    } else {
        index.min(item_count - 1)
    }
}

/// Calculates visible range for scrolling (pure).
pub fn calculate_visible_range(
    scroll_offset: usize,
    viewport_height: usize,
    total_items: usize,
) -> std::ops::Range<usize> {
    let start = scroll_offset.min(total_items);
    let end = (scroll_offset + viewport_height).min(total_items);
    start..end
}

/// Smallest scroll change that keeps `selected` inside the viewport (pure).
pub fn scroll_to_show(selected: usize, scroll_offset: usize, viewport_height: usize) -> usize {
    if viewport_height == 0 {
        return selected;
    }
    if selected < scroll_offset {
        selected
    } else if selected >= scroll_offset + viewport_height {
        selected + 1 - viewport_height
    } else {
        scroll_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_selection_empty() {
        assert_eq!(clamp_selection(5, 0), 0);
    }

    #[test]
    fn test_clamp_selection_exceeds_bounds() {
        assert_eq!(clamp_selection(15, 10), 9);
    }

    #[test]
    fn test_next_and_previous_stop_at_edges() {
        let mut state = ListState::new();
        state.select_previous(5);
        assert_eq!(state.selected_index(), 0);
        for _ in 0..10 {
            state.select_next(5);
        }
        assert_eq!(state.selected_index(), 4);
    }

    #[test]
    fn test_select_last() {
        let mut state = ListState::new();
        state.select_last(7);
        assert_eq!(state.selected_index(), 6);
        state.select_last(0);
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_down_and_up() {
        let mut state = ListState::new();
        state.set_selected_index(12, 20);
        state.ensure_visible(5);
        assert_eq!(state.scroll_offset(), 8);
        state.set_selected_index(2, 20);
        state.ensure_visible(5);
        assert_eq!(state.scroll_offset(), 2);
    }

    #[test]
    fn test_calculate_visible_range_clamped() {
        assert_eq!(calculate_visible_range(95, 10, 100), 95..100);
        assert_eq!(calculate_visible_range(0, 10, 0), 0..0);
    }

    #[test]
    fn test_reset() {
        let mut state = ListState::new();
        state.set_selected_index(5, 10);
        state.ensure_visible(2);
        state.reset();
        assert_eq!(state, ListState::default());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: selection is always valid after set_selected_index.
        #[test]
        fn selection_always_valid(
            input_index in 0usize..10000,
            item_count in 0usize..1000
        ) {
            let mut state = ListState::new();
            state.set_selected_index(input_index, item_count);

            let selected = state.selected_index();
            if item_count == 0 {
                prop_assert_eq!(selected, 0);
            } else {
                prop_assert!(selected < item_count, "Selected {} >= count {}", selected, item_count);
            }
        }

        /// Property: clamp_selection is idempotent.
        #[test]
        fn clamp_is_idempotent(
            index in 0usize..10000,
            item_count in 0usize..1000
        ) {
            let once = clamp_selection(index, item_count);
            let twice = clamp_selection(once, item_count);
            prop_assert_eq!(once, twice);
        }

        /// Property: the visible range is well formed and bounded.
        #[test]
        fn visible_range_is_bounded(
            scroll_offset in 0usize..300,
            viewport_height in 0usize..100,
            total_items in 0usize..200
        ) {
            let range = calculate_visible_range(scroll_offset, viewport_height, total_items);
            prop_assert!(range.start <= range.end);
            prop_assert!(range.end <= total_items);
        }

        /// Property: after ensure_visible the selection lies in the viewport.
        #[test]
        fn selection_visible_after_scroll(
            selected in 0usize..500,
            scroll in 0usize..500,
            viewport_height in 1usize..50
        ) {
            let offset = scroll_to_show(selected, scroll, viewport_height);
            prop_assert!(offset <= selected);
            prop_assert!(selected < offset + viewport_height);
        }
    }
}
