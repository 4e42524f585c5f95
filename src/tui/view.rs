//! Selection and viewport over a ranked snapshot.

/// Rows taken by the status bar, header, separator and footer.
pub const CHROME_ROWS: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Table rows available for a terminal of `height` rows, never below 1.
pub fn page_size(height: u16) -> usize {
    height.saturating_sub(CHROME_ROWS).max(1) as usize
}

/// First visible index: the page that contains `selected`.
pub fn viewport_start(selected: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    (selected / page_size) * page_size
}

/// Position within the ranked snapshot, not a PID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    selected_index: usize,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected index, or `None` when the snapshot is empty.
    pub fn selected(&self, count: usize) -> Option<usize> {
        (self.selected_index < count).then_some(self.selected_index)
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Pulls the selection back inside `[0, count-1]` after a refresh.
    pub fn clamp(&mut self, count: usize) {
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    pub fn apply(&mut self, nav: Navigation, count: usize, page_size: usize) {
        if count == 0 {
            self.selected_index = 0;
            return;
        }
        let last = count - 1;
        let current = self.selected_index.min(last);
        self.selected_index = match nav {
            Navigation::Up => current.saturating_sub(1),
            Navigation::Down => (current + 1).min(last),
            Navigation::Home => 0,
            Navigation::End => last,
            Navigation::PageUp => current.saturating_sub(page_size),
            Navigation::PageDown => current.saturating_add(page_size).min(last),
        };
    }

    pub fn viewport_start(&self, page_size: usize) -> usize {
        viewport_start(self.selected_index, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Navigation; 6] = [
        Navigation::Up,
        Navigation::Down,
        Navigation::Home,
        Navigation::End,
        Navigation::PageUp,
        Navigation::PageDown,
    ];

    #[test]
    fn page_size_excludes_chrome() {
        assert_eq!(page_size(24), 20);
        assert_eq!(page_size(4), 1);
        assert_eq!(page_size(0), 1);
    }

    #[test]
    fn viewport_is_floor_aligned() {
        assert_eq!(viewport_start(0, 20), 0);
        assert_eq!(viewport_start(19, 20), 0);
        assert_eq!(viewport_start(20, 20), 20);
        assert_eq!(viewport_start(45, 20), 40);
    }

    #[test]
    fn moves_are_clamped() {
        let mut view = ViewState::new();
        view.apply(Navigation::Up, 10, 4);
        assert_eq!(view.selected_index(), 0);
        view.apply(Navigation::End, 10, 4);
        assert_eq!(view.selected_index(), 9);
        view.apply(Navigation::Down, 10, 4);
        assert_eq!(view.selected_index(), 9);
        view.apply(Navigation::PageUp, 10, 4);
        assert_eq!(view.selected_index(), 5);
        view.apply(Navigation::PageUp, 10, 4);
        view.apply(Navigation::PageUp, 10, 4);
        assert_eq!(view.selected_index(), 0);
        view.apply(Navigation::PageDown, 10, 4);
        assert_eq!(view.selected_index(), 4);
        view.apply(Navigation::PageDown, 10, 4);
        view.apply(Navigation::PageDown, 10, 4);
        assert_eq!(view.selected_index(), 9);
        view.apply(Navigation::Home, 10, 4);
        assert_eq!(view.selected_index(), 0);
    }

    #[test]
    fn every_command_stays_in_bounds() {
        for count in [1usize, 2, 7, 33] {
            for page in [1usize, 3, 20] {
                let mut view = ViewState::new();
                for step in 0..200 {
                    view.apply(ALL[(step * 7 + count) % ALL.len()], count, page);
                    assert!(view.selected_index() < count);
                }
            }
        }
    }

    #[test]
    fn shrinking_snapshot_clamps_selection() {
        let mut view = ViewState::new();
        view.apply(Navigation::End, 50, 10);
        view.clamp(12);
        assert_eq!(view.selected(12), Some(11));
        view.clamp(0);
        assert_eq!(view.selected(0), None);
        view.clamp(3);
        assert_eq!(view.selected(3), Some(0));
    }
}
