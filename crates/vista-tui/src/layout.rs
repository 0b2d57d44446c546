use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

/// Width of the overlay menu, borders included
const MENU_WIDTH: u16 = 28;
/// Floating action button, drawn as "( ✉ )"
const ACTION_BUTTON_WIDTH: u16 = 5;

/// Screen regions: navigation bar, page, status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub full: Rect,
    pub nav: Rect,
    pub page: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            full: area,
            nav: chunks[0],
            page: chunks[1],
            status: chunks[2],
        }
    }

    /// Overlay menu anchored under the right end of the navigation bar
    pub fn menu_area(&self, entries: usize) -> Rect {
        let width = MENU_WIDTH.min(self.full.width);
        let height = (entries as u16)
            .saturating_add(2)
            .min(self.full.height.saturating_sub(self.nav.height));
        Rect::new(
            self.full.right().saturating_sub(width),
            self.nav.bottom(),
            width,
            height,
        )
    }

    /// Row of the `index`-th menu entry, inside the border
    pub fn menu_entry_area(&self, entries: usize, index: usize) -> Rect {
        let menu = self.menu_area(entries);
        Rect::new(
            menu.x + 1,
            menu.y + 1 + index as u16,
            menu.width.saturating_sub(2),
            1,
        )
    }

    /// Floating action button in the bottom right corner of the page
    pub fn action_button_area(&self) -> Rect {
        let width = ACTION_BUTTON_WIDTH.min(self.page.width);
        Rect::new(
            self.page.right().saturating_sub(width + 1),
            self.page.bottom().saturating_sub(2).max(self.page.y),
            width,
            1.min(self.page.height),
        )
    }

    /// The menu entry under a click, if any
    pub fn menu_entry_at(&self, entries: usize, column: u16, row: u16) -> Option<usize> {
        let position = Position::new(column, row);
        (0..entries).find(|&i| {
            let entry = self.menu_entry_area(entries, i);
            entry.bottom() <= self.menu_area(entries).bottom() && entry.contains(position)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_take_one_row_each() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.nav, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.page, Rect::new(0, 1, 80, 22));
        assert_eq!(layout.status, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn test_menu_hit_testing() {
        let layout = AppLayout::new(Rect::new(0, 0, 60, 20));
        let menu = layout.menu_area(5);
        assert_eq!(menu, Rect::new(32, 1, 28, 7));
        assert_eq!(layout.menu_entry_at(5, 33, 2), Some(0));
        assert_eq!(layout.menu_entry_at(5, 33, 6), Some(4));
        // Border rows and outside the panel
        assert_eq!(layout.menu_entry_at(5, 33, 1), None);
        assert_eq!(layout.menu_entry_at(5, 5, 3), None);
    }

    #[test]
    fn test_action_button_sits_above_status_bar() {
        let layout = AppLayout::new(Rect::new(0, 0, 60, 20));
        assert_eq!(layout.action_button_area(), Rect::new(54, 17, 5, 1));

        let tiny = AppLayout::new(Rect::new(0, 0, 3, 3));
        let button = tiny.action_button_area();
        assert!(button.width <= 3);
        assert_eq!(button.y, 1);
    }
}
