use std::sync::Arc;
use std::time::Duration;

use ratatui::layout::{Position, Rect};
use tracing::debug;
use vista_core::{ActiveSection, AppConfig, Clock, Page, ScrollUpdate, SystemClock};

use crate::layout::AppLayout;
use crate::scroll::ScrollAnimator;
use crate::theme::Theme;

/// Scale from which the action button accepts clicks
pub const ACTION_BUTTON_READY: f64 = 0.67;

/// Terminal application state around one page
pub struct App {
    pub config: Arc<AppConfig>,
    pub page: Page,
    /// Highlighted section, updated by the page's navigator
    active: ActiveSection,
    pub theme: Theme,
    pub scroll: ScrollAnimator,
    clock: Box<dyn Clock>,
    /// Full terminal area from the last resize
    pub area: Rect,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(page: Page, config: Arc<AppConfig>) -> Self {
        Self::with_clock(page, config, SystemClock::new())
    }

    /// Build with an explicit time source
    pub fn with_clock(page: Page, config: Arc<AppConfig>, clock: impl Clock + 'static) -> Self {
        Self {
            scroll: ScrollAnimator::new(config.ui.scroll.clone()),
            config,
            active: page.navigator().cursor(),
            page,
            theme: Theme::default(),
            clock: Box::new(clock),
            area: Rect::default(),
            should_quit: false,
            status_message: None,
        }
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Page pixels per terminal row
    pub fn px_per_row(&self) -> f64 {
        match self.config.ui.px_per_row {
            px if px.is_finite() && px > 0.0 => px,
            _ => 20.0,
        }
    }

    pub fn active_section(&self) -> &ActiveSection {
        &self.active
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::new(self.area)
    }

    /// Rows available to the page itself
    pub fn viewport_rows(&self) -> u16 {
        self.layout().page.height
    }

    /// Navigation collapses into the overlay menu on narrow terminals
    pub fn is_compact(&self) -> bool {
        self.area.width < self.config.ui.menu_breakpoint
    }

    /// First frame: size the viewport and start the entrance animations
    pub fn mount(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        let now = self.now();
        let viewport = self.viewport_rows() as f64 * self.px_per_row();
        self.page.set_viewport_height(viewport, now);
        self.page.mount(now);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        let now = self.now();
        let viewport = self.viewport_rows() as f64 * self.px_per_row();
        let update = self.page.set_viewport_height(viewport, now);
        self.apply(update);
        // Keep the offset inside the shorter or taller document window
        let max = self.page.max_scroll();
        if self.scroll.current_scroll() > max {
            self.scroll.set_scroll(max);
        }
    }

    pub fn scroll_down(&mut self) {
        let max = self.page.max_scroll();
        self.scroll.scroll_down(self.px_per_row(), max);
    }

    pub fn scroll_up(&mut self) {
        let max = self.page.max_scroll();
        self.scroll.scroll_up(self.px_per_row(), max);
    }

    /// Scroll by whole rows (mouse wheel)
    pub fn scroll_rows(&mut self, rows: i32) {
        let max = self.page.max_scroll();
        self.scroll.scroll_by(rows as f64 * self.px_per_row(), max);
    }

    pub fn scroll_half_page_down(&mut self) {
        self.scroll_rows((self.viewport_rows() / 2).max(1) as i32);
    }

    pub fn scroll_half_page_up(&mut self) {
        self.scroll_rows(-((self.viewport_rows() / 2).max(1) as i32));
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_rows(self.viewport_rows().max(1) as i32);
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll_rows(-(self.viewport_rows().max(1) as i32));
    }

    pub fn jump_to_top(&mut self) {
        let now = self.now();
        self.scroll.scroll_to(0.0, self.page.max_scroll(), now);
    }

    pub fn jump_to_bottom(&mut self) {
        let now = self.now();
        let max = self.page.max_scroll();
        self.scroll.scroll_to(max, max, now);
    }

    /// Navigate to the section at `index`, closing the overlay menu
    pub fn navigate_to(&mut self, index: usize) {
        let Some(request) = self.page.navigate_index(index) else {
            return;
        };
        let now = self.now();
        let max = self.page.max_scroll();
        debug!(section = request.section, target_y = request.target_y, "Scrolling to section");
        self.scroll.scroll_to(request.target_y, max, now);
    }

    pub fn next_section(&mut self) {
        let next = self.active.index() + 1;
        if next < self.page.navigator().sections().len() {
            self.navigate_to(next);
        }
    }

    pub fn prev_section(&mut self) {
        let active = self.active.index();
        // Jump back to the start of the current section first
        let at_top = self
            .page
            .section_top(active)
            .is_some_and(|top| self.scroll.target_scroll() <= top);
        match (active, at_top) {
            (0, _) => self.jump_to_top(),
            (i, true) => self.navigate_to(i - 1),
            (i, false) => self.navigate_to(i),
        }
    }

    pub fn toggle_menu(&mut self) {
        self.page.navigator_mut().toggle_menu();
    }

    pub fn close_menu(&mut self) {
        self.page.navigator_mut().close_menu();
    }

    pub fn is_menu_open(&self) -> bool {
        self.page.navigator().is_menu_open()
    }

    /// Whether the floating action button is drawn and clickable
    pub fn shows_action_button(&self) -> bool {
        self.is_compact()
            && !self.is_menu_open()
            && self.page.action_button_state(self.now()).scale >= ACTION_BUTTON_READY
    }

    /// A click on the menu selects an entry; anywhere else closes it.
    /// With the menu closed, the action button jumps to the last section.
    pub fn click(&mut self, column: u16, row: u16) {
        if self.is_menu_open() {
            let sections = self.page.navigator().sections().len();
            match self.layout().menu_entry_at(sections, column, row) {
                Some(index) => self.navigate_to(index),
                None => self.close_menu(),
            }
            return;
        }
        let position = Position::new(column, row);
        if self.shows_action_button() && self.layout().action_button_area().contains(position) {
            let last = self.page.navigator().sections().len().saturating_sub(1);
            self.navigate_to(last);
        }
    }

    /// Advance scrolling and every animation to the current time
    pub fn update(&mut self) {
        let now = self.now();
        let max = self.page.max_scroll();
        let scroll_y = self.scroll.update(now, max);
        if scroll_y != self.page.scroll_y() {
            let update = self.page.on_scroll(scroll_y, now);
            self.apply(update);
        } else {
            self.page.tick(now);
        }
    }

    fn apply(&mut self, update: ScrollUpdate) {
        if let Some(index) = update.active_section {
            if let Some(section) = self.page.navigator().sections().get(index) {
                self.status_message = Some(section.label.clone());
            }
        }
    }

    /// Whether the next poll should use the animation frame rate
    pub fn needs_fast_update(&self) -> bool {
        self.scroll.needs_update() || self.page.is_animating(self.now())
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
