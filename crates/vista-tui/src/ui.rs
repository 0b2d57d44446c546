use ratatui::Frame;

use crate::app::App;
use crate::layout::AppLayout;
use crate::widgets::{ActionButtonWidget, MenuWidget, NavBarWidget, PageViewWidget, StatusBarWidget};

/// Draw one frame of the whole application
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    PageViewWidget::render(frame, layout.page, app);
    NavBarWidget::render(frame, layout.nav, app);
    StatusBarWidget::render(frame, layout.status, app);
    ActionButtonWidget::render(frame, app);

    // Overlay menu on top
    MenuWidget::render(frame, app);
}
