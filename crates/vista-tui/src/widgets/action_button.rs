use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, ACTION_BUTTON_READY};

/// Scale below which the button is not drawn at all
const DOT_SCALE: f64 = 0.34;

pub struct ActionButtonWidget;

impl ActionButtonWidget {
    /// Floating contact button on narrow terminals. Pops in as a dot, then
    /// the full button.
    pub fn render(frame: &mut Frame, app: &App) {
        if !app.is_compact() || app.is_menu_open() {
            return;
        }
        let theme = &app.theme;
        let state = app.page.action_button_state(app.now());
        let area = app.layout().action_button_area();

        let span = if state.scale >= ACTION_BUTTON_READY {
            Span::styled(
                "( ✉ )",
                Style::default()
                    .fg(theme.bg0)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else if state.scale >= DOT_SCALE {
            Span::styled("·", Style::default().fg(theme.accent))
        } else {
            return;
        };

        frame.render_widget(
            Paragraph::new(Line::from(span)).alignment(Alignment::Center),
            area,
        );
    }
}
