use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let navigator = app.page.navigator();
        let scroll_y = app.page.scroll_y();
        let max = app.page.max_scroll();
        let percent = if max > 0.0 {
            (scroll_y / max * 100.0).round() as u32
        } else {
            100
        };

        let status_text = match &app.status_message {
            Some(msg) => format!(" {msg}"),
            None => {
                let label = navigator
                    .sections()
                    .get(app.active_section().index())
                    .map(|s| s.label.as_str())
                    .unwrap_or_default();
                format!(" {} | {:.0}px | {}%", label.to_uppercase(), scroll_y, percent)
            }
        };

        let help_hint = if app.is_compact() {
            " q:quit m:menu "
        } else {
            " q:quit j/k:scroll n/p:section 1-9:jump m:menu "
        };
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
