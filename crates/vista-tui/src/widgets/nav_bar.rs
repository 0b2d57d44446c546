use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use vista_core::NavBackdrop;

use crate::app::App;
use crate::theme::blend;

pub struct NavBarWidget;

impl NavBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let now = app.now();
        let navigator = app.page.navigator();
        let active = app.active_section().index();

        // Transparent over the hero, frosted once the page scrolls
        let backdrop = NavBackdrop::at(app.page.scroll_y());
        let bg = blend(theme.bg0, theme.bg2, backdrop.opacity);
        let mut bar = Block::default().style(Style::default().bg(bg));
        if backdrop.blur >= 5.0 {
            bar = bar.style(Style::default().bg(bg).add_modifier(Modifier::DIM));
        }
        frame.render_widget(bar, area);

        let mut spans = vec![Span::styled(
            format!(" {} ", app.page.title()),
            Style::default()
                .fg(theme.accent)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )];

        if app.is_compact() {
            if let Some(section) = navigator.sections().get(active) {
                spans.push(Span::styled("│ ", Style::default().fg(theme.grey1).bg(bg)));
                spans.push(Span::styled(
                    section.label.clone(),
                    Style::default().fg(theme.yellow).bg(bg),
                ));
            }
            let toggle = if app.is_menu_open() { "✕ " } else { "☰ " };
            let hint = Paragraph::new(Line::from(Span::styled(
                toggle,
                Style::default().fg(theme.fg1).bg(bg),
            )))
            .alignment(Alignment::Right);
            frame.render_widget(Paragraph::new(Line::from(spans)), area);
            frame.render_widget(hint, area);
            return;
        }

        for (index, section) in navigator.sections().iter().enumerate() {
            let entrance = app.page.nav_entry_state(index, now);
            let base = if index == active { theme.yellow } else { theme.fg0 };
            let mut style = Style::default()
                .fg(blend(bg, base, entrance.opacity))
                .bg(bg);
            if index == active {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(" ", Style::default().bg(bg)));
            spans.push(Span::styled(format!("{} {}", index + 1, section.label), style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
