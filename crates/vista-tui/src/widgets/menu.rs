use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

pub struct MenuWidget;

impl MenuWidget {
    /// Render the overlay section menu when it is open
    pub fn render(frame: &mut Frame, app: &App) {
        if !app.is_menu_open() {
            return;
        }
        let theme = &app.theme;
        let navigator = app.page.navigator();
        let sections = navigator.sections();
        let layout = app.layout();
        let menu_area = layout.menu_area(sections.len()).intersection(frame.area());

        // Clear the background area
        frame.render_widget(Clear, menu_area);

        let block = Block::default()
            .title(" Sections ")
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(" m/Esc close ").alignment(Alignment::Center))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));
        frame.render_widget(block, menu_area);

        for (index, section) in sections.iter().enumerate() {
            let entry = layout
                .menu_entry_area(sections.len(), index)
                .intersection(menu_area);
            if entry.height == 0 || entry.bottom() >= menu_area.bottom() {
                continue;
            }
            let active = index == app.active_section().index();
            let style = if active {
                Style::default()
                    .fg(theme.bg0)
                    .bg(theme.yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg0).bg(theme.bg1)
            };
            let line = Line::from(vec![
                Span::styled(format!(" {} ", index + 1), Style::default().fg(theme.grey1).bg(theme.bg1)),
                Span::styled(format!(" {} ", section.label), style),
            ]);
            frame.render_widget(Paragraph::new(line), entry);
        }
    }
}
