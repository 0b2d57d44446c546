use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Block,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vista_core::motion::VisualState;

use crate::app::App;

/// Horizontal page pixels represented by one terminal column
const PX_PER_COLUMN: f64 = 8.0;
/// Left margin of block content
const INDENT: i32 = 4;
const LABEL_WIDTH: usize = 14;
const MAX_TRACK: u16 = 32;
const CURSOR: &str = "▌";

pub struct PageViewWidget;

impl PageViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);

        let now = app.now();
        let px_per_row = app.px_per_row();
        let scroll_y = app.page.scroll_y();
        let window = area.height as f64 * px_per_row;
        let to_row = |y: f64| ((y - scroll_y) / px_per_row).floor() as i32;
        let text_width = (area.width as i32 - 2 * INDENT).max(1) as usize;

        let mut canvas = Canvas {
            buf: frame.buffer_mut(),
            area,
        };

        // Section rules
        for (index, section) in app.page.navigator().sections().iter().enumerate() {
            let Some(top) = app.page.section_top(index) else {
                continue;
            };
            let label = format!("── {} ", section.label);
            let fill = "─".repeat((area.width as usize).saturating_sub(label.width() + 1));
            canvas.put(
                to_row(top),
                1,
                &format!("{label}{fill}"),
                Style::default().fg(theme.grey1),
            );
        }

        for block in app.page.blocks() {
            let bounds = block.bounds();
            if bounds.bottom() < scroll_y || bounds.top > scroll_y + window {
                continue;
            }
            for (item, state) in block.ambient(now) {
                let free = (area.width as f64 - item.text.width() as f64).max(0.0);
                let col = (free * item.left_pct / 100.0).round() as i32;
                canvas.put(
                    to_row(bounds.top + item.top_px + state.offset_y),
                    col,
                    &item.text,
                    Style::default().fg(theme.fade(theme.aqua, state.opacity)),
                );
            }

            let mut row = to_row(bounds.top) + 1;

            if let Some(title) = block.title() {
                let state = block
                    .reveal()
                    .item_state(0, now)
                    .unwrap_or(VisualState::SHOWN);
                canvas.put(
                    row,
                    INDENT,
                    title,
                    Style::default()
                        .fg(theme.fade(theme.yellow, state.opacity.max(0.4)))
                        .add_modifier(Modifier::BOLD),
                );
                row += 2;
            }

            for (text, state) in block.lines(now) {
                if state.is_visible() {
                    let dy = (state.offset_y / px_per_row).round() as i32;
                    let dx = (state.offset_x / PX_PER_COLUMN).round() as i32;
                    canvas.put(
                        row + dy,
                        INDENT + dx,
                        text,
                        Style::default().fg(theme.fade(theme.fg0, state.opacity)),
                    );
                }
                row += 1;
            }

            if let Some(typewriter) = block.typewriter() {
                row += 1;
                let lines = wrap(typewriter.revealed_text(), text_width);
                let last = lines.len().saturating_sub(1);
                for (i, line) in lines.iter().enumerate() {
                    canvas.put(row, INDENT, line, Style::default().fg(theme.fg1));
                    if i == last && typewriter.cursor_visible() {
                        canvas.put(
                            row,
                            INDENT + line.width() as i32,
                            CURSOR,
                            Style::default().fg(theme.cursor),
                        );
                    }
                    row += 1;
                }
            }

            if !block.counters().is_empty() {
                row += 1;
                for (i, counter) in block.counters().iter().enumerate() {
                    let value = format!("{:>10}", counter.display());
                    canvas.put(
                        row,
                        INDENT,
                        &value,
                        Style::default()
                            .fg(theme.series(i))
                            .add_modifier(Modifier::BOLD),
                    );
                    canvas.put(
                        row,
                        INDENT + 12,
                        &counter.label,
                        Style::default().fg(theme.grey2),
                    );
                    row += 1;
                }
            }

            let track = MAX_TRACK.min(area.width.saturating_sub(2 * INDENT as u16 + LABEL_WIDTH as u16 + 12));
            for bar in block.bars() {
                let width = bar.animator.width(now);
                let filled = bar.animator.filled_cells(now, track);
                let label = pad(&bar.label, LABEL_WIDTH);
                canvas.put(row, INDENT, &label, Style::default().fg(theme.fg0));

                let x = INDENT + LABEL_WIDTH as i32;
                canvas.put(
                    row,
                    x,
                    &"█".repeat(filled as usize),
                    Style::default().fg(theme.level(bar.animator.target())),
                );
                canvas.put(
                    row,
                    x + filled as i32,
                    &"░".repeat(track.saturating_sub(filled) as usize),
                    Style::default().fg(theme.bg2),
                );
                canvas.put(
                    row,
                    x + track as i32 + 1,
                    &format!("{:>3}% {}", (width * 100.0).round() as u32, bar.caption),
                    Style::default().fg(theme.grey2),
                );
                row += 2;
            }
        }
    }
}

/// Clipped drawing into the page area with row/column offsets relative to it
struct Canvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl Canvas<'_> {
    fn put(&mut self, row: i32, col: i32, text: &str, style: Style) {
        if row < 0 || row >= self.area.height as i32 || col >= self.area.width as i32 {
            return;
        }
        // Text sliding in from the left is cut at the edge
        let (text, col) = if col < 0 {
            (skip_columns(text, (-col) as usize), 0)
        } else {
            (text, col)
        };
        let x = self.area.x + col as u16;
        let y = self.area.y + row as u16;
        let max_width = (self.area.right() - x) as usize;
        self.buf.set_stringn(x, y, text, max_width, style);
    }
}

fn skip_columns(text: &str, columns: usize) -> &str {
    let mut skipped = 0;
    for (i, c) in text.char_indices() {
        if skipped >= columns {
            return &text[i..];
        }
        skipped += c.width().unwrap_or(0);
    }
    ""
}

fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - used))
    }
}

/// Greedy word wrap by display width
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![String::new()];
    for word in text.split(' ') {
        let Some(current) = lines.last_mut() else {
            break;
        };
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed > width && !current.is_empty() {
            lines.push(word.to_string());
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap_by_width() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("unbreakable", 4), vec!["unbreakable"]);
    }

    #[test]
    fn test_skip_columns() {
        assert_eq!(skip_columns("hello", 2), "llo");
        assert_eq!(skip_columns("hi", 5), "");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("Rust", 6), "Rust  ");
        assert_eq!(pad("TypeScript", 4), "TypeScript");
    }
}
