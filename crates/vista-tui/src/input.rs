use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    NextSection,
    PrevSection,
    /// Jump to the section at this index
    GoToSection(usize),
    ToggleMenu,
    CloseMenu,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if app.is_menu_open() {
        if let Some(action) = handle_menu_key(key) {
            return action;
        }
    }

    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ScrollPageDown,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::ScrollPageUp,
        (KeyCode::PageDown, _) | (KeyCode::Char(' '), KeyModifiers::NONE) => Action::ScrollPageDown,
        (KeyCode::PageUp, _) => Action::ScrollPageUp,

        // Jump to top/bottom
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), KeyModifiers::SHIFT) | (KeyCode::End, _) => Action::JumpToBottom,

        // Sections
        (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::Tab, _) => Action::NextSection,
        (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::BackTab, _) => Action::PrevSection,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => section_digit(c),

        // Overlay menu
        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::ToggleMenu,
        (KeyCode::Esc, _) => Action::CloseMenu,

        _ => Action::None,
    }
}

/// Keys that behave differently while the overlay menu is open
fn handle_menu_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => Some(Action::CloseMenu),
        _ => None,
    }
}

fn section_digit(c: char) -> Action {
    match c.to_digit(10) {
        Some(d) if d > 0 => Action::GoToSection(d as usize - 1),
        _ => Action::None,
    }
}

/// Apply an action to the application state
pub fn apply_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::ScrollDown => app.scroll_down(),
        Action::ScrollUp => app.scroll_up(),
        Action::ScrollHalfPageDown => app.scroll_half_page_down(),
        Action::ScrollHalfPageUp => app.scroll_half_page_up(),
        Action::ScrollPageDown => app.scroll_page_down(),
        Action::ScrollPageUp => app.scroll_page_up(),
        Action::JumpToTop => app.jump_to_top(),
        Action::JumpToBottom => app.jump_to_bottom(),
        Action::NextSection => app.next_section(),
        Action::PrevSection => app.prev_section(),
        Action::GoToSection(index) => app.navigate_to(index),
        Action::ToggleMenu => app.toggle_menu(),
        Action::CloseMenu => app.close_menu(),
        Action::None => {}
    }
}
