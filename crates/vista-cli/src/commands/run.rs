use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use vista_core::{AppConfig, Page, PageConfig};
use vista_tui::{
    event::{AppEvent, EventHandler},
    input::{apply_action, handle_key_event},
    ui, App,
};

pub fn run(config: Arc<AppConfig>, page_config: PageConfig) -> Result<()> {
    let page = Page::build(&page_config, &config.motion, 0.0)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(page.title()))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, App::new(page, config));

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    let size = terminal.size()?;
    app.mount(size.width, size.height);
    info!(title = app.page.title(), width = size.width, height = size.height, "Page mounted");

    let event_handler = EventHandler::with_animation_fps(
        app.config.ui.tick_rate_ms,
        app.config.ui.scroll.animation_fps,
    );

    // Checked at the end of each iteration to pick the next poll rate
    let mut needs_fast_update = true;

    loop {
        app.update();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Use the frame rate while anything is moving
        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    app.clear_status();
                    let action = handle_key_event(key, &app);
                    apply_action(&mut app, action);
                }
                AppEvent::Click(column, row) => app.click(column, row),
                AppEvent::Wheel(rows) => app.scroll_rows(rows),
                AppEvent::Resize(width, height) => app.resize(width, height),
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    app.page.dispose();
    info!("Page closed");
    Ok(())
}
