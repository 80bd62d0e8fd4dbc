//! codechat-tui: Terminal UI for the codechat coding assistant
//!
//! This crate provides the interactive chat screen:
//! - Transcript with formatted prose and framed code blocks
//! - Input bar with history, disabled while a reply is pending
//! - Help overlay and clipboard copy of code blocks

mod app;
mod event;
#[cfg(test)]
pub mod test_utils;
mod text;
mod theme;
mod ui;
mod widgets;

pub use app::App;
pub use codechat_engine;
pub use event::{Action, Event, EventHandler};
pub use theme::{Theme, ThemeName};

use codechat_engine::Config;
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit.
pub async fn run_tui(config: &Config, theme: ThemeName) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::from_config(config, Theme::from(theme));
    info!(session_id = app.conversation().session_id(), "chat session started");

    let mut events = EventHandler::new(config.tick_rate_ms);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dirty = true;

    loop {
        if dirty {
            let mut max_scroll = 0;
            terminal.draw(|frame| {
                max_scroll = ui::render_chat(app, frame.area(), frame.buffer_mut());
            })?;
            app.set_scroll_limit(max_scroll);
            dirty = false;
        }

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    handle_key(app, key);
                    dirty = true;
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        app.handle_action(Action::Up);
                        dirty = true;
                    }
                    MouseEventKind::ScrollDown => {
                        app.handle_action(Action::Down);
                        dirty = true;
                    }
                    _ => {}
                },
                Event::Tick => {
                    app.tick();
                    // Only the spinner and notifications animate
                    dirty |= app.is_pending() || app.notification.is_some();
                }
                Event::Resize(_, _) => dirty = true,
            }
        }

        app.poll_response().await;
        dirty |= app.take_revision_change();

        if app.should_quit {
            app.abort_pending();
            break;
        }
    }

    Ok(())
}

/// Route a key press: close help, edit the input, or fall through to an action.
fn handle_key(app: &mut App, key: KeyEvent) {
    if app.show_help {
        app.show_help = false;
        return;
    }
    if !handle_input_key(app, key) {
        app.handle_action(event::key_to_action(key));
    }
}

/// Handle key input for the input bar.
/// Returns true if the key was handled (should not be processed as action).
fn handle_input_key(app: &mut App, key: KeyEvent) -> bool {
    let newline = (key.code == KeyCode::Enter
        && key
            .modifiers
            .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT | KeyModifiers::CONTROL))
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('j'));

    // Editing is disabled until the reply arrives
    if app.is_pending() {
        return matches!(key.code, KeyCode::Char(_) | KeyCode::Enter | KeyCode::Backspace | KeyCode::Delete)
            && !key.modifiers.contains(KeyModifiers::CONTROL);
    }

    if newline {
        app.input_state.insert('\n');
        return true;
    }

    // Ctrl+C, Ctrl+Y and friends are actions
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match key.code {
        KeyCode::Enter => {
            app.send_input();
            true
        }
        KeyCode::Char(c) => {
            app.input_state.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input_state.backspace();
            true
        }
        KeyCode::Delete => {
            app.input_state.delete();
            true
        }
        KeyCode::Left => {
            app.input_state.move_left();
            true
        }
        KeyCode::Right => {
            app.input_state.move_right();
            true
        }
        KeyCode::Home => {
            app.input_state.move_home();
            true
        }
        KeyCode::End => {
            app.input_state.move_end();
            true
        }
        // History navigation when input is empty, else scroll the transcript
        KeyCode::Up if app.input_state.is_empty() => {
            app.input_state.history_prev();
            true
        }
        KeyCode::Down if app.input_state.is_empty() => {
            app.input_state.history_next();
            true
        }
        _ => false,
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
