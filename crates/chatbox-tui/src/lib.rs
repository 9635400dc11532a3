//! chatbox-tui: Terminal UI for the chatbox mock chat
//!
//! This crate provides the interactive layer of chatbox, including:
//! - The chat screen (header, conversation, input bar, footer)
//! - Key handling and slash commands
//! - Headless mode for scripts and tests

mod app;
pub mod commands;
mod event;
pub mod headless;
#[cfg(test)]
pub mod test_utils;
mod text;
mod theme;
mod ui;
mod widgets;

pub use app::{App, InputMode};
pub use chatbox_engine;
pub use event::{Action, Event, EventHandler};
pub use headless::{run_script, HeadlessConfig, HeadlessReport};

use chatbox_engine::{Config, ConversationSession};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tracing::info;

/// Current time on the tokio clock, so paused test time applies.
pub(crate) fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// RAII guard for terminal state restoration.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the interactive chat.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit. The session is torn down before returning.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let session = ConversationSession::new(config)?;

    enable_raw_mode()?;
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let _guard = TerminalGuard { keyboard_enhanced };

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    if keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    app.keyboard_enhanced = keyboard_enhanced;
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    // 4 Hz tick drives the typing animation
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    app.session.teardown();
    info!(messages = app.session.messages().len(), "chat closed");
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame.area(), frame.buffer_mut()))?;

        if app.should_quit {
            break;
        }

        let due = app.session.next_reply_due();
        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) => app.handle_key(key, now()),
                Some(Event::Mouse(mouse)) => app.handle_mouse(mouse),
                Some(Event::Resize(width, height)) => app.resize(width, height),
                Some(Event::Tick) => app.tick(),
                None => break,
            },
            () = sleep_until_due(due) => {}
        }

        app.poll(now());
    }

    Ok(())
}

/// Sleep until the next reply is due, or forever if none is pending.
async fn sleep_until_due(due: Option<std::time::Instant>) {
    match due {
        Some(due) => tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await,
        None => std::future::pending().await,
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
