//! Headless mode for the chatbox TUI.
//!
//! Drives the same [`App`] as the terminal loop, without a terminal: each
//! script step is typed into the active input and submitted, then the runner
//! sleeps until every scripted reply has landed. Sleeping goes through
//! `tokio::time`, so tests can run it with paused time.

use std::time::Duration;

use chatbox_engine::{Config, ConversationSession, Message, SessionError};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use serde::Serialize;
use tracing::{debug, info};

use crate::app::{App, InputMode};
use crate::event::Action;
use crate::theme::{IconMode, IconSet};
use crate::{now, ui};

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// Options for a headless run.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Pause between steps.
    pub gap: Duration,
    /// Terminal width for the final screen capture.
    pub width: u16,
    /// Terminal height for the final screen capture.
    pub height: u16,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            gap: Duration::from_millis(500),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    /// Every message in order of arrival.
    pub messages: Vec<Message>,
    /// Notices raised along the way (e.g. a missing image file).
    pub notices: Vec<String>,
    /// Text of the final screen.
    #[serde(skip)]
    pub screen: String,
    /// A step asked to quit before the script ended.
    pub quit_early: bool,
}

/// Run `steps` against a fresh session and return the transcript.
///
/// Each step is plain text or a slash command, exactly as typed into the
/// input bar. After a bare `/image` the next step is the path to share; a
/// path that cannot be staged becomes a notice. A `/quit` step tears the session down, dropping replies still
/// pending.
pub async fn run_script(
    config: &Config,
    steps: &[String],
    options: &HeadlessConfig,
) -> Result<HeadlessReport, SessionError> {
    let session = ConversationSession::new(config)?;
    let mut app = App::with_icons(session, IconSet::new(IconMode::Unicode));
    app.resize(options.width, options.height);

    let mut notices = Vec::new();
    let mut quit_early = false;

    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(options.gap).await;
            app.poll(now());
        }

        debug!(step = %step, "script step");
        let attaching = app.mode == InputMode::Attach;
        if attaching {
            app.path_input.set_content(step.as_str());
        } else {
            app.input.set_content(step.as_str());
        }
        app.submit(now());
        // a failed path keeps the prompt open; scripts have no Esc
        if attaching && app.mode == InputMode::Attach {
            app.handle_action(Action::Back, now());
        }

        if let Some(notice) = app.notice.take() {
            notices.push(notice.text);
        }
        if app.should_quit {
            quit_early = i + 1 < steps.len();
            app.session.teardown();
            break;
        }
    }

    while let Some(due) = app.session.next_reply_due() {
        tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await;
        app.poll(now());
    }

    let screen = capture(&app, options.width, options.height);
    app.session.teardown();

    info!(
        steps = steps.len(),
        messages = app.session.messages().len(),
        "script finished"
    );

    Ok(HeadlessReport {
        messages: app.session.messages().to_vec(),
        notices,
        screen,
        quit_early,
    })
}

fn capture(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let Ok(mut terminal) = Terminal::new(backend) else {
        return String::new();
    };
    if terminal
        .draw(|frame| ui::render(app, frame.area(), frame.buffer_mut()))
        .is_err()
    {
        return String::new();
    }
    buffer_to_string(terminal.backend().buffer())
}

/// Convert a buffer to text, one line per row, trailing spaces trimmed.
fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut lines = Vec::with_capacity(usize::from(area.height));
    for y in area.y..area.y + area.height {
        let line: String = (area.x..area.x + area.width)
            .filter_map(|x| buffer.cell((x, y)).map(ratatui::buffer::Cell::symbol))
            .collect();
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}
