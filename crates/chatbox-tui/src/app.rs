//! Application state for the chat screen.
//!
//! `App` owns the conversation session and everything the UI needs around
//! it: the draft being typed, the image path prompt, scroll position and a
//! transient notice line. Time is always passed in so the same code drives
//! the terminal loop and the headless runner.

use std::path::PathBuf;
use std::time::Instant;

use chatbox_engine::ConversationSession;
use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use tracing::{debug, warn};

use crate::commands::{classify, Command, Input};
use crate::event::{key_to_action, Action};
use crate::theme::{IconMode, IconSet, Theme};
use crate::ui;
use crate::widgets::{ConversationView, NoticeLevel, TextInputState};

/// Lines moved per PageUp/PageDown.
const SCROLL_PAGE: usize = 5;
/// Lines moved per mouse wheel notch.
const SCROLL_WHEEL: usize = 2;
/// Ticks a notice stays visible (4s at the default tick rate).
const NOTICE_TICKS: usize = 16;

/// What the input bar is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Writing a message.
    Compose,
    /// Typing the path of an image to share.
    Attach,
}

/// A transient line in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    ticks_left: usize,
}

pub struct App {
    pub session: ConversationSession,
    /// Message draft.
    pub input: TextInputState,
    /// Image path prompt.
    pub path_input: TextInputState,
    pub mode: InputMode,
    pub show_help: bool,
    pub should_quit: bool,
    /// Lines scrolled up from the newest message.
    pub scroll: usize,
    pub notice: Option<Notice>,
    pub theme: Theme,
    pub icons: IconSet,
    /// Animation counter for the typing dots.
    pub tick: usize,
    pub terminal_size: (u16, u16),
    /// Terminal reports Ctrl+Enter distinctly.
    pub keyboard_enhanced: bool,
}

impl App {
    pub fn new(session: ConversationSession) -> Self {
        Self::with_icons(session, IconSet::new(IconMode::from_env()))
    }

    pub fn with_icons(session: ConversationSession, icons: IconSet) -> Self {
        Self {
            session,
            input: TextInputState::new(),
            path_input: TextInputState::new(),
            mode: InputMode::Compose,
            show_help: false,
            should_quit: false,
            scroll: 0,
            notice: None,
            theme: Theme::from_env(),
            icons,
            tick: 0,
            terminal_size: (80, 24),
            keyboard_enhanced: false,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Advance animations and expire the notice.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(notice) = &mut self.notice {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
            if notice.ticks_left == 0 {
                self.notice = None;
            }
        }
    }

    /// Deliver due replies. Returns how many landed.
    pub fn poll(&mut self, now: Instant) -> usize {
        let landed = self.session.poll(now).len();
        if landed > 0 {
            debug!(landed, "replies delivered");
            self.scroll = 0;
        }
        landed
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // any key dismisses help
        if self.show_help {
            self.show_help = false;
            return;
        }
        self.handle_action(key_to_action(key), now);
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_up(SCROLL_WHEEL),
            MouseEventKind::ScrollDown => self.scroll_down(SCROLL_WHEEL),
            _ => {}
        }
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = !self.show_help,
            Action::Submit => self.submit(now),
            Action::Attach => self.enter_attach_mode(),
            Action::Invite => self.invite(now),
            Action::Back => self.back(),
            Action::ScrollUp => self.scroll_up(SCROLL_PAGE),
            Action::ScrollDown => self.scroll_down(SCROLL_PAGE),
            Action::Newline => {
                if self.mode == InputMode::Compose {
                    self.input.insert('\n');
                }
            }
            Action::Insert(c) => self.active_input().insert(c),
            Action::Backspace => self.active_input().backspace(),
            Action::Delete => self.active_input().delete(),
            Action::Left => self.active_input().move_left(),
            Action::Right => self.active_input().move_right(),
            Action::Home => self.active_input().move_home(),
            Action::End => self.active_input().move_end(),
            Action::HistoryPrev => {
                if self.mode == InputMode::Compose {
                    self.input.history_prev();
                }
            }
            Action::HistoryNext => {
                if self.mode == InputMode::Compose {
                    self.input.history_next();
                }
            }
            Action::None => {}
        }
        self.sync_draft();
    }

    /// Enter: send the draft, run a slash command, or share the typed path.
    pub fn submit(&mut self, now: Instant) {
        if self.mode == InputMode::Attach {
            let path = self.path_input.content().trim().to_string();
            if path.is_empty() {
                // nothing selected
                self.session.submit_image(None, now);
                self.leave_attach_mode();
            } else if self.attach(&path, now) {
                self.leave_attach_mode();
            }
            return;
        }

        match classify(self.input.content()) {
            Input::Command(command) => self.run_command(command, now),
            Input::Text(text) => {
                self.session.set_draft(text);
                if self.session.submit_text(now).is_some() {
                    self.input.submit();
                    self.scroll = 0;
                }
                self.sync_draft();
            }
        }
    }

    fn run_command(&mut self, command: Command, now: Instant) {
        debug!(?command, "slash command");
        match command {
            Command::Image(Some(path)) => {
                if self.attach(&path, now) {
                    self.input.submit();
                }
            }
            Command::Image(None) => {
                self.input.clear();
                self.enter_attach_mode();
            }
            Command::Invite => {
                self.input.submit();
                self.invite(now);
            }
            Command::Help => {
                self.input.clear();
                self.show_help = true;
            }
            Command::Quit => self.should_quit = true,
            Command::Unknown(name) => {
                self.set_notice(format!("Unknown command: /{name}"), NoticeLevel::Error);
            }
        }
        self.sync_draft();
    }

    /// Stage the file at `path` and share it. Returns false if staging failed.
    pub fn attach(&mut self, path: &str, now: Instant) -> bool {
        let path = expand_home(path);
        match self.session.stage_image(&path) {
            Ok(image) => {
                let name = image.file_name.clone();
                if self.session.submit_image(Some(image), now).is_some() {
                    self.set_notice(format!("Shared {name}"), NoticeLevel::Info);
                    self.scroll = 0;
                }
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not stage image");
                self.set_notice(
                    format!("{} {e}", self.icons.warning()),
                    NoticeLevel::Error,
                );
                false
            }
        }
    }

    pub fn invite(&mut self, now: Instant) {
        if self.session.send_game_invite(now).is_some() {
            self.scroll = 0;
        }
    }

    pub fn enter_attach_mode(&mut self) {
        self.mode = InputMode::Attach;
        self.path_input.clear();
    }

    fn leave_attach_mode(&mut self) {
        self.mode = InputMode::Compose;
        self.path_input.submit();
    }

    /// Esc: leave attach mode, clear the draft, or quit.
    fn back(&mut self) {
        if self.mode == InputMode::Attach {
            self.mode = InputMode::Compose;
            self.path_input.clear();
        } else if !self.input.is_empty() {
            self.input.clear();
        } else {
            self.should_quit = true;
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.max_scroll());
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn max_scroll(&self) -> usize {
        let (width, height) = ui::conversation_viewport(self.terminal_size.0, self.terminal_size.1);
        let local = &self.session.local_user().id;
        ConversationView::new(
            self.session.messages(),
            local,
            &self.session.friend().name,
            &self.theme,
            &self.icons,
        )
        .max_scroll(width, height)
    }

    fn active_input(&mut self) -> &mut TextInputState {
        match self.mode {
            InputMode::Compose => &mut self.input,
            InputMode::Attach => &mut self.path_input,
        }
    }

    fn sync_draft(&mut self) {
        if self.session.draft() != self.input.content() {
            self.session.set_draft(self.input.content());
        }
    }

    fn set_notice(&mut self, text: String, level: NoticeLevel) {
        self.notice = Some(Notice {
            text,
            level,
            ticks_left: NOTICE_TICKS,
        });
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
