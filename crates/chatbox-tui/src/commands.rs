//! Slash commands typed into the input bar.
//!
//! Commands are invoked by typing `/` followed by the command name, for
//! example `/invite` or `/image ~/pics/cat.png`. A leading `//` sends a
//! literal slash as text.

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Share an image; without a path, open the path prompt.
    Image(Option<String>),
    /// Send a game invite.
    Invite,
    /// Toggle the help overlay.
    Help,
    /// Exit chatbox.
    Quit,
    /// Unrecognized command name.
    Unknown(String),
}

/// Command metadata for the help overlay.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    /// Primary command name (without the /).
    pub name: &'static str,
    /// Alternative names for the command.
    pub aliases: &'static [&'static str],
    /// Argument placeholder, if any.
    pub args: Option<&'static str>,
    /// Brief description.
    pub description: &'static str,
    /// Keyboard shortcut if available.
    pub keybinding: Option<&'static str>,
}

/// Static registry of all available commands.
pub static COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "image",
        aliases: &["img", "photo"],
        args: Some("[path]"),
        description: "Share an image",
        keybinding: Some("Ctrl+O"),
    },
    CommandInfo {
        name: "invite",
        aliases: &["game"],
        args: None,
        description: "Send a game invite",
        keybinding: Some("Ctrl+G"),
    },
    CommandInfo {
        name: "help",
        aliases: &["?"],
        args: None,
        description: "Show available commands",
        keybinding: Some("F1"),
    },
    CommandInfo {
        name: "quit",
        aliases: &["q", "exit"],
        args: None,
        description: "Exit chatbox",
        keybinding: Some("Ctrl+C"),
    },
];

/// What a submitted line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A slash command.
    Command(Command),
    /// Text to send as a message, slash escapes removed.
    Text(String),
}

/// Check if input starts with '/' (is a command).
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/') && !is_escaped_slash(input)
}

/// Check if input is an escaped slash (starts with //).
pub fn is_escaped_slash(input: &str) -> bool {
    input.trim().starts_with("//")
}

/// Unescape a leading `//` to `/`. Other input is returned unchanged.
pub fn unescape_slash(input: &str) -> String {
    let trimmed = input.trim_start();
    match trimmed.strip_prefix("//") {
        Some(rest) => format!("/{rest}"),
        None => input.to_string(),
    }
}

/// Classify a submitted line.
pub fn classify(input: &str) -> Input {
    if is_command(input) {
        if let Some(command) = parse_command(input) {
            return Input::Command(command);
        }
    }
    Input::Text(unescape_slash(input))
}

/// Parse a slash command from user input.
///
/// Returns `None` if the input does not start with `/`.
///
/// # Examples
///
/// ```
/// use chatbox_tui::commands::{parse_command, Command};
///
/// assert!(matches!(parse_command("/invite"), Some(Command::Invite)));
/// assert!(matches!(parse_command("/image cat.png"), Some(Command::Image(Some(_)))));
/// ```
pub fn parse_command(input: &str) -> Option<Command> {
    let content = input.trim().strip_prefix('/')?;

    let (name, args) = match content.find(char::is_whitespace) {
        Some(idx) => {
            let (c, a) = content.split_at(idx);
            let a = a.trim();
            (c.to_lowercase(), (!a.is_empty()).then(|| a.to_string()))
        }
        None => (content.to_lowercase(), None),
    };

    Some(match name.as_str() {
        "image" | "img" | "photo" => Command::Image(args),
        "invite" | "game" => Command::Invite,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    })
}
