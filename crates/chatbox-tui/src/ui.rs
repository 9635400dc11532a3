//! Screen layout and rendering.
//!
//! ```text
//! ┌ header ──────────────────────────────┐ 3 rows
//! │ conversation                         │ fills
//! ├ input ───────────────────────────────┤ 3 rows
//! └ footer hints ────────────────────────┘ 1 row
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::{App, InputMode};
use crate::commands::COMMANDS;
use crate::theme::Theme;
use crate::widgets::{ChatHeader, ConversationView, FooterHints, InputBar};

/// Minimum terminal width.
pub const MIN_WIDTH: u16 = 30;
/// Minimum terminal height.
pub const MIN_HEIGHT: u16 = 10;

const HEADER_HEIGHT: u16 = 3;
const INPUT_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;

/// Areas of the chat screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub conversation: Rect,
    pub input: Rect,
    pub footer: Rect,
}

/// Split the terminal into header, conversation, input, and footer.
pub fn layout(area: Rect) -> ScreenLayout {
    let [header, conversation, input, footer] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(FOOTER_HEIGHT),
    ])
    .areas(area);

    ScreenLayout {
        header,
        conversation,
        input,
        footer,
    }
}

/// Width and height available to message lines for a terminal of this size.
pub fn conversation_viewport(width: u16, height: u16) -> (u16, u16) {
    let pane = layout(Rect::new(0, 0, width, height)).conversation;
    // side borders
    (pane.width.saturating_sub(2), pane.height)
}

/// Render the whole screen.
pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(&app.theme, area, buf);
        return;
    }

    let areas = layout(area);
    let session = &app.session;
    let friend = session.friend();

    ChatHeader::new(friend, session.is_typing(), &app.theme, &app.icons)
        .tick(app.tick)
        .render(areas.header, buf);

    ConversationView::new(
        session.messages(),
        &session.local_user().id,
        &friend.name,
        &app.theme,
        &app.icons,
    )
    .scroll(app.scroll)
    .render(areas.conversation, buf);

    let typing_hint;
    let (input, title, prompt, placeholder) = match app.mode {
        InputMode::Compose => {
            let placeholder = if session.is_typing() {
                typing_hint = format!("{} is typing…", friend.name);
                typing_hint.as_str()
            } else {
                "Type a message"
            };
            (&app.input, "Message", "> ", placeholder)
        }
        InputMode::Attach => (
            &app.path_input,
            "Share image",
            "path> ",
            "path to an image file",
        ),
    };
    InputBar::new(input, &app.theme)
        .title(title)
        .prompt(prompt)
        .placeholder(placeholder)
        .focused(!app.show_help)
        .render(areas.input, buf);

    let hints = match app.mode {
        InputMode::Compose => FooterHints::compose_hints(app.keyboard_enhanced),
        InputMode::Attach => FooterHints::attach_hints(),
    };
    let mut footer = FooterHints::new(&hints, &app.theme);
    if let Some(notice) = &app.notice {
        footer = footer.notice(&notice.text, notice.level);
    }
    footer.render(areas.footer, buf);

    if app.show_help {
        render_help_overlay(&app.theme, area, buf);
    }
}

fn render_too_small(theme: &Theme, area: Rect, buf: &mut Buffer) {
    let text = vec![
        Line::from(Span::styled(
            "Terminal too small",
            Style::default().fg(theme.warning),
        )),
        Line::from(Span::styled(
            format!("need {MIN_WIDTH}x{MIN_HEIGHT}, have {}x{}", area.width, area.height),
            Style::default().fg(theme.muted),
        )),
    ];
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(theme.base))
        .render(area, buf);
}

/// Help overlay listing commands and keys.
pub fn render_help_overlay(theme: &Theme, area: Rect, buf: &mut Buffer) {
    let key = Style::default().fg(theme.primary);
    let desc = Style::default().fg(theme.text);
    let heading = Style::default()
        .fg(theme.secondary)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(Span::styled("Commands", heading))];
    for cmd in COMMANDS {
        let usage = match cmd.args {
            Some(args) => format!("/{} {args}", cmd.name),
            None => format!("/{}", cmd.name),
        };
        let mut spans = vec![
            Span::styled(format!("  {usage:<16}"), key),
            Span::styled(cmd.description.to_string(), desc),
        ];
        if let Some(binding) = cmd.keybinding {
            spans.push(Span::styled(
                format!("  ({binding})"),
                Style::default().fg(theme.muted),
            ));
        }
        lines.push(Line::from(spans));
    }
    let aliases: Vec<String> = COMMANDS
        .iter()
        .flat_map(|cmd| cmd.aliases.iter().map(|a| format!("/{a}")))
        .collect();
    lines.push(Line::from(Span::styled(
        format!("  also: {}", aliases.join(" ")),
        Style::default().fg(theme.muted),
    )));

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Keys", heading)));
    for (k, d) in [
        ("Enter", "Send message"),
        ("Ctrl+J", "New line"),
        ("PgUp/PgDn", "Scroll conversation"),
        ("Up/Down", "Previous messages"),
        ("Esc", "Back / clear / quit"),
        ("//text", "Send a leading slash"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("  {k:<16}"), key),
            Span::styled(d, desc),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "  [Press any key to close]",
        Style::default().fg(theme.muted),
    )));

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let width = 60.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let overlay = centered_fixed(width, height, area);

    Clear.render(overlay, buf);
    Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Help ")
                .title_style(heading)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused)),
        )
        .style(Style::default().bg(theme.overlay))
        .render(overlay, buf);
}

/// A `width` x `height` rectangle centered in `area`.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, render_app_to_string, render_app_to_string_sized};
    use std::time::{Duration, Instant};

    #[test]
    fn test_layout_heights() {
        let areas = layout(Rect::new(0, 0, 80, 24));
        assert_eq!(areas.header.height, 3);
        assert_eq!(areas.conversation.height, 17);
        assert_eq!(areas.input.height, 3);
        assert_eq!(areas.footer.height, 1);
        assert_eq!(areas.footer.y, 23);
    }

    #[test]
    fn test_conversation_viewport() {
        assert_eq!(conversation_viewport(80, 24), (78, 17));
    }

    #[test]
    fn test_centered_fixed() {
        let r = centered_fixed(20, 10, Rect::new(0, 0, 80, 24));
        assert_eq!(r, Rect::new(30, 7, 20, 10));
        let r = centered_fixed(200, 100, Rect::new(0, 0, 80, 24));
        assert_eq!(r, Rect::new(0, 0, 80, 24));
    }

    #[test]
    fn test_too_small() {
        let app = create_test_app();
        let out = render_app_to_string_sized(&app, 20, 5);
        assert!(out.contains("Terminal too small"));
    }

    #[test]
    fn test_initial_screen() {
        let app = create_test_app();
        let out = render_app_to_string(&app);
        assert!(out.contains("Best Friend"));
        assert!(out.contains("Say hi to Best Friend"));
        assert!(out.contains("Type a message"));
        assert!(out.contains("[Enter] send"));
    }

    #[test]
    fn test_typing_shown_in_header_and_input() {
        let mut app = create_test_app();
        app.input.insert_str("hi");
        app.submit(Instant::now());

        let out = render_app_to_string(&app);
        assert!(out.contains("typing"));
        assert!(out.contains("Best Friend is typing"));
        assert!(out.contains("✓ sent"));
    }

    #[test]
    fn test_reply_lands_on_screen() {
        let mut app = create_test_app();
        let t0 = Instant::now();
        app.input.insert_str("hi");
        app.submit(t0);
        app.poll(t0 + Duration::from_millis(2000));

        let out = render_app_to_string(&app);
        assert!(!out.contains("typing"));
        // wide emoji render with a trailing blank cell, so match the words
        let reply = app.session.messages()[1].text.clone();
        let (words, _emoji) = reply.rsplit_once(' ').unwrap();
        assert!(out.contains(words));
    }

    #[test]
    fn test_attach_mode_prompt() {
        let mut app = create_test_app();
        app.enter_attach_mode();
        let out = render_app_to_string(&app);
        assert!(out.contains("Share image"));
        assert!(out.contains("path> "));
        assert!(out.contains("[Esc] cancel"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = create_test_app();
        app.show_help = true;
        let out = render_app_to_string(&app);
        assert!(out.contains(" Help "));
        assert!(out.contains("/image [path]"));
        assert!(out.contains("Send a game invite"));
        assert!(out.contains("also: /img /photo /game"));
        assert!(out.contains("Press any key to close"));
    }
}
