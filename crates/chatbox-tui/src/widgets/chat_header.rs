//! Chat header: who you are talking to and whether they are typing.
//!
//! ```text
//! ● Best Friend                          last seen 14:02
//!   🎮 Playing games
//! ──────────────────────────────────────────────────────
//! ```

use chatbox_engine::User;
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::{IconSet, Theme};

/// Header widget for the friend's identity and typing indicator.
pub struct ChatHeader<'a> {
    friend: &'a User,
    typing: bool,
    tick: usize,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> ChatHeader<'a> {
    /// Create a header for `friend`.
    pub fn new(friend: &'a User, typing: bool, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            friend,
            typing,
            tick: 0,
            theme,
            icons,
        }
    }

    /// Animation frame for the typing dots.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    fn status_line(&self) -> Line<'static> {
        if self.typing {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("typing {}", self.icons.typing(self.tick)),
                    Style::default()
                        .fg(self.theme.secondary)
                        .add_modifier(Modifier::ITALIC),
                ),
            ])
        } else {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    self.friend.status.clone(),
                    Style::default().fg(self.theme.subtext),
                ),
            ])
        }
    }
}

impl Widget for ChatHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let name = Line::from(vec![
            Span::styled(
                format!("{} ", self.icons.online()),
                Style::default().fg(self.theme.success),
            ),
            Span::styled(
                self.friend.name.clone(),
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(vec![name, self.status_line()]).render(inner, buf);

        if let Some(seen) = self.friend.last_seen {
            let label = format!(
                "last seen {}",
                seen.with_timezone(&Local).format("%H:%M")
            );
            Paragraph::new(Line::from(Span::styled(
                label,
                Style::default().fg(self.theme.muted),
            )))
            .alignment(Alignment::Right)
            .render(Rect::new(inner.x, inner.y, inner.width, 1), buf);
        }
    }
}
