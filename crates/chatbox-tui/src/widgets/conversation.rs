//! Scrollable conversation thread.

use chatbox_engine::{Message, UserId};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::MessageItem;
use crate::theme::{IconSet, Theme};

/// Conversation pane listing every message, newest at the bottom.
///
/// `scroll` counts lines scrolled up from the bottom; 0 follows new messages.
pub struct ConversationView<'a> {
    messages: &'a [Message],
    local: &'a UserId,
    friend_name: &'a str,
    scroll: usize,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> ConversationView<'a> {
    pub fn new(
        messages: &'a [Message],
        local: &'a UserId,
        friend_name: &'a str,
        theme: &'a Theme,
        icons: &'a IconSet,
    ) -> Self {
        Self {
            messages,
            local,
            friend_name,
            scroll: 0,
            theme,
            icons,
        }
    }

    #[must_use]
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// All message lines for a pane `width` cells wide, a blank line between messages.
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            let own = message.is_from(self.local);
            lines.extend(MessageItem::new(message, own, self.theme, self.icons).lines(width));
        }
        lines
    }

    /// Largest useful scroll offset for an inner area of `width` x `height`.
    pub fn max_scroll(&self, width: u16, height: u16) -> usize {
        self.lines(width)
            .len()
            .saturating_sub(usize::from(height))
    }
}

impl Widget for ConversationView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.messages.is_empty() {
            let hint = Line::from(Span::styled(
                format!("Say hi to {} 👋", self.friend_name),
                Style::default().fg(self.theme.muted),
            ));
            let y = inner.y + inner.height / 2;
            Paragraph::new(hint)
                .alignment(Alignment::Center)
                .render(Rect::new(inner.x, y, inner.width, 1), buf);
            return;
        }

        let lines = self.lines(inner.width);
        let height = usize::from(inner.height);
        let max_scroll = lines.len().saturating_sub(height);
        let scroll = self.scroll.min(max_scroll);
        let end = lines.len() - scroll;
        let start = end.saturating_sub(height);

        // short threads sit at the bottom, like a chat
        let used = u16::try_from(end - start).unwrap_or(inner.height);
        let top = inner.y + inner.height.saturating_sub(used);
        let visible: Vec<Line<'static>> = lines[start..end].to_vec();
        Paragraph::new(visible).render(Rect::new(inner.x, top, inner.width, used), buf);

        if scroll > 0 {
            let marker = Line::from(Span::styled(
                format!("↓ {scroll} more"),
                Style::default().fg(self.theme.secondary),
            ));
            Paragraph::new(marker).alignment(Alignment::Right).render(
                Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
                buf,
            );
        }
    }
}
