//! Rendering for a single message.
//!
//! Own messages are right aligned with a delivery label, the friend's are
//! left aligned, and notifications are centered.

use chatbox_engine::{DeliveryStatus, Message, MessageKind};
use chrono::Local;
use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::text::{truncate_to_width, wrap_text};
use crate::theme::{IconSet, Theme};

/// Share of the pane a message body may use before wrapping, in percent.
const BODY_WIDTH_PERCENT: usize = 75;

/// One message laid out as lines.
pub struct MessageItem<'a> {
    message: &'a Message,
    own: bool,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> MessageItem<'a> {
    pub fn new(message: &'a Message, own: bool, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            message,
            own,
            theme,
            icons,
        }
    }

    /// Lay the message out for a pane `width` cells wide.
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        match self.message.kind {
            MessageKind::Notification => self.notification_lines(width),
            MessageKind::Text | MessageKind::Image => self.bubble_lines(width),
        }
    }

    fn alignment(&self) -> Alignment {
        if self.own {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }

    fn time(&self) -> String {
        self.message
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string()
    }

    fn bubble_lines(&self, width: u16) -> Vec<Line<'static>> {
        let body_width = (usize::from(width) * BODY_WIDTH_PERCENT / 100).max(1);
        let color = if self.own {
            self.theme.own
        } else {
            self.theme.friend
        };
        let alignment = self.alignment();

        let mut lines: Vec<Line<'static>> = wrap_text(&self.message.text, body_width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(color))).alignment(alignment))
            .collect();

        if let Some(image) = &self.message.image {
            let label = format!(
                "{} {} ({})",
                self.icons.attachment(),
                image.file_name,
                format_bytes(image.bytes)
            );
            lines.push(
                Line::from(Span::styled(
                    truncate_to_width(&label, body_width),
                    Style::default()
                        .fg(self.theme.subtext)
                        .add_modifier(Modifier::UNDERLINED),
                ))
                .alignment(alignment),
            );
        }

        lines.push(self.meta_line().alignment(alignment));
        lines
    }

    fn meta_line(&self) -> Line<'static> {
        let muted = Style::default().fg(self.theme.muted);
        let mut spans = vec![Span::styled(self.time(), muted)];

        // only our own messages show delivery state
        if self.own {
            match self.message.status {
                Some(DeliveryStatus::Sent) => {
                    spans.push(Span::styled(format!(" {} sent", self.icons.sent()), muted));
                }
                Some(DeliveryStatus::Read) => spans.push(Span::styled(
                    format!(" {} read", self.icons.read()),
                    Style::default().fg(self.theme.info),
                )),
                None => {}
            }
        }
        Line::from(spans)
    }

    fn notification_lines(&self, width: u16) -> Vec<Line<'static>> {
        let style = Style::default()
            .fg(self.theme.notification)
            .add_modifier(Modifier::ITALIC);
        let mut lines: Vec<Line<'static>> = wrap_text(&self.message.text, usize::from(width))
            .into_iter()
            .map(|l| Line::from(Span::styled(l, style)).alignment(Alignment::Center))
            .collect();
        lines.push(
            Line::from(Span::styled(self.time(), Style::default().fg(self.theme.muted)))
                .alignment(Alignment::Center),
        );
        lines
    }
}

/// Human-readable byte count.
#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
