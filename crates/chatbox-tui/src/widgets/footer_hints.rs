//! Footer bar: a notice on the left, key hints on the right.
//!
//! `● Photo shared                 [Enter] send │ [Ctrl+O] image │ [F1] help`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::text::{truncate_to_width, visual_width};
use crate::theme::Theme;

/// A single keybinding hint.
#[derive(Debug, Clone)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Enter", "Ctrl+O").
    pub key: String,
    /// The action description (e.g., "send", "image").
    pub action: String,
}

impl KeyHint {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Severity of a footer notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Footer status bar widget.
pub struct FooterHints<'a> {
    hints: &'a [KeyHint],
    theme: &'a Theme,
    notice: Option<(&'a str, NoticeLevel)>,
}

impl<'a> FooterHints<'a> {
    pub fn new(hints: &'a [KeyHint], theme: &'a Theme) -> Self {
        Self {
            hints,
            theme,
            notice: None,
        }
    }

    /// Message shown on the left.
    #[must_use]
    pub fn notice(mut self, text: &'a str, level: NoticeLevel) -> Self {
        self.notice = Some((text, level));
        self
    }

    /// Hints while composing a message.
    ///
    /// `keyboard_enhanced` selects Ctrl+Enter over Ctrl+J for newlines.
    pub fn compose_hints(keyboard_enhanced: bool) -> Vec<KeyHint> {
        let newline = if keyboard_enhanced {
            KeyHint::new("Ctrl+Enter", "newline")
        } else {
            KeyHint::new("Ctrl+J", "newline")
        };
        vec![
            KeyHint::new("Enter", "send"),
            newline,
            KeyHint::new("Ctrl+O", "image"),
            KeyHint::new("Ctrl+G", "invite"),
            KeyHint::new("F1", "help"),
        ]
    }

    /// Hints while typing an image path.
    pub fn attach_hints() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Enter", "share"),
            KeyHint::new("Esc", "cancel"),
        ]
    }
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let muted = Style::default().fg(self.theme.muted);

        let mut right_spans = Vec::new();
        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                right_spans.push(Span::styled(" │ ", muted));
            }
            right_spans.push(Span::styled("[", muted));
            right_spans.push(Span::styled(
                hint.key.clone(),
                Style::default().fg(self.theme.primary),
            ));
            right_spans.push(Span::styled("] ", muted));
            right_spans.push(Span::styled(
                hint.action.clone(),
                Style::default().fg(self.theme.subtext),
            ));
        }
        let right_width: usize = right_spans.iter().map(|s| visual_width(&s.content)).sum();
        let total_width = usize::from(area.width);

        let mut spans = Vec::new();
        if let Some((text, level)) = self.notice {
            let color = match level {
                NoticeLevel::Info => self.theme.info,
                NoticeLevel::Error => self.theme.error,
            };
            // the notice wins over hints when space is short
            let room = total_width.saturating_sub(right_width + 1).max(total_width / 2);
            spans.push(Span::styled(
                truncate_to_width(text, room),
                Style::default().fg(color),
            ));
        }

        let left_width: usize = spans.iter().map(|s| visual_width(&s.content)).sum();
        if left_width + right_width <= total_width {
            spans.push(Span::raw(" ".repeat(total_width - left_width - right_width)));
            spans.extend(right_spans);
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn render(footer: FooterHints<'_>, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        footer.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_key_hint_creation() {
        let hint = KeyHint::new("Ctrl+O", "image");
        assert_eq!(hint.key, "Ctrl+O");
        assert_eq!(hint.action, "image");
    }

    #[test]
    fn test_compose_hints_newline_key() {
        let hints = FooterHints::compose_hints(false);
        assert!(hints.iter().any(|h| h.key == "Ctrl+J"));
        let hints = FooterHints::compose_hints(true);
        assert!(hints.iter().any(|h| h.key == "Ctrl+Enter"));
        assert!(hints.iter().any(|h| h.key == "Ctrl+G" && h.action == "invite"));
    }

    #[test]
    fn test_hints_right_aligned() {
        let theme = Theme::default();
        let hints = FooterHints::attach_hints();
        let out = render(FooterHints::new(&hints, &theme), 50);
        assert!(out.ends_with("[Enter] share │ [Esc] cancel"));
        assert!(out.starts_with(' '));
    }

    #[test]
    fn test_notice_on_left() {
        let theme = Theme::default();
        let hints = FooterHints::attach_hints();
        let out = render(
            FooterHints::new(&hints, &theme).notice("File not found", NoticeLevel::Error),
            60,
        );
        assert!(out.starts_with("File not found"));
        assert!(out.contains("[Esc] cancel"));
    }

    #[test]
    fn test_narrow_drops_hints() {
        let theme = Theme::default();
        let hints = FooterHints::compose_hints(false);
        let out = render(
            FooterHints::new(&hints, &theme).notice("Photo shared", NoticeLevel::Info),
            30,
        );
        assert!(out.starts_with("Photo shared"));
        assert!(!out.contains("[Enter]"));
    }
}
