//! Full-width input bar widget.
//!
//! Always visible below the conversation. Supports multi-line drafts with
//! Ctrl+J for newlines, and doubles as the image path prompt.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::TextInputState;
use crate::theme::Theme;

/// Full-width input bar for text entry.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    title: &'a str,
    prompt: &'a str,
    placeholder: &'a str,
    focused: bool,
}

impl<'a> InputBar<'a> {
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            title: "",
            prompt: "> ",
            placeholder: "",
            focused: true,
        }
    }

    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Prefix for the first line, e.g. `"> "`.
    #[must_use]
    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }

    /// Hint shown while the input is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Lines to display and the index of the line holding the cursor.
    fn build_input_lines(&self) -> (Vec<Line<'static>>, usize) {
        let content = self.input.content();
        let cursor_pos = self.input.cursor;
        let indent = " ".repeat(self.prompt.chars().count());

        if content.is_empty() {
            let mut spans = vec![Span::raw(self.prompt.to_string())];
            if self.focused {
                spans.push(Span::raw("█"));
            }
            spans.push(Span::styled(
                self.placeholder.to_string(),
                Style::default().fg(self.theme.muted),
            ));
            return (vec![Line::from(spans)], 0);
        }

        let text_lines: Vec<&str> = content.split('\n').collect();

        let mut char_count = 0;
        let mut cursor_line = 0;
        let mut cursor_col = 0;
        for (line_idx, line) in text_lines.iter().enumerate() {
            let line_len = line.chars().count();
            if cursor_pos <= char_count + line_len {
                cursor_line = line_idx;
                cursor_col = cursor_pos - char_count;
                break;
            }
            // +1 for the newline
            char_count += line_len + 1;
        }

        let lines = text_lines
            .iter()
            .enumerate()
            .map(|(line_idx, line_text)| {
                let prefix = if line_idx == 0 {
                    self.prompt.to_string()
                } else {
                    indent.clone()
                };
                if !(self.focused && line_idx == cursor_line) {
                    return Line::from(format!("{prefix}{line_text}"));
                }

                let chars: Vec<char> = line_text.chars().collect();
                let col = cursor_col.min(chars.len());
                let before: String = chars[..col].iter().collect();
                let after: String = chars[col..].iter().collect();
                Line::from(vec![
                    Span::raw(prefix),
                    Span::raw(before),
                    Span::raw("█"),
                    Span::raw(after),
                ])
            })
            .collect();

        (lines, cursor_line)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        if !self.title.is_empty() {
            block = block.title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(self.theme.subtext),
            ));
        }

        let inner_height = usize::from(area.height.saturating_sub(2));
        let (lines, cursor_line) = self.build_input_lines();

        // keep the cursor line visible
        let scroll_offset = if lines.len() <= inner_height {
            0
        } else {
            cursor_line.saturating_sub(inner_height.saturating_sub(1))
        };

        Paragraph::new(lines)
            .block(block)
            .style(Style::default().fg(self.theme.text))
            .scroll((u16::try_from(scroll_offset).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}
