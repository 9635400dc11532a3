//! Word wrapping for message bodies.

/// Wrap `text` to `width` columns, keeping explicit line breaks.
///
/// Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = text
        .split('\n')
        .flat_map(|paragraph| {
            if paragraph.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(paragraph, width)
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect();

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
