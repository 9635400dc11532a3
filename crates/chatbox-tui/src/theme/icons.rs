//! Icon sets for Unicode and ASCII fallback.

/// Icon mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconMode {
    /// Standard Unicode symbols.
    #[default]
    Unicode,
    /// ASCII-only fallback (also used with `NO_COLOR`).
    Ascii,
}

impl IconMode {
    /// Pick a mode from the environment, respecting `NO_COLOR`.
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::Ascii
        } else {
            Self::Unicode
        }
    }
}

/// Icon set based on configured mode.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    mode: IconMode,
}

impl IconSet {
    /// Create a new icon set with the specified mode.
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    /// Get the current icon mode.
    pub fn mode(&self) -> IconMode {
        self.mode
    }

    // === Delivery ===

    pub fn sent(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "✓",
            IconMode::Ascii => "v",
        }
    }

    pub fn read(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "✓✓",
            IconMode::Ascii => "vv",
        }
    }

    // === Presence ===

    pub fn online(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "●",
            IconMode::Ascii => "*",
        }
    }

    /// Animated typing dots for the given tick.
    pub fn typing(&self, tick: usize) -> &'static str {
        const UNICODE: [&str; 3] = ["•  ", "•• ", "•••"];
        const ASCII: [&str; 3] = [".  ", ".. ", "..."];
        match self.mode {
            IconMode::Unicode => UNICODE[tick % UNICODE.len()],
            IconMode::Ascii => ASCII[tick % ASCII.len()],
        }
    }

    // === Attachments ===

    pub fn attachment(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "🖼",
            IconMode::Ascii => "[img]",
        }
    }

    pub fn warning(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "⚠",
            IconMode::Ascii => "[!]",
        }
    }
}
