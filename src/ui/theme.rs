use ansi_term::{Colour, Style};
use std::io::IsTerminal;

/// Terminal styles. With color off every style is plain, so output piped
/// to a file carries no escape codes.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    color: bool,
}

impl Theme {
    /// Color when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        Self {
            color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    fn pick(&self, style: Style) -> Style {
        if self.color { style } else { Style::new() }
    }

    pub fn title(&self) -> Style {
        self.pick(Colour::Green.bold())
    }

    /// Table headers and option keys.
    pub fn label(&self) -> Style {
        self.pick(Colour::Yellow.bold())
    }

    pub fn value(&self) -> Style {
        self.pick(Colour::White.normal())
    }

    pub fn success(&self) -> Style {
        self.pick(Colour::Green.normal())
    }

    pub fn error(&self) -> Style {
        self.pick(Colour::Red.bold())
    }

    pub fn dimmed(&self) -> Style {
        self.pick(Style::new().dimmed())
    }
}
