//! Terminal colours for user-facing output.

use colored::Colorize;

/// Colours text by role; a disabled palette returns text unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> colored::ColoredString) -> String {
        if self.enabled {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dependency(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    pub fn dropping(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    pub fn file(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    pub fn file_size(&self, text: &str) -> String {
        self.paint(text, |t| t.magenta())
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().bold())
    }

    pub fn installed(&self, text: &str) -> String {
        self.paint(text, |t| t.magenta().bold())
    }

    pub fn not_installed(&self, text: &str) -> String {
        self.paint(text, |t| t.blue())
    }

    pub fn package(&self, text: &str) -> String {
        self.paint(text, |t| t.white().bold())
    }

    pub fn rev_dependency(&self, text: &str) -> String {
        self.paint(text, |t| t.red().reversed())
    }

    pub fn tool(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan())
    }

    pub fn version(&self, text: &str) -> String {
        self.paint(text, |t| t.white().bold())
    }
}
