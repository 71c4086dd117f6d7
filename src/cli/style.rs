//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escape codes when
//! stdout isn't a terminal.

use owo_colors::OwoColorize;

/// Check mark used for successful steps
pub const CHECK: &str = "✓";

/// Semantic styles for CLI output
pub trait Stylize {
    /// Headlines and important values
    fn emphasis(&self) -> String;
    /// Secondary information
    fn muted(&self) -> String;
    /// Counts and identifiers
    fn accent(&self) -> String;
    /// Completed actions
    fn success(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }
}

/// Styled check mark
pub fn check() -> String {
    CHECK.success()
}
