//! UI context for environment detection.

use std::io::IsTerminal;

/// Terminal and environment context for UI decisions.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether stdin is a TTY (prompt with echo disabled)
    pub interactive: bool,
    /// Whether color output is enabled on stderr
    pub color: bool,
}

impl UiContext {
    /// Create context from the environment.
    pub fn from_env() -> Self {
        let stderr_tty = std::io::stderr().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var_os("NO_COLOR").is_some();

        Self {
            interactive: std::io::stdin().is_terminal(),
            color: resolve_color(stderr_tty, no_color_env, term_is_dumb),
        }
    }
}

/// Color only on a TTY, and never with `NO_COLOR` or `TERM=dumb`.
fn resolve_color(is_tty: bool, no_color_env: bool, term_is_dumb: bool) -> bool {
    is_tty && !no_color_env && !term_is_dumb
}
