//! Output formatting for tool results

pub mod console;
pub mod formatter;

/// Disable ANSI colors for the rest of the process
pub fn disable_color() {
    colored::control::set_override(false);
}
