//! Spinners for operations that wait on the network or a timeout

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
///
/// Hidden when stderr is not a terminal so piped output stays clean.
#[must_use]
pub fn spinner(message: &str) -> ProgressBar {
    if !console::Term::stderr().features().is_attended() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {message}"));
}

/// Clear a spinner without leaving a line behind
pub fn finish_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_creation() {
        let pb = spinner("Locating...");
        finish_success(&pb, "done");
        assert!(pb.is_finished());
    }

    #[test]
    fn test_finish_clear() {
        let pb = spinner("Searching...");
        finish_clear(&pb);
        assert!(pb.is_finished());
    }
}
