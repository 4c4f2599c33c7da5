//! Terminal output utilities
//!
//! Status lines go to stdout, problems to stderr.

use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `label: value` row
    pub fn field(label: &str, value: impl std::fmt::Display) {
        println!("  {:<14} {}", format!("{label}:").dimmed(), value);
    }
}

/// Format a distance in kilometres
///
/// Under one kilometre the value is shown in whole metres.
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{km:.1} km")
    }
}

/// Format a count with singular/plural
#[must_use]
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// `"yes"` or `"no"`
#[must_use]
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.4), "400 m");
        assert_eq!(format_distance(2.44), "2.4 km");
        assert_eq!(format_distance(108.9), "108.9 km");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "item", "items"), "1 item");
        assert_eq!(format_count(5, "item", "items"), "5 items");
        assert_eq!(format_count(0, "line", "lines"), "0 lines");
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "yes");
        assert_eq!(yes_no(false), "no");
    }
}
