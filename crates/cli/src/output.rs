//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format a Unix timestamp as UTC
pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Color the connectivity flag
pub fn color_connected(connected: bool) -> String {
    if connected {
        "connected".green().to_string()
    } else {
        "disconnected".red().to_string()
    }
}

/// Format a percentage change, colored by whether an increase is good.
///
/// `None` means no comparison is available (previous value was zero).
pub fn format_percent_delta(value: Option<f64>, higher_is_better: bool) -> String {
    let Some(value) = value else {
        return "n/a".dimmed().to_string();
    };

    let formatted = format!("{:+.1}%", value);
    color_delta(formatted, value, higher_is_better)
}

/// Format a percentage-point change, colored the same way
pub fn format_point_delta(value: f64, higher_is_better: bool) -> String {
    let formatted = format!("{:+.1}pp", value);
    color_delta(formatted, value, higher_is_better)
}

fn color_delta(formatted: String, value: f64, higher_is_better: bool) -> String {
    if value == 0.0 {
        return formatted;
    }

    let improving = (value > 0.0) == higher_is_better;
    if improving {
        formatted.green().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Format a latency value in milliseconds
pub fn format_latency(latency_ms: f64) -> String {
    format!("{:.1}ms", latency_ms)
}

/// Format a success rate percentage
pub fn format_success_rate(rate: f64) -> String {
    let formatted = format!("{:.1}%", rate);
    if rate >= 99.0 {
        formatted.green().to_string()
    } else if rate >= 95.0 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_format_percent_delta_missing_comparison() {
        // Must never render NaN/Infinity; absent comparisons say so
        assert!(format_percent_delta(None, true).contains("n/a"));
    }

    #[test]
    fn test_format_percent_delta_sign() {
        assert!(format_percent_delta(Some(50.0), true).contains("+50.0%"));
        assert!(format_percent_delta(Some(-12.5), true).contains("-12.5%"));
    }

    #[test]
    fn test_format_point_delta() {
        assert!(format_point_delta(0.5, true).contains("+0.5pp"));
        assert_eq!(format_point_delta(0.0, true), "+0.0pp");
    }
}
