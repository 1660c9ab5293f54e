//! Time formatting utilities

use chrono::{DateTime, Local};

/// Layout of the timestamp heading locally authored entries
pub const ENTRY_TIMESTAMP_FORMAT: &str = "%H:%M:%S %d.%m.%Y";

/// Time formatter for listings and stored entries
pub struct TimeFormatter;

impl TimeFormatter {
    /// Create a new time formatter
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeFormatter {
    /// Format seconds as HH:MM:SS, truncating fractions
    pub fn format_clock(&self, seconds: f64) -> String {
        let total = seconds.max(0.0) as u64;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let secs = total % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }

    /// Heading for a locally authored cut list entry
    pub fn format_entry_timestamp(&self, at: DateTime<Local>) -> String {
        at.format(ENTRY_TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_clock() {
        let formatter = TimeFormatter::new();
        assert_eq!(formatter.format_clock(0.0), "00:00:00");
        assert_eq!(formatter.format_clock(3725.9), "01:02:05");
        assert_eq!(formatter.format_clock(-3.0), "00:00:00");
    }

    #[test]
    fn test_entry_timestamp() {
        let at = Local.with_ymd_and_hms(2010, 1, 2, 20, 15, 7).unwrap();
        assert_eq!(
            TimeFormatter::new().format_entry_timestamp(at),
            "20:15:07 02.01.2010"
        );
    }
}
