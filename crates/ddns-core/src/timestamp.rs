//! Local timestamps shared by log lines and record comments

use chrono::{DateTime, Local};

/// `YYYY-MM-DD HH:MM:SS`, used for both log prefixes and record comments
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a local time with [`TIMESTAMP_FORMAT`]
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time formatted with [`TIMESTAMP_FORMAT`]
pub fn local_timestamp() -> String {
    format_timestamp(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};

    #[test]
    fn test_format_timestamp() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(&time), "2024-03-09 07:05:01");
    }

    #[test]
    fn test_local_timestamp_parses_back() {
        let now = local_timestamp();
        assert!(NaiveDateTime::parse_from_str(&now, TIMESTAMP_FORMAT).is_ok());
    }
}
