//! Shared utility functions for the LicenseLock core.

use chrono::{Months, TimeZone, Utc};

/// Current unix timestamp in seconds.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Add `months` calendar months to a unix timestamp.
///
/// Calendar arithmetic, not a fixed number of seconds: Jan 31 + 1 month is
/// Feb 28/29. Falls back to the input on unrepresentable timestamps.
pub fn add_months(ts: i64, months: u32) -> i64 {
    Utc.timestamp_opt(ts, 0)
        .single()
        .and_then(|dt| dt.checked_add_months(Months::new(months)))
        .map(|dt| dt.timestamp())
        .unwrap_or(ts)
}

/// Format a unix timestamp as `YYYY-MM-DD HH:MM:SS` UTC for display and CSV
/// output. Unrepresentable timestamps fall back to the raw number.
pub fn format_timestamp(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
pub fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_months_calendar_arithmetic() {
        // 2024-01-15 00:00:00 UTC
        let jan_15 = 1705276800;
        // 2024-04-15 00:00:00 UTC
        let apr_15 = 1713139200;
        assert_eq!(add_months(jan_15, 3), apr_15);
    }

    #[test]
    fn test_add_months_clamps_end_of_month() {
        // 2024-01-31 + 1 month clamps to 2024-02-29 (leap year)
        let jan_31 = 1706659200;
        let feb_29 = 1709164800;
        assert_eq!(add_months(jan_31, 1), feb_29);
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
