//! Date normalization between the canonical backend format and the display
//! format used on receipts, report cards and attendance history.
//!
//! Canonical storage is `YYYY-MM-DD`; display is `DD-MM-YYYY`.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};

pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_FORMAT: &str = "%d-%m-%Y";

/// Convert a canonical date to the display representation.
///
/// Malformed input falls back to a general parse; if that also fails the
/// original string is returned unchanged. Missing values render as `-`.
/// This is deliberately lossy so malformed upstream data never breaks a
/// page.
pub fn to_display(stored: Option<&str>) -> String {
    let Some(raw) = stored else {
        return "-".to_string();
    };
    if raw.is_empty() {
        return "-".to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, CANONICAL_FORMAT) {
        return date.format(DISPLAY_FORMAT).to_string();
    }

    // General fallback: RFC 3339 timestamps or datetime strings with a date
    // prefix, as some backends return full timestamps for date columns.
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.date().format(DISPLAY_FORMAT).to_string();
    }

    raw.to_string()
}

/// Today's date in canonical form.
pub fn today() -> String {
    Local::now().date_naive().format(CANONICAL_FORMAT).to_string()
}

/// Step a canonical date forward or back by whole days. Returns the input
/// unchanged when it does not parse.
pub fn shift_days(stored: &str, days: i64) -> String {
    match NaiveDate::parse_from_str(stored, CANONICAL_FORMAT) {
        Ok(date) => (date + Duration::days(days))
            .format(CANONICAL_FORMAT)
            .to_string(),
        Err(_) => stored.to_string(),
    }
}

/// Sort key for newest-first ordering; unparseable dates sink to the bottom.
pub fn sort_key(stored: &str) -> NaiveDate {
    NaiveDate::parse_from_str(stored, CANONICAL_FORMAT)
        .unwrap_or(NaiveDate::MIN)
}

/// Current month name, used as the default on fee and report forms.
pub fn current_month_name() -> String {
    const MONTHS: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July",
        "August", "September", "October", "November", "December",
    ];
    MONTHS[Local::now().month0() as usize].to_string()
}

pub fn current_year() -> String {
    Local::now().year().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_to_display() {
        assert_eq!(to_display(Some("2024-03-07")), "07-03-2024");
        assert_eq!(to_display(Some("1999-12-31")), "31-12-1999");
    }

    #[test]
    fn test_missing_value_renders_dash() {
        assert_eq!(to_display(None), "-");
        assert_eq!(to_display(Some("")), "-");
    }

    #[test]
    fn test_malformed_input_passes_through() {
        assert_eq!(to_display(Some("not-a-date")), "not-a-date");
        assert_eq!(to_display(Some("2024-13-45")), "2024-13-45");
    }

    #[test]
    fn test_timestamp_fallback() {
        assert_eq!(to_display(Some("2024-03-07T10:15:00Z")), "07-03-2024");
        assert_eq!(to_display(Some("2024-03-07 10:15:00")), "07-03-2024");
    }

    #[test]
    fn test_shift_days() {
        assert_eq!(shift_days("2024-03-07", 1), "2024-03-08");
        assert_eq!(shift_days("2024-03-01", -1), "2024-02-29"); // leap year
        assert_eq!(shift_days("garbage", 1), "garbage");
    }

    #[test]
    fn test_sort_key_orders_newest_first() {
        let mut dates = vec!["2024-01-15", "bad", "2024-03-07", "2023-12-31"];
        dates.sort_by_key(|d| std::cmp::Reverse(sort_key(d)));
        assert_eq!(dates, vec!["2024-03-07", "2024-01-15", "2023-12-31", "bad"]);
    }
}
