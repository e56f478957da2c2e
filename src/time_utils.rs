// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Time range for a position history query, in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub time_from: i64,
    pub time_to: i64,
}

impl HistoryWindow {
    /// Window covering `[now - hours, now]`.
    pub fn ending_at(now: DateTime<Utc>, hours: u32) -> Self {
        let from = now - Duration::hours(i64::from(hours));
        Self {
            time_from: from.timestamp(),
            time_to: now.timestamp(),
        }
    }

    /// Window covering the last `hours` hours.
    pub fn last_hours(hours: u32) -> Self {
        Self::ending_at(Utc::now(), hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_utc_rfc3339() {
        let date = Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2026-03-14T15:09:26Z");
    }

    #[test]
    fn test_history_window_bounds() {
        let now = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
        let window = HistoryWindow::ending_at(now, 2);
        assert_eq!(window.time_to, 1_700_000_000);
        assert_eq!(window.time_from, 1_700_000_000 - 7200);
    }

    #[test]
    fn test_history_window_zero_hours() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let window = HistoryWindow::ending_at(now, 0);
        assert_eq!(window.time_from, window.time_to);
    }
}
