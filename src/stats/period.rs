// src/stats/period.rs

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Half-open time window, end exclusive.
///
/// Comparisons are calendar-aligned: the current window runs from the start
/// of the running month to now, the previous window is the full prior month.
/// Early in a month the partial current window is compared against a complete
/// previous month; that asymmetry is deliberate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    /// Start of the current calendar month up to `now`.
    pub fn current_month(now: DateTime<Utc>) -> Self {
        Self {
            start: month_start(now),
            end: now,
        }
    }

    /// The full previous calendar month.
    pub fn previous_month(now: DateTime<Utc>) -> Self {
        let current_start = month_start(now);
        let (year, month) = if current_start.month() == 1 {
            (current_start.year() - 1, 12)
        } else {
            (current_start.year(), current_start.month() - 1)
        };
        // Midnight on the 1st, UTC: always a valid, unambiguous instant.
        let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap();
        Self {
            start,
            end: current_start,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

fn month_start(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(instant.year(), instant.month(), 1, 0, 0, 0)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_current_month_runs_to_now() {
        let now = at(2026, 8, 14, 9);
        let window = PeriodWindow::current_month(now);
        assert_eq!(window.start, at(2026, 8, 1, 0));
        assert_eq!(window.end, now);
    }

    #[test]
    fn test_previous_month_is_full_month() {
        let now = at(2026, 8, 14, 9);
        let window = PeriodWindow::previous_month(now);
        assert_eq!(window.start, at(2026, 7, 1, 0));
        assert_eq!(window.end, at(2026, 8, 1, 0));
    }

    #[test]
    fn test_january_wraps_to_previous_december() {
        let now = at(2026, 1, 5, 12);
        let window = PeriodWindow::previous_month(now);
        assert_eq!(window.start, at(2025, 12, 1, 0));
        assert_eq!(window.end, at(2026, 1, 1, 0));
    }

    #[test]
    fn test_windows_are_adjacent_and_disjoint() {
        let now = at(2026, 3, 20, 18);
        let current = PeriodWindow::current_month(now);
        let previous = PeriodWindow::previous_month(now);

        assert_eq!(previous.end, current.start);
        assert!(previous.contains(at(2026, 2, 28, 23)));
        assert!(!previous.contains(current.start));
        assert!(current.contains(at(2026, 3, 1, 0)));
        assert!(!current.contains(now));
    }
}
