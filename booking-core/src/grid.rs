//! Time-Grid Model
//!
//! A day is a bounded minute axis from opening to closing time. Everything
//! downstream (slots, conflicts, holds) works exclusively in grid-relative
//! minutes; conversion to and from wall-clock Unix millis happens only here,
//! at the boundary with the presentation layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{BookingError, BookingResult};

/// Opening hour of the grid (grid minute 0 == 08:00)
pub const OPEN_HOUR: u32 = 8;
/// Closing hour of the grid
pub const CLOSE_HOUR: u32 = 22;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Half-open interval `[start, end)` in grid-relative minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// Build a window, rejecting empty or inverted ranges.
    pub fn new(start: i64, end: i64) -> BookingResult<Self> {
        if end <= start {
            return Err(BookingError::validation(format!(
                "time window end ({end}) must be after start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn duration_minutes(&self) -> i64 {
        self.end - self.start
    }

    /// Strict overlap: touching endpoints (`a.end == b.start`) do not count.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.end > other.start && self.start < other.end
    }

    /// Overlapping sub-interval, if any.
    pub fn intersect(&self, other: &TimeWindow) -> Option<TimeWindow> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end > start).then_some(TimeWindow { start, end })
    }

    /// Extend the end by `minutes` (the trailing turnaround buffer).
    pub fn with_buffer_after(&self, minutes: i64) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end + minutes,
        }
    }
}

/// One bookable day: a date plus its open/close bounds in absolute
/// minutes-of-day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayGrid {
    date: NaiveDate,
    open_minute_of_day: i64,
    close_minute_of_day: i64,
}

impl DayGrid {
    /// Grid for `date` with the standard opening hours.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            open_minute_of_day: (OPEN_HOUR as i64) * 60,
            close_minute_of_day: (CLOSE_HOUR as i64) * 60,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Total bookable extent in minutes (opening to closing).
    pub fn span_minutes(&self) -> i64 {
        self.close_minute_of_day - self.open_minute_of_day
    }

    /// Whether a window lies fully inside the bookable day.
    pub fn contains(&self, window: &TimeWindow) -> bool {
        window.start >= 0 && window.end <= self.span_minutes()
    }

    /// Grid minute → Unix millis (UTC) on this grid's date.
    pub fn to_millis(&self, grid_minutes: i64) -> i64 {
        let midnight = self.date.and_hms_opt(0, 0, 0).unwrap_or_default();
        midnight.and_utc().timestamp_millis()
            + (self.open_minute_of_day + grid_minutes) * MILLIS_PER_MINUTE
    }

    /// Unix millis → grid minute on this grid's date. Values outside the
    /// day come back out of `[0, span]`; callers clamp or reject.
    pub fn minutes_from_millis(&self, millis: i64) -> i64 {
        let midnight = self.date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let offset = millis - midnight.and_utc().timestamp_millis();
        offset / MILLIS_PER_MINUTE - self.open_minute_of_day
    }

    /// Wall-clock pair → grid window.
    pub fn window_from_millis(&self, start_millis: i64, end_millis: i64) -> BookingResult<TimeWindow> {
        TimeWindow::new(
            self.minutes_from_millis(start_millis),
            self.minutes_from_millis(end_millis),
        )
    }
}
