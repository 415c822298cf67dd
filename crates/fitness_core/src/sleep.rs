//! crates/fitness_core/src/sleep.rs
//!
//! Sleep duration arithmetic. A night of sleep is stored as a calendar date plus
//! two clock times; the whole-hour duration is derived from them and cached.

use chrono::{Duration, NaiveDate, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const CLOCK_FORMAT: &str = "%H:%M";

/// Raised when a `"YYYY-MM-DD"` or `"HH:MM"` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),
    #[error("Invalid time '{0}', expected HH:MM")]
    Clock(String),
}

/// Whole hours slept between `bed_time` and `wake_time` on `date`.
///
/// A wake time strictly earlier than the bed time is read as the next morning.
/// Equal times are the same instant and yield 0, not 24.
pub fn compute_duration(date: NaiveDate, bed_time: NaiveTime, wake_time: NaiveTime) -> u32 {
    let bed_instant = date.and_time(bed_time);
    let mut wake_instant = date.and_time(wake_time);
    if wake_time < bed_time {
        wake_instant = wake_instant + Duration::days(1);
    }

    let elapsed = (wake_instant - bed_instant).num_seconds();
    (elapsed / 3600) as u32
}

pub fn parse_date(value: &str) -> Result<NaiveDate, TimeParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| TimeParseError::Date(value.to_string()))
}

pub fn parse_clock(value: &str) -> Result<NaiveTime, TimeParseError> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
        .map_err(|_| TimeParseError::Clock(value.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

//=========================================================================================
// SleepInterval
//=========================================================================================

/// A night of sleep with its derived duration.
///
/// Fields are private so `duration_hours` can only change through the setters,
/// each of which recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepInterval {
    date: NaiveDate,
    bed_time: NaiveTime,
    wake_time: NaiveTime,
    duration_hours: u32,
}

impl SleepInterval {
    pub fn new(date: NaiveDate, bed_time: NaiveTime, wake_time: NaiveTime) -> Self {
        Self {
            date,
            bed_time,
            wake_time,
            duration_hours: compute_duration(date, bed_time, wake_time),
        }
    }

    /// Builds an interval from the raw `"YYYY-MM-DD"` / `"HH:MM"` strings of a request.
    pub fn parse(date: &str, bed_time: &str, wake_time: &str) -> Result<Self, TimeParseError> {
        Ok(Self::new(
            parse_date(date)?,
            parse_clock(bed_time)?,
            parse_clock(wake_time)?,
        ))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn bed_time(&self) -> NaiveTime {
        self.bed_time
    }

    pub fn wake_time(&self) -> NaiveTime {
        self.wake_time
    }

    pub fn duration_hours(&self) -> u32 {
        self.duration_hours
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.recompute();
    }

    pub fn set_bed_time(&mut self, bed_time: NaiveTime) {
        self.bed_time = bed_time;
        self.recompute();
    }

    pub fn set_wake_time(&mut self, wake_time: NaiveTime) {
        self.wake_time = wake_time;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.duration_hours = compute_duration(self.date, self.bed_time, self.wake_time);
    }
}
