//! Recurring daily time windows
//!
//! Turns a daily "HH:MM - HH:MM" clock window into the concrete interval that
//! most recently ended at or before a reference instant.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{ParseError, ValidationError};

const CLOCK_FORMAT: &str = "%H:%M";

/// Absolute interval of capture times, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    from: DateTime<Local>,
    to: DateTime<Local>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Local>, to: DateTime<Local>) -> Result<Self, ValidationError> {
        if to < from {
            return Err(ValidationError::InvertedWindow);
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> DateTime<Local> {
        self.from
    }

    pub fn to(&self) -> DateTime<Local> {
        self.to
    }

    /// Check whether a timestamp falls inside the window (inclusive on both ends)
    pub fn contains(&self, t: &DateTime<Local>) -> bool {
        *t >= self.from && *t <= self.to
    }

    pub fn span(&self) -> Duration {
        self.to - self.from
    }
}

/// Resolve a daily clock window relative to `reference`.
///
/// Both clocks are placed on the reference's calendar date in its zone. A
/// window whose end clock precedes its start crosses midnight; equal clocks
/// mean a full 24 hours. The result is then moved back a day at a time until
/// it no longer ends after `reference`.
pub fn resolve<Tz: TimeZone>(
    from_clock: &str,
    to_clock: &str,
    reference: &DateTime<Tz>,
) -> Result<(DateTime<Tz>, DateTime<Tz>), ParseError> {
    let from_time = NaiveTime::parse_from_str(from_clock.trim(), CLOCK_FORMAT)
        .map_err(|_| ParseError::FromClock(from_clock.to_string()))?;
    let to_time = NaiveTime::parse_from_str(to_clock.trim(), CLOCK_FORMAT)
        .map_err(|_| ParseError::ToClock(to_clock.to_string()))?;

    let zone = reference.timezone();
    let day = reference.date_naive();
    let mut from = local_instant(&zone, day.and_time(from_time));
    let mut to = local_instant(&zone, day.and_time(to_time));

    let day_len = Duration::hours(24);
    if to < from {
        to = to + day_len;
    } else if to == from {
        from = from - day_len;
    }

    while to > *reference {
        from = from - day_len;
        to = to - day_len;
    }

    Ok((from, to))
}

/// Map a wall-clock time to an instant in `zone`.
///
/// Ambiguous times (clocks turned back) take the earlier instant. Times that
/// do not exist (clocks turned forward) take the first valid minute after.
fn local_instant<Tz: TimeZone>(zone: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut probe = naive;
            for _ in 0..(24 * 60) {
                probe += Duration::minutes(1);
                if let Some(t) = zone.from_local_datetime(&probe).earliest() {
                    return t;
                }
            }
            zone.from_utc_datetime(&naive)
        }
    }
}
