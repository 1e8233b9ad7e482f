//! Working-hours calendar: pure time arithmetic over the daily shift.
//!
//! Absolute time is measured in minutes from day 0 00:00:
//!   day 0 09:00 = 540
//!   day 0 18:00 = 1080
//!   day 1 09:00 = 1980
//!
//! The shift is the half-open window [09:00, 18:00). The 18:00 instant is
//! a valid *finish* for a service, but it is never a valid *start*: any
//! start at or after 18:00 rolls to 09:00 of the next day.

use crate::types::Minutes;

pub const MINUTES_PER_DAY: Minutes = 24.0 * 60.0;
pub const SHIFT_START: Minutes = 9.0 * 60.0;
pub const SHIFT_END: Minutes = 18.0 * 60.0;
pub const SHIFT_LENGTH: Minutes = SHIFT_END - SHIFT_START;

/// Zero-based day index containing `t`.
pub fn day_of(t: Minutes) -> u64 {
    (t / MINUTES_PER_DAY).floor().max(0.0) as u64
}

/// Minute within its own day, in [0, 1440).
pub fn minute_of_day(t: Minutes) -> Minutes {
    t.rem_euclid(MINUTES_PER_DAY)
}

pub fn shift_start_of(day: u64) -> Minutes {
    day as Minutes * MINUTES_PER_DAY + SHIFT_START
}

pub fn shift_end_of(day: u64) -> Minutes {
    day as Minutes * MINUTES_PER_DAY + SHIFT_END
}

/// Closing instant of the last simulated day. `days` must be >= 1.
pub fn horizon_end(days: u32) -> Minutes {
    shift_end_of(u64::from(days.saturating_sub(1)))
}

/// Move `t` to the next instant at which work may start.
pub fn normalize_to_shift(t: Minutes) -> Minutes {
    let day = day_of(t);
    let minute = minute_of_day(t);

    if minute < SHIFT_START {
        return shift_start_of(day);
    }
    if minute >= SHIFT_END {
        return shift_start_of(day + 1);
    }
    t
}

/// Add `duration` working minutes to `start`, skipping nights.
///
/// Returns the absolute finish instant. A zero duration returns the
/// normalized start unchanged.
pub fn add_working_minutes(start: Minutes, duration: Minutes) -> Minutes {
    let mut current = normalize_to_shift(start);
    let mut remaining = duration;

    while remaining > 0.0 {
        let day = day_of(current);
        let available = shift_end_of(day) - current;
        if remaining <= available {
            return current + remaining;
        }
        remaining -= available;
        current = shift_start_of(day + 1);
    }
    current
}

/// Human-readable "Day D HH:MM" rendering, for traces and logs.
pub fn format_minutes(t: Minutes) -> String {
    let day = day_of(t);
    let minute = minute_of_day(t) as u64;
    format!("Day {day} {:02}:{:02}", minute / 60, minute % 60)
}
