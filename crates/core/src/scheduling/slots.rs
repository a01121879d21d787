//! Slot-availability engine
//!
//! Computes candidate appointment start times for a working day, walking a
//! cursor in fixed 30-minute steps and jumping past conflicts instead of
//! re-testing inside them.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use salonkit_domain::constants::SLOT_STEP_MINUTES;
use salonkit_domain::{Appointment, BreakInterval, WorkingDay};

/// Candidate start times for a service of `duration_minutes` on `day`.
///
/// Starting at the opening time, each candidate `t` is tested against the
/// day's breaks and its non-cancelled appointments. A conflicting candidate
/// jumps the cursor to the end of the conflict and is re-tested from there;
/// an accepted candidate advances the cursor by the fixed step. Returns an
/// ordered, duplicate-free list; empty for a day off or when nothing fits.
#[must_use]
pub fn available_slots(
    day: &WorkingDay,
    breaks: &[BreakInterval],
    appointments: &[Appointment],
    duration_minutes: u32,
) -> Vec<NaiveDateTime> {
    if day.is_day_off || duration_minutes == 0 {
        return Vec::new();
    }

    let duration = Duration::minutes(i64::from(duration_minutes));
    let step = Duration::minutes(SLOT_STEP_MINUTES);
    let closes_at = day.closes_at();

    let mut slots = Vec::new();
    let mut cursor = day.opens_at();

    // The loop terminates: a jump target is the end of a range that overlaps
    // [cursor, cursor + duration), so it is strictly after cursor, and an
    // accepted slot advances by the step.
    while cursor + duration <= closes_at {
        match next_conflict_end(day.work_date, cursor, cursor + duration, breaks, appointments) {
            Some(jump_to) => cursor = jump_to,
            None => {
                slots.push(cursor);
                cursor += step;
            }
        }
    }

    slots
}

/// The end of the first break or blocking appointment overlapping
/// `[start, end)`, or `None` when the candidate is free.
///
/// Breaks are checked before appointments, mirroring the booking validator's
/// check order. Cancelled appointments never block.
fn next_conflict_end(
    date: NaiveDate,
    start: NaiveDateTime,
    end: NaiveDateTime,
    breaks: &[BreakInterval],
    appointments: &[Appointment],
) -> Option<NaiveDateTime> {
    for brk in breaks {
        if brk.overlaps(date, start, end) {
            return Some(brk.bounds_on(date).1);
        }
    }

    appointments
        .iter()
        .find(|appt| appt.status.blocks_slot() && appt.overlaps(start, end))
        .map(|appt| appt.end_datetime)
}
