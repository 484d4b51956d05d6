//! Detect overlaps between a candidate lesson and the bookings already on a day.
//!
//! Every interval carries the trailing buffer: a booking starting at `s` with
//! duration `d` occupies `[s, s + d + buffer)`. Intervals are half-open, so a
//! candidate whose occupied interval ends exactly when another begins is NOT a
//! conflict.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::booking::Booking;
use crate::config::BufferPolicy;

/// Half-open `[start, end)` interval a booking blocks, buffer included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupiedInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl OccupiedInterval {
    /// Interval for a lesson of `duration_minutes` starting at `start` on `date`.
    pub fn new(date: NaiveDate, start: NaiveTime, duration_minutes: u32, buffer: BufferPolicy) -> Self {
        let start = date.and_time(start);
        let end = start + Duration::minutes(i64::from(duration_minutes) + i64::from(buffer.minutes()));
        Self { start, end }
    }

    pub fn of(booking: &Booking, buffer: BufferPolicy) -> Self {
        Self::new(booking.date, booking.start_time, booking.duration_minutes, buffer)
    }

    /// `self.start < other.end && other.start < self.end`.
    pub fn overlaps(&self, other: &OccupiedInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes shared with `other`; zero when they don't overlap.
    pub fn overlap_minutes(&self, other: &OccupiedInterval) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        (self.end.min(other.end) - self.start.max(other.start)).num_minutes()
    }

    /// Whether the interval ends on its start date (midnight itself allowed).
    pub fn within_day(&self) -> bool {
        let next_midnight = self.start.date().succ_opt().and_then(|d| d.and_hms_opt(0, 0, 0));
        match next_midnight {
            Some(limit) => self.end <= limit,
            None => false,
        }
    }
}

/// A detected conflict between a candidate and one existing booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub booking: Booking,
    pub overlap_minutes: i64,
}

/// Whether a candidate lesson overlaps any of `existing`.
///
/// The candidate occupies `[start, start + duration + buffer)` on `date`; each
/// existing booking occupies the same shape on its own date. Any positive (or
/// zero) duration is accepted; catalog membership is checked by the form.
pub fn is_conflicting(
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: u32,
    buffer: BufferPolicy,
    existing: &[Booking],
) -> bool {
    let candidate = OccupiedInterval::new(date, start, duration_minutes, buffer);
    existing
        .iter()
        .any(|booking| candidate.overlaps(&OccupiedInterval::of(booking, buffer)))
}

/// Pairwise test between two bookings. Symmetric in `a` and `b`.
pub fn bookings_conflict(a: &Booking, b: &Booking, buffer: BufferPolicy) -> bool {
    OccupiedInterval::of(a, buffer).overlaps(&OccupiedInterval::of(b, buffer))
}

/// Find every existing booking the candidate overlaps, with the overlap length.
///
/// Results keep the order of `existing`.
pub fn find_conflicts(
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: u32,
    buffer: BufferPolicy,
    existing: &[Booking],
) -> Vec<Conflict> {
    let candidate = OccupiedInterval::new(date, start, duration_minutes, buffer);
    let mut conflicts = Vec::new();

    for booking in existing {
        let occupied = OccupiedInterval::of(booking, buffer);
        if candidate.overlaps(&occupied) {
            conflicts.push(Conflict {
                booking: booking.clone(),
                overlap_minutes: candidate.overlap_minutes(&occupied),
            });
        }
    }

    conflicts
}
