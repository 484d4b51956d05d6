//! Per-day availability: which grid slots can start a lesson of a given length,
//! and the free windows left between bookings inside opening hours.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::booking::{Booking, BookingId};
use crate::clock::hhmm;
use crate::config::BufferPolicy;
use crate::conflict::{is_conflicting, OccupiedInterval};
use crate::grid::SlotGrid;

/// A grid start time and whether it is free, ignoring hover and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CandidateSlot {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    pub available: bool,
}

/// Base availability of every grid slot for one (date, duration) pair.
///
/// Computed once whenever the date or duration changes; hover and selection
/// updates only read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    date: NaiveDate,
    duration_minutes: u32,
    slots: Vec<CandidateSlot>,
}

impl DayAvailability {
    /// Evaluate every slot of `grid` against `existing`.
    ///
    /// A slot is available when it does not conflict and its occupied interval
    /// (buffer included) ends by midnight.
    pub fn compute(
        grid: &SlotGrid,
        date: NaiveDate,
        duration_minutes: u32,
        buffer: BufferPolicy,
        existing: &[Booking],
    ) -> Self {
        let slots = grid
            .slots()
            .iter()
            .map(|&start| {
                let fits = OccupiedInterval::new(date, start, duration_minutes, buffer).within_day();
                CandidateSlot {
                    start,
                    available: fits
                        && !is_conflicting(date, start, duration_minutes, buffer, existing),
                }
            })
            .collect();

        Self {
            date,
            duration_minutes,
            slots,
        }
    }

    /// Like [`compute`](Self::compute), but ignores the booking being edited.
    pub fn compute_excluding(
        grid: &SlotGrid,
        date: NaiveDate,
        duration_minutes: u32,
        buffer: BufferPolicy,
        existing: &[Booking],
        exclude: Option<BookingId>,
    ) -> Self {
        match exclude {
            Some(id) => {
                let others: Vec<Booking> = existing
                    .iter()
                    .filter(|b| b.id != Some(id))
                    .cloned()
                    .collect();
                Self::compute(grid, date, duration_minutes, buffer, &others)
            }
            None => Self::compute(grid, date, duration_minutes, buffer, existing),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn slots(&self) -> &[CandidateSlot] {
        &self.slots
    }

    /// `false` for times that are not on the grid.
    pub fn is_available(&self, start: NaiveTime) -> bool {
        self.slots
            .binary_search_by_key(&start, |slot| slot.start)
            .map(|idx| self.slots[idx].available)
            .unwrap_or(false)
    }

    pub fn available_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.available).count()
    }

    pub fn first_available(&self) -> Option<NaiveTime> {
        self.slots.iter().find(|slot| slot.available).map(|slot| slot.start)
    }
}

/// A free stretch of the day between occupied intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub duration_minutes: i64,
}

/// Merge overlapping or adjacent occupied intervals, clipped to the window.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals.
fn merge_occupied(
    bookings: &[Booking],
    buffer: BufferPolicy,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    let mut intervals: Vec<(NaiveDateTime, NaiveDateTime)> = bookings
        .iter()
        .map(|b| OccupiedInterval::of(b, buffer))
        .filter(|i| i.start < window_end && i.end > window_start)
        .map(|i| (i.start.max(window_start), i.end.min(window_end)))
        .collect();

    intervals.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Free windows between `opening` and `closing` on `date`.
///
/// Occupied intervals include the buffer, so a window's start is the earliest
/// time a new lesson may begin.
pub fn free_windows(
    date: NaiveDate,
    opening: NaiveTime,
    closing: NaiveTime,
    buffer: BufferPolicy,
    existing: &[Booking],
) -> Vec<FreeWindow> {
    let window_start = date.and_time(opening);
    let window_end = date.and_time(closing);
    if window_start >= window_end {
        return Vec::new();
    }

    let mut windows = Vec::new();
    let mut cursor = window_start;

    for (busy_start, busy_end) in merge_occupied(existing, buffer, window_start, window_end) {
        if cursor < busy_start {
            windows.push(FreeWindow {
                start: cursor.time(),
                end: busy_start.time(),
                duration_minutes: (busy_start - cursor).num_minutes(),
            });
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window_end {
        windows.push(FreeWindow {
            start: cursor.time(),
            end: window_end.time(),
            duration_minutes: (window_end - cursor).num_minutes(),
        });
    }

    windows
}
