//! Tests for per-day slot availability and free windows.

use booking_engine::{
    free_windows, Booking, BookingId, BufferPolicy, DayAvailability, EngineConfig, LessonMode,
};
use chrono::{NaiveDate, NaiveTime};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn booking(hour: u32, minute: u32, duration: u32) -> Booking {
    Booking::new(day(), at(hour, minute), duration, LessonMode::OnSite)
}

fn scenario_bookings() -> Vec<Booking> {
    vec![booking(10, 0, 90), booking(14, 0, 120), booking(16, 30, 60)]
}

// ── DayAvailability ─────────────────────────────────────────────────────────

#[test]
fn scenario_slots_for_one_hour_lesson() {
    let grid = EngineConfig::default().grid().unwrap();
    let availability =
        DayAvailability::compute(&grid, day(), 60, BufferPolicy::default(), &scenario_bookings());

    assert_eq!(availability.slots().len(), 145);
    assert!(availability.is_available(at(11, 50)));
    assert!(!availability.is_available(at(11, 35)));
    assert!(availability.is_available(at(11, 40)));
    assert!(availability.is_available(at(12, 50)));
    assert!(!availability.is_available(at(12, 55)));
    assert!(!availability.is_available(at(16, 15)));
    assert!(availability.is_available(at(17, 40)));
    assert_eq!(availability.first_available(), Some(at(11, 40)));
}

#[test]
fn off_grid_time_is_not_available() {
    let grid = EngineConfig::default().grid().unwrap();
    let availability = DayAvailability::compute(&grid, day(), 60, BufferPolicy::default(), &[]);

    assert!(!availability.is_available(at(11, 52)));
    assert!(!availability.is_available(at(8, 0)));
}

#[test]
fn empty_day_is_available_everywhere_that_fits() {
    let grid = EngineConfig::default().grid().unwrap();
    let availability = DayAvailability::compute(&grid, day(), 60, BufferPolicy::default(), &[]);
    assert_eq!(availability.available_count(), 145);
}

#[test]
fn late_long_lessons_must_finish_before_midnight() {
    let grid = EngineConfig::default().grid().unwrap();
    let availability = DayAvailability::compute(&grid, day(), 180, BufferPolicy::default(), &[]);

    // 20:50 + 180 + 10 = 24:00 exactly; 20:55 would spill into the next day.
    assert!(availability.is_available(at(20, 50)));
    assert!(!availability.is_available(at(20, 55)));
    assert!(!availability.is_available(at(21, 0)));
}

#[test]
fn excluded_booking_does_not_block_itself() {
    let grid = EngineConfig::default().grid().unwrap();
    let own = booking(10, 0, 90).with_id(BookingId(7));
    let existing = vec![own.clone(), booking(14, 0, 120)];

    let with_self =
        DayAvailability::compute(&grid, day(), 90, BufferPolicy::default(), &existing);
    assert!(!with_self.is_available(at(10, 0)));

    let without_self = DayAvailability::compute_excluding(
        &grid,
        day(),
        90,
        BufferPolicy::default(),
        &existing,
        own.id,
    );
    assert!(without_self.is_available(at(10, 0)));
    assert!(!without_self.is_available(at(13, 0)));
}

// ── Free windows ────────────────────────────────────────────────────────────

#[test]
fn free_windows_between_scenario_bookings() {
    let windows = free_windows(
        day(),
        at(9, 0),
        at(21, 0),
        BufferPolicy::default(),
        &scenario_bookings(),
    );

    let spans: Vec<(NaiveTime, NaiveTime, i64)> = windows
        .iter()
        .map(|w| (w.start, w.end, w.duration_minutes))
        .collect();
    assert_eq!(
        spans,
        vec![
            (at(9, 0), at(10, 0), 60),
            (at(11, 40), at(14, 0), 140),
            (at(16, 10), at(16, 30), 20),
            (at(17, 40), at(21, 0), 200),
        ]
    );
}

#[test]
fn free_windows_merge_overlapping_buffers() {
    // [10:00,11:10) and [11:05,12:15) merge into one busy block.
    let existing = vec![booking(10, 0, 60), booking(11, 5, 60)];
    let windows = free_windows(day(), at(9, 0), at(13, 0), BufferPolicy::default(), &existing);

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].end, at(10, 0));
    assert_eq!(windows[1].start, at(12, 15));
}

#[test]
fn free_windows_clip_to_opening_hours() {
    let existing = vec![booking(8, 0, 90)];
    let windows = free_windows(day(), at(9, 0), at(12, 0), BufferPolicy::default(), &existing);

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start, at(9, 40));
    assert_eq!(windows[0].duration_minutes, 140);
}

#[test]
fn free_windows_empty_for_inverted_window() {
    assert!(free_windows(day(), at(12, 0), at(9, 0), BufferPolicy::default(), &[]).is_empty());
}
