//! Tests for buffered conflict detection.

use booking_engine::{
    bookings_conflict, find_conflicts, is_conflicting, Booking, BufferPolicy, LessonMode,
    OccupiedInterval,
};
use chrono::{NaiveDate, NaiveTime};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn booking(hour: u32, minute: u32, duration: u32) -> Booking {
    Booking::new(day(), at(hour, minute), duration, LessonMode::OnSite)
}

fn buffer() -> BufferPolicy {
    BufferPolicy::default()
}

#[test]
fn default_buffer_is_ten_minutes() {
    assert_eq!(buffer().minutes(), 10);
}

#[test]
fn candidate_abutting_buffer_end_is_free() {
    // 10:00 + 90 + 10 = 11:40
    let existing = vec![booking(10, 0, 90)];
    for duration in [1, 60, 180] {
        assert!(
            !is_conflicting(day(), at(11, 40), duration, buffer(), &existing),
            "11:40 with {} min should be free",
            duration
        );
    }
}

#[test]
fn candidate_one_minute_early_conflicts() {
    let existing = vec![booking(10, 0, 90)];
    assert!(is_conflicting(day(), at(11, 39), 1, buffer(), &existing));
}

#[test]
fn candidate_whose_buffer_reaches_next_booking_conflicts() {
    // Candidate 12:55 + 60 + 10 = 14:05 runs into the 14:00 lesson.
    let existing = vec![booking(14, 0, 120)];
    assert!(is_conflicting(day(), at(12, 55), 60, buffer(), &existing));
    // 12:50 + 70 = 14:00 exactly: adjacent.
    assert!(!is_conflicting(day(), at(12, 50), 60, buffer(), &existing));
}

#[test]
fn empty_day_never_conflicts() {
    assert!(!is_conflicting(day(), at(9, 0), 180, buffer(), &[]));
}

#[test]
fn zero_length_booking_occupies_only_its_buffer() {
    let existing = vec![booking(12, 0, 0)];
    // Occupied [12:00, 12:10)
    assert!(is_conflicting(day(), at(12, 5), 60, buffer(), &existing));
    assert!(!is_conflicting(day(), at(12, 10), 60, buffer(), &existing));
    // 10:50 + 70 = 12:00, abuts.
    assert!(!is_conflicting(day(), at(10, 50), 60, buffer(), &existing));
}

#[test]
fn bookings_on_other_days_do_not_conflict() {
    let tomorrow = day().succ_opt().unwrap();
    let existing = vec![Booking::new(tomorrow, at(10, 0), 90, LessonMode::Remote)];
    assert!(!is_conflicting(day(), at(10, 0), 90, buffer(), &existing));
}

#[test]
fn conflict_is_symmetric() {
    let a = booking(10, 0, 90);
    let b = booking(11, 35, 60);
    assert!(bookings_conflict(&a, &b, buffer()));
    assert!(bookings_conflict(&b, &a, buffer()));

    let c = booking(11, 40, 60);
    assert!(!bookings_conflict(&a, &c, buffer()));
    assert!(!bookings_conflict(&c, &a, buffer()));
}

#[test]
fn zero_buffer_reduces_to_plain_overlap() {
    let existing = vec![booking(10, 0, 60)];
    assert!(!is_conflicting(day(), at(11, 0), 60, BufferPolicy::new(0), &existing));
    assert!(is_conflicting(day(), at(11, 0), 60, buffer(), &existing));
}

#[test]
fn find_conflicts_reports_overlap_minutes() {
    let existing = vec![booking(10, 0, 90), booking(14, 0, 120), booking(16, 30, 60)];

    // Candidate [11:35, 12:45) vs [10:00, 11:40): 5 minutes.
    let conflicts = find_conflicts(day(), at(11, 35), 60, buffer(), &existing);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].booking.start_time, at(10, 0));
    assert_eq!(conflicts[0].overlap_minutes, 5);
}

#[test]
fn find_conflicts_spanning_two_bookings() {
    let existing = vec![booking(14, 0, 120), booking(16, 30, 60)];

    // Candidate [15:00, 18:10) overlaps [14:00,16:10) by 70 and [16:30,17:40) by 70.
    let conflicts = find_conflicts(day(), at(15, 0), 180, buffer(), &existing);
    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0].overlap_minutes, 70);
    assert_eq!(conflicts[1].overlap_minutes, 70);
}

#[test]
fn occupied_interval_includes_buffer() {
    let interval = OccupiedInterval::of(&booking(10, 0, 90), buffer());
    assert_eq!(interval.start, day().and_time(at(10, 0)));
    assert_eq!(interval.end, day().and_time(at(11, 40)));
    assert!(interval.within_day());
}

#[test]
fn interval_past_midnight_is_not_within_day() {
    let late = OccupiedInterval::new(day(), at(21, 0), 180, buffer());
    assert!(!late.within_day());

    let exact = OccupiedInterval::new(day(), at(21, 0), 170, buffer());
    assert!(exact.within_day());
}
