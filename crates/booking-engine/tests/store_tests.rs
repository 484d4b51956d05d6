//! Tests for the in-memory booking store and its conditional write.

use booking_engine::{
    Booking, BookingId, BookingStore, BufferPolicy, LessonMode, MemoryStore, SaveMode, StoreError,
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

#[test]
fn create_assigns_sequential_ids() {
    let mut store = MemoryStore::new(BufferPolicy::default());

    let first = store.save_booking(&booking(9, 0, 60), SaveMode::Create).unwrap();
    let second = store.save_booking(&booking(12, 0, 60), SaveMode::Create).unwrap();

    assert_eq!(first.id, Some(BookingId(1)));
    assert_eq!(second.id, Some(BookingId(2)));
    assert_eq!(store.len(), 2);
}

#[test]
fn list_is_sorted_and_scoped_to_the_day() {
    let other_day = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
    let store = MemoryStore::with_bookings(
        BufferPolicy::default(),
        vec![
            booking(16, 30, 60),
            booking(10, 0, 90),
            Booking::new(other_day, at(10, 0), 60, LessonMode::Remote),
        ],
    );

    let day_list = store.list_bookings_for_day(day()).unwrap();
    let starts: Vec<NaiveTime> = day_list.iter().map(|b| b.start_time).collect();
    assert_eq!(starts, vec![at(10, 0), at(16, 30)]);
}

#[test]
fn conditional_write_rejects_overlap() {
    let mut store = MemoryStore::with_bookings(BufferPolicy::default(), vec![booking(10, 0, 90)]);

    let err = store
        .save_booking(&booking(11, 35, 60), SaveMode::Create)
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { start, .. } if start == at(11, 35)));
    assert_eq!(store.len(), 1);

    store
        .save_booking(&booking(11, 40, 60), SaveMode::Create)
        .unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn update_ignores_the_booking_being_replaced() {
    let mut store = MemoryStore::with_bookings(
        BufferPolicy::default(),
        vec![booking(10, 0, 90).with_id(BookingId(5))],
    );

    let moved = booking(10, 30, 90).with_id(BookingId(5));
    let saved = store.save_booking(&moved, SaveMode::Update).unwrap();

    assert_eq!(saved.id, Some(BookingId(5)));
    assert_eq!(store.load_booking(BookingId(5)).unwrap().start_time, at(10, 30));
    assert_eq!(store.len(), 1);
}

#[test]
fn update_requires_known_id() {
    let mut store = MemoryStore::new(BufferPolicy::default());

    assert!(matches!(
        store.save_booking(&booking(10, 0, 60), SaveMode::Update),
        Err(StoreError::MissingId)
    ));
    assert!(matches!(
        store.save_booking(&booking(10, 0, 60).with_id(BookingId(3)), SaveMode::Update),
        Err(StoreError::NotFound(BookingId(3)))
    ));
}

#[test]
fn seeded_ids_are_kept_and_new_ids_continue_after_them() {
    let mut store = MemoryStore::with_bookings(
        BufferPolicy::default(),
        vec![booking(9, 0, 60).with_id(BookingId(10)), booking(12, 0, 60)],
    );

    assert!(store.load_booking(BookingId(10)).is_ok());
    assert!(store.load_booking(BookingId(11)).is_ok());
    let created = store.save_booking(&booking(15, 0, 60), SaveMode::Create).unwrap();
    assert_eq!(created.id, Some(BookingId(12)));
}

#[test]
fn json_roundtrip_preserves_bookings() {
    let json = r#"{
        "bookings": [
            {"id": 1, "date": "2024-01-15", "start_time": "10:00", "duration_minutes": 90, "mode": "on-site"},
            {"date": "2024-01-15", "start_time": "14:00", "duration_minutes": 120, "mode": "remote", "notes": "exam prep"}
        ]
    }"#;

    let store = MemoryStore::from_json(json, BufferPolicy::default()).unwrap();
    assert_eq!(store.len(), 2);

    let second = store.load_booking(BookingId(2)).unwrap();
    assert_eq!(second.mode, LessonMode::Remote);
    assert_eq!(second.notes.as_deref(), Some("exam prep"));

    let written = store.to_json().unwrap();
    assert!(written.contains("\"start_time\": \"14:00\""));
    assert!(written.contains("\"mode\": \"on-site\""));

    let reloaded = MemoryStore::from_json(&written, BufferPolicy::default()).unwrap();
    let before: Vec<&Booking> = store.bookings().collect();
    let after: Vec<&Booking> = reloaded.bookings().collect();
    assert_eq!(before, after);
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = MemoryStore::from_json("{\"bookings\": [{\"date\": 5}]}", BufferPolicy::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));

    let bad_time = r#"{"bookings":[{"date":"2024-01-15","start_time":"noon","duration_minutes":60,"mode":"remote"}]}"#;
    assert!(MemoryStore::from_json(bad_time, BufferPolicy::default()).is_err());
}
