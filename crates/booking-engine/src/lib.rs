//! # booking-engine
//!
//! Time-slot availability and conflict detection for booking lessons.
//!
//! A teacher's day is offered as a grid of candidate start times. Each booking
//! blocks its duration plus a fixed buffer for setup and teardown, and a new
//! lesson may only start where its own buffered interval overlaps no existing
//! one. The [`BookingForm`] controller drives both the create and the edit
//! flow on top of these pure building blocks.
//!
//! ## Quick start
//!
//! ```rust
//! use booking_engine::{is_conflicting, Booking, BufferPolicy, LessonMode};
//! use chrono::{NaiveDate, NaiveTime};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
//! let existing = vec![Booking::new(day, at(10, 0), 90, LessonMode::OnSite)];
//!
//! // 10:00 + 90 min + 10 min buffer = 11:40
//! assert!(!is_conflicting(day, at(11, 40), 60, BufferPolicy::default(), &existing));
//! assert!(is_conflicting(day, at(11, 35), 60, BufferPolicy::default(), &existing));
//! ```
//!
//! ## Modules
//!
//! - [`duration`] - Catalog of allowed lesson lengths
//! - [`grid`] - Opening window → ordered candidate start times
//! - [`conflict`] - Buffered half-open interval overlap
//! - [`availability`] - Per-day slot availability and free windows
//! - [`interaction`] - Hover/selection display state of a slot
//! - [`form`] - Create/edit booking controller
//! - [`store`] - Booking store trait and in-memory implementation
//! - [`booking`] - Booking record and confirmation summary
//! - [`config`] - Opening hours, step, buffer
//! - [`error`] - Error types

pub mod availability;
pub mod booking;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod duration;
pub mod error;
pub mod form;
pub mod grid;
pub mod interaction;
pub mod store;

pub use availability::{free_windows, CandidateSlot, DayAvailability, FreeWindow};
pub use booking::{Booking, BookingId, BookingSummary, LessonMode};
pub use config::{BufferPolicy, EngineConfig};
pub use conflict::{bookings_conflict, find_conflicts, is_conflicting, Conflict, OccupiedInterval};
pub use duration::{durations, DurationOption};
pub use error::{FormError, SlotError, StoreError, ValidationError};
pub use form::{BookingForm, BookingStep, Field, FormMode};
pub use grid::{generate_slot_labels, generate_slots, SlotGrid};
pub use interaction::{slot_state, SlotDisplayState};
pub use store::{BookingStore, MemoryStore, SaveMode};
