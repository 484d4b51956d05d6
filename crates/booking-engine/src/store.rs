//! The external booking store boundary and an in-memory implementation.
//!
//! [`MemoryStore`] performs a conditional write: the candidate is re-checked
//! against the stored bookings for that day at save time, so a booking that
//! won a race is never silently overwritten.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::{Booking, BookingId};
use crate::config::BufferPolicy;
use crate::conflict::is_conflicting;
use crate::error::StoreError;

/// Whether a save inserts a new booking or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update,
}

/// Read/write access to the bookings of one teacher.
pub trait BookingStore {
    /// Consistent snapshot of all bookings on `date`, ordered by start time.
    fn list_bookings_for_day(&self, date: NaiveDate) -> Result<Vec<Booking>, StoreError>;

    fn load_booking(&self, id: BookingId) -> Result<Booking, StoreError>;

    /// Persist `booking` and return it as stored (with its id).
    fn save_booking(&mut self, booking: &Booking, mode: SaveMode) -> Result<Booking, StoreError>;
}

#[derive(Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    bookings: Vec<Booking>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bookings: BTreeMap<BookingId, Booking>,
    next_id: u64,
    buffer: BufferPolicy,
}

impl MemoryStore {
    pub fn new(buffer: BufferPolicy) -> Self {
        Self {
            bookings: BTreeMap::new(),
            next_id: 1,
            buffer,
        }
    }

    /// Seed a store with bookings, assigning ids to those without one.
    ///
    /// Seeded bookings are not conflict-checked against each other.
    pub fn with_bookings(buffer: BufferPolicy, bookings: impl IntoIterator<Item = Booking>) -> Self {
        let mut store = Self::new(buffer);
        let mut pending = Vec::new();
        for booking in bookings {
            match booking.id {
                Some(id) => {
                    store.next_id = store.next_id.max(id.0 + 1);
                    store.bookings.insert(id, booking);
                }
                None => pending.push(booking),
            }
        }
        for booking in pending {
            let id = store.allocate_id();
            store.bookings.insert(id, booking.with_id(id));
        }
        store
    }

    /// Load from the JSON document produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str, buffer: BufferPolicy) -> Result<Self, StoreError> {
        let file: StoreFile = serde_json::from_str(json)?;
        Ok(Self::with_bookings(buffer, file.bookings))
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        let file = StoreFile {
            bookings: self.bookings.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn bookings(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.values()
    }

    fn allocate_id(&mut self) -> BookingId {
        let id = BookingId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    fn day_excluding(&self, date: NaiveDate, exclude: Option<BookingId>) -> Vec<Booking> {
        self.bookings
            .values()
            .filter(|b| b.date == date && (exclude.is_none() || b.id != exclude))
            .cloned()
            .collect()
    }
}

impl BookingStore for MemoryStore {
    fn list_bookings_for_day(&self, date: NaiveDate) -> Result<Vec<Booking>, StoreError> {
        let mut day = self.day_excluding(date, None);
        day.sort_by_key(|b| b.start_time);
        Ok(day)
    }

    fn load_booking(&self, id: BookingId) -> Result<Booking, StoreError> {
        self.bookings.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn save_booking(&mut self, booking: &Booking, mode: SaveMode) -> Result<Booking, StoreError> {
        let exclude = match mode {
            SaveMode::Create => None,
            SaveMode::Update => {
                let id = booking.id.ok_or(StoreError::MissingId)?;
                if !self.bookings.contains_key(&id) {
                    return Err(StoreError::NotFound(id));
                }
                Some(id)
            }
        };

        let others = self.day_excluding(booking.date, exclude);
        if is_conflicting(
            booking.date,
            booking.start_time,
            booking.duration_minutes,
            self.buffer,
            &others,
        ) {
            tracing::warn!(
                date = %booking.date,
                start = %booking.start_time,
                "rejecting write: slot taken by another booking"
            );
            return Err(StoreError::Conflict {
                date: booking.date,
                start: booking.start_time,
            });
        }

        let id = match exclude {
            Some(id) => id,
            None => self.allocate_id(),
        };
        let stored = booking.clone().with_id(id);
        self.bookings.insert(id, stored.clone());
        tracing::debug!(%id, ?mode, "booking saved");
        Ok(stored)
    }
}
