//! Error types for booking-engine operations.

use chrono::NaiveTime;
use thiserror::Error;

use crate::booking::BookingId;
use crate::form::Field;

/// Configuration errors in the slot grid or time parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// Opening window or step size cannot produce a finite grid.
    #[error("Invalid grid parameters: open={open}, close={close}, step={step} (minutes of day)")]
    InvalidGridParameters { open: u32, close: u32, step: u32 },

    #[error("Invalid time of day: '{0}' (expected HH:MM)")]
    InvalidTime(String),
}

/// A booking cannot be submitted in its current shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(Field),

    #[error("Unsupported lesson duration: {0} minutes")]
    UnsupportedDuration(u32),

    /// Edit flow only: the form still matches the loaded booking.
    #[error("Nothing to save: the booking has not been changed")]
    NoChanges,
}

/// Failures reported by a [`BookingStore`](crate::store::BookingStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Booking {0} not found")]
    NotFound(BookingId),

    /// The conditional write lost against a booking that is already stored.
    #[error("Slot {} on {date} is no longer free", .start.format("%H:%M"))]
    Conflict {
        date: chrono::NaiveDate,
        start: NaiveTime,
    },

    #[error("Cannot update a booking without an id")]
    MissingId,

    #[error("Booking store unavailable: {0}")]
    Unavailable(String),

    #[error("Booking store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by the [`BookingForm`](crate::form::BookingForm) controller.
///
/// All of them are recoverable: the form keeps every field the user entered.
#[derive(Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Grid(#[from] SlotError),

    /// Create flow: a later step was set before the step it depends on.
    #[error("Cannot set {step} before {requires} is chosen")]
    StepOutOfOrder { step: Field, requires: Field },

    #[error("Slot {} is not available", .0.format("%H:%M"))]
    SlotUnavailable(NaiveTime),

    #[error("A submission is already in progress")]
    SubmitInProgress,

    #[error("The booking has already been submitted")]
    AlreadySubmitted,

    /// A store result arrived with no submission in flight.
    #[error("No submission is in progress")]
    NotSubmitting,

    /// Reading from the booking store failed (listing or loading).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store rejected the final write. Retrying is allowed.
    #[error("Could not save the booking, please try again ({0})")]
    SubmitFailed(#[source] StoreError),
}

/// Convenience alias used for grid and configuration operations.
pub type Result<T> = std::result::Result<T, SlotError>;
