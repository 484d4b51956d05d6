//! Booking form controller shared by the create and edit flows.
//!
//! The form walks mode -> duration -> date -> time -> notes. Whenever the date
//! or duration changes it recomputes the day's availability and drops a
//! selected time that no longer fits. Create and edit differ only in how the
//! fields start out and in the edit flow's "has anything changed" gate.

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};

use crate::availability::DayAvailability;
use crate::booking::{normalize_notes, Booking, BookingId, BookingSummary, LessonMode};
use crate::config::{BufferPolicy, EngineConfig};
use crate::duration;
use crate::error::{FormError, SlotError, StoreError, ValidationError};
use crate::grid::SlotGrid;
use crate::interaction::{slot_state, SlotDisplayState};
use crate::store::{BookingStore, SaveMode};

/// Message shown to the user when the store refuses a submission.
pub const SUBMIT_FAILURE_MESSAGE: &str = "Could not save the booking. Please try again.";

/// A user-editable field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Mode,
    Duration,
    Date,
    Time,
    Notes,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Mode => "lesson mode",
            Field::Duration => "duration",
            Field::Date => "date",
            Field::Time => "start time",
            Field::Notes => "notes",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Progress through the booking steps.
///
/// `Ready` means a start time is selected; notes are optional from there on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    Blank,
    ModeSelected,
    DurationSelected,
    DateSelected,
    Ready,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Fields {
    mode: Option<LessonMode>,
    duration_minutes: Option<u32>,
    date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    notes: Option<String>,
}

impl Fields {
    fn from_booking(booking: &Booking) -> Self {
        Self {
            mode: Some(booking.mode),
            duration_minutes: Some(booking.duration_minutes),
            date: Some(booking.date),
            start_time: Some(booking.start_time),
            notes: normalize_notes(booking.notes.clone()),
        }
    }

    fn assemble(&self, id: Option<BookingId>) -> Result<Booking, ValidationError> {
        let mode = self.mode.ok_or(ValidationError::MissingField(Field::Mode))?;
        let duration_minutes = self
            .duration_minutes
            .ok_or(ValidationError::MissingField(Field::Duration))?;
        let date = self.date.ok_or(ValidationError::MissingField(Field::Date))?;
        let start_time = self
            .start_time
            .ok_or(ValidationError::MissingField(Field::Time))?;

        Ok(Booking {
            id,
            date,
            start_time,
            duration_minutes,
            mode,
            notes: self.notes.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SubmitState {
    Idle,
    InFlight,
    Submitted(Booking),
}

#[derive(Debug, Clone)]
pub struct BookingForm {
    grid: SlotGrid,
    buffer: BufferPolicy,
    redirect_delay: Duration,
    fields: Fields,
    /// Snapshot loaded in edit mode; `None` when creating.
    original: Option<Booking>,
    day_bookings: Vec<Booking>,
    availability: Option<DayAvailability>,
    hovered: Option<NaiveTime>,
    submit_state: SubmitState,
    last_error: Option<String>,
}

impl BookingForm {
    /// Blank form for a new booking.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidGridParameters` if the configured opening
    /// hours cannot produce a grid.
    pub fn create(config: &EngineConfig) -> Result<Self, SlotError> {
        Ok(Self {
            grid: config.grid()?,
            buffer: config.buffer(),
            redirect_delay: config.redirect_delay(),
            fields: Fields::default(),
            original: None,
            day_bookings: Vec::new(),
            availability: None,
            hovered: None,
            submit_state: SubmitState::Idle,
            last_error: None,
        })
    }

    /// Load booking `id` from the store and open it for editing.
    pub fn edit<S: BookingStore>(config: &EngineConfig, store: &S, id: BookingId) -> Result<Self, FormError> {
        let original = store.load_booking(id)?;
        let day_bookings = store.list_bookings_for_day(original.date)?;
        Ok(Self::from_booking(config, original, day_bookings)?)
    }

    /// Edit form pre-filled from `original`, with the bookings of its day.
    ///
    /// The original keeps its time even if the day has since filled up; it is
    /// only re-validated once the date or duration changes.
    pub fn from_booking(
        config: &EngineConfig,
        original: Booking,
        day_bookings: Vec<Booking>,
    ) -> Result<Self, SlotError> {
        let mut form = Self::create(config)?;
        form.fields = Fields::from_booking(&original);
        form.original = Some(original);
        form.day_bookings = day_bookings;
        form.recompute_availability();
        Ok(form)
    }

    pub fn form_mode(&self) -> FormMode {
        if self.original.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn original(&self) -> Option<&Booking> {
        self.original.as_ref()
    }

    pub fn mode(&self) -> Option<LessonMode> {
        self.fields.mode
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.fields.duration_minutes
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.fields.date
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.fields.start_time
    }

    pub fn notes(&self) -> Option<&str> {
        self.fields.notes.as_deref()
    }

    pub fn hovered(&self) -> Option<NaiveTime> {
        self.hovered
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub fn buffer(&self) -> BufferPolicy {
        self.buffer
    }

    pub fn availability(&self) -> Option<&DayAvailability> {
        self.availability.as_ref()
    }

    /// Bookings on the selected day, as last read from the store.
    pub fn day_bookings(&self) -> &[Booking] {
        &self.day_bookings
    }

    /// User-facing message from the last failed submission.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn submitted(&self) -> Option<&Booking> {
        match &self.submit_state {
            SubmitState::Submitted(booking) => Some(booking),
            _ => None,
        }
    }

    /// Delay before navigating away; only set once the booking is submitted.
    pub fn redirect_delay(&self) -> Option<Duration> {
        self.submitted().map(|_| self.redirect_delay)
    }

    pub fn step(&self) -> BookingStep {
        match self.submit_state {
            SubmitState::InFlight => return BookingStep::Submitting,
            SubmitState::Submitted(_) => return BookingStep::Submitted,
            SubmitState::Idle => {}
        }
        let f = &self.fields;
        if f.mode.is_none() {
            BookingStep::Blank
        } else if f.duration_minutes.is_none() {
            BookingStep::ModeSelected
        } else if f.date.is_none() {
            BookingStep::DurationSelected
        } else if f.start_time.is_none() {
            BookingStep::DateSelected
        } else {
            BookingStep::Ready
        }
    }

    pub fn set_mode(&mut self, mode: LessonMode) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.fields.mode = Some(mode);
        Ok(())
    }

    /// Choose a catalog duration and recompute availability.
    pub fn set_duration(&mut self, minutes: u32) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.require(Field::Duration, Field::Mode, self.fields.mode.is_some())?;
        if !duration::is_supported(minutes) {
            return Err(ValidationError::UnsupportedDuration(minutes).into());
        }
        self.fields.duration_minutes = Some(minutes);
        self.on_date_or_duration_change();
        Ok(())
    }

    /// Choose a date, read its bookings from `store` and recompute availability.
    ///
    /// If the store read fails the previous date stays selected.
    pub fn set_date<S: BookingStore>(&mut self, date: NaiveDate, store: &S) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.require(Field::Date, Field::Duration, self.fields.duration_minutes.is_some())?;
        let bookings = store.list_bookings_for_day(date)?;
        self.fields.date = Some(date);
        self.day_bookings = bookings;
        self.on_date_or_duration_change();
        Ok(())
    }

    /// Change date and duration in one step, recomputing availability once.
    ///
    /// A selected time is kept when it fits the new day and length together,
    /// even if it would not fit either change applied alone.
    pub fn set_date_and_duration<S: BookingStore>(
        &mut self,
        date: NaiveDate,
        minutes: u32,
        store: &S,
    ) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.require(Field::Duration, Field::Mode, self.fields.mode.is_some())?;
        if !duration::is_supported(minutes) {
            return Err(ValidationError::UnsupportedDuration(minutes).into());
        }
        let bookings = store.list_bookings_for_day(date)?;
        self.fields.duration_minutes = Some(minutes);
        self.fields.date = Some(date);
        self.day_bookings = bookings;
        self.on_date_or_duration_change();
        Ok(())
    }

    /// Re-read the selected day from `store`, e.g. after a rejected submission.
    pub fn reload_bookings<S: BookingStore>(&mut self, store: &S) -> Result<(), FormError> {
        if let Some(date) = self.fields.date {
            self.day_bookings = store.list_bookings_for_day(date)?;
            self.on_date_or_duration_change();
        }
        Ok(())
    }

    /// Pick a start time. It must be on the grid and available.
    pub fn select_time(&mut self, time: NaiveTime) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.require(Field::Time, Field::Date, self.fields.date.is_some())?;
        let available = self
            .availability
            .as_ref()
            .is_some_and(|a| a.is_available(time));
        if !available {
            return Err(FormError::SlotUnavailable(time));
        }
        self.fields.start_time = Some(time);
        Ok(())
    }

    pub fn clear_time(&mut self) {
        if self.submit_state == SubmitState::Idle {
            self.fields.start_time = None;
        }
    }

    /// Free-text notes; blank text clears them.
    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.require(Field::Notes, Field::Time, self.fields.start_time.is_some())?;
        self.fields.notes = normalize_notes(Some(notes.into()));
        Ok(())
    }

    pub fn hover(&mut self, time: NaiveTime) {
        self.hovered = Some(time);
    }

    /// Pointer left the grid: the hover preview disappears entirely.
    pub fn leave_grid(&mut self) {
        self.hovered = None;
    }

    /// Display state of `slot` for the current hover, selection and day.
    ///
    /// Slots stay `Disabled` until both a duration and a date are chosen.
    pub fn slot_state_at(&self, slot: NaiveTime) -> SlotDisplayState {
        let availability = self.availability.as_ref();
        slot_state(
            slot,
            self.hovered,
            self.fields.start_time,
            availability.map(|a| a.duration_minutes()),
            self.buffer,
            |start| availability.is_some_and(|a| !a.is_available(start)),
        )
    }

    pub fn slot_states(&self) -> Vec<(NaiveTime, SlotDisplayState)> {
        self.grid
            .slots()
            .iter()
            .map(|&slot| (slot, self.slot_state_at(slot)))
            .collect()
    }

    /// Create: any field filled. Edit: any field differs from the original.
    pub fn has_changes(&self) -> bool {
        match &self.original {
            Some(original) => self.fields != Fields::from_booking(original),
            None => self.fields != Fields::default(),
        }
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.submit_state == SubmitState::Idle && self.validate().is_ok()
    }

    /// Assemble the booking, or report why it cannot be submitted yet.
    pub fn validate(&self) -> Result<Booking, ValidationError> {
        let booking = self.fields.assemble(self.original.as_ref().and_then(|o| o.id))?;
        if !duration::is_supported(booking.duration_minutes) {
            return Err(ValidationError::UnsupportedDuration(booking.duration_minutes));
        }
        if self.form_mode() == FormMode::Edit && !self.has_changes() {
            return Err(ValidationError::NoChanges);
        }
        Ok(booking)
    }

    /// Summary of the booking as currently filled in.
    pub fn summary(&self) -> Option<BookingSummary> {
        self.fields
            .assemble(self.original.as_ref().and_then(|o| o.id))
            .ok()
            .map(|booking| booking.summary(self.buffer))
    }

    /// Validate and mark a submission as in flight.
    ///
    /// Returns the booking to write and whether it is a create or an update.
    /// Nothing is marked in flight when validation fails.
    pub fn begin_submit(&mut self) -> Result<(Booking, SaveMode), FormError> {
        self.ensure_editable()?;
        let booking = self.validate()?;
        let mode = match self.form_mode() {
            FormMode::Create => SaveMode::Create,
            FormMode::Edit => SaveMode::Update,
        };
        self.submit_state = SubmitState::InFlight;
        self.last_error = None;
        tracing::info!(
            date = %booking.date,
            start = %booking.start_time,
            duration = booking.duration_minutes,
            ?mode,
            "submitting booking"
        );
        Ok((booking, mode))
    }

    /// Record the store's answer to the in-flight submission.
    ///
    /// On failure the form returns to its editable state with every field
    /// intact and `last_error` set. Fails with `NotSubmitting` unless
    /// [`begin_submit`](Self::begin_submit) put a submission in flight.
    pub fn complete_submit(&mut self, result: Result<Booking, StoreError>) -> Result<Booking, FormError> {
        if self.submit_state != SubmitState::InFlight {
            return Err(FormError::NotSubmitting);
        }
        match result {
            Ok(saved) => {
                tracing::info!(id = ?saved.id, "booking submitted");
                self.submit_state = SubmitState::Submitted(saved.clone());
                Ok(saved)
            }
            Err(err) => {
                tracing::warn!(error = %err, "booking submission failed");
                self.submit_state = SubmitState::Idle;
                self.last_error = Some(SUBMIT_FAILURE_MESSAGE.to_string());
                Err(FormError::SubmitFailed(err))
            }
        }
    }

    /// Validate, write to `store`, and record the outcome.
    pub fn submit<S: BookingStore>(&mut self, store: &mut S) -> Result<Booking, FormError> {
        let (booking, mode) = self.begin_submit()?;
        let result = store.save_booking(&booking, mode);
        self.complete_submit(result)
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        match self.submit_state {
            SubmitState::Idle => Ok(()),
            SubmitState::InFlight => Err(FormError::SubmitInProgress),
            SubmitState::Submitted(_) => Err(FormError::AlreadySubmitted),
        }
    }

    /// Step ordering only applies while creating; edit forms start filled in.
    fn require(&self, step: Field, requires: Field, present: bool) -> Result<(), FormError> {
        if self.form_mode() == FormMode::Create && !present {
            return Err(FormError::StepOutOfOrder { step, requires });
        }
        Ok(())
    }

    fn recompute_availability(&mut self) {
        self.availability = match (self.fields.date, self.fields.duration_minutes) {
            (Some(date), Some(minutes)) => Some(DayAvailability::compute_excluding(
                &self.grid,
                date,
                minutes,
                self.buffer,
                &self.day_bookings,
                self.original.as_ref().and_then(|o| o.id),
            )),
            _ => None,
        };
    }

    fn on_date_or_duration_change(&mut self) {
        self.recompute_availability();

        if let (Some(time), Some(availability)) = (self.fields.start_time, &self.availability) {
            if !availability.is_available(time) {
                tracing::debug!(start = %time, "selected time no longer available, clearing");
                self.fields.start_time = None;
            }
        }

        if let Some(availability) = &self.availability {
            tracing::debug!(
                date = %availability.date(),
                duration = availability.duration_minutes(),
                available = availability.available_count(),
                "availability recomputed"
            );
        }
    }
}
