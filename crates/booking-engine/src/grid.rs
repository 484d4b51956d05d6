//! Slot grid generation -- the candidate start times offered for one day.
//!
//! The grid depends only on the opening window and the step; it is the same
//! for every date and does not look at existing bookings.

use chrono::NaiveTime;

use crate::clock::{format_hhmm, time_from_minute, MINUTES_PER_DAY};
use crate::error::{Result, SlotError};

/// Validate grid bounds: `open <= close`, `close` inside the day, `step > 0`.
pub fn check_parameters(open_minute: u32, close_minute: u32, step_minutes: u32) -> Result<()> {
    if step_minutes == 0 || open_minute > close_minute || close_minute >= MINUTES_PER_DAY {
        return Err(SlotError::InvalidGridParameters {
            open: open_minute,
            close: close_minute,
            step: step_minutes,
        });
    }
    Ok(())
}

/// Generate every start time from `open_minute` to `close_minute` inclusive,
/// advancing by `step_minutes`.
///
/// With the default 09:00-21:00 window at 5 minutes this yields 145 slots.
///
/// # Errors
/// Returns `SlotError::InvalidGridParameters` for an inverted window, a close
/// bound at or past midnight, or a zero step.
pub fn generate_slots(
    open_minute: u32,
    close_minute: u32,
    step_minutes: u32,
) -> Result<Vec<NaiveTime>> {
    check_parameters(open_minute, close_minute, step_minutes)?;

    Ok((open_minute..=close_minute)
        .step_by(step_minutes as usize)
        .filter_map(time_from_minute)
        .collect())
}

/// Same as [`generate_slots`] but rendered as `"HH:MM"` labels.
pub fn generate_slot_labels(
    open_minute: u32,
    close_minute: u32,
    step_minutes: u32,
) -> Result<Vec<String>> {
    Ok(generate_slots(open_minute, close_minute, step_minutes)?
        .into_iter()
        .map(format_hhmm)
        .collect())
}

/// A generated grid, kept so controllers don't regenerate it per render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    slots: Vec<NaiveTime>,
    step_minutes: u32,
}

impl SlotGrid {
    pub fn new(open_minute: u32, close_minute: u32, step_minutes: u32) -> Result<Self> {
        Ok(Self {
            slots: generate_slots(open_minute, close_minute, step_minutes)?,
            step_minutes,
        })
    }

    pub fn slots(&self) -> &[NaiveTime] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    /// Whether `time` is one of the offered start times.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.slots.binary_search(&time).is_ok()
    }

    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().copied().map(format_hhmm).collect()
    }
}
