//! Display state of a grid slot given the current hover and selection.
//!
//! Pure derivation: the caller passes everything in, nothing is remembered
//! between calls.

use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;

use crate::clock::minute_of_day;
use crate::config::BufferPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotDisplayState {
    Available,
    AvailableHover,
    Conflicting,
    ConflictingHover,
    Selected,
    /// No duration chosen yet.
    Disabled,
}

impl SlotDisplayState {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotDisplayState::Available => "available",
            SlotDisplayState::AvailableHover => "available-hover",
            SlotDisplayState::Conflicting => "conflicting",
            SlotDisplayState::ConflictingHover => "conflicting-hover",
            SlotDisplayState::Selected => "selected",
            SlotDisplayState::Disabled => "disabled",
        }
    }

    pub fn is_hover(self) -> bool {
        matches!(
            self,
            SlotDisplayState::AvailableHover | SlotDisplayState::ConflictingHover
        )
    }

    pub fn is_conflicting(self) -> bool {
        matches!(
            self,
            SlotDisplayState::Conflicting | SlotDisplayState::ConflictingHover
        )
    }
}

impl fmt::Display for SlotDisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `slot` falls in `[start, start + duration + buffer)`.
///
/// Always `false` when `start` is `None`.
pub fn in_range(
    slot: NaiveTime,
    start: Option<NaiveTime>,
    duration_minutes: u32,
    buffer: BufferPolicy,
) -> bool {
    let Some(start) = start else {
        return false;
    };
    let from = u64::from(minute_of_day(start));
    let until = from + u64::from(duration_minutes) + u64::from(buffer.minutes());
    (from..until).contains(&u64::from(minute_of_day(slot)))
}

/// Derive the display state of one slot.
///
/// Priority: `Selected` > `ConflictingHover` > `Conflicting` >
/// `AvailableHover` > `Available`. Every slot is `Disabled` until a duration
/// is chosen. `is_conflicting` answers whether a lesson starting at the slot
/// would be refused.
pub fn slot_state<F>(
    slot: NaiveTime,
    hovered: Option<NaiveTime>,
    selected: Option<NaiveTime>,
    duration_minutes: Option<u32>,
    buffer: BufferPolicy,
    is_conflicting: F,
) -> SlotDisplayState
where
    F: Fn(NaiveTime) -> bool,
{
    let Some(duration) = duration_minutes else {
        return SlotDisplayState::Disabled;
    };

    if in_range(slot, selected, duration, buffer) {
        return SlotDisplayState::Selected;
    }

    let hovered = in_range(slot, hovered, duration, buffer);
    match (is_conflicting(slot), hovered) {
        (true, true) => SlotDisplayState::ConflictingHover,
        (true, false) => SlotDisplayState::Conflicting,
        (false, true) => SlotDisplayState::AvailableHover,
        (false, false) => SlotDisplayState::Available,
    }
}
