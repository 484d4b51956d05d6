//! Engine configuration: opening hours, grid step, buffer and redirect delay.
//!
//! The struct is serde-friendly so a binary can load it from TOML; every field
//! has a default matching the school's standard opening hours.

use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::{hhmm, minute_of_day};
use crate::error::Result;
use crate::grid::{self, SlotGrid};

pub const DEFAULT_BUFFER_MINUTES: u32 = 10;
pub const DEFAULT_STEP_MINUTES: u32 = 5;
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;

/// Setup/teardown time appended after every booking's nominal duration.
///
/// Applies to both the candidate and the existing booking, so two bookings are
/// always separated by at least one buffer period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BufferPolicy {
    minutes: u32,
}

impl BufferPolicy {
    pub const fn new(minutes: u32) -> Self {
        Self { minutes }
    }

    pub const fn minutes(self) -> u32 {
        self.minutes
    }
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_MINUTES)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// First bookable start time.
    #[serde(with = "hhmm")]
    pub opening: NaiveTime,
    /// Last bookable start time (inclusive).
    #[serde(with = "hhmm")]
    pub closing: NaiveTime,
    pub step_minutes: u32,
    pub buffer_minutes: u32,
    /// How long the confirmation stays on screen before navigating away.
    pub redirect_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            opening: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            closing: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default(),
            step_minutes: DEFAULT_STEP_MINUTES,
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
        }
    }
}

impl EngineConfig {
    pub fn opening_minute(&self) -> u32 {
        minute_of_day(self.opening)
    }

    pub fn closing_minute(&self) -> u32 {
        minute_of_day(self.closing)
    }

    pub fn buffer(&self) -> BufferPolicy {
        BufferPolicy::new(self.buffer_minutes)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// Build the slot grid for these opening hours.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidGridParameters` if the window is inverted or
    /// the step is zero.
    pub fn grid(&self) -> Result<SlotGrid> {
        SlotGrid::new(self.opening_minute(), self.closing_minute(), self.step_minutes)
    }

    /// Check the configuration without keeping the grid.
    pub fn validate(&self) -> Result<()> {
        grid::check_parameters(self.opening_minute(), self.closing_minute(), self.step_minutes)
    }
}
