//! The booking record and its human-readable confirmation summary.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::clock::{format_hhmm, hhmm};
use crate::config::BufferPolicy;
use crate::duration;

/// Store-assigned identifier of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub u64);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the lesson takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LessonMode {
    OnSite,
    Remote,
}

impl LessonMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LessonMode::OnSite => "on-site",
            LessonMode::Remote => "remote",
        }
    }
}

impl fmt::Display for LessonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on-site" | "onsite" | "offline" => Ok(LessonMode::OnSite),
            "remote" | "online" => Ok(LessonMode::Remote),
            other => Err(format!("unknown lesson mode '{}' (expected on-site or remote)", other)),
        }
    }
}

/// One occupied interval on one calendar day for one teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookingId>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub mode: LessonMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(date: NaiveDate, start_time: NaiveTime, duration_minutes: u32, mode: LessonMode) -> Self {
        Self {
            id: None,
            date,
            start_time,
            duration_minutes,
            mode,
            notes: None,
        }
    }

    pub fn with_id(mut self, id: BookingId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = normalize_notes(Some(notes.into()));
        self
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// End of the lesson itself, without the buffer.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at() + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// End of the occupied interval: lesson plus trailing buffer.
    pub fn occupied_until(&self, buffer: BufferPolicy) -> NaiveDateTime {
        self.ends_at() + Duration::minutes(i64::from(buffer.minutes()))
    }

    pub fn summary(&self, buffer: BufferPolicy) -> BookingSummary {
        BookingSummary::new(self, buffer)
    }
}

/// Whitespace-only notes count as no notes.
pub(crate) fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

/// Confirmation view of a booking.
///
/// `end` includes the buffer, matching what the booking blocks on the
/// calendar; `lesson_end` is when teaching stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub mode: LessonMode,
    pub duration_minutes: u32,
    pub duration_description: Option<&'static str>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub lesson_end: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub notes: Option<String>,
}

impl BookingSummary {
    pub fn new(booking: &Booking, buffer: BufferPolicy) -> Self {
        Self {
            mode: booking.mode,
            duration_minutes: booking.duration_minutes,
            duration_description: duration::lookup(booking.duration_minutes).map(|d| d.description),
            date: booking.date,
            start: booking.start_time,
            lesson_end: booking.ends_at().time(),
            end: booking.occupied_until(buffer).time(),
            notes: booking.notes.clone(),
        }
    }

    /// `"HH:MM-HH:MM"` window including the buffer.
    pub fn window(&self) -> String {
        format!("{}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

impl fmt::Display for BookingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mode:      {}", self.mode)?;
        match self.duration_description {
            Some(description) => {
                writeln!(f, "Duration:  {} minutes ({})", self.duration_minutes, description)?
            }
            None => writeln!(f, "Duration:  {} minutes", self.duration_minutes)?,
        }
        writeln!(f, "Date:      {}", self.date)?;
        writeln!(f, "Time:      {}", self.window())?;
        write!(f, "Notes:     {}", self.notes.as_deref().unwrap_or("-"))
    }
}
