//! The fixed catalog of lesson lengths a booking may use.

use serde::Serialize;

/// One selectable lesson length with a note on who it suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationOption {
    pub minutes: u32,
    pub description: &'static str,
}

impl DurationOption {
    /// Short label such as `"1 h 20 min"`.
    pub fn label(&self) -> String {
        match (self.minutes / 60, self.minutes % 60) {
            (0, m) => format!("{} min", m),
            (h, 0) => format!("{} h", h),
            (h, m) => format!("{} h {} min", h, m),
        }
    }
}

const CATALOG: [DurationOption; 6] = [
    DurationOption {
        minutes: 60,
        description: "Standard lesson, suitable for beginners and younger students",
    },
    DurationOption {
        minutes: 80,
        description: "Extended lesson with time for guided practice",
    },
    DurationOption {
        minutes: 90,
        description: "In-depth lesson for intermediate students",
    },
    DurationOption {
        minutes: 120,
        description: "Two-hour session for advanced study or exam preparation",
    },
    DurationOption {
        minutes: 150,
        description: "Intensive workshop session covering several topics",
    },
    DurationOption {
        minutes: 180,
        description: "Masterclass or full project session",
    },
];

/// All allowed durations, shortest first.
pub fn durations() -> &'static [DurationOption] {
    &CATALOG
}

pub fn lookup(minutes: u32) -> Option<DurationOption> {
    CATALOG.iter().copied().find(|option| option.minutes == minutes)
}

pub fn is_supported(minutes: u32) -> bool {
    lookup(minutes).is_some()
}
