//! Session clock state
//!
//! The live countdown: which interval is running, how many seconds are left,
//! and the persisted record it round-trips through.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default work interval (25 minutes)
pub const WORK_SECONDS: u32 = 25 * 60;

/// Default break interval (5 minutes)
pub const BREAK_SECONDS: u32 = 5 * 60;

/// Which interval the clock is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Focus phase
    #[default]
    Work,
    /// Rest phase
    Break,
}

impl Mode {
    /// The mode that follows this one
    pub fn next(self) -> Self {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Work => "Focus Mode",
            Mode::Break => "Break Time",
        }
    }
}

/// Cosmetic timer style. Has no effect on timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayVariant {
    #[default]
    Modern,
    Retro,
}

impl DisplayVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayVariant::Modern => "modern",
            DisplayVariant::Retro => "retro",
        }
    }

    /// The other variant
    pub fn toggled(self) -> Self {
        match self {
            DisplayVariant::Modern => DisplayVariant::Retro,
            DisplayVariant::Retro => DisplayVariant::Modern,
        }
    }
}

impl fmt::Display for DisplayVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display variant name that is neither "modern" nor "retro"
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown display variant: {0} (expected 'modern' or 'retro')")]
pub struct UnknownVariant(pub String);

impl FromStr for DisplayVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "modern" => Ok(DisplayVariant::Modern),
            "retro" => Ok(DisplayVariant::Retro),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Interval lengths in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub work_seconds: u32,
    pub break_seconds: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_seconds: WORK_SECONDS,
            break_seconds: BREAK_SECONDS,
        }
    }
}

impl Durations {
    pub fn from_minutes(work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            work_seconds: work_minutes.saturating_mul(60),
            break_seconds: break_minutes.saturating_mul(60),
        }
    }

    /// Full length of an interval
    pub fn for_mode(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_seconds,
            Mode::Break => self.break_seconds,
        }
    }

    /// Work interval credited to focus time on completion
    pub fn work_minutes(&self) -> u32 {
        self.work_seconds / 60
    }
}

/// The live clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Seconds left in the current interval
    pub remaining_seconds: u32,
    /// Current interval
    pub mode: Mode,
    /// Whether the clock is counting down
    pub running: bool,
    /// Work intervals completed since the record was created
    pub completed_sessions_this_load: u32,
    /// Cosmetic timer style
    pub display_variant: DisplayVariant,
}

impl SessionState {
    /// A paused clock at the start of a work interval
    pub fn new(durations: &Durations) -> Self {
        Self {
            remaining_seconds: durations.work_seconds,
            mode: Mode::Work,
            running: false,
            completed_sessions_this_load: 0,
            display_variant: DisplayVariant::default(),
        }
    }

    pub fn with_variant(mut self, variant: DisplayVariant) -> Self {
        self.display_variant = variant;
        self
    }

    /// Restore a clock from its persisted record.
    ///
    /// The restored clock is always paused. A stored zero means "full
    /// interval", and anything longer than the configured interval is
    /// clamped to it.
    pub fn from_record(record: SessionRecord, durations: &Durations) -> Self {
        let full = durations.for_mode(record.mode);
        let remaining_seconds = match record.remaining_seconds {
            0 => full,
            secs => secs.min(full),
        };

        Self {
            remaining_seconds,
            mode: record.mode,
            running: false,
            completed_sessions_this_load: record.completed_sessions_this_load,
            display_variant: record.display_variant,
        }
    }

    /// The persisted shape of this clock (running is not stored)
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            remaining_seconds: self.remaining_seconds,
            mode: self.mode,
            completed_sessions_this_load: self.completed_sessions_this_load,
            display_variant: self.display_variant,
        }
    }

    /// Progress through the current interval as a percentage (0-100)
    pub fn progress_percent(&self, durations: &Durations) -> u32 {
        let full = durations.for_mode(self.mode);
        if full == 0 {
            return 100;
        }
        let elapsed = full.saturating_sub(self.remaining_seconds) as u64;
        ((elapsed * 100) / full as u64).min(100) as u32
    }
}

/// Persisted session record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRecord {
    pub remaining_seconds: u32,
    pub mode: Mode,
    pub completed_sessions_this_load: u32,
    pub display_variant: DisplayVariant,
}
