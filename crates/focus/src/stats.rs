//! Focus statistics
//!
//! Cumulative counters derived from completed work intervals:
//! - Total and same-day session counts
//! - Total focus time
//! - Consecutive-day streak

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format of the persisted `lastSessionDate`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cumulative focus statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Completed work intervals, ever
    pub total_sessions: u32,
    /// Completed work intervals on `last_session_date`
    pub today_sessions: u32,
    /// Total focus time in minutes
    pub total_focus_minutes: u32,
    /// Consecutive calendar days with at least one completed work interval
    pub streak_days: u32,
    /// Local date of the most recent completion
    pub last_session_date: Option<NaiveDate>,
}

impl Statistics {
    /// Count a completed work interval of `work_minutes` finished on `today`
    pub fn record_work_completion(&mut self, work_minutes: u32, today: NaiveDate) {
        *self = self.after_work_completion(work_minutes, today);
    }

    /// The statistics that result from one more completed work interval
    pub fn after_work_completion(&self, work_minutes: u32, today: NaiveDate) -> Self {
        let is_new_day = self.last_session_date != Some(today);

        let today_sessions = if is_new_day {
            1
        } else {
            self.today_sessions.saturating_add(1)
        };

        let streak_days = if !is_new_day {
            self.streak_days
        } else if self.last_session_date.is_some() && self.last_session_date == today.pred_opt() {
            self.streak_days.saturating_add(1)
        } else {
            1
        };

        Self {
            total_sessions: self.total_sessions.saturating_add(1),
            today_sessions,
            total_focus_minutes: self.total_focus_minutes.saturating_add(work_minutes),
            streak_days,
            last_session_date: Some(today),
        }
    }

    /// Sessions completed on `today` (zero if the last one was another day)
    pub fn sessions_on(&self, today: NaiveDate) -> u32 {
        if self.last_session_date == Some(today) {
            self.today_sessions
        } else {
            0
        }
    }

    /// Streak still alive on `today`: the last completion was today or yesterday
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        match self.last_session_date {
            Some(last) if last == today || Some(last) == today.pred_opt() => self.streak_days,
            _ => 0,
        }
    }

    /// Get total hours and minutes as a tuple
    pub fn total_time(&self) -> (u32, u32) {
        (self.total_focus_minutes / 60, self.total_focus_minutes % 60)
    }

    /// Restore statistics from their persisted record
    pub fn from_record(record: StatsRecord) -> Result<Self, chrono::ParseError> {
        let last_session_date = match record.last_session_date.trim() {
            "" => None,
            date => Some(NaiveDate::parse_from_str(date, DATE_FORMAT)?),
        };

        Ok(Self {
            total_sessions: record.total_sessions,
            today_sessions: record.today_sessions,
            total_focus_minutes: record.total_focus_minutes,
            streak_days: record.streak_days,
            last_session_date,
        })
    }

    /// The persisted shape of these statistics
    pub fn to_record(&self) -> StatsRecord {
        StatsRecord {
            total_sessions: self.total_sessions,
            today_sessions: self.today_sessions,
            total_focus_minutes: self.total_focus_minutes,
            streak_days: self.streak_days,
            last_session_date: self
                .last_session_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

/// Persisted statistics record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsRecord {
    pub total_sessions: u32,
    pub today_sessions: u32,
    pub total_focus_minutes: u32,
    pub streak_days: u32,
    /// Date-only string, empty when no session was ever completed
    pub last_session_date: String,
}
