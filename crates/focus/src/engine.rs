//! Pomodoro engine
//!
//! Pure state transitions over the session clock and statistics. The engine
//! never touches storage, notifications or timers; it reports what changed
//! through a [`Transition`] and leaves the side effects to its owner.

use chrono::NaiveDate;
use tracing::{debug, info, trace};

use crate::session::{DisplayVariant, Durations, Mode, SessionState};
use crate::stats::Statistics;

/// Everything the engine can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// One second elapsed
    Tick,
    /// Pause or resume
    ToggleRunning,
    /// Back to a paused, full work interval
    Reset,
    /// Jump to the other interval without counting a completion
    Skip,
    SetDisplayVariant(DisplayVariant),
    ToggleDisplayVariant,
}

/// An interval that ran down to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The interval that just finished
    pub finished: Mode,
}

impl Completion {
    /// Notification title
    pub fn title(&self) -> &'static str {
        match self.finished {
            Mode::Work => "Focus session completed!",
            Mode::Break => "Break time is over!",
        }
    }

    /// Notification body
    pub fn body(&self) -> &'static str {
        match self.finished {
            Mode::Work => "Take a well-deserved break!",
            Mode::Break => "Time to get back to work!",
        }
    }
}

/// What a command changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub session_changed: bool,
    pub stats_changed: bool,
    pub completion: Option<Completion>,
}

impl Transition {
    fn session() -> Self {
        Self {
            session_changed: true,
            ..Default::default()
        }
    }

    /// Nothing changed
    pub fn is_noop(&self) -> bool {
        !self.session_changed && !self.stats_changed && self.completion.is_none()
    }
}

/// A copy of the engine state handed to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub session: SessionState,
    pub stats: Statistics,
    pub durations: Durations,
}

/// The session clock plus its statistics
#[derive(Debug, Clone)]
pub struct Engine {
    session: SessionState,
    stats: Statistics,
    durations: Durations,
}

impl Engine {
    pub fn new(session: SessionState, stats: Statistics, durations: Durations) -> Self {
        Self {
            session,
            stats,
            durations,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session.clone(),
            stats: self.stats.clone(),
            durations: self.durations,
        }
    }

    /// Run a command. `today` is the local date a completion is credited to.
    pub fn apply(&mut self, command: Command, today: NaiveDate) -> Transition {
        match command {
            Command::Tick => self.tick(today),
            Command::ToggleRunning => self.toggle_running(),
            Command::Reset => self.reset(),
            Command::Skip => self.skip(),
            Command::SetDisplayVariant(variant) => self.set_display_variant(variant),
            Command::ToggleDisplayVariant => {
                self.set_display_variant(self.session.display_variant.toggled())
            }
        }
    }

    /// Advance the clock by one second. A no-op while paused.
    pub fn tick(&mut self, today: NaiveDate) -> Transition {
        if !self.session.running {
            return Transition::default();
        }

        self.session.remaining_seconds = self.session.remaining_seconds.saturating_sub(1);
        if self.session.remaining_seconds > 0 {
            trace!(remaining = self.session.remaining_seconds, "tick");
            return Transition::session();
        }

        let finished = self.session.mode;
        let stats_changed = match finished {
            Mode::Work => {
                self.stats
                    .record_work_completion(self.durations.work_minutes(), today);
                self.session.completed_sessions_this_load =
                    self.session.completed_sessions_this_load.saturating_add(1);
                true
            }
            Mode::Break => false,
        };

        self.session.mode = finished.next();
        self.session.remaining_seconds = self.durations.for_mode(self.session.mode);

        info!(
            finished = ?finished,
            total_sessions = self.stats.total_sessions,
            streak_days = self.stats.streak_days,
            "interval completed"
        );

        Transition {
            session_changed: true,
            stats_changed,
            completion: Some(Completion { finished }),
        }
    }

    pub fn toggle_running(&mut self) -> Transition {
        self.session.running = !self.session.running;
        debug!(running = self.session.running, "toggled");
        Transition::session()
    }

    pub fn reset(&mut self) -> Transition {
        self.session.running = false;
        self.session.mode = Mode::Work;
        self.session.remaining_seconds = self.durations.work_seconds;
        debug!("reset");
        Transition::session()
    }

    pub fn skip(&mut self) -> Transition {
        self.session.running = false;
        self.session.mode = self.session.mode.next();
        self.session.remaining_seconds = self.durations.for_mode(self.session.mode);
        debug!(mode = ?self.session.mode, "skipped");
        Transition::session()
    }

    pub fn set_display_variant(&mut self, variant: DisplayVariant) -> Transition {
        self.session.display_variant = variant;
        Transition::session()
    }
}
