//! focus - Pomodoro session clock and focus statistics
//!
//! A single countdown alternates between a work interval (25 min) and a
//! break (5 min). Each work interval that runs down to zero counts toward:
//! - Total and same-day session counts
//! - Total focus time
//! - A consecutive-day streak
//!
//! Skipping an interval never counts as a completion.
//!
//! Layout:
//! - [`engine`]: pure transitions over [`session`] and [`stats`]
//! - [`app`]: owns the engine, persists through [`store`], notifies
//! - [`runner`]: one-second tick scheduler on tokio

pub mod app;
pub mod clock;
pub mod engine;
pub mod runner;
pub mod session;
pub mod stats;
pub mod store;

pub use app::FocusApp;
pub use clock::{Clock, FixedClock, LocalClock};
pub use engine::{Command, Completion, Engine, Snapshot, Transition};
pub use session::{DisplayVariant, Durations, Mode, SessionState};
pub use stats::Statistics;
pub use store::{FileStore, KeyValueStore, MemoryStore};
