//! The focus application: one engine wired to its collaborators
//!
//! `FocusApp` is the only owner of engine state. Consumers send it
//! [`Command`]s and watch [`Snapshot`]s; after each command it persists
//! whatever changed and fires a notification on completion.

use pomo_notify::Notifier;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::engine::{Command, Engine, Snapshot, Transition};
use crate::session::{DisplayVariant, Durations, SessionRecord, SessionState};
use crate::stats::{Statistics, StatsRecord};
use crate::store::{load_record, save_record, KeyValueStore, SESSION_KEY, STATS_KEY};

pub struct FocusApp<S, N, C> {
    engine: Engine,
    store: S,
    notifier: N,
    clock: C,
    state_tx: watch::Sender<Snapshot>,
}

impl<S, N, C> FocusApp<S, N, C>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    /// Restore state from `store`, falling back to defaults for anything
    /// missing or malformed. `variant` styles a session with no record.
    pub fn load(
        store: S,
        notifier: N,
        clock: C,
        durations: Durations,
        variant: DisplayVariant,
    ) -> Self {
        let session = match load_record::<SessionRecord, _>(&store, SESSION_KEY) {
            Some(record) => SessionState::from_record(record, &durations),
            None => SessionState::new(&durations).with_variant(variant),
        };

        let stats = load_record::<StatsRecord, _>(&store, STATS_KEY)
            .and_then(|record| match Statistics::from_record(record) {
                Ok(stats) => Some(stats),
                Err(e) => {
                    warn!(key = STATS_KEY, error = %e, "bad lastSessionDate, using defaults");
                    None
                }
            })
            .unwrap_or_default();

        debug!(
            mode = ?session.mode,
            remaining = session.remaining_seconds,
            total_sessions = stats.total_sessions,
            "focus state loaded"
        );

        let engine = Engine::new(session, stats, durations);
        let (state_tx, _) = watch::channel(engine.snapshot());

        Self {
            engine,
            store,
            notifier,
            clock,
            state_tx,
        }
    }

    /// Run a command and apply its side effects
    pub fn dispatch(&mut self, command: Command) -> Transition {
        let today = self.clock.today();
        let transition = self.engine.apply(command, today);
        self.on_change(&transition);
        transition
    }

    /// Persist, notify and publish after a transition
    fn on_change(&self, transition: &Transition) {
        if transition.is_noop() {
            return;
        }

        if transition.stats_changed {
            if let Err(e) = save_record(&self.store, STATS_KEY, &self.engine.stats().to_record()) {
                warn!(key = STATS_KEY, error = %format!("{:#}", e), "failed to persist");
            }
        }

        if transition.session_changed {
            if let Err(e) =
                save_record(&self.store, SESSION_KEY, &self.engine.session().to_record())
            {
                warn!(key = SESSION_KEY, error = %format!("{:#}", e), "failed to persist");
            }
        }

        if let Some(completion) = transition.completion {
            if let Err(e) = self.notifier.notify(completion.title(), completion.body()) {
                debug!(error = %e, "notification not delivered");
            }
        }

        self.state_tx.send_replace(self.engine.snapshot());
    }

    /// Watch state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.engine.session().running
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
