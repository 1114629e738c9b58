//! Tick scheduler
//!
//! Drives a [`FocusApp`] from a one-second interval and a command channel on
//! a single task. The interval only exists while the clock is running: a
//! stop drops it, so no tick can land after a pause, reset or skip.

use pomo_notify::Notifier;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::app::FocusApp;
use crate::clock::Clock;
use crate::engine::Command;
use crate::store::KeyValueStore;

/// Time between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Process commands and ticks until the command channel closes
pub async fn run<S, N, C>(app: &mut FocusApp<S, N, C>, mut commands: mpsc::Receiver<Command>)
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    let mut ticker: Option<Interval> = None;

    loop {
        match (app.is_running(), ticker.is_some()) {
            (true, false) => ticker = Some(start_ticker()),
            (false, true) => {
                ticker = None;
                debug!("ticker stopped");
            }
            _ => {}
        }

        tokio::select! {
            // Commands win ties so a stop is seen before a due tick
            biased;

            command = commands.recv() => match command {
                Some(command) => {
                    app.dispatch(command);
                }
                None => break,
            },

            _ = next_tick(&mut ticker) => {
                app.dispatch(Command::Tick);
            }
        }
    }

    debug!("command channel closed, scheduler exiting");
}

/// An interval whose first tick is one full period from now
fn start_ticker() -> Interval {
    let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!("ticker started");
    interval
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::session::{DisplayVariant, Durations, Mode};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use pomo_notify::{BackgroundNotifier, SilentNotifier};

    fn app() -> FocusApp<MemoryStore, SilentNotifier, FixedClock> {
        FocusApp::load(
            MemoryStore::new(),
            SilentNotifier,
            FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
            Durations::default(),
            DisplayVariant::Modern,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_second_while_running() {
        let mut app = app();
        let (tx, rx) = mpsc::channel(8);

        let script = async move {
            tx.send(Command::ToggleRunning).await.unwrap();
            time::sleep(Duration::from_millis(3500)).await;
            tx.send(Command::ToggleRunning).await.unwrap();
            // Paused: nothing may tick from here on
            time::sleep(Duration::from_secs(10)).await;
        };

        tokio::join!(run(&mut app, rx), script);

        let session = app.snapshot().session;
        assert_eq!(session.remaining_seconds, 1497);
        assert!(!session.running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_stale_tick_after_skip() {
        let mut app = app();
        let (tx, rx) = mpsc::channel(8);

        let script = async move {
            tx.send(Command::ToggleRunning).await.unwrap();
            time::sleep(Duration::from_millis(1500)).await;
            tx.send(Command::Skip).await.unwrap();
            time::sleep(Duration::from_secs(5)).await;
        };

        tokio::join!(run(&mut app, rx), script);

        let session = app.snapshot().session;
        assert_eq!(session.mode, Mode::Break);
        assert_eq!(session.remaining_seconds, 300);
        assert!(!session.running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_waits_a_full_period() {
        let mut app = app();
        let (tx, rx) = mpsc::channel(8);

        let script = async move {
            tx.send(Command::ToggleRunning).await.unwrap();
            time::sleep(Duration::from_millis(1900)).await;
            tx.send(Command::ToggleRunning).await.unwrap();
            tx.send(Command::ToggleRunning).await.unwrap();
            time::sleep(Duration::from_millis(900)).await;
            tx.send(Command::ToggleRunning).await.unwrap();
        };

        tokio::join!(run(&mut app, rx), script);

        // One tick before the pause, none in the 0.9s after resuming
        assert_eq!(app.snapshot().session.remaining_seconds, 1499);
    }

    /// Blocks the calling thread the way a desktop helper process can
    struct SlowNotifier;

    impl Notifier for SlowNotifier {
        fn notify(&self, _title: &str, _body: &str) -> anyhow::Result<()> {
            std::thread::sleep(Duration::from_millis(2500));
            Ok(())
        }
    }

    // Real time: the notifier blocks an OS thread, which paused time cannot model
    #[tokio::test]
    async fn test_slow_notifier_does_not_delay_ticks() {
        let mut app = FocusApp::load(
            MemoryStore::new(),
            BackgroundNotifier::spawn(SlowNotifier).unwrap(),
            FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
            Durations {
                work_seconds: 1,
                break_seconds: 60,
            },
            DisplayVariant::Modern,
        );
        let (tx, rx) = mpsc::channel(8);

        let script = async move {
            tx.send(Command::ToggleRunning).await.unwrap();
            time::sleep(Duration::from_millis(3500)).await;
            tx.send(Command::ToggleRunning).await.unwrap();
        };

        tokio::join!(run(&mut app, rx), script);

        // Work completes at 1s, then two break ticks at 2s and 3s
        let session = app.snapshot().session;
        assert_eq!(session.mode, Mode::Break);
        assert_eq!(session.remaining_seconds, 58);
        assert_eq!(app.snapshot().stats.total_sessions, 1);
    }
}
