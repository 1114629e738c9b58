//! pomo-notify - Desktop notifications for pomo
//!
//! Alerts the user when a work or break interval finishes. Works on macOS
//! (osascript/terminal-notifier), Linux (notify-send, kdialog) and WSL, with
//! a terminal fallback everywhere else.
//!
//! Delivery is best-effort: callers treat an `Err` as "not shown" and carry on.

mod backend;

pub use backend::{Backend, Notification};

use anyhow::{anyhow, Context, Result};
use std::sync::mpsc;
use std::thread;

/// Application name reported to notification daemons
pub const APP_NAME: &str = "pomo";

/// Something that can show a user-facing alert
pub trait Notifier {
    /// Show an alert with a title and body
    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

/// Sends notifications through a platform backend
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    backend: Backend,
}

impl DesktopNotifier {
    /// Use the best backend available on this machine
    pub fn detect() -> Self {
        let backend = Backend::detect();
        tracing::debug!(backend = backend.name(), "notification backend detected");
        Self { backend }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        let notification = Notification::new(title, body).with_timeout(10);
        self.backend.send(&notification)
    }
}

/// Drops every notification (notifications disabled in config)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, title: &str, _body: &str) -> Result<()> {
        tracing::trace!(title, "notification suppressed");
        Ok(())
    }
}

/// Delivers through another notifier on a worker thread
///
/// Backends shell out and wait for the helper to exit, which can take
/// seconds. `notify` only queues the alert, so the caller never waits on
/// delivery. Failures are logged by the worker.
#[derive(Debug)]
pub struct BackgroundNotifier {
    queue: mpsc::Sender<(String, String)>,
}

impl BackgroundNotifier {
    /// Start the worker thread
    pub fn spawn<N>(notifier: N) -> Result<Self>
    where
        N: Notifier + Send + 'static,
    {
        let (queue, pending) = mpsc::channel::<(String, String)>();

        thread::Builder::new()
            .name("pomo-notify".to_string())
            .spawn(move || {
                for (title, body) in pending {
                    if let Err(e) = notifier.notify(&title, &body) {
                        tracing::debug!(
                            error = %format!("{:#}", e),
                            title = %title,
                            "notification not shown"
                        );
                    }
                }
                tracing::trace!("notification worker exiting");
            })
            .context("Failed to start notification worker")?;

        Ok(Self { queue })
    }
}

impl Notifier for BackgroundNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        self.queue
            .send((title.to_string(), body.to_string()))
            .map_err(|_| anyhow!("notification worker stopped"))
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        (**self).notify(title, body)
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        (**self).notify(title, body)
    }
}
