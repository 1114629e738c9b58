//! Notification backends for different platforms

use anyhow::{bail, Result};
use std::process::Command;

/// A notification to display
#[derive(Debug, Clone, Default)]
pub struct Notification {
    /// Notification title
    pub title: String,
    /// Notification message/body
    pub message: String,
    /// Auto-dismiss timeout in seconds (optional)
    pub timeout: Option<u32>,
}

impl Notification {
    /// Create a new notification with a title and body
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            timeout: None,
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout = Some(seconds);
        self
    }
}

/// Available notification backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// macOS terminal-notifier
    TerminalNotifier,
    /// macOS osascript
    Osascript,
    /// Linux notify-send
    NotifySend,
    /// KDE kdialog
    Kdialog,
    /// WSL PowerShell
    Wsl,
    /// Fallback echo to the terminal
    Echo,
}

impl Backend {
    /// Detect the best available backend for the current platform
    pub fn detect() -> Self {
        #[cfg(target_os = "macos")]
        {
            if Self::command_exists("terminal-notifier") {
                return Self::TerminalNotifier;
            }
            return Self::Osascript;
        }

        #[cfg(target_os = "linux")]
        {
            if std::env::var("WSL_DISTRO_NAME").is_ok() {
                return Self::Wsl;
            }
            if Self::command_exists("notify-send") {
                return Self::NotifySend;
            }
            if Self::command_exists("kdialog") {
                return Self::Kdialog;
            }
            return Self::Echo;
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            Self::Echo
        }
    }

    /// Check if a command exists
    #[allow(dead_code)]
    fn command_exists(cmd: &str) -> bool {
        Command::new("which")
            .arg(cmd)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Get the name of this backend
    pub fn name(&self) -> &'static str {
        match self {
            Self::TerminalNotifier => "terminal-notifier",
            Self::Osascript => "osascript",
            Self::NotifySend => "notify-send",
            Self::Kdialog => "kdialog",
            Self::Wsl => "wsl",
            Self::Echo => "echo",
        }
    }

    /// Send a notification using this backend
    pub fn send(&self, notification: &Notification) -> Result<()> {
        match self {
            Self::TerminalNotifier => self.send_terminal_notifier(notification),
            Self::Osascript => self.send_osascript(notification),
            Self::NotifySend => self.send_notify_send(notification),
            Self::Kdialog => self.send_kdialog(notification),
            Self::Wsl => self.send_wsl(notification),
            Self::Echo => self.send_echo(notification),
        }
    }

    fn send_terminal_notifier(&self, notification: &Notification) -> Result<()> {
        let mut cmd = Command::new("terminal-notifier");
        cmd.args([
            "-title",
            &notification.title,
            "-message",
            &notification.message,
            "-group",
            crate::APP_NAME,
            "-sound",
            "default",
        ]);

        let status = cmd.status()?;
        if !status.success() {
            bail!("terminal-notifier failed with status: {}", status);
        }
        Ok(())
    }

    fn send_osascript(&self, notification: &Notification) -> Result<()> {
        let title = escape_double_quotes(&notification.title);
        let message = escape_double_quotes(&notification.message);

        let script = format!(
            r#"display notification "{}" with title "{}" sound name "default""#,
            message, title
        );

        let status = Command::new("osascript").args(["-e", &script]).status()?;

        if !status.success() {
            bail!("osascript failed with status: {}", status);
        }
        Ok(())
    }

    fn send_notify_send(&self, notification: &Notification) -> Result<()> {
        let mut cmd = Command::new("notify-send");
        cmd.args(["--app-name", crate::APP_NAME]);
        cmd.args(["--urgency", "normal"]);

        if let Some(timeout) = notification.timeout {
            cmd.args(["--expire-time", &(timeout * 1000).to_string()]);
        }

        cmd.args([&notification.title, &notification.message]);

        let status = cmd.status()?;
        if !status.success() {
            bail!("notify-send failed with status: {}", status);
        }
        Ok(())
    }

    fn send_kdialog(&self, notification: &Notification) -> Result<()> {
        let timeout = notification.timeout.unwrap_or(5);

        let status = Command::new("kdialog")
            .args([
                "--passivepopup",
                &notification.message,
                &timeout.to_string(),
                "--title",
                &notification.title,
            ])
            .status()?;

        if !status.success() {
            bail!("kdialog failed with status: {}", status);
        }
        Ok(())
    }

    fn send_wsl(&self, notification: &Notification) -> Result<()> {
        let title = escape_single_quotes(&notification.title);
        let message = escape_single_quotes(&notification.message);

        let ps_script = format!(
            r#"[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null; $template = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02); $template.GetElementsByTagName('text')[0].AppendChild($template.CreateTextNode('{}')) | Out-Null; $template.GetElementsByTagName('text')[1].AppendChild($template.CreateTextNode('{}')) | Out-Null; [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('{}').Show([Windows.UI.Notifications.ToastNotification]::new($template))"#,
            title,
            message,
            crate::APP_NAME
        );

        let status = Command::new("powershell.exe")
            .args(["-Command", &ps_script])
            .status()?;

        // Toasts are unreliable from WSL; fall back to the terminal
        if !status.success() {
            return self.send_echo(notification);
        }
        Ok(())
    }

    fn send_echo(&self, notification: &Notification) -> Result<()> {
        println!("\x07[{}] {}", notification.title, notification.message);
        Ok(())
    }
}

/// Escape double quotes for AppleScript string literals
fn escape_double_quotes(s: &str) -> String {
    s.replace('"', r#"\""#)
}

/// Escape single quotes for PowerShell string literals
fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', "''")
}
