//! pomo - Pomodoro timer with focus statistics
//!
//! Usage:
//!   pomo start                  Run the timer in the foreground
//!   pomo status                 Show the current interval
//!   pomo stats                  Show focus statistics
//!   pomo reset                  Back to a fresh work interval
//!   pomo skip                   Jump to the other interval
//!   pomo style <modern|retro>   Change the timer display
//!   pomo config                 Show configuration and paths

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use focus::runner;
use focus::store::FileStore;
use focus::{Clock, Command, DisplayVariant, Durations, FocusApp, KeyValueStore, LocalClock, Snapshot};
use pomo_core::{format, Config, Paths};
use pomo_notify::{BackgroundNotifier, DesktopNotifier, Notifier, SilentNotifier};

/// pomo - Pomodoro timer with focus statistics
#[derive(Parser)]
#[command(name = "pomo")]
#[command(about = "Pomodoro timer with session statistics and streaks")]
#[command(version)]
#[command(after_help = r#"WHEN TO USE:
    Before starting focused work. Alternates 25-minute work intervals with
    5-minute breaks and keeps a daily streak.

TIMER KEYS (pomo start, press Enter after each):
    p    pause / resume
    r    reset to a fresh work interval
    s    skip to the other interval
    v    switch display style
    q    quit (state is kept)

EXAMPLES:
    pomo start                  # Resume where you left off
    pomo status                 # Check remaining time
    pomo skip                   # Jump to the break without counting it
    pomo stats                  # Totals, today and streak

CONFIGURATION:
    ~/.config/pomo/config.json  work_minutes, break_minutes,
                                notifications, display_variant
    POMO_DATA_DIR / POMO_CONFIG_DIR override the default locations.
    RUST_LOG=focus=debug logs transitions to stderr.

ALIASES:
    pomo s      # start
    pomo st     # status
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer in the foreground
    #[command(alias = "s")]
    Start,

    /// Show the current interval
    #[command(alias = "st")]
    Status,

    /// Show focus statistics
    #[command(alias = "statistics")]
    Stats,

    /// Stop and return to a fresh work interval
    Reset,

    /// Jump to the other interval (never counts as completed)
    Skip,

    /// Change the timer display style
    Style {
        /// "modern" or "retro"
        variant: DisplayVariant,
    },

    /// Show configuration and paths
    Config,
}

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const MAGENTA: &str = "\x1b[0;35m";
const YELLOW: &str = "\x1b[0;33m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

/// Bold section title
fn heading(text: &str) -> String {
    color(BOLD, text)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = Paths::new();
    let config = Config::load(&paths.config_file())?;
    let store = FileStore::new(&paths.state("focus"))?;

    let command = cli.command.unwrap_or(Commands::Status);

    // Only the foreground timer can complete an interval
    let notifier: Box<dyn Notifier> = match command {
        Commands::Start if config.notifications => {
            Box::new(BackgroundNotifier::spawn(DesktopNotifier::detect())?)
        }
        _ => Box::new(SilentNotifier),
    };

    let durations = Durations::from_minutes(config.work_minutes, config.break_minutes);
    let variant: DisplayVariant = config.display_variant.parse()?;
    let mut app = FocusApp::load(store, notifier, LocalClock, durations, variant);

    match command {
        Commands::Start => cmd_start(app),
        Commands::Status => cmd_status(&app),
        Commands::Stats => cmd_stats(&app),
        Commands::Reset => {
            app.dispatch(Command::Reset);
            println!("{} Timer reset", color(GREEN, "[ok]"));
            cmd_status(&app)
        }
        Commands::Skip => {
            app.dispatch(Command::Skip);
            println!("{} Skipped (not counted)", color(GREEN, "[ok]"));
            cmd_status(&app)
        }
        Commands::Style { variant } => {
            app.dispatch(Command::SetDisplayVariant(variant));
            println!("{} Display style: {}", color(GREEN, "[ok]"), variant);
            Ok(())
        }
        Commands::Config => cmd_config(&paths, &config),
    }
}

/// What a line typed during `pomo start` asks for
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Send(Command),
    Quit,
}

fn parse_key(input: &str) -> Option<KeyAction> {
    match input.trim().to_lowercase().as_str() {
        "p" | "" => Some(KeyAction::Send(Command::ToggleRunning)),
        "r" => Some(KeyAction::Send(Command::Reset)),
        "s" => Some(KeyAction::Send(Command::Skip)),
        "v" => Some(KeyAction::Send(Command::ToggleDisplayVariant)),
        "q" => Some(KeyAction::Quit),
        _ => None,
    }
}

/// Forward input lines as commands until quit. Once input ends the sender
/// is held until the runner stops or Ctrl-C, so only `q` ends a run.
async fn read_keys<R>(input: R, commands: mpsc::Sender<Command>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_key(&line) {
                Some(KeyAction::Send(command)) => {
                    if commands.send(command).await.is_err() {
                        return;
                    }
                }
                Some(KeyAction::Quit) => return,
                None => tracing::debug!(input = %line, "unknown key"),
            },
            Ok(None) => {
                tracing::debug!("input closed, timer keeps running");
                break;
            }
            Err(e) => {
                tracing::debug!(error = %e, "input unreadable, timer keeps running");
                break;
            }
        }
    }

    tokio::select! {
        _ = commands.closed() => {}
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                tracing::debug!(error = %e, "no Ctrl-C handler");
                commands.closed().await;
            }
        }
    }
}

/// Run the timer in the foreground
fn cmd_start<S, N, C>(mut app: FocusApp<S, N, C>) -> Result<()>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let (tx, rx) = mpsc::channel(16);
        let mut display = app.subscribe();

        if !app.is_running() {
            app.dispatch(Command::ToggleRunning);
        }
        render(&display.borrow_and_update());

        let renderer = tokio::spawn(async move {
            while display.changed().await.is_ok() {
                let snapshot = display.borrow_and_update().clone();
                render(&snapshot);
            }
        });
        let input = tokio::spawn(read_keys(BufReader::new(tokio::io::stdin()), tx));

        runner::run(&mut app, rx).await;

        input.abort();
        drop(app);
        let _ = renderer.await;
    });

    // stdin reads block a worker thread; don't wait on them
    rt.shutdown_timeout(Duration::from_millis(100));
    println!();
    Ok(())
}

/// Redraw the timer line in place
fn render(snapshot: &Snapshot) {
    let session = &snapshot.session;
    let clock = format::clock(session.remaining_seconds);
    let label = session.mode.label();

    let line = match session.display_variant {
        DisplayVariant::Modern => {
            let progress = session.progress_percent(&snapshot.durations);
            format!(
                "{}  {}  [{}] {}%",
                color(BOLD, &clock),
                color(CYAN, label),
                format::progress_bar(progress, 20),
                progress
            )
        }
        DisplayVariant::Retro => format!(
            "[ {} ]  {}",
            color(&format!("{}{}", BOLD, MAGENTA), &clock),
            label.to_uppercase()
        ),
    };

    let state = if session.running {
        String::new()
    } else {
        format!("  {}", color(YELLOW, "(paused)"))
    };

    print!("\r\x1b[2K{}{}", line, state);
    let _ = std::io::stdout().flush();
}

/// Show the current interval
fn cmd_status<S, N, C>(app: &FocusApp<S, N, C>) -> Result<()>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    let snapshot = app.snapshot();
    let session = &snapshot.session;
    let progress = session.progress_percent(&snapshot.durations);

    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), &session.mode.label().to_uppercase()));
    println!();
    println!(
        "  {} [{}] {}%",
        color(CYAN, "Progress:"),
        format::progress_bar(progress, 30),
        progress
    );
    println!(
        "  {} {}",
        color(CYAN, "Remaining:"),
        format::clock(session.remaining_seconds)
    );
    println!(
        "  {}  {}",
        color(CYAN, "Sessions:"),
        session.completed_sessions_this_load
    );
    println!("  {}     {}", color(CYAN, "Style:"), session.display_variant);
    println!();
    println!("Run 'pomo start' to run the timer");

    Ok(())
}

/// Show focus statistics
fn cmd_stats<S, N, C>(app: &FocusApp<S, N, C>) -> Result<()>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    let stats = app.engine().stats();
    let today = app.clock().today();

    println!("{}", heading("Productivity Stats"));
    println!();
    println!("  {}   {}", color(CYAN, "Total Sessions:"), stats.total_sessions);
    println!(
        "  {} {}",
        color(CYAN, "Today's Sessions:"),
        stats.sessions_on(today)
    );
    println!(
        "  {}       {}",
        color(CYAN, "Focus Time:"),
        format::hours_minutes(stats.total_focus_minutes)
    );
    println!(
        "  {}   {} days",
        color(CYAN, "Current Streak:"),
        stats.current_streak(today)
    );

    Ok(())
}

/// Show configuration and paths
fn cmd_config(paths: &Paths, config: &Config) -> Result<()> {
    println!("{}", heading("Configuration"));
    println!();
    println!("  {}    {}", color(CYAN, "Config:"), paths.config_file().display());
    println!("  {}      {}", color(CYAN, "Data:"), paths.state("focus").display());
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_with_tty() {
        let result = color(GREEN, "test");
        assert!(result.contains("test"));
    }

    #[test]
    fn test_heading_has_no_stray_codes() {
        for title in ["Productivity Stats", "Configuration"] {
            let expected = if use_colors() {
                format!("{}{}{}", BOLD, title, NC)
            } else {
                title.to_string()
            };
            assert_eq!(heading(title), expected);
        }
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("p"), Some(KeyAction::Send(Command::ToggleRunning)));
        assert_eq!(parse_key(""), Some(KeyAction::Send(Command::ToggleRunning)));
        assert_eq!(parse_key(" S \n"), Some(KeyAction::Send(Command::Skip)));
        assert_eq!(parse_key("r"), Some(KeyAction::Send(Command::Reset)));
        assert_eq!(
            parse_key("v"),
            Some(KeyAction::Send(Command::ToggleDisplayVariant))
        );
        assert_eq!(parse_key("q"), Some(KeyAction::Quit));
        assert_eq!(parse_key("x"), None);
    }

    #[test]
    fn test_cli_parses_style() {
        let cli = Cli::try_parse_from(["pomo", "style", "retro"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Style {
                variant: DisplayVariant::Retro
            })
        ));
        assert!(Cli::try_parse_from(["pomo", "style", "neon"]).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_eof_keeps_timer_alive() {
        let (tx, mut rx) = mpsc::channel(4);

        let ended = tokio::time::timeout(
            Duration::from_secs(60),
            read_keys(&b"s\n"[..], tx),
        )
        .await;

        assert!(ended.is_err(), "end of input must not stop the run");
        assert_eq!(rx.try_recv().unwrap(), Command::Skip);
    }

    #[tokio::test]
    async fn test_quit_key_ends_input() {
        let (tx, mut rx) = mpsc::channel(4);
        read_keys(&b"p\nq\ns\n"[..], tx).await;

        assert_eq!(rx.recv().await, Some(Command::ToggleRunning));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_input_ends_when_runner_stops() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        read_keys(&b""[..], tx).await;
    }
}
