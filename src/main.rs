use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;

use tmux_menu::app::{App, Outcome};
use tmux_menu::config::{self, Config};
use tmux_menu::event_loop::run_menu;
use tmux_menu::handoff::Handoff;
use tmux_menu::input::{EventPoller, InputError, SignalFlags, TtySource};
use tmux_menu::session::{self, History, Tmux};
use tmux_menu::terminal::{install_panic_hook, MenuTerminal};

/// Pick, create, or kill a tmux session.
///
/// The choice is written to the hand-off directory for the orchestrating
/// script, which performs the tmux action and runs the menu again.
#[derive(Debug, Parser)]
#[command(name = "tmux-menu", version, about)]
struct Cli {
    /// Config file (defaults to <config dir>/tmux-menu/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for the session/command hand-off files
    #[arg(long, value_name = "DIR")]
    handoff_dir: Option<PathBuf>,

    /// Recency history file
    #[arg(long, value_name = "PATH")]
    history: Option<PathBuf>,

    /// Order sessions lexically, ignoring history
    #[arg(long)]
    no_history: bool,

    /// tmux binary
    #[arg(long, value_name = "BIN")]
    tmux: Option<String>,

    /// Log file (defaults to <state dir>/tmux-menu/tmux-menu.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// CLI flags take precedence over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.handoff_dir {
            config.handoff_dir = Some(dir.clone());
        }
        if let Some(path) = &self.history {
            config.history_path = Some(path.clone());
        }
        if self.no_history {
            config.history_enabled = false;
        }
        if let Some(bin) = &self.tmux {
            config.tmux_bin = bin.clone();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(InputError::Terminated(signal)) = e.downcast_ref::<InputError>() {
                tracing::info!(signal, "terminated by signal");
                return ExitCode::from(u8::try_from(128 + signal).unwrap_or(u8::MAX));
            }
            tracing::error!("{:#}", e);
            eprintln!("tmux-menu: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);
    tracing::debug!(?config, "configuration loaded");

    if !io::stdout().is_terminal() {
        anyhow::bail!("tmux-menu must be run in an interactive terminal");
    }
    let tty = TtySource::open().context("Failed to open terminal device /dev/tty")?;
    let signals = SignalFlags::register().context("Failed to install signal handlers")?;
    let term_size = crossterm::terminal::size().context("Failed to get terminal size")?;

    let history = config
        .history_enabled
        .then(|| History::new(config.history_file(), config.history_limit));
    let listing = session::list_sessions(&Tmux::new(config.tmux_bin.as_str()), history.as_ref());

    let handoff = Handoff::new(config.handoff_directory());
    let previous = handoff.previous_selection();

    let mut app = App::new(listing, previous.as_deref(), term_size, display_cwd());
    let mut poller = EventPoller::new(tty, signals, config.escape_delay());

    install_panic_hook();
    let result = MenuTerminal::enter().and_then(|mut menu| {
        run_menu(menu.terminal_mut(), &mut poller, &mut app, config.poll_interval())
    });
    let outcome = handoff.quit_on_error(result)?;

    tracing::info!(
        command = outcome.command_token(),
        session = outcome.session_name().unwrap_or_default(),
        "menu finished"
    );

    if let (Some(history), Outcome::Attach(name)) = (&history, &outcome) {
        if let Err(e) = history.record(name) {
            tracing::warn!(path = %history.path().display(), "failed to record history: {:#}", e);
        }
    }

    handoff.write(&outcome)
}

/// Working directory for the title, with the home directory shortened to `~`.
fn display_cwd() -> String {
    let Ok(cwd) = std::env::current_dir() else {
        return String::new();
    };
    match dirs::home_dir().and_then(|home| cwd.strip_prefix(&home).ok().map(Path::to_path_buf)) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => cwd.display().to_string(),
    }
}

/// Log to a file: the terminal belongs to the menu.
fn setup_logging(cli: &Cli) {
    use tracing_subscriber::prelude::*;

    let path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| config::log_dir().join("tmux-menu.log"));
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        // Run without logging rather than refuse to start
        return;
    };

    let default_filter = if cli.verbose {
        "tmux_menu=debug"
    } else {
        "tmux_menu=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
