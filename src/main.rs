mod app;
mod commands;
mod config;
mod domain;
mod input;
mod ordering;
mod persistence;
mod session;
mod store;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use commands::{SortArg, StdinPrompter, ThemeArg};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use persistence::init_local_dir;
use ratatui::{backend::CrosstermBackend, Terminal};
use session::Session;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// How long the TUI waits for an event before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "tasklane")]
#[command(about = "A terminal task list with sorting, drag reordering and order reset", long_about = None)]
struct Cli {
    /// Data directory (defaults to the nearest .tasklane, then ~/.tasklane)
    #[arg(long, global = true, env = "TASKLANE_DIR")]
    dir: Option<PathBuf>,

    /// Keep the list in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tasklane directory in the current directory
    Init,
    /// Add a task
    Add {
        /// Task name
        text: String,
    },
    /// List tasks in display order
    Ls,
    /// Toggle a task between done and not done
    Done {
        /// Task name or #position
        task: String,
    },
    /// Rename a task (prompts for the new name when omitted)
    Rename {
        /// Task name or #position
        task: String,
        /// New name
        new_text: Option<String>,
    },
    /// Delete one or more tasks
    Rm {
        /// Task names or #positions
        #[arg(required = true)]
        tasks: Vec<String>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Sort tasks by name
    Sort {
        #[arg(value_enum)]
        direction: SortArg,
    },
    /// Restore the order tasks were created in
    Reset,
    /// Move a task before another one (or to the end)
    Mv {
        /// Task name or #position
        task: String,
        /// Task to place it before
        #[arg(short, long)]
        before: Option<String>,
    },
    /// Show counters
    Stats,
    /// Show or set the colour theme
    Theme {
        #[arg(value_enum)]
        theme: Option<ThemeArg>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        install_tracing_stderr();
        let dir = init_local_dir()?;
        println!("Initialized tasklane directory: {}", dir.display());
        println!();
        println!("Tasklane will now use this local directory for storage.");
        return Ok(());
    }

    let config = Config::resolve(cli.dir, cli.ephemeral)?;

    match cli.command {
        None => {
            install_tracing_file(&config)?;
            run_tui(&config)
        }
        Some(command) => {
            install_tracing_stderr();
            let mut session = Session::open(config.open_storage()?);
            run_command(&mut session, command)
        }
    }
}

/// Directives from RUST_LOG when they parse; INFO otherwise
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn env_filter() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

fn install_tracing_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

/// The TUI owns the terminal, so logs go to a file in the data directory
fn install_tracing_file(config: &Config) -> Result<()> {
    if config.ephemeral {
        return Ok(());
    }
    persistence::ensure_dir(&config.data_dir)?;
    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .try_init();
    Ok(())
}

fn run_command(session: &mut Session, command: Commands) -> Result<()> {
    match command {
        Commands::Init => Ok(()),
        Commands::Add { text } => commands::add(session, &text),
        Commands::Ls => {
            commands::print_list(session);
            Ok(())
        }
        Commands::Done { task } => commands::toggle(session, &task),
        Commands::Rename { task, new_text } => commands::rename(
            session,
            &task,
            new_text.as_deref(),
            &mut StdinPrompter { assume_yes: false },
        ),
        Commands::Rm { tasks, yes } => {
            commands::remove(session, &tasks, &mut StdinPrompter { assume_yes: yes })
        }
        Commands::Sort { direction } => commands::sort(session, direction),
        Commands::Reset => commands::reset(session),
        Commands::Mv { task, before } => commands::move_task(session, &task, before.as_deref()),
        Commands::Stats => {
            println!("{}", commands::format_counters(&session.counters()));
            Ok(())
        }
        Commands::Theme { theme } => commands::theme(session, theme),
    }
}

fn run_tui(config: &Config) -> Result<()> {
    let session = Session::open(config.open_storage()?);
    if !config.ephemeral {
        info!("using data directory {}", config.data_dir.display());
    }
    let mut app = AppState::new(session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // Print any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                // Only process key press events (ignore key release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if input::handle_key(app, key)? {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_rust_log_level_is_not_capped() {
        assert_eq!(filter_from(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(filter_from(Some("trace")).max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_default_filter_is_info() {
        assert_eq!(filter_from(None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tasklane", "ls", "--ephemeral", "--dir", "/tmp/x"]).unwrap();
        assert!(cli.ephemeral);
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Some(Commands::Ls)));
    }

    #[test]
    fn test_parse_rm_requires_a_task() {
        assert!(Cli::try_parse_from(["tasklane", "rm"]).is_err());
        let cli = Cli::try_parse_from(["tasklane", "rm", "a", "#2", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::Rm { tasks, yes }) => {
                assert_eq!(tasks, vec!["a", "#2"]);
                assert!(yes);
            }
            _ => panic!("expected rm"),
        }
    }

    #[test]
    fn test_parse_sort_direction() {
        let cli = Cli::try_parse_from(["tasklane", "sort", "desc"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Sort { direction: SortArg::Desc })
        ));
    }

    #[test]
    fn test_no_subcommand_launches_tui() {
        let cli = Cli::try_parse_from(["tasklane"]).unwrap();
        assert!(cli.command.is_none());
    }
}
