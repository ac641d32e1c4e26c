//! modeterm - a typewriter-paced, multi-mode terminal session
//!
//! modeterm plays an animated banner for the current mode and then accepts a
//! tiny command language at a `> ` prompt.
//!
//! # Features
//!
//! - **Typewriter output**: Banner lines are written one character at a time
//! - **Modes**: Named modes with their own description and color
//! - **Mode switching**: `switch <mode>` clears the screen and replays the banner
//! - **Configuration**: Modes, pacing and colors from `~/.modeterm/config.toml`
//!
//! # Quick Start
//!
//! ```text
//! modeterm                 # Start in the default mode (LAB42)
//! modeterm -m x-manager    # Start in X-MANAGER
//! modeterm --fast          # No typewriter delays
//! ```
//!
//! # Commands
//!
//! | Command | Action |
//! |---------|--------|
//! | modes | List available modes |
//! | switch &lt;mode&gt; | Change to another mode |

mod config;
mod core;
mod ui;

use std::env;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::style::Stylize;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{Config, Pacing};
use crate::core::registry::{Mode, ModeRegistry};
use crate::core::runner::SessionHandle;
use crate::core::session::{SessionController, SessionSettings};
use crate::core::writer::Liveness;
use crate::ui::{HostInput, KeyMapper, Renderer, TerminalSurface};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter
const LOG_ENV: &str = "MODETERM_LOG";

/// Command line options for an interactive run
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    /// Startup mode, overriding the config file
    mode: Option<String>,
    /// Disable all typewriter delays
    fast: bool,
}

/// What the command line asks for
#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    Run(Options),
    ListModes,
    InitConfig,
    Help,
    Version,
}

fn print_version() {
    eprintln!("modeterm {}", VERSION);
}

fn print_help() {
    eprintln!("modeterm {} - A typewriter-paced, multi-mode terminal session", VERSION);
    eprintln!();
    eprintln!("Usage: modeterm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -m, --mode <NAME>     Start in the given mode (case-insensitive)");
    eprintln!("  -f, --fast            Disable typewriter delays");
    eprintln!("  -l, --list-modes      Print available modes and exit");
    eprintln!("      --init-config     Write the current configuration and exit");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Commands (at the > prompt):");
    eprintln!("  modes                 List available modes");
    eprintln!("  switch <mode>         Change to another mode");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Ctrl+V                Paste the first clipboard line");
    eprintln!("  Esc, Ctrl+C, Ctrl+D   Exit");
    eprintln!();
    eprintln!("Configuration: ~/.modeterm/config.toml");
    eprintln!("Log file:      ~/.modeterm/modeterm.log ({} sets the filter)", LOG_ENV);
}

fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    let mut options = Options::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-v" | "--version" => return Ok(CliCommand::Version),
            "-l" | "--list-modes" => return Ok(CliCommand::ListModes),
            "--init-config" => return Ok(CliCommand::InitConfig),
            "-m" | "--mode" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing mode argument".to_string());
                }
                options.mode = Some(args[i].clone());
            }
            "-f" | "--fast" => {
                options.fast = true;
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(CliCommand::Run(options))
}

/// Log to `~/.modeterm/modeterm.log`; stdout belongs to the session
fn init_logging() {
    let log_path = config::data_dir()
        .map(|dir| dir.join("modeterm.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("modeterm.log"));

    // Create log directory if needed
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Open log file (append mode)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("modeterm {} starting...", VERSION);

    let config = Config::load();
    let registry = config.registry();
    info!("{} modes available", registry.list().len());

    match command {
        CliCommand::Help => print_help(),
        CliCommand::Version => print_version(),
        CliCommand::ListModes => list_modes(&registry),
        CliCommand::InitConfig => init_config(config, &registry)?,
        CliCommand::Run(options) => {
            let initial = match config.initial_mode(&registry, options.mode.as_deref()) {
                Ok(mode) => mode,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    eprintln!("Use --list-modes to see available modes");
                    std::process::exit(1);
                }
            };
            let mut settings = SessionSettings::from(&config);
            if options.fast {
                settings.pacing = Pacing::instant();
            }
            run_terminal(&config, registry, initial, settings)?;
        }
    }

    Ok(())
}

fn list_modes(registry: &ModeRegistry) {
    for mode in registry.list() {
        println!(
            "{} - {}",
            mode.name.as_str().with(mode.color.to_crossterm()),
            mode.description
        );
    }
}

fn init_config(mut config: Config, registry: &ModeRegistry) -> anyhow::Result<()> {
    if config.modes.is_empty() {
        config.modes = registry.list().to_vec();
    }
    let path = config.save()?;
    info!("Wrote config to {}", path.display());
    eprintln!("Configuration written to {}", path.display());
    Ok(())
}

/// Run the interactive session until it ends or the user quits
fn run_terminal(
    config: &Config,
    registry: ModeRegistry,
    initial: Mode,
    settings: SessionSettings,
) -> anyhow::Result<()> {
    let (cols, rows) = Renderer::size()?;
    info!("Terminal size: {}x{}", cols, rows);
    info!("Starting in mode {}", initial.name);

    let mut renderer = Renderer::new(config.theme);
    renderer.init()?;

    let surface = TerminalSurface::stdout(&config.theme);
    let controller = SessionController::new(surface, registry, initial, settings, Liveness::new());
    let handle = SessionHandle::spawn(controller)?;

    // Run main loop
    let result = run_main_loop(&handle);

    let outcome = handle.shutdown();
    let _ = renderer.cleanup();

    if let Err(e) = &outcome {
        error!("Session ended with error: {}", e);
    }
    result?;
    outcome?;
    info!("modeterm exiting");
    Ok(())
}

/// Main event loop: forward keys to the session thread
fn run_main_loop(handle: &SessionHandle<TerminalSurface<std::io::Stdout>>) -> anyhow::Result<()> {
    let poll_timeout = Duration::from_millis(10);
    let mut clipboard: Option<arboard::Clipboard> = None;

    loop {
        if !handle.is_running() {
            info!("Session ended");
            break;
        }

        if !event::poll(poll_timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => match KeyMapper::map(&key) {
                Some(HostInput::Key(input)) => {
                    handle.send_key(input);
                }
                Some(HostInput::Paste) => paste(&mut clipboard, handle),
                Some(HostInput::Quit) => {
                    info!("Quit requested");
                    break;
                }
                None => {}
            },
            Event::Resize(cols, rows) => {
                // Columns are read live by the surface
                debug!("Resized to {}x{}", cols, rows);
            }
            _ => {}
        }
    }

    Ok(())
}

/// Send the first clipboard line as typed characters
fn paste(
    clipboard: &mut Option<arboard::Clipboard>,
    handle: &SessionHandle<TerminalSurface<std::io::Stdout>>,
) {
    if clipboard.is_none() {
        match arboard::Clipboard::new() {
            Ok(cb) => *clipboard = Some(cb),
            Err(e) => {
                warn!("Clipboard unavailable: {}", e);
                return;
            }
        }
    }

    if let Some(cb) = clipboard.as_mut() {
        match cb.get_text() {
            Ok(text) => {
                for key in KeyMapper::paste_keys(&text) {
                    handle.send_key(key);
                }
            }
            Err(e) => warn!("Failed to read clipboard: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        assert_eq!(parse_args(&args(&[])), Ok(CliCommand::Run(Options::default())));
    }

    #[test]
    fn test_parse_args_run_options() {
        assert_eq!(
            parse_args(&args(&["-m", "x-manager", "--fast"])),
            Ok(CliCommand::Run(Options {
                mode: Some("x-manager".to_string()),
                fast: true,
            }))
        );
    }

    #[test]
    fn test_parse_args_commands() {
        assert_eq!(parse_args(&args(&["--list-modes"])), Ok(CliCommand::ListModes));
        assert_eq!(parse_args(&args(&["--init-config"])), Ok(CliCommand::InitConfig));
        assert_eq!(parse_args(&args(&["-v"])), Ok(CliCommand::Version));
        assert_eq!(parse_args(&args(&["-f", "-h"])), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["--mode"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }
}
