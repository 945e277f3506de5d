//! `hbnb` interactive console.
//!
//! # Responsibility
//! - Map command-line flags and environment onto `ConsoleConfig`.
//! - Own the record store for the process lifetime and feed it stdin lines.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use hbnb_core::{init_logging, Console, ConsoleConfig, Flow, JsonFileStore};
use log::{error, info};

const PROMPT: &str = "(hbnb) ";

#[derive(Parser)]
#[command(author, version, about = "Command interpreter for hbnb records")]
struct Cli {
    /// JSON file holding every record. Defaults to ./file.json
    #[arg(long = "file", env = "HBNB_FILE")]
    store_path: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "HBNB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rotating log files
    #[arg(long, env = "HBNB_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> ConsoleConfig {
        let defaults = ConsoleConfig::default();
        ConsoleConfig {
            store_path: self.store_path.unwrap_or(defaults.store_path),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            log_dir: self.log_dir.unwrap_or(defaults.log_dir),
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse().into_config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={:#}", err);
            eprintln!("hbnb: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: ConsoleConfig) -> Result<()> {
    config.validate().context("invalid configuration")?;

    let log_dir = config.resolved_log_dir()?;
    if let Err(err) = init_logging(&config.log_level, &log_dir) {
        eprintln!("hbnb: logging disabled: {err}");
    }

    let store = JsonFileStore::open(config.store_path.clone()).with_context(|| {
        format!("failed to load records from `{}`", config.store_path.display())
    })?;
    let mut console = Console::new(store);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut input = stdin.lock();
    let mut stdout = io::stdout().lock();
    let mut line = String::new();

    loop {
        if interactive {
            write!(stdout, "{PROMPT}")?;
            stdout.flush()?;
        }

        line.clear();
        let command = if input.read_line(&mut line)? == 0 {
            if interactive {
                writeln!(stdout)?;
            }
            "EOF"
        } else {
            line.as_str()
        };

        if console.execute(command, &mut stdout)? == Flow::Exit {
            break;
        }
    }

    info!("event=app_exit module=cli status=ok");
    Ok(())
}
