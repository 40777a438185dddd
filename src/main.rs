mod app;
mod command;
mod config;
mod consts;
mod game;
mod menu;
mod progress;
mod util;
mod view;
use crate::app::App;
use crate::config::Config;
use crate::progress::{FileStorage, ProgressStore};
use anyhow::Context;
use lexopt::{Arg, Parser};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const USAGE: &str = concat!(
    "Usage: gridsnake [<options>]\n",
    "\n",
    "Options:\n",
    "  -c, --config <PATH>       Read configuration from <PATH>\n",
    "      --progress-file <PATH>\n",
    "                            Load & save progress at <PATH>\n",
    "      --log-file <PATH>     Append log messages to <PATH>\n",
    "  -h, --help                Show this help message and exit\n",
    "  -V, --version             Show the program version and exit\n",
);

/// What the command line asked for
#[derive(Clone, Debug, Eq, PartialEq)]
enum Invocation {
    Run(Arguments),
    Help,
    Version,
}

/// Options given on the command line.  These override the configuration
/// file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    progress_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

impl Invocation {
    fn from_parser(mut parser: Parser) -> Result<Invocation, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("progress-file") => {
                    args.progress_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => {
                    args.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Invocation::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Invocation::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Invocation::Run(args))
    }
}

fn main() -> ExitCode {
    let args = match Invocation::from_parser(Parser::from_env()) {
        Ok(Invocation::Run(args)) => args,
        Ok(Invocation::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Version) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("gridsnake: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    let app = match setup(args) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("gridsnake: {e:?}");
            return ExitCode::FAILURE;
        }
    };
    let terminal = ratatui::init();
    let r = app.run(terminal);
    ratatui::restore();
    tracing::info!(ok = r.is_ok(), "Exiting");
    io_exit(r)
}

/// Load the configuration, start logging, and open the progress store
fn setup(args: Arguments) -> anyhow::Result<App> {
    let config = match args.config {
        Some(path) => Config::load(&path, false)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => match Config::default_path() {
            Ok(path) => Config::load(&path, true).with_context(|| {
                format!("failed to load configuration from {}", path.display())
            })?,
            Err(_) => Config::default(),
        },
    };
    if let Some(path) = args.log_file.or_else(|| config.files.log_file.clone()) {
        init_logging(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    }
    let storage = FileStorage::new(
        args.progress_file
            .unwrap_or_else(|| config.files.progress_file.clone()),
    );
    tracing::info!(
        progress_file = %storage.path().display(),
        mode = %config.defaults.mode,
        walls = config.defaults.walls,
        "Starting up"
    );
    Ok(App::new(
        ProgressStore::open(storage),
        config.defaults.settings(),
    ))
}

/// Send log messages at or above `RUST_LOG` (default: `info`) to the end of
/// the file at `path`.  The terminal belongs to the game, so nothing is ever
/// logged there.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Invocation, lexopt::Error> {
        Invocation::from_parser(Parser::from_iter(
            std::iter::once("gridsnake").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn no_args() {
        assert_eq!(parse(&[]).unwrap(), Invocation::Run(Arguments::default()));
    }

    #[test]
    fn all_paths() {
        let inv = parse(&[
            "-c",
            "cfg.toml",
            "--progress-file=save.json",
            "--log-file",
            "snake.log",
        ])
        .unwrap();
        assert_eq!(
            inv,
            Invocation::Run(Arguments {
                config: Some(PathBuf::from("cfg.toml")),
                progress_file: Some(PathBuf::from("save.json")),
                log_file: Some(PathBuf::from("snake.log")),
            })
        );
    }

    #[rstest]
    #[case(&["-h"], Invocation::Help)]
    #[case(&["--help"], Invocation::Help)]
    #[case(&["-V"], Invocation::Version)]
    #[case(&["--version"], Invocation::Version)]
    #[case(&["--config", "x.toml", "--help"], Invocation::Help)]
    fn info_flags(#[case] args: &[&str], #[case] inv: Invocation) {
        assert_eq!(parse(args).unwrap(), inv);
    }

    #[rstest]
    #[case(&["--bogus"])]
    #[case(&["stray"])]
    #[case(&["--config"])]
    fn usage_errors(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }
}
