mod app;
mod birthday;
mod help;
mod theme;
mod view;
use crate::app::App;
use anyhow::Context;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use lifeweeks::{
    grid::{DEFAULT_LIFE_EXPECTANCY, DEFAULT_WEEKS_PER_YEAR, MAX_WEEKS_PER_YEAR},
    input, OrientationMode,
};
use ratatui::DefaultTerminal;
use std::path::{Path, PathBuf};
use time::{Date, OffsetDateTime};

/// Log level used when `RUST_LOG` is unset and logs go to a file
const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "info"
};

/// Without a log file, logs go to stderr, where anything below a warning
/// would scribble over the calendar
const STDERR_LOG_LEVEL: &str = "warn";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    /// Kept unparsed so that a bad value can fall back to today after
    /// logging is set up
    birthday: Option<String>,
    life_expectancy: Option<String>,
    weeks_per_year: Option<u32>,
    orientation: OrientationMode,
    no_color: bool,
    today: Option<Date>,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('l') | Arg::Long("life-expectancy") => {
                    opts.life_expectancy = Some(parser.value()?.string()?);
                }
                Arg::Short('w') | Arg::Long("weeks-per-year") => {
                    let weeks = parser.value()?.parse::<u32>()?;
                    if weeks > MAX_WEEKS_PER_YEAR {
                        return Err(lexopt::Error::Custom(
                            format!("weeks per year cannot be more than {MAX_WEEKS_PER_YEAR}")
                                .into(),
                        ));
                    }
                    opts.weeks_per_year = Some(weeks);
                }
                Arg::Short('o') | Arg::Long("orientation") => {
                    opts.orientation = parser.value()?.parse()?;
                }
                Arg::Long("no-color") => opts.no_color = true,
                Arg::Long("today") => {
                    let value = parser.value()?.string()?;
                    match input::parse_birth_date(&value) {
                        Ok(d) => opts.today = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                Arg::Long("log-file") => opts.log_file = Some(parser.value()?.into()),
                Arg::Value(value) if opts.birthday.is_none() => {
                    opts.birthday = Some(value.string()?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                let _logger = init_logging(opts.log_file.as_deref())?;
                let today = match opts.today {
                    Some(d) => d,
                    None => OffsetDateTime::now_local()
                        .context("failed to determine local date")?
                        .date(),
                };
                let birthday = input::birth_date_or(opts.birthday.as_deref(), today);
                let life_expectancy = opts
                    .life_expectancy
                    .as_deref()
                    .map_or(DEFAULT_LIFE_EXPECTANCY, input::life_expectancy_or_zero);
                let weeks_per_year = opts.weeks_per_year.unwrap_or(DEFAULT_WEEKS_PER_YEAR);
                log::info!(
                    "Starting with birthday {birthday}, life expectancy {life_expectancy}, \
                     {weeks_per_year} weeks per year, today {today}"
                );
                let app = App::new(today)
                    .birthday(birthday)
                    .life_expectancy(life_expectancy)
                    .weeks_per_year(weeks_per_year)
                    .orientation(opts.orientation)
                    .colorize(!opts.no_color);
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    app.run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: lifeweeks [OPTIONS] [YYYY-MM-DD]");
                println!();
                println!("Show your life as a grid of weeks, from the given birthday");
                println!();
                println!("Options:");
                println!("  -l, --life-expectancy <N>   Number of years to show, at most 200 [default: 88]");
                println!("  -w, --weeks-per-year <N>    Number of weeks per year, at most 53 [default: 52]");
                println!("  -o, --orientation <MODE>    auto, portrait, or landscape [default: auto]");
                println!("      --no-color              Do not color weeks by age");
                println!("      --today <YYYY-MM-DD>    Use the given date as today");
                println!("      --log-file <PATH>       Write log messages to the given file");
                println!("  -h, --help                  Display this help message and exit");
                println!("  -V, --version               Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<LoggerHandle> {
    let logger = match log_file {
        Some(path) => Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?
            .log_to_file(FileSpec::try_from(path)?)
            .print_message(),
        None => Logger::try_with_env_or_str(STDERR_LOG_LEVEL)?,
    };
    logger.start().context("failed to start logger")
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
