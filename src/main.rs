mod debug_report;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use chrono_english::{Dialect, parse_date_string};
use lectio::{
    BookResolver, Catalog, Config, Context, Dataset, Error, Lectio, MemoryStore, ReferenceParser, Store, VerseQuery,
    month_days,
};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Instant;

const DEFAULT_TRANSLATION: &str = "kjv";

fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    setup_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(if err.is_user_error() { 2 } else { 1 });
    }
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("LECTIO_LOG").unwrap_or_else(|_| {
        if verbose { EnvFilter::new("lectio=debug") } else { EnvFilter::new("lectio=info") }
    });
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

enum Command {
    Parse(String),
    Resolve(String),
    Compile(String),
    /// `None` tops up the rolling buffer instead of one month.
    Schedule(Option<(i32, u32)>),
}

struct CliConfig {
    command: Command,
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    translation: Option<String>,
    reference_time: Option<NaiveDateTime>,
    color: bool,
    verbose: bool,
}

fn run(cli: &CliConfig) -> lectio::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let store = MemoryStore::new();
    if let Some(path) = &cli.data {
        let catalog = Catalog::canonical();
        let resolver = BookResolver::with_strategies(&catalog, config.resolver.strategies());
        let parser = ReferenceParser::new(&catalog, &resolver).with_reversed_ranges(config.parser.reversed_ranges);
        Dataset::load(path)?.load_into(&store, &catalog, &parser)?;
    }

    let lectio = Lectio::new(store, config);
    let ctx = match cli.reference_time {
        Some(reference_time) => Context { reference_time },
        None => Context::default(),
    };
    let translation = cli.translation.as_deref();
    let started = Instant::now();

    match &cli.command {
        Command::Parse(input) => {
            let range = lectio.parse_reference(input, translation)?;
            let label = match translation {
                Some(slug) => Some(range.label(lectio.translation(slug)?)),
                None => None,
            };
            debug_report::print_parse(input, &range, label.as_deref(), started.elapsed(), cli.color);
        }
        Command::Resolve(input) => {
            let slug = lectio.resolve_book(input, translation)?;
            let book = lectio.catalog().get(slug).ok_or_else(|| Error::BookNotFound {
                name: input.clone(),
                translation: translation.unwrap_or_default().to_string(),
            })?;
            debug_report::print_resolve(input, book, started.elapsed(), cli.color);
        }
        Command::Compile(input) => {
            let range = lectio.parse_reference(input, translation)?;
            let predicate = lectio.compile_range(&range, translation.unwrap_or(DEFAULT_TRANSLATION));
            let sql = VerseQuery::new(predicate).with_limit(lectio.config().query.limit()).to_sql();
            debug_report::print_compile(input, &range, &sql, started.elapsed(), cli.color);
        }
        Command::Schedule(month) => {
            let reports = match month {
                Some((year, month)) => vec![lectio.schedule_month(*year, *month, &ctx)?],
                None => lectio.ensure_buffer(&ctx)?,
            };
            let mut days = Vec::new();
            for report in &reports {
                let dates = month_days(report.year, report.month)?;
                let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
                    continue;
                };
                for day in lectio.store().scheduled_days(first, last)? {
                    days.push((day.date, lectio.scheduled_range(day.date)?));
                }
            }
            debug_report::print_schedule(ctx.today(), &reports, &days, cli.color);
        }
    }
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut config = None;
    let mut data = None;
    let mut translation = None;
    let mut reference_time = None;
    let mut color = io::stdout().is_terminal();
    let mut verbose = false;
    let mut words: Vec<String> = Vec::new();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("lectio {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "-v" | "--verbose" => verbose = true,
            "--config" | "--data" | "--translation" | "-t" | "--today" => {
                let value = args.next().ok_or_else(|| format!("error: {arg} expects a value"))?;
                apply_option(&arg, &value, &mut config, &mut data, &mut translation, &mut reference_time)?;
            }
            "--" => {
                words.extend(args.by_ref());
                break;
            }
            _ if arg.starts_with("--") && arg.contains('=') => {
                let (name, value) = arg.split_once('=').unwrap_or((arg.as_str(), ""));
                apply_option(name, value, &mut config, &mut data, &mut translation, &mut reference_time)?;
            }
            _ if arg.starts_with('-') && words.is_empty() => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => words.push(arg),
        }
    }

    let mut words = words.into_iter();
    let command = words.next().ok_or_else(|| format!("error: no command given\n\n{}", help_text()))?;
    let rest = words.collect::<Vec<_>>().join(" ");

    let command = match command.as_str() {
        "parse" => Command::Parse(input_or_stdin(rest)?),
        "resolve" => Command::Resolve(input_or_stdin(rest)?),
        "compile" => Command::Compile(input_or_stdin(rest)?),
        "schedule" if rest.trim().is_empty() => Command::Schedule(None),
        "schedule" => Command::Schedule(Some(parse_month(rest.trim())?)),
        other => return Err(format!("error: unknown command '{other}'\n\n{}", help_text())),
    };

    Ok(CliConfig { command, config, data, translation, reference_time, color, verbose })
}

fn apply_option(
    name: &str,
    value: &str,
    config: &mut Option<PathBuf>,
    data: &mut Option<PathBuf>,
    translation: &mut Option<String>,
    reference_time: &mut Option<NaiveDateTime>,
) -> Result<(), String> {
    match name {
        "--config" => *config = Some(PathBuf::from(value)),
        "--data" => *data = Some(PathBuf::from(value)),
        "--translation" | "-t" => *translation = Some(value.to_string()),
        "--today" => *reference_time = Some(parse_today(value)?),
        _ => return Err(format!("error: unknown option '{name}'")),
    }
    Ok(())
}

fn input_or_stdin(rest: String) -> Result<String, String> {
    let input = if rest.trim().is_empty() { read_stdin_input()? } else { rest };
    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }
    Ok(input.trim().to_string())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

/// `2025-03-01`, or anything `chrono-english` understands ("next friday", "1 March 2025").
fn parse_today(value: &str) -> Result<NaiveDateTime, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(Local::now().time()));
    }
    parse_date_string(value, Local::now(), Dialect::Uk)
        .map(|dt| dt.naive_local())
        .map_err(|err| format!("error: invalid --today '{value}': {err}"))
}

fn parse_month(value: &str) -> Result<(i32, u32), String> {
    let invalid = || format!("error: invalid month '{value}' (expected YYYY-MM)");
    let date = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
    Ok((date.year(), date.month()))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "lectio {version}

Scripture reference parser and daily verse scheduler.

Usage:
  lectio [OPTIONS] parse <reference...>
  lectio [OPTIONS] resolve <book name...>
  lectio [OPTIONS] compile <reference...>
  lectio [OPTIONS] schedule [YYYY-MM]

Commands:
  parse                      Parse a reference into a verse range.
  resolve                    Resolve a book name to its canonical slug.
  compile                    Parse a reference and print the SQL it compiles to.
  schedule                   Schedule one month, or top up the rolling buffer when
                             no month is given. Runs against --data in memory.

Options:
  --config <path>            TOML configuration file.
  --data <path>              TOML dataset (translations, verses, pool) to load.
  -t, --translation <slug>   Translation for localized book names and queries.
                             Default for compile: {default_translation}
  --today <date>             Reference date for scheduling, e.g. 2025-03-01 or
                             \"next monday\". Default: now.
  -v, --verbose              Debug logging (LECTIO_LOG overrides).
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Storage, configuration or scheduling error.
  2  Invalid arguments or an unparseable reference.
",
        version = env!("CARGO_PKG_VERSION"),
        default_translation = DEFAULT_TRANSLATION
    )
}
