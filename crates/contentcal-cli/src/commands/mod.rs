pub mod config;
pub mod csv;
pub mod day;
pub mod history;
pub mod maintenance;
pub mod month;
pub mod report;
pub mod theme;
pub mod validate;

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use contentcal_core::event::parse_day;
use contentcal_core::{
    events_from_json, Config, Event, KvBackend, Planner, Problem, SafeStore, SqliteKv,
    UnavailableKv,
};

pub type CliResult = Result<(), Box<dyn Error>>;

/// Planner over the durable store, or over memory only when the database
/// cannot be opened.
pub type CliPlanner = Planner<Box<dyn KvBackend>>;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn open_planner(config: &Config) -> Result<CliPlanner, Box<dyn Error>> {
    let backend: Box<dyn KvBackend> = match SqliteKv::open() {
        Ok(kv) => Box::new(kv),
        Err(e) => {
            tracing::warn!(error = %e, "database unavailable, running in memory");
            Box::new(UnavailableKv)
        }
    };
    let store = SafeStore::new(backend).with_status_callback(|s| eprintln!("warning: {s}"));
    Ok(Planner::open(store, config, today())?)
}

/// Print the planner's status line, if any.
pub fn print_status(planner: &CliPlanner) {
    if !planner.status().is_empty() {
        println!("{}", planner.status());
    }
}

/// `clap` value parser for calendar days.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_day(s).ok_or_else(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

/// The events file to use: the explicit one, else `events.path` from config.
pub fn events_path(explicit: Option<PathBuf>, config: &Config) -> Result<PathBuf, Box<dyn Error>> {
    explicit
        .or_else(|| config.events.path.as_ref().map(PathBuf::from))
        .ok_or_else(|| "no events file given (pass --events or set events.path)".into())
}

pub fn read_json(path: &Path) -> Result<serde_json::Value, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not valid JSON: {e}", path.display()))?;
    Ok(value)
}

/// Load events, warning about entries that could not be read.
pub fn load_events(path: &Path) -> Result<Vec<Event>, Box<dyn Error>> {
    let (events, problems) = events_from_json(&read_json(path)?);
    warn_problems(&problems);
    Ok(events)
}

pub fn warn_problems(problems: &[Problem]) {
    for p in problems {
        eprintln!("warning: {p}");
    }
}

/// Zero-based month for a 1-based argument, defaulting to the first month
/// in display order.
pub fn month0(arg: Option<u32>, planner: &CliPlanner) -> u32 {
    match arg {
        Some(m) => m - 1,
        None => planner.state().month_order(today())[0],
    }
}
