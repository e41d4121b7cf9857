use chrono::NaiveDate;
use clap::Subcommand;
use contentcal_core::calendar::DEFAULT_UPCOMING_LIMIT;
use contentcal_core::Config;

use super::{month0, open_planner, parse_date, today, CliResult};

#[derive(Subcommand)]
pub enum ReportAction {
    /// Free and used day counts of a month
    Stats {
        /// Month, 1-12 (defaults to the current one)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Free days of a month
    OpenDays {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// First free day on or after a date
    NextFree {
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
    },
    /// Open todos from today on
    Upcoming {
        #[arg(long, default_value_t = DEFAULT_UPCOMING_LIMIT)]
        limit: usize,
    },
    /// Titles used on more than one day
    Dupes,
    /// Recent activity
    Log {
        #[arg(default_value_t = 20)]
        n: usize,
    },
    /// Whole document as JSON
    ExportJson,
    /// Free days of the whole year, one per line
    ExportOpen,
    /// One row per day of a month
    ExportMonth {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Storage health as JSON
    Storage,
}

pub fn run(action: ReportAction) -> CliResult {
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;

    match action {
        ReportAction::Stats { month } => {
            let m = month0(month, &planner);
            let stats = planner.state().month_stats(m);
            println!("free: {}, used: {}", stats.free, stats.used);
        }
        ReportAction::OpenDays { month } => {
            let m = month0(month, &planner);
            for d in planner.state().open_days(m) {
                println!("{d}");
            }
        }
        ReportAction::NextFree { from } => {
            let from = from.unwrap_or_else(today);
            match planner.state().next_free_day(from) {
                Some(d) => println!("{d}"),
                None => println!("no free day left in {}", planner.state().year),
            }
        }
        ReportAction::Upcoming { limit } => {
            let todos = planner.state().upcoming_todos(today(), limit);
            if todos.is_empty() {
                println!("no open todos");
            }
            for (d, text) in todos {
                println!("{d}  {text}");
            }
        }
        ReportAction::Dupes => {
            let report = planner.state().duplicates_report();
            if report.is_empty() {
                println!("no duplicates");
            } else {
                println!("{report}");
            }
        }
        ReportAction::Log { n } => {
            for line in planner.state().recent_log(n) {
                println!("{line}");
            }
        }
        ReportAction::ExportJson => println!("{}", planner.state().to_json()?),
        ReportAction::ExportOpen => println!("{}", planner.state().open_days_text()),
        ReportAction::ExportMonth { month } => {
            let m = month0(month, &planner);
            println!("{}", planner.state().month_rows_text(m));
        }
        ReportAction::Storage => {
            let report = planner.storage_report();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
