use chrono::NaiveDate;
use clap::Subcommand;
use contentcal_core::{Config, Todo};

use super::{open_planner, parse_date, print_status, CliResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Show a day's content as JSON
    Show {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Set title, description or tags of a day
    Set {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
    /// Add an extra title to a day
    AddTitle {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        title: String,
    },
    /// Add a todo to a day
    TodoAdd {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        text: String,
    },
    /// Mark a todo done (or open again with --reopen)
    TodoDone {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        /// Zero-based todo index
        index: usize,
        #[arg(long)]
        reopen: bool,
    },
    /// Remove a todo
    TodoRemove {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        /// Zero-based todo index
        index: usize,
    },
    /// Remove all content from a day
    Clear {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Switch the planned year
    Year { year: i32 },
}

pub fn run(action: DayAction) -> CliResult {
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;

    match action {
        DayAction::Show { date } => {
            let state = planner.state();
            let out = serde_json::json!({
                "date": date,
                "used": state.is_used(date),
                "duplicates": state.has_duplicates(date),
                "item": state.item(date),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }
        DayAction::Set {
            date,
            title,
            desc,
            tags,
        } => {
            if title.is_none() && desc.is_none() && tags.is_none() {
                return Err("nothing to set (use --title, --desc or --tags)".into());
            }
            planner.apply(&format!("saved: {date}"), |s| {
                let item = s.item_mut(date);
                if let Some(t) = title {
                    item.title = t;
                }
                if let Some(d) = desc {
                    item.desc = d;
                }
                if let Some(t) = tags {
                    item.tags = t;
                }
            })?;
        }
        DayAction::AddTitle { date, title } => {
            planner.apply(&format!("title added: {date}"), |s| {
                s.item_mut(date).titles.push(title)
            })?;
        }
        DayAction::TodoAdd { date, text } => {
            planner.apply(&format!("todo added: {date}"), |s| {
                s.item_mut(date).todos.push(Todo { text, done: false })
            })?;
        }
        DayAction::TodoDone {
            date,
            index,
            reopen,
        } => {
            let msg = if reopen { "todo reopened" } else { "todo done" };
            planner.try_apply(&format!("{msg}: {date}"), |s| {
                s.set_todo_done(date, index, !reopen)
            })?;
        }
        DayAction::TodoRemove { date, index } => {
            planner.try_apply(&format!("todo removed: {date}"), |s| {
                s.remove_todo(date, index).map(drop)
            })?;
        }
        DayAction::Clear { date } => {
            planner.apply(&format!("cleared: {date}"), |s| {
                s.clear_day(date);
            })?;
        }
        DayAction::Year { year } => {
            planner.apply(&format!("year: {year}"), |s| s.year = year)?;
        }
    }

    print_status(&planner);
    Ok(())
}
