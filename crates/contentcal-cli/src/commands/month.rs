use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use contentcal_core::filter::group_by_day;
use contentcal_core::{expand_month, summarize, Config, EventFilter, EventStatus, MonthGrid};

use super::{events_path, load_events, CliResult};

#[derive(Args)]
pub struct MonthArgs {
    /// Year, e.g. 2024
    year: i32,
    /// Month, 1-12
    #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,
    /// Events file (defaults to events.path from config)
    #[arg(long)]
    events: Option<PathBuf>,
    /// Only show these statuses
    #[arg(long)]
    status: Vec<EventStatus>,
    /// Only show these platforms
    #[arg(long)]
    platform: Vec<String>,
    /// Only show events carrying any of these tags
    #[arg(long)]
    tag: Vec<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

const WEEKDAYS: &str = "Mo Tu We Th Fr Sa Su";

pub fn run(args: MonthArgs) -> CliResult {
    let config = Config::load_or_default();
    let path = events_path(args.events, &config)?;
    let events = load_events(&path)?;

    let month0 = args.month - 1;
    let grid = MonthGrid::new(args.year, month0).ok_or("year out of range")?;
    let all = expand_month(&events, args.year, month0);

    let filter = EventFilter {
        status: args.status.into_iter().collect(),
        platform: args.platform.into_iter().collect(),
        tag: args.tag.into_iter().collect(),
    };
    let mut shown = filter.apply(&all);
    shown.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.title.cmp(&b.title)));
    let summary = summarize(shown.iter().copied());

    if args.json {
        let out = serde_json::json!({
            "year": args.year,
            "month": args.month,
            "instances": shown,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let by_day = group_by_day(shown.iter().copied());

    println!("{WEEKDAYS}");
    for week in 0..grid.weeks() {
        let cells: Vec<String> = (0..7)
            .map(|i| match grid.day_at(week * 7 + i) {
                Some(d) => {
                    let busy = NaiveDate::from_ymd_opt(args.year, args.month, d)
                        .is_some_and(|date| by_day.contains_key(&date));
                    format!("{d:>2}{}", if busy { "*" } else { " " })
                }
                None => "   ".to_string(),
            })
            .collect();
        println!("{}", cells.concat().trim_end());
    }

    println!();
    for (date, items) in &by_day {
        for inst in items {
            let status = inst.status.map_or("-", |s| s.as_str());
            let mut line = format!("{date}  {} [{status}]", inst.title);
            if let Some(p) = &inst.platform {
                line.push_str(&format!(" @{p}"));
            }
            for t in &inst.tags {
                line.push_str(&format!(" #{t}"));
            }
            if inst.is_deadline {
                line.push_str(" (deadline)");
            }
            println!("{line}");
        }
    }
    if by_day.is_empty() {
        println!("no events");
    }

    println!();
    for (label, counts) in [
        ("status", &summary.status),
        ("platform", &summary.platform),
        ("tags", &summary.tags),
    ] {
        if counts.is_empty() {
            continue;
        }
        let parts: Vec<String> = counts.iter().map(|(k, n)| format!("{k} {n}")).collect();
        println!("{label}: {}", parts.join(", "));
    }
    Ok(())
}
