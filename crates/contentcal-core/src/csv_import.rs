//! CSV import of events.
//!
//! The first non-blank row is the header. Recognized columns (case
//! insensitive, any order): `id, title, date, status, start_date, end_date,
//! deadline, platform, tags, rrule, freq, interval, byweekday`. Tags are
//! separated by `;`, weekday codes by `|`. Unknown columns are ignored.

use std::collections::HashMap;

use crate::error::Result;
use crate::event::{Event, EventStatus, Recurrence};
use crate::validate::Problem;

/// Split CSV text into rows. Quoted fields, doubled quotes and CRLF line
/// ends are handled; rows whose fields are all blank are dropped.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().any(|f| !f.trim().is_empty()) {
            rows.push(record.iter().map(str::to_string).collect());
        }
    }
    Ok(rows)
}

/// Turn parsed rows (header first) into events.
///
/// Rows whose `status` cannot be read are still imported, without a
/// status, and reported as problems at `/[n]` where `n` is the event's
/// index in the result.
pub fn rows_to_events(rows: &[Vec<String>]) -> (Vec<Event>, Vec<Problem>) {
    let Some((head, body)) = rows.split_first() else {
        return (Vec::new(), Vec::new());
    };
    let columns: HashMap<String, usize> = head
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .rev() // first occurrence of a duplicated header wins
        .collect();

    let mut events = Vec::with_capacity(body.len());
    let mut problems = Vec::new();

    for (n, row) in body.iter().enumerate() {
        let get = |key: &str| {
            columns
                .get(key)
                .and_then(|&i| row.get(i))
                .map_or("", |s| s.trim())
        };
        let opt = |key: &str| Some(get(key)).filter(|s| !s.is_empty()).map(str::to_string);

        let id = opt("id")
            .unwrap_or_else(|| format!("csv_{}_{}", n + 1, uuid::Uuid::new_v4().simple()));
        let mut ev = Event::new(id, get("title"));
        ev.date = Some(get("date").to_string());
        ev.start_date = opt("start_date");
        ev.end_date = opt("end_date");
        ev.deadline = opt("deadline");
        ev.platform = opt("platform");

        let status = get("status");
        ev.status = if status.is_empty() {
            Some(EventStatus::Planned)
        } else {
            match status.parse() {
                Ok(s) => Some(s),
                Err(_) => {
                    problems.push(Problem::new(
                        format!("/[{n}]"),
                        format!("unknown status '{status}'"),
                    ));
                    None
                }
            }
        };

        ev.tags = get("tags")
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let rrule = opt("rrule");
        let freq = opt("freq");
        let interval = opt("interval");
        let byday = opt("byweekday");
        if rrule.is_some() || freq.is_some() || interval.is_some() || byday.is_some() {
            ev.recurrence = Some(Recurrence {
                rrule,
                freq: freq.map(|f| f.to_uppercase()),
                interval: interval.map(|i| i.parse().ok().filter(|&n| n >= 1).unwrap_or(1)),
                byweekday: byday.map(|b| {
                    b.split('|')
                        .map(|s| s.trim().to_uppercase())
                        .filter(|s| !s.is_empty())
                        .collect()
                }),
                ..Recurrence::default()
            });
        }

        events.push(ev);
    }

    (events, problems)
}

/// Merge `imported` into `existing` by id: an imported event replaces the
/// existing one with the same id in place, new ids are appended in import
/// order.
pub fn merge_events(existing: Vec<Event>, imported: Vec<Event>) -> Vec<Event> {
    let mut out: Vec<Event> = Vec::with_capacity(existing.len() + imported.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for ev in existing.into_iter().chain(imported) {
        match index.get(&ev.id) {
            Some(&i) => out[i] = ev,
            None => {
                index.insert(ev.id.clone(), out.len());
                out.push(ev);
            }
        }
    }
    out
}
