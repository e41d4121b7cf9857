//! Per-day planning state for one calendar year.
//!
//! A [`CalendarState`] is the document the planner snapshots into its undo
//! history: every day of the year may carry a [`DayItem`] with a main title,
//! extra titles, a description, free-form tags and todos. A day is "used"
//! when any of those hold content, "free" otherwise.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, ValidationError};
use crate::recurrence::MonthWindow;
use crate::storage::TimeFormat;
use crate::theme::{Palette, Theme};

/// Default number of entries returned by [`CalendarState::upcoming_todos`].
pub const DEFAULT_UPCOMING_LIMIT: usize = 12;

/// Entries kept in the activity log.
pub const LOG_CAPACITY: usize = 250;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl DayItem {
    /// Whether the day holds any content.
    pub fn is_used(&self) -> bool {
        let filled = |s: &str| !s.trim().is_empty();
        filled(&self.title)
            || filled(&self.desc)
            || filled(&self.tags)
            || self.titles.iter().any(|t| filled(t))
            || !self.todos.is_empty()
    }

    /// Main title and extra titles, trimmed and lowercased, blanks dropped.
    pub fn title_keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.title.as_str())
            .chain(self.titles.iter().map(String::as_str))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    pub fn open_todos(&self) -> usize {
        self.todos.iter().filter(|t| !t.done).count()
    }
}

/// Free/used day counts of one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthStats {
    pub free: u32,
    pub used: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarState {
    pub year: i32,
    #[serde(default)]
    pub items: BTreeMap<NaiveDate, DayItem>,
    /// Newest first.
    #[serde(default)]
    pub log: Vec<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(
        default = "default_font_size",
        rename = "fontsize",
        deserialize_with = "lenient_font_size"
    )]
    pub font_size: u32,
    #[serde(default, deserialize_with = "lenient_palette")]
    pub palette: Palette,
}

fn default_font_size() -> u32 {
    16
}

/// Accepts `16` as well as `"16"`.
fn lenient_font_size<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u32, D::Error> {
    let v = serde_json::Value::deserialize(d)?;
    Ok(match v {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .unwrap_or_else(default_font_size))
}

fn lenient_palette<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Palette, D::Error> {
    let s = String::deserialize(d)?;
    Ok(Palette::from_name(&s))
}

impl CalendarState {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            items: BTreeMap::new(),
            log: Vec::new(),
            theme: Theme::default(),
            font_size: default_font_size(),
            palette: Palette::default(),
        }
    }

    // ── Days ───────────────────────────────────────────────────────────

    pub fn item(&self, date: NaiveDate) -> Option<&DayItem> {
        self.items.get(&date)
    }

    /// Mutable access to a day, creating an empty item when missing.
    pub fn item_mut(&mut self, date: NaiveDate) -> &mut DayItem {
        self.items.entry(date).or_default()
    }

    pub fn is_used(&self, date: NaiveDate) -> bool {
        self.item(date).is_some_and(DayItem::is_used)
    }

    /// Remove a day's content. Returns whether anything was there.
    pub fn clear_day(&mut self, date: NaiveDate) -> bool {
        self.items.remove(&date).is_some()
    }

    /// Mark a todo done or open again.
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfBounds`] when the day has no todo at
    /// `index`.
    pub fn set_todo_done(&mut self, date: NaiveDate, index: usize, done: bool) -> Result<()> {
        let todos = self.items.get_mut(&date).map(|it| &mut it.todos);
        let len = todos.as_ref().map_or(0, |t| t.len());
        match todos.and_then(|t| t.get_mut(index)) {
            Some(todo) => {
                todo.done = done;
                Ok(())
            }
            None => Err(ValidationError::OutOfBounds {
                collection: "todos".into(),
                index,
                len,
            }
            .into()),
        }
    }

    /// Remove a todo, returning it.
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfBounds`] when the day has no todo at
    /// `index`.
    pub fn remove_todo(&mut self, date: NaiveDate, index: usize) -> Result<Todo> {
        let len = self.item(date).map_or(0, |it| it.todos.len());
        if index >= len {
            return Err(ValidationError::OutOfBounds {
                collection: "todos".into(),
                index,
                len,
            }
            .into());
        }
        Ok(self.item_mut(date).todos.remove(index))
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Every day of the state's year, in order.
    pub fn all_days(&self) -> Vec<NaiveDate> {
        (0..12)
            .filter_map(|m| MonthWindow::new(self.year, m))
            .flat_map(|w| w.days().collect::<Vec<_>>())
            .collect()
    }

    fn month_days(&self, month0: u32) -> Vec<NaiveDate> {
        MonthWindow::new(self.year, month0)
            .map(|w| w.days().collect())
            .unwrap_or_default()
    }

    pub fn month_stats(&self, month0: u32) -> MonthStats {
        let mut stats = MonthStats::default();
        for d in self.month_days(month0) {
            if self.is_used(d) {
                stats.used += 1;
            } else {
                stats.free += 1;
            }
        }
        stats
    }

    pub fn open_days(&self, month0: u32) -> Vec<NaiveDate> {
        self.month_days(month0)
            .into_iter()
            .filter(|d| !self.is_used(*d))
            .collect()
    }

    /// First free day of the year on or after `from`.
    pub fn next_free_day(&self, from: NaiveDate) -> Option<NaiveDate> {
        self.all_days()
            .into_iter()
            .find(|d| *d >= from && !self.is_used(*d))
    }

    /// Zero-based months in display order. In the current year the list
    /// starts at the current month and wraps around.
    pub fn month_order(&self, today: NaiveDate) -> Vec<u32> {
        let start = if self.year == today.year() {
            today.month0()
        } else {
            0
        };
        (0..12).map(|i| (start + i) % 12).collect()
    }

    /// Open todos on or after `today`, by date, at most `limit`.
    pub fn upcoming_todos(&self, today: NaiveDate, limit: usize) -> Vec<(NaiveDate, &str)> {
        self.items
            .range(today..)
            .flat_map(|(d, it)| {
                it.todos
                    .iter()
                    .filter(|t| !t.done)
                    .map(move |t| (*d, t.text.as_str()))
            })
            .take(limit)
            .collect()
    }

    // ── Duplicates ─────────────────────────────────────────────────────

    /// Normalized title to the dates it appears on. A title used twice on
    /// the same day lists that day twice.
    pub fn collect_titles(&self) -> BTreeMap<String, Vec<NaiveDate>> {
        let mut map: BTreeMap<String, Vec<NaiveDate>> = BTreeMap::new();
        for (d, it) in &self.items {
            for key in it.title_keys() {
                map.entry(key).or_default().push(*d);
            }
        }
        map
    }

    /// Titles that appear more than once.
    pub fn duplicates(&self) -> Vec<(String, Vec<NaiveDate>)> {
        self.collect_titles()
            .into_iter()
            .filter(|(_, dates)| dates.len() > 1)
            .collect()
    }

    /// Whether any title of `date` also appears elsewhere.
    pub fn has_duplicates(&self, date: NaiveDate) -> bool {
        let Some(item) = self.item(date) else {
            return false;
        };
        let all = self.collect_titles();
        item.title_keys()
            .any(|k| all.get(&k).is_some_and(|dates| dates.len() > 1))
    }

    /// One `title -> date, date` line per duplicate.
    pub fn duplicates_report(&self) -> String {
        self.duplicates()
            .iter()
            .map(|(title, dates)| {
                let dates: Vec<String> = dates.iter().map(ToString::to_string).collect();
                format!("{title} -> {}", dates.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ── Exports ────────────────────────────────────────────────────────

    /// Whole state as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// All free days of the year, one per line.
    pub fn open_days_text(&self) -> String {
        self.all_days()
            .into_iter()
            .filter(|d| !self.is_used(*d))
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One row per day of the month:
    /// `date | title | [extra; titles] | desc | tags | todos open/total`.
    pub fn month_rows_text(&self, month0: u32) -> String {
        let empty = DayItem::default();
        self.month_days(month0)
            .into_iter()
            .map(|d| {
                let it = self.item(d).unwrap_or(&empty);
                format!(
                    "{d} | {} | [{}] | {} | {} | todos {}/{}",
                    it.title,
                    it.titles.join("; "),
                    it.desc,
                    it.tags,
                    it.open_todos(),
                    it.todos.len()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ── Log ────────────────────────────────────────────────────────────

    /// Prepend a timestamped entry, keeping at most [`LOG_CAPACITY`].
    pub fn log_event(&mut self, msg: &str, at: NaiveDateTime, format: TimeFormat) {
        self.log
            .insert(0, format!("{} - {msg}", at.format(format.pattern())));
        self.log.truncate(LOG_CAPACITY);
    }

    pub fn recent_log(&self, n: usize) -> &[String] {
        &self.log[..n.min(self.log.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn titled(title: &str) -> DayItem {
        DayItem {
            title: title.into(),
            ..DayItem::default()
        }
    }

    #[test]
    fn used_detection() {
        assert!(!DayItem::default().is_used());
        assert!(!titled("   ").is_used());
        assert!(titled("Post").is_used());
        let extra = DayItem {
            titles: vec!["".into(), " x ".into()],
            ..DayItem::default()
        };
        assert!(extra.is_used());
        let todo_only = DayItem {
            todos: vec![Todo::default()],
            ..DayItem::default()
        };
        assert!(todo_only.is_used());
    }

    #[test]
    fn month_stats_and_open_days() {
        let mut s = CalendarState::new(2024);
        *s.item_mut(day(2024, 2, 1)) = titled("a");
        *s.item_mut(day(2024, 2, 29)) = titled("b");
        s.item_mut(day(2024, 2, 2)); // empty item stays free
        let stats = s.month_stats(1);
        assert_eq!(stats, MonthStats { free: 27, used: 2 });
        let open = s.open_days(1);
        assert_eq!(open.len(), 27);
        assert_eq!(open[0], day(2024, 2, 2));
        assert_eq!(s.all_days().len(), 366);
    }

    #[test]
    fn next_free_skips_used_days() {
        let mut s = CalendarState::new(2024);
        *s.item_mut(day(2024, 5, 1)) = titled("a");
        *s.item_mut(day(2024, 5, 2)) = titled("b");
        assert_eq!(s.next_free_day(day(2024, 5, 1)), Some(day(2024, 5, 3)));
        assert_eq!(s.next_free_day(day(2023, 1, 1)), Some(day(2024, 1, 1)));
        *s.item_mut(day(2024, 12, 31)) = titled("z");
        assert_eq!(s.next_free_day(day(2024, 12, 31)), None);
    }

    #[test]
    fn month_order_rotates_in_current_year() {
        let s = CalendarState::new(2024);
        let order = s.month_order(day(2024, 10, 5));
        assert_eq!(order[0], 9);
        assert_eq!(order[3], 0);
        assert_eq!(s.month_order(day(2025, 10, 5)), (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn upcoming_todos_ordered_and_limited() {
        let mut s = CalendarState::new(2024);
        let todo = |text: &str, done| Todo {
            text: text.into(),
            done,
        };
        s.item_mut(day(2024, 3, 1)).todos = vec![todo("past", false)];
        s.item_mut(day(2024, 3, 9)).todos = vec![todo("later", false)];
        s.item_mut(day(2024, 3, 5)).todos = vec![todo("done", true), todo("soon", false)];
        let up = s.upcoming_todos(day(2024, 3, 5), DEFAULT_UPCOMING_LIMIT);
        assert_eq!(up, vec![(day(2024, 3, 5), "soon"), (day(2024, 3, 9), "later")]);
        assert_eq!(s.upcoming_todos(day(2024, 3, 5), 1).len(), 1);
    }

    #[test]
    fn duplicate_titles() {
        let mut s = CalendarState::new(2024);
        *s.item_mut(day(2024, 1, 1)) = titled("Launch ");
        s.item_mut(day(2024, 1, 2)).titles = vec!["launch".into()];
        *s.item_mut(day(2024, 1, 3)) = titled("unique");
        let dups = s.duplicates();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].0, "launch");
        assert!(s.has_duplicates(day(2024, 1, 2)));
        assert!(!s.has_duplicates(day(2024, 1, 3)));
        assert!(!s.has_duplicates(day(2024, 1, 4)));
        assert_eq!(s.duplicates_report(), "launch -> 2024-01-01, 2024-01-02");
    }

    #[test]
    fn month_rows_format() {
        let mut s = CalendarState::new(2024);
        *s.item_mut(day(2024, 2, 1)) = DayItem {
            title: "Post".into(),
            titles: vec!["a".into(), "b".into()],
            desc: "d".into(),
            tags: "t".into(),
            todos: vec![
                Todo {
                    text: "x".into(),
                    done: true,
                },
                Todo {
                    text: "y".into(),
                    done: false,
                },
            ],
        };
        let text = s.month_rows_text(1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 29);
        assert_eq!(lines[0], "2024-02-01 | Post | [a; b] | d | t | todos 1/2");
        assert_eq!(lines[1], "2024-02-02 |  | [] |  |  | todos 0/0");
    }

    #[test]
    fn todo_edits_check_bounds() {
        let mut s = CalendarState::new(2024);
        let d = day(2024, 6, 1);
        s.item_mut(d).todos.push(Todo {
            text: "a".into(),
            done: false,
        });
        s.set_todo_done(d, 0, true).unwrap();
        assert!(s.item(d).unwrap().todos[0].done);
        assert!(s.set_todo_done(d, 3, true).is_err());
        assert!(s.set_todo_done(day(2024, 6, 2), 0, true).is_err());
        assert_eq!(s.remove_todo(d, 0).unwrap().text, "a");
        assert!(s.remove_todo(d, 0).is_err());
    }

    #[test]
    fn log_is_newest_first_and_bounded() {
        let mut s = CalendarState::new(2024);
        let at = day(2024, 1, 1).and_hms_opt(13, 5, 0).unwrap();
        for i in 0..(LOG_CAPACITY + 5) {
            s.log_event(&format!("e{i}"), at, TimeFormat::H24);
        }
        assert_eq!(s.log.len(), LOG_CAPACITY);
        assert!(s.log[0].ends_with(&format!("e{}", LOG_CAPACITY + 4)));
        assert_eq!(s.recent_log(2).len(), 2);
        assert_eq!(s.recent_log(1000).len(), LOG_CAPACITY);

        let mut s = CalendarState::new(2024);
        s.log_event("x", at, TimeFormat::H12);
        assert_eq!(s.log[0], "2024-01-01 01:05:00 PM - x");
    }

    #[test]
    fn snapshot_json_is_lenient() {
        let raw = r#"{"year":2024,"items":{"2024-01-05":{"title":"a"}},
                      "theme":"dunkel","fontsize":"18","palette":"teal"}"#;
        let s: CalendarState = serde_json::from_str(raw).unwrap();
        assert_eq!(s.theme, Theme::Dark);
        assert_eq!(s.font_size, 18);
        assert_eq!(s.palette, Palette::Blue);
        assert!(s.is_used(day(2024, 1, 5)));

        let back: CalendarState = serde_json::from_str(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
