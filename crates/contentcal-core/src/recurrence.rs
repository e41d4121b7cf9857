//! Recurrence expansion: events in, concrete per-day instances out.
//!
//! `expand_month` is the only entry point the rendering side needs. For each
//! event it emits:
//!
//! - one instance per day of a plain `date` / `start_date..=end_date` range,
//! - or one instance per step of its recurrence rule,
//! - plus a separate deadline marker when `deadline` falls in the month.
//!
//! Only days inside the requested month are returned.
//!
//! ## Rules
//!
//! The supported subset is `FREQ` (DAILY, WEEKLY, MONTHLY, YEARLY),
//! `INTERVAL`, `BYDAY` (weekly only), `COUNT` and `UNTIL`. Keys and values
//! are case-insensitive and unknown keys are ignored. `COUNT` counts every
//! step from the event's start, including steps outside the month. Without
//! `UNTIL` stepping stops 31 days after the end of the month.
//!
//! Monthly and yearly steps keep the start's day of month and roll over
//! when that day does not exist: a rule starting on Jan 31 lands on Mar 2
//! (leap year) for its February step, then on Mar 31. Each step is computed
//! from the start date, so a rolled-over step does not shift later ones.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::event::{parse_day, Event, EventInstance, Recurrence};

/// Days added past the month end when a rule has no `UNTIL`.
pub const DEFAULT_HORIZON_DAYS: u64 = 31;

const WEEKDAY_CODES: [(&str, Weekday); 7] = [
    ("MO", Weekday::Mon),
    ("TU", Weekday::Tue),
    ("WE", Weekday::Wed),
    ("TH", Weekday::Thu),
    ("FR", Weekday::Fri),
    ("SA", Weekday::Sat),
    ("SU", Weekday::Sun),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Map a two-letter code (`MO` .. `SU`, any case) to a weekday.
pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    let code = code.trim();
    WEEKDAY_CODES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, w)| *w)
}

/// Split a compact rule string into upper-cased `KEY -> VALUE` pairs.
///
/// Pairs without a key or a value are dropped.
pub fn parse_rrule(rule: &str) -> HashMap<String, String> {
    rule.split(';')
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            let (k, v) = (k.trim(), v.trim());
            if k.is_empty() || v.is_empty() {
                return None;
            }
            Some((k.to_ascii_uppercase(), v.to_ascii_uppercase()))
        })
        .collect()
}

/// A recurrence with defaults applied and every field parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// `None` when the frequency is missing or unknown; such a rule yields
    /// no occurrences.
    pub freq: Option<Frequency>,
    pub interval: u32,
    pub by_weekday: Vec<Weekday>,
    pub count: Option<u32>,
    pub until: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Resolve a recurrence. A non-blank rule string replaces the structured
    /// fields entirely, except that a structured `interval` still applies
    /// when the string carries none. Invalid values fall back to defaults.
    pub fn resolve(rec: &Recurrence) -> Self {
        let Some(rule) = rec.rrule.as_deref().filter(|r| !r.trim().is_empty()) else {
            return Self::from_fields(rec);
        };

        let parts = parse_rrule(rule);
        for key in parts.keys() {
            if !matches!(
                key.as_str(),
                "FREQ" | "INTERVAL" | "BYDAY" | "COUNT" | "UNTIL"
            ) {
                tracing::debug!(key = %key, "ignoring unsupported recurrence key");
            }
        }

        let interval = match parts.get("INTERVAL") {
            Some(v) => v.parse::<u32>().ok(),
            None => rec.interval,
        };

        Self {
            freq: parts.get("FREQ").and_then(|f| Frequency::parse(f)),
            interval: interval.filter(|n| *n >= 1).unwrap_or(1),
            by_weekday: parts
                .get("BYDAY")
                .map(|days| days.split(',').filter_map(weekday_from_code).collect())
                .unwrap_or_default(),
            count: parts
                .get("COUNT")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n >= 1),
            until: parts.get("UNTIL").and_then(|v| parse_day(v)),
        }
    }

    fn from_fields(rec: &Recurrence) -> Self {
        Self {
            freq: rec.freq.as_deref().and_then(Frequency::parse),
            interval: rec.interval.filter(|n| *n >= 1).unwrap_or(1),
            by_weekday: rec
                .byweekday
                .iter()
                .flatten()
                .filter_map(|c| weekday_from_code(c))
                .collect(),
            count: rec.count.filter(|n| *n >= 1),
            until: rec.until.as_deref().and_then(parse_day),
        }
    }
}

/// The days of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl MonthWindow {
    /// `month0` is zero-based (0 = January). Returns `None` when out of range.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
        let next = if month0 == 11 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month0 + 2, 1)?
        };
        Some(Self {
            first,
            last: next.pred_opt()?,
        })
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        d >= self.first && d <= self.last
    }

    pub fn days_in_month(&self) -> u32 {
        self.last.day()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first.iter_days().take_while(move |d| *d <= self.last)
    }
}

/// Expand events into the instances that fall in one month.
///
/// `month0` is zero-based. Events without any usable start date are
/// skipped. Instances of one event are in chronological order; there is no
/// order across events.
pub fn expand_month(events: &[Event], year: i32, month0: u32) -> Vec<EventInstance> {
    let Some(window) = MonthWindow::new(year, month0) else {
        tracing::debug!(year, month0, "month out of range, nothing to expand");
        return Vec::new();
    };
    let mut out = Vec::new();
    for ev in events {
        expand_event(ev, &window, &mut out);
    }
    out
}

/// Expand one event into `out`.
pub fn expand_event(ev: &Event, window: &MonthWindow, out: &mut Vec<EventInstance>) {
    let Some(start) = ev.base_start().and_then(parse_day) else {
        tracing::debug!(id = %ev.id, "event has no usable date, skipping");
        return;
    };

    match ev.active_recurrence() {
        None => {
            let end = ev.base_end().and_then(parse_day).unwrap_or(start);
            let from = start.max(window.first);
            let to = end.min(window.last);
            for d in from.iter_days().take_while(|d| *d <= to) {
                out.push(EventInstance::occurrence(ev, d));
            }
        }
        Some(rec) => {
            let rule = RecurrenceRule::resolve(rec);
            let mut emitter = Emitter {
                event: ev,
                window,
                count: rule.count,
                seen: 0,
                out: &mut *out,
            };
            step_rule(&rule, start, &mut emitter);
        }
    }

    if let Some(deadline) = ev.deadline.as_deref().and_then(parse_day) {
        if window.contains(deadline) {
            out.push(EventInstance::deadline_marker(ev, deadline));
        }
    }
}

/// Counts steps and keeps those that land in the window.
struct Emitter<'a> {
    event: &'a Event,
    window: &'a MonthWindow,
    count: Option<u32>,
    seen: u32,
    out: &'a mut Vec<EventInstance>,
}

impl Emitter<'_> {
    /// Record one step. Returns `true` once `COUNT` is exhausted.
    fn step(&mut self, d: NaiveDate) -> bool {
        if self.window.contains(d) {
            self.out.push(EventInstance::occurrence(self.event, d));
        }
        self.seen += 1;
        self.count.is_some_and(|c| self.seen >= c)
    }

    /// Steps before the window may be skipped when nothing is counted.
    fn counting(&self) -> bool {
        self.count.is_some()
    }
}

fn step_rule(rule: &RecurrenceRule, start: NaiveDate, em: &mut Emitter<'_>) {
    let window = *em.window;
    let horizon = rule.until.unwrap_or_else(|| {
        window
            .last
            .checked_add_days(Days::new(DEFAULT_HORIZON_DAYS))
            .unwrap_or(window.last)
    });
    // Nothing past the window can be emitted, so stepping ends there.
    let limit = horizon.min(window.last);

    let Some(freq) = rule.freq else {
        tracing::debug!(id = %em.event.id, "recurrence without a known FREQ, no occurrences");
        return;
    };

    match freq {
        Frequency::Daily => step_days(start, u64::from(rule.interval), limit, em),
        Frequency::Weekly if !rule.by_weekday.is_empty() => {
            step_weekdays(&rule.by_weekday, start, limit, em)
        }
        Frequency::Weekly => step_days(start, 7 * u64::from(rule.interval), limit, em),
        Frequency::Monthly => step_months(start, i64::from(rule.interval), limit, em),
        Frequency::Yearly => step_months(start, 12 * i64::from(rule.interval), limit, em),
    }
}

fn step_days(start: NaiveDate, step: u64, limit: NaiveDate, em: &mut Emitter<'_>) {
    let mut cur = start;
    if !em.counting() && cur < em.window.first {
        let gap = (em.window.first - cur).num_days() as u64;
        let skip = gap.div_ceil(step) * step;
        match cur.checked_add_days(Days::new(skip)) {
            Some(d) => cur = d,
            None => return,
        }
    }
    while cur <= limit {
        if em.step(cur) {
            return;
        }
        match cur.checked_add_days(Days::new(step)) {
            Some(next) => cur = next,
            None => return,
        }
    }
}

fn step_weekdays(days: &[Weekday], start: NaiveDate, limit: NaiveDate, em: &mut Emitter<'_>) {
    let mut offsets: Vec<u64> = days
        .iter()
        .map(|w| u64::from(w.num_days_from_monday()))
        .collect();
    offsets.sort_unstable();
    offsets.dedup();

    let start_week = monday_of(start);
    // One week of padding before the month, as the window is walked week by week.
    let padded = monday_of(em.window.first)
        .checked_sub_days(Days::new(7))
        .unwrap_or(em.window.first);
    let mut week = if em.counting() {
        start_week
    } else {
        start_week.max(padded)
    };

    while week <= limit {
        for off in &offsets {
            let Some(d) = week.checked_add_days(Days::new(*off)) else {
                return;
            };
            if d < start || d > limit {
                continue;
            }
            if em.step(d) {
                return;
            }
        }
        match week.checked_add_days(Days::new(7)) {
            Some(next) => week = next,
            None => return,
        }
    }
}

fn step_months(start: NaiveDate, months: i64, limit: NaiveDate, em: &mut Emitter<'_>) {
    let mut k: i64 = 0;
    while let Some(d) = add_months_rollover(start, k * months) {
        if d > limit || em.step(d) {
            return;
        }
        k += 1;
    }
}

/// Shift `base` by whole months, keeping its day of month and rolling over
/// into the next month when that day does not exist.
pub fn add_months_rollover(base: NaiveDate, months: i64) -> Option<NaiveDate> {
    let total = i64::from(base.year()) * 12 + i64::from(base.month0()) + months;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(base.day() - 1)))
}

fn monday_of(d: NaiveDate) -> NaiveDate {
    d.checked_sub_days(Days::new(u64::from(d.weekday().num_days_from_monday())))
        .unwrap_or(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventStatus;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dates(instances: &[EventInstance]) -> Vec<String> {
        instances.iter().map(|i| i.date_key()).collect()
    }

    fn rrule(rule: &str) -> Recurrence {
        Recurrence {
            rrule: Some(rule.to_string()),
            ..Recurrence::default()
        }
    }

    #[test]
    fn parse_rrule_is_case_insensitive_and_loose() {
        let parts = parse_rrule("freq=weekly;Interval=2;;BYDAY=mo,we;junk;X=");
        assert_eq!(parts.get("FREQ").map(String::as_str), Some("WEEKLY"));
        assert_eq!(parts.get("INTERVAL").map(String::as_str), Some("2"));
        assert_eq!(parts.get("BYDAY").map(String::as_str), Some("MO,WE"));
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn rule_string_replaces_structured_fields() {
        let rec = Recurrence {
            rrule: Some("FREQ=DAILY;COUNT=3".into()),
            freq: Some("MONTHLY".into()),
            interval: Some(4),
            byweekday: Some(vec!["MO".into()]),
            count: Some(10),
            until: Some("2024-01-31".into()),
        };
        let rule = RecurrenceRule::resolve(&rec);
        assert_eq!(rule.freq, Some(Frequency::Daily));
        assert_eq!(rule.count, Some(3));
        // Not in the rule string, so the structured interval applies.
        assert_eq!(rule.interval, 4);
        // The other structured fields are ignored.
        assert!(rule.by_weekday.is_empty());
        assert_eq!(rule.until, None);

        let no_freq = Recurrence {
            rrule: Some("COUNT=2".into()),
            freq: Some("WEEKLY".into()),
            ..Recurrence::default()
        };
        assert_eq!(RecurrenceRule::resolve(&no_freq).freq, None);
    }

    #[test]
    fn structured_fields_apply_without_rule_string() {
        let rec = Recurrence {
            rrule: Some("  ".into()),
            freq: Some("weekly".into()),
            byweekday: Some(vec!["TU".into(), "xx".into()]),
            count: Some(0),
            ..Recurrence::default()
        };
        let rule = RecurrenceRule::resolve(&rec);
        assert_eq!(rule.freq, Some(Frequency::Weekly));
        assert_eq!(rule.by_weekday, vec![Weekday::Tue]);
        assert_eq!(rule.count, None);
        assert_eq!(rule.interval, 1);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let rule = RecurrenceRule::resolve(&rrule("FREQ=DAILY;INTERVAL=abc;COUNT=0;UNTIL=never"));
        assert_eq!(rule.interval, 1);
        assert_eq!(rule.count, None);
        assert_eq!(rule.until, None);
    }

    #[test]
    fn month_window_bounds() {
        let feb = MonthWindow::new(2024, 1).unwrap();
        assert_eq!(feb.first, day("2024-02-01"));
        assert_eq!(feb.last, day("2024-02-29"));
        assert_eq!(feb.days_in_month(), 29);
        let dec = MonthWindow::new(2023, 11).unwrap();
        assert_eq!(dec.last, day("2023-12-31"));
        assert_eq!(dec.days().count(), 31);
        assert!(MonthWindow::new(2024, 12).is_none());
    }

    #[test]
    fn single_day_event_lands_in_its_month_only() {
        let events = vec![Event::new("a", "Post").on("2024-03-15")];
        assert_eq!(dates(&expand_month(&events, 2024, 2)), vec!["2024-03-15"]);
        assert!(expand_month(&events, 2024, 1).is_empty());
        assert!(expand_month(&events, 2024, 3).is_empty());
        assert!(expand_month(&events, 2023, 2).is_empty());
    }

    #[test]
    fn range_is_clipped_per_month() {
        let events = vec![Event::new("a", "Trip").spanning("2024-03-30", "2024-04-02")];
        assert_eq!(
            dates(&expand_month(&events, 2024, 2)),
            vec!["2024-03-30", "2024-03-31"]
        );
        assert_eq!(
            dates(&expand_month(&events, 2024, 3)),
            vec!["2024-04-01", "2024-04-02"]
        );
    }

    #[test]
    fn instances_drop_range_and_recurrence() {
        let mut ev = Event::new("a", "Trip").spanning("2024-03-30", "2024-03-31");
        ev.platform = Some("youtube".into());
        ev.tags = vec!["travel".into()];
        let inst = &expand_month(&[ev], 2024, 2)[0];
        let json = serde_json::to_value(inst).unwrap();
        assert!(json.get("start_date").is_none());
        assert!(json.get("end_date").is_none());
        assert!(json.get("recurrence").is_none());
        assert_eq!(json["platform"], "youtube");
    }

    #[test]
    fn start_without_end_is_a_single_day() {
        let mut ev = Event::new("a", "Half open");
        ev.start_date = Some("2024-03-05".into());
        assert_eq!(dates(&expand_month(&[ev], 2024, 2)), vec!["2024-03-05"]);
    }

    #[test]
    fn reversed_range_yields_nothing() {
        let ev = Event::new("a", "Backwards").spanning("2024-03-10", "2024-03-01");
        assert!(expand_month(&[ev], 2024, 2).is_empty());
    }

    #[test]
    fn event_without_dates_is_skipped() {
        let mut ev = Event::new("a", "Nowhere");
        ev.date = Some("not a date".into());
        let undated = Event::new("b", "Undated").with_deadline("2024-03-10");
        let out = expand_month(&[ev, undated], 2024, 2);
        assert!(out.is_empty());
    }

    #[test]
    fn weekly_byday_covers_month() {
        let ev = Event::new("w", "Standup").on("2024-01-01").with_recurrence(Recurrence {
            freq: Some("WEEKLY".into()),
            interval: Some(1),
            byweekday: Some(vec!["MO".into(), "WE".into()]),
            ..Recurrence::default()
        });
        let got = dates(&expand_month(&[ev], 2024, 2));
        assert_eq!(
            got,
            vec![
                "2024-03-04", "2024-03-06", "2024-03-11", "2024-03-13", "2024-03-18",
                "2024-03-20", "2024-03-25", "2024-03-27"
            ]
        );
    }

    #[test]
    fn weekly_byday_respects_start_date() {
        let ev = Event::new("w", "Standup")
            .on("2024-03-13")
            .with_recurrence(rrule("FREQ=WEEKLY;BYDAY=WE,MO"));
        let got = dates(&expand_month(&[ev], 2024, 2));
        assert_eq!(got, vec!["2024-03-13", "2024-03-18", "2024-03-20", "2024-03-25", "2024-03-27"]);
    }

    #[test]
    fn weekly_byday_count_is_global() {
        // Mondays from Feb 26: Feb 26, Mar 4, Mar 11 and then stop.
        let ev = Event::new("w", "Three Mondays")
            .on("2024-02-26")
            .with_recurrence(rrule("FREQ=WEEKLY;BYDAY=MO;COUNT=3"));
        assert_eq!(
            dates(&expand_month(&[ev.clone()], 2024, 2)),
            vec!["2024-03-04", "2024-03-11"]
        );
        assert_eq!(dates(&expand_month(&[ev], 2024, 1)), vec!["2024-02-26"]);
    }

    #[test]
    fn daily_interval_count_spans_months() {
        let ev = Event::new("d", "Every other day").on("2024-02-28").with_recurrence(Recurrence {
            freq: Some("DAILY".into()),
            interval: Some(2),
            count: Some(5),
            ..Recurrence::default()
        });
        assert_eq!(dates(&expand_month(&[ev.clone()], 2024, 1)), vec!["2024-02-28"]);
        assert_eq!(
            dates(&expand_month(&[ev.clone()], 2024, 2)),
            vec!["2024-03-01", "2024-03-03", "2024-03-05", "2024-03-07"]
        );
        assert!(expand_month(&[ev], 2024, 3).is_empty());
    }

    #[test]
    fn daily_without_count_skips_ahead() {
        let ev = Event::new("d", "Every third day")
            .on("2020-01-01")
            .with_recurrence(rrule("FREQ=DAILY;INTERVAL=3"));
        let got = expand_month(&[ev], 2024, 2);
        let first = got[0].date;
        assert_eq!((first - day("2020-01-01")).num_days() % 3, 0);
        assert!(got.windows(2).all(|w| (w[1].date - w[0].date).num_days() == 3));
        assert!(got.iter().all(|i| i.date.month() == 3));
    }

    #[test]
    fn until_is_inclusive() {
        let ev = Event::new("d", "Short run")
            .on("2024-03-28")
            .with_recurrence(rrule("FREQ=DAILY;UNTIL=20240330"));
        assert_eq!(
            dates(&expand_month(&[ev], 2024, 2)),
            vec!["2024-03-28", "2024-03-29", "2024-03-30"]
        );
    }

    #[test]
    fn plain_weekly_steps_from_start() {
        let ev = Event::new("w", "Fortnightly")
            .on("2024-02-20")
            .with_recurrence(rrule("FREQ=WEEKLY;INTERVAL=2"));
        assert_eq!(
            dates(&expand_month(&[ev], 2024, 2)),
            vec!["2024-03-05", "2024-03-19"]
        );
    }

    #[test]
    fn monthly_rolls_over_short_months() {
        let ev = Event::new("m", "Month end")
            .on("2024-01-31")
            .with_recurrence(rrule("FREQ=MONTHLY"));
        assert!(expand_month(&[ev.clone()], 2024, 1).is_empty());
        assert_eq!(
            dates(&expand_month(&[ev.clone()], 2024, 2)),
            vec!["2024-03-02", "2024-03-31"]
        );
        assert_eq!(dates(&expand_month(&[ev], 2024, 3)), Vec::<String>::new());
    }

    #[test]
    fn monthly_interval_and_count() {
        let ev = Event::new("m", "Quarterly")
            .on("2024-01-15")
            .with_recurrence(rrule("FREQ=MONTHLY;INTERVAL=3;COUNT=2"));
        assert_eq!(dates(&expand_month(&[ev.clone()], 2024, 3)), vec!["2024-04-15"]);
        assert!(expand_month(&[ev], 2024, 6).is_empty());
    }

    #[test]
    fn yearly_keeps_day_and_month() {
        let ev = Event::new("y", "Anniversary")
            .on("2020-02-29")
            .with_recurrence(Recurrence {
                freq: Some("yearly".into()),
                ..Recurrence::default()
            });
        assert_eq!(dates(&expand_month(&[ev.clone()], 2024, 1)), vec!["2024-02-29"]);
        assert!(expand_month(&[ev.clone()], 2023, 1).is_empty());
        assert_eq!(dates(&expand_month(&[ev], 2023, 2)), vec!["2023-03-01"]);
    }

    #[test]
    fn unknown_freq_yields_only_deadline() {
        let ev = Event::new("x", "Odd")
            .on("2024-03-01")
            .with_deadline("2024-03-09")
            .with_recurrence(rrule("FREQ=HOURLY"));
        let got = expand_month(&[ev], 2024, 2);
        assert_eq!(got.len(), 1);
        assert!(got[0].is_deadline);
    }

    #[test]
    fn deadline_is_additive() {
        let ev = Event::new("a", "Draft")
            .on("2024-03-05")
            .with_deadline("2024-03-20")
            .with_status(EventStatus::Productive);
        let got = expand_month(&[ev], 2024, 2);
        assert_eq!(dates(&got), vec!["2024-03-05", "2024-03-20"]);
        assert!(!got[0].is_deadline);
        assert!(got[1].is_deadline);
        assert_eq!(got[1].status, Some(EventStatus::Productive));
    }

    #[test]
    fn deadline_outside_month_is_dropped() {
        let ev = Event::new("a", "Draft").on("2024-03-05").with_deadline("2024-04-01");
        assert_eq!(expand_month(&[ev], 2024, 2).len(), 1);
    }

    #[test]
    fn add_months_rollover_cases() {
        assert_eq!(add_months_rollover(day("2024-01-31"), 1), Some(day("2024-03-02")));
        assert_eq!(add_months_rollover(day("2023-01-31"), 1), Some(day("2023-03-03")));
        assert_eq!(add_months_rollover(day("2024-01-31"), 2), Some(day("2024-03-31")));
        assert_eq!(add_months_rollover(day("2024-11-15"), 3), Some(day("2025-02-15")));
        assert_eq!(add_months_rollover(day("2024-03-15"), -3), Some(day("2023-12-15")));
    }

    #[test]
    fn weekday_codes() {
        assert_eq!(weekday_from_code("mo"), Some(Weekday::Mon));
        assert_eq!(weekday_from_code(" SU "), Some(Weekday::Sun));
        assert_eq!(weekday_from_code("XX"), None);
    }
}
