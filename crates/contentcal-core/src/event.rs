//! Event and instance types for the recurrence engine.
//!
//! Events come from an external JSON source and are read best-effort: date
//! fields stay as strings so that a malformed date only disqualifies the
//! field, not the whole event list. Fields the calendar does not know about
//! are kept in `extra` and copied onto every instance.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::validate::Problem;

/// Workflow status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Planned,
    Productive,
    Done,
}

impl EventStatus {
    pub const ALL: [EventStatus; 3] = [Self::Planned, Self::Productive, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Productive => "productive",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "productive" => Ok(Self::Productive),
            "done" => Ok(Self::Done),
            other => Err(format!("unknown status '{other}' (expected planned|productive|done)")),
        }
    }
}

/// Recurrence as it appears on an event: a compact `rrule` string, the
/// structured fields, or both (the rule string wins key by key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub interval: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_codes",
        skip_serializing_if = "Option::is_none"
    )]
    pub byweekday: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

impl Recurrence {
    /// Whether this carries a schedule at all. Without a rule string or a
    /// frequency the event is treated as a plain date range.
    pub fn is_active(&self) -> bool {
        non_blank(self.rrule.as_deref()) || non_blank(self.freq.as_deref())
    }
}

/// A calendar event as read from the events file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Fields not modelled above, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    pub fn spanning(mut self, start: &str, end: &str) -> Self {
        self.start_date = Some(start.to_string());
        self.end_date = Some(end.to_string());
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn with_deadline(mut self, date: &str) -> Self {
        self.deadline = Some(date.to_string());
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// First day the event occupies: `start_date`, else `date`.
    pub fn base_start(&self) -> Option<&str> {
        first_non_blank(self.start_date.as_deref(), self.date.as_deref())
    }

    /// Last day of a plain range: `end_date`, else `date`.
    pub fn base_end(&self) -> Option<&str> {
        first_non_blank(self.end_date.as_deref(), self.date.as_deref())
    }

    /// The recurrence, if it actually describes a schedule.
    pub fn active_recurrence(&self) -> Option<&Recurrence> {
        self.recurrence.as_ref().filter(|r| r.is_active())
    }
}

/// One concrete calendar day of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInstance {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Set when the instance marks the event's deadline rather than an
    /// occurrence.
    #[serde(rename = "_deadline", default, skip_serializing_if = "is_false")]
    pub is_deadline: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventInstance {
    pub fn occurrence(event: &Event, date: NaiveDate) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            date,
            deadline: event.deadline.clone(),
            status: event.status,
            platform: event.platform.clone(),
            tags: event.tags.clone(),
            is_deadline: false,
            extra: event.extra.clone(),
        }
    }

    /// Deadline marker; status falls back to `planned`.
    pub fn deadline_marker(event: &Event, date: NaiveDate) -> Self {
        Self {
            status: Some(event.status.unwrap_or(EventStatus::Planned)),
            is_deadline: true,
            ..Self::occurrence(event, date)
        }
    }

    /// The `YYYY-MM-DD` key used to place the instance into a cell.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Read events from arbitrary JSON, keeping what can be read.
///
/// Entries that are not objects are reported and left out. Inside an
/// object a field of the wrong shape is reported and dropped while the
/// event itself is kept: an unknown status reads as no status, a numeric
/// id or title becomes its string form, a tag string is split on `,`.
pub fn events_from_json(data: &Value) -> (Vec<Event>, Vec<Problem>) {
    let Some(items) = data.as_array() else {
        return (
            Vec::new(),
            vec![Problem::new("/", "events file must be an array")],
        );
    };

    let mut events = Vec::with_capacity(items.len());
    let mut problems = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let path = format!("/[{idx}]");
        let Some(obj) = item.as_object() else {
            problems.push(Problem::new(path, "event must be an object"));
            continue;
        };
        let mut report = |msg: String| problems.push(Problem::new(path.clone(), msg));
        let obj = sanitize_event(obj.clone(), &mut report);
        match Event::deserialize(Value::Object(obj)) {
            Ok(ev) => events.push(ev),
            Err(e) => report(e.to_string()),
        }
    }
    (events, problems)
}

/// Coerce or drop fields so that the object deserializes into an [`Event`].
fn sanitize_event(
    mut obj: Map<String, Value>,
    report: &mut impl FnMut(String),
) -> Map<String, Value> {
    for field in ["id", "title"] {
        match obj.remove(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => {
                obj.insert(field.to_string(), Value::String(s));
            }
            Some(v @ (Value::Number(_) | Value::Bool(_))) => {
                obj.insert(field.to_string(), Value::String(v.to_string()));
            }
            Some(_) => report(format!("{field} must be a string, ignored")),
        }
    }

    for field in ["date", "start_date", "end_date", "deadline", "platform"] {
        keep_string(&mut obj, field, field, report);
    }

    match obj.remove("status") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) if s.trim().is_empty() => {}
        Some(Value::String(s)) => match s.parse::<EventStatus>() {
            Ok(status) => {
                obj.insert("status".into(), Value::String(status.as_str().into()));
            }
            Err(e) => report(format!("{e}, status ignored")),
        },
        Some(_) => report("status must be a string, ignored".to_string()),
    }

    match obj.remove("tags") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            let tags: Vec<Value> = items
                .into_iter()
                .filter_map(|t| match t {
                    Value::String(s) => Some(Value::String(s)),
                    Value::Number(n) => Some(Value::String(n.to_string())),
                    _ => None,
                })
                .collect();
            obj.insert("tags".into(), Value::Array(tags));
        }
        Some(Value::String(s)) => {
            let tags = s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| Value::String(t.to_string()))
                .collect();
            obj.insert("tags".into(), Value::Array(tags));
        }
        Some(_) => report("tags must be an array, ignored".to_string()),
    }

    match obj.remove("recurrence") {
        None | Some(Value::Null) => {}
        Some(Value::Object(mut rec)) => {
            for (field, label) in [
                ("rrule", "recurrence.rrule"),
                ("freq", "recurrence.freq"),
                ("until", "recurrence.until"),
            ] {
                keep_string(&mut rec, field, label, report);
            }
            obj.insert("recurrence".into(), Value::Object(rec));
        }
        Some(_) => report("recurrence must be an object, ignored".to_string()),
    }

    obj
}

/// Keep `field` only when it is a string (or null).
fn keep_string(
    obj: &mut Map<String, Value>,
    field: &str,
    label: &str,
    report: &mut impl FnMut(String),
) {
    if obj.get(field).is_some_and(|v| !v.is_string() && !v.is_null()) {
        obj.remove(field);
        report(format!("{label} must be a string, ignored"));
    }
}

/// Parse a calendar day.
///
/// Accepts `YYYY-MM-DD`, the compact `YYYYMMDD` form and compact
/// date-times such as `20240331T000000Z` (only the date part is used).
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    let compact = s.get(..8)?;
    if !compact.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let rest = &s[8..];
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with('t')) {
        return None;
    }
    NaiveDate::parse_from_str(compact, "%Y%m%d").ok()
}

fn non_blank(s: Option<&str>) -> bool {
    s.is_some_and(|s| !s.trim().is_empty())
}

fn first_non_blank<'a>(a: Option<&'a str>, b: Option<&'a str>) -> Option<&'a str> {
    a.filter(|s| !s.trim().is_empty())
        .or_else(|| b.filter(|s| !s.trim().is_empty()))
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Numbers or numeric strings; anything else reads as absent.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Weekday codes as a list, or as one string separated by `,` or `|`.
fn lenient_codes<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        Some(Value::String(s)) => Some(
            s.split([',', '|'])
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        _ => None,
    })
}
