//! Lightweight schema check for event lists.
//!
//! The recurrence engine never validates; it reads what it can. This module
//! is the separate, stricter pass whose problems are shown to the user but
//! never block rendering.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::recurrence::weekday_from_code;

const DEFAULT_REQUIRED: [&str; 4] = ["id", "title", "date", "status"];
const STATUSES: [&str; 3] = ["planned", "productive", "done"];

/// One structured validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Location in the input, e.g. `/[3]`.
    pub path: String,
    pub msg: String,
}

impl Problem {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            msg: msg.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.msg)
    }
}

/// Validate an event list against an optional JSON schema.
///
/// Only `items.required` is taken from the schema; everything else is
/// fixed. Problems are returned in input order.
pub fn validate_events(data: &Value, schema: Option<&Value>) -> Vec<Problem> {
    let Some(items) = data.as_array() else {
        return vec![Problem::new("/", "events file must be an array")];
    };

    let required: BTreeSet<String> = schema
        .and_then(|s| s.pointer("/items/required"))
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_else(|| DEFAULT_REQUIRED.iter().map(|s| s.to_string()).collect());

    let mut problems = Vec::new();
    for (idx, ev) in items.iter().enumerate() {
        let path = format!("/[{idx}]");
        let mut report = |msg: String| problems.push(Problem::new(path.clone(), msg));

        let Some(obj) = ev.as_object() else {
            report("event must be an object".to_string());
            continue;
        };

        for key in &required {
            if !obj.contains_key(key) {
                report(format!("missing required field: {key}"));
            }
        }

        for field in ["date", "start_date", "end_date", "deadline"] {
            if let Some(v) = obj.get(field).filter(|v| truthy(v)) {
                if !is_iso_day(v) {
                    report(format!("{field} must be YYYY-MM-DD"));
                }
            }
        }

        if let Some(status) = obj.get("status").filter(|v| truthy(v)) {
            if !status.as_str().is_some_and(|s| STATUSES.contains(&s)) {
                report("status must be planned|productive|done".to_string());
            }
        }
        if obj.get("tags").is_some_and(|t| !t.is_array()) {
            report("tags must be an array".to_string());
        }
        if obj
            .get("platform")
            .is_some_and(|p| !p.is_null() && !p.is_string())
        {
            report("platform must be a string".to_string());
        }

        if let (Some(start), Some(end)) = (
            obj.get("start_date").and_then(Value::as_str).filter(|s| !s.is_empty()),
            obj.get("end_date").and_then(Value::as_str).filter(|s| !s.is_empty()),
        ) {
            if start > end {
                report("start_date must not be after end_date".to_string());
            }
        }

        if let Some(rec) = obj.get("recurrence").filter(|v| truthy(v)) {
            check_recurrence(rec, &mut report);
        }
    }
    problems
}

fn check_recurrence(rec: &Value, report: &mut impl FnMut(String)) {
    if let Some(days) = rec.get("byweekday").filter(|v| truthy(v)) {
        let valid = days.as_array().is_some_and(|codes| {
            codes
                .iter()
                .all(|c| c.as_str().and_then(weekday_from_code).is_some())
        });
        if !valid {
            report("recurrence.byweekday is invalid".to_string());
        }
    }
    for key in ["interval", "count"] {
        if let Some(v) = rec.get(key).filter(|v| truthy(v)) {
            if !v.as_f64().is_some_and(|n| n >= 1.0) {
                report(format!("recurrence.{key} must be a number >= 1"));
            }
        }
    }
    if let Some(until) = rec.get("until").filter(|v| truthy(v)) {
        if !is_iso_day(until) {
            report("recurrence.until must be YYYY-MM-DD".to_string());
        }
    }
    if rec.get("rrule").is_some_and(|r| truthy(r) && !r.is_string()) {
        report("recurrence.rrule must be a string".to_string());
    }
}

/// JSON truthiness: null, false, 0, "" are "not set".
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_iso_day(v: &Value) -> bool {
    v.as_str()
        .filter(|s| s.len() == 10)
        .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_list_has_no_problems() {
        let data = json!([
            {"id": "a", "title": "Reel", "date": "2024-03-15", "status": "planned",
             "tags": ["video"], "platform": "instagram"},
            {"id": "b", "title": "Series", "date": "2024-03-01", "status": "done",
             "recurrence": {"freq": "WEEKLY", "byweekday": ["MO", "WE"], "interval": 1}}
        ]);
        assert!(validate_events(&data, None).is_empty());
    }

    #[test]
    fn non_array_is_a_single_problem() {
        let problems = validate_events(&json!({}), None);
        assert_eq!(problems, vec![Problem::new("/", "events file must be an array")]);
    }

    #[test]
    fn reports_missing_required_fields() {
        let problems = validate_events(&json!([{"id": "a"}]), None);
        let msgs: Vec<_> = problems.iter().map(|p| p.msg.as_str()).collect();
        assert!(msgs.contains(&"missing required field: title"));
        assert!(msgs.contains(&"missing required field: date"));
        assert!(msgs.contains(&"missing required field: status"));
        assert!(problems.iter().all(|p| p.path == "/[0]"));
    }

    #[test]
    fn schema_overrides_required_fields() {
        let schema = json!({"items": {"required": ["id"]}});
        assert!(validate_events(&json!([{"id": "a"}]), Some(&schema)).is_empty());
    }

    #[test]
    fn reports_bad_field_shapes() {
        let data = json!([{
            "id": "a", "title": "t", "date": "15.03.2024", "status": "someday",
            "tags": "x", "platform": 3,
            "start_date": "2024-03-10", "end_date": "2024-03-01",
            "recurrence": {"byweekday": ["XX"], "interval": 0.5, "count": "3",
                           "until": "soon", "rrule": 7}
        }]);
        let msgs: Vec<String> = validate_events(&data, None).into_iter().map(|p| p.msg).collect();
        for expected in [
            "date must be YYYY-MM-DD",
            "status must be planned|productive|done",
            "tags must be an array",
            "platform must be a string",
            "start_date must not be after end_date",
            "recurrence.byweekday is invalid",
            "recurrence.interval must be a number >= 1",
            "recurrence.count must be a number >= 1",
            "recurrence.until must be YYYY-MM-DD",
            "recurrence.rrule must be a string",
        ] {
            assert!(msgs.iter().any(|m| m == expected), "missing: {expected}");
        }
    }
}
