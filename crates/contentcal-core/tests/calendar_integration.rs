//! Integration tests for the events pipeline: JSON or CSV in, validated,
//! expanded per month, filtered and summarized.

use chrono::NaiveDate;
use contentcal_core::filter::{instances_on, parse_tags};
use contentcal_core::{
    events_from_json, expand_month, merge_events, parse_csv, rows_to_events, summarize,
    validate_events, EventFilter, EventStatus,
};
use serde_json::json;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_events() -> serde_json::Value {
    json!([
        { "id": "launch", "title": "Launch video", "date": "2024-03-15",
          "status": "planned", "platform": "youtube", "tags": ["launch"] },
        { "id": "trip", "title": "Conference", "date": "2024-03-30",
          "start_date": "2024-03-30", "end_date": "2024-04-02", "status": "productive" },
        { "id": "posts", "title": "Blog post", "date": "2024-01-01", "status": "done",
          "platform": "blog", "tags": ["writing"],
          "recurrence": { "freq": "WEEKLY", "byweekday": ["MO", "WE"] } },
        { "id": "streak", "title": "Daily clip", "date": "2024-02-28", "status": "planned",
          "recurrence": { "rrule": "FREQ=DAILY;INTERVAL=2;COUNT=5" },
          "deadline": "2024-03-20", "campaign": "spring" }
    ])
}

#[test]
fn valid_file_expands_for_march() {
    let data = sample_events();
    assert!(validate_events(&data, None).is_empty());
    let (events, problems) = events_from_json(&data);
    assert!(problems.is_empty());
    assert_eq!(events.len(), 4);

    let march = expand_month(&events, 2024, 2);
    let count = |id: &str| march.iter().filter(|i| i.id == id).count();
    assert_eq!(count("launch"), 1);
    assert_eq!(count("trip"), 2);
    // 4 Mondays and 4 Wednesdays in March 2024.
    assert_eq!(count("posts"), 8);
    // 03-01, 03-03, 03-05, 03-07 plus the deadline marker.
    assert_eq!(count("streak"), 5);

    let deadline = march.iter().find(|i| i.is_deadline).unwrap();
    assert_eq!(deadline.date, day(2024, 3, 20));
    assert_eq!(deadline.extra.get("campaign"), Some(&json!("spring")));

    let april = expand_month(&events, 2024, 3);
    let trip: Vec<_> = april.iter().filter(|i| i.id == "trip").map(|i| i.date).collect();
    assert_eq!(trip, vec![day(2024, 4, 1), day(2024, 4, 2)]);
    assert!(april.iter().all(|i| i.id != "launch" && i.id != "streak"));
}

#[test]
fn filters_and_summary_over_a_month() {
    let (events, _) = events_from_json(&sample_events());
    let march = expand_month(&events, 2024, 2);

    let mut filter = EventFilter::default();
    filter.status.insert(EventStatus::Done);
    filter.platform.insert("blog".into());
    let done = filter.apply(&march);
    assert_eq!(done.len(), 8);

    let mut by_tag = EventFilter::default();
    by_tag.tag = parse_tags("launch, unknown");
    assert_eq!(by_tag.apply(&march).len(), 1);

    let summary = summarize(&march);
    assert_eq!(summary.status[0], ("done".to_string(), 8));
    assert_eq!(summary.platform[0], ("blog".to_string(), 8));

    let on_15th = instances_on(&march, day(2024, 3, 15));
    assert_eq!(on_15th.len(), 1);
    assert_eq!(on_15th[0].title, "Launch video");
}

#[test]
fn broken_entries_are_reported_not_fatal() {
    let data = json!([
        { "id": "ok", "title": "Fine", "date": "2024-03-01", "status": "planned" },
        { "id": "bad", "title": "Bad", "date": "03/01/2024", "status": "someday" },
        "not an object",
        { "id": "nodate", "title": "Floating", "status": "planned" }
    ]);
    let problems = validate_events(&data, None);
    let paths: Vec<&str> = problems.iter().map(|p| p.path.as_str()).collect();
    assert!(paths.contains(&"/[1]"));
    assert!(paths.contains(&"/[2]"));
    assert!(paths.contains(&"/[3]"));

    let (events, load_problems) = events_from_json(&data);
    assert_eq!(load_problems.len(), 2);
    // The unknown status and the bad date only cost their fields.
    assert_eq!(events.len(), 3);
    assert_eq!(events[1].status, None);
    let march = expand_month(&events, 2024, 2);
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].id, "ok");
}

#[test]
fn csv_import_merges_into_existing_events() {
    let csv = "id,title,date,status,tags,freq,byweekday\n\
               launch,Launch video (recut),2024-03-16,done,launch;video,,\n\
               ,Newsletter,2024-03-04,,,weekly,MO\n";
    let rows = parse_csv(csv).unwrap();
    let (imported, problems) = rows_to_events(&rows);
    assert!(problems.is_empty());
    let as_json = serde_json::to_value(&imported).unwrap();
    assert!(validate_events(&as_json, None).is_empty());

    let (existing, _) = events_from_json(&sample_events());
    let merged = merge_events(existing, imported);
    assert_eq!(merged.len(), 5);
    assert_eq!(merged[0].id, "launch");
    assert_eq!(merged[0].title, "Launch video (recut)");
    assert!(merged[4].id.starts_with("csv_2_"));

    let march = expand_month(&merged, 2024, 2);
    let newsletter = march.iter().filter(|i| i.title == "Newsletter").count();
    // Mondays from 03-04: 4, 11, 18, 25.
    assert_eq!(newsletter, 4);
}
