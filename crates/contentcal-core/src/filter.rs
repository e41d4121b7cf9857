//! Filtering, grouping and summarizing expanded instances.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::event::{EventInstance, EventStatus};
use crate::recurrence::MonthWindow;

/// Status / platform / tag filter. Empty sets match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub status: HashSet<EventStatus>,
    pub platform: HashSet<String>,
    pub tag: HashSet<String>,
}

impl EventFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_empty() && self.platform.is_empty() && self.tag.is_empty()
    }

    pub fn matches(&self, inst: &EventInstance) -> bool {
        if !self.status.is_empty() && !inst.status.is_some_and(|s| self.status.contains(&s)) {
            return false;
        }
        if !self.platform.is_empty()
            && !inst
                .platform
                .as_ref()
                .is_some_and(|p| self.platform.contains(p))
        {
            return false;
        }
        if !self.tag.is_empty() && !inst.tags.iter().any(|t| self.tag.contains(t)) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, instances: &'a [EventInstance]) -> Vec<&'a EventInstance> {
        instances.iter().filter(|i| self.matches(i)).collect()
    }
}

/// Split a comma-separated tag input into trimmed, non-empty tags.
pub fn parse_tags(input: &str) -> HashSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Instances placed on one day.
pub fn instances_on<'a>(
    instances: impl IntoIterator<Item = &'a EventInstance>,
    date: NaiveDate,
) -> Vec<&'a EventInstance> {
    instances.into_iter().filter(|i| i.date == date).collect()
}

/// Instances grouped by day, days in ascending order.
pub fn group_by_day<'a>(
    instances: impl IntoIterator<Item = &'a EventInstance>,
) -> BTreeMap<NaiveDate, Vec<&'a EventInstance>> {
    let mut map: BTreeMap<NaiveDate, Vec<&'a EventInstance>> = BTreeMap::new();
    for inst in instances {
        map.entry(inst.date).or_default().push(inst);
    }
    map
}

/// Counts per status, platform and tag; each list sorted by count, highest
/// first, ties by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub status: Vec<(String, usize)>,
    pub platform: Vec<(String, usize)>,
    pub tags: Vec<(String, usize)>,
}

pub fn summarize<'a>(instances: impl IntoIterator<Item = &'a EventInstance>) -> Summary {
    let mut status: BTreeMap<String, usize> = BTreeMap::new();
    let mut platform: BTreeMap<String, usize> = BTreeMap::new();
    let mut tags: BTreeMap<String, usize> = BTreeMap::new();

    for inst in instances {
        if let Some(s) = inst.status {
            *status.entry(s.to_string()).or_default() += 1;
        }
        if let Some(p) = inst.platform.as_ref().filter(|p| !p.is_empty()) {
            *platform.entry(p.clone()).or_default() += 1;
        }
        for t in &inst.tags {
            *tags.entry(t.clone()).or_default() += 1;
        }
    }

    Summary {
        status: ranked(status),
        platform: ranked(platform),
        tags: ranked(tags),
    }
}

fn ranked(counts: BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut v: Vec<_> = counts.into_iter().collect();
    // Stable sort keeps the BTreeMap's name order among equal counts.
    v.sort_by(|a, b| b.1.cmp(&a.1));
    v
}

/// Monday-first layout of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    /// Zero-based month.
    pub month0: u32,
    /// Empty cells before day 1.
    pub offset: u32,
    pub days_in_month: u32,
    /// Always a multiple of seven.
    pub total_cells: u32,
}

impl MonthGrid {
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        let window = MonthWindow::new(year, month0)?;
        let offset = window.first.weekday().num_days_from_monday();
        let days_in_month = window.days_in_month();
        Some(Self {
            year,
            month0,
            offset,
            days_in_month,
            total_cells: (offset + days_in_month).div_ceil(7) * 7,
        })
    }

    /// Day of month shown in `cell`, if the cell belongs to the month.
    pub fn day_at(&self, cell: u32) -> Option<u32> {
        let day = cell.checked_sub(self.offset)? + 1;
        (day <= self.days_in_month).then_some(day)
    }

    pub fn weeks(&self) -> u32 {
        self.total_cells / 7
    }
}
