//! # Contentcal Core Library
//!
//! This library provides the core logic for contentcal, a content-planning
//! calendar. All operations are exposed through the `contentcal` CLI; any
//! other front end is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **History**: Bounded undo/redo stack of opaque snapshots
//! - **Recurrence**: Expands events (single days, ranges, RRULE-style rules,
//!   deadlines) into the instances that fall in one month
//! - **Storage**: Key/value store that falls back to memory when SQLite is
//!   unavailable, plus TOML-based configuration
//! - **Planner**: Calendar document, history and store wired together
//!
//! ## Key Components
//!
//! - [`HistoryStack`]: Undo/redo timeline
//! - [`expand_month`]: Month expansion of events
//! - [`SafeStore`]: Durable-if-possible key/value storage
//! - [`Planner`]: Shell state container
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod csv_import;
pub mod error;
pub mod event;
pub mod filter;
pub mod history;
pub mod planner;
pub mod recurrence;
pub mod selfcheck;
pub mod storage;
pub mod theme;
pub mod validate;

pub use calendar::{CalendarState, DayItem, MonthStats, Todo};
pub use csv_import::{merge_events, parse_csv, rows_to_events};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use event::{events_from_json, Event, EventInstance, EventStatus, Recurrence};
pub use filter::{summarize, EventFilter, MonthGrid, Summary};
pub use history::{HistoryStack, DEFAULT_HISTORY_LIMIT};
pub use planner::{Planner, StorageReport};
pub use recurrence::{expand_month, MonthWindow, RecurrenceRule};
pub use selfcheck::{self_check, CheckInput, Finding, Severity};
pub use storage::{Config, KvBackend, SafeStore, SqliteKv, StoreStatus, UnavailableKv};
pub use theme::{Palette, Theme};
pub use validate::{validate_events, Problem};
