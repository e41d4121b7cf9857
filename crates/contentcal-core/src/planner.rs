//! Shell state container.
//!
//! [`Planner`] owns the calendar document, its undo history and the safe
//! store it is persisted through. Every mutation goes through
//! [`Planner::apply`], which logs it, snapshots the document into the
//! history and writes both to storage. The last user-facing message is
//! kept in [`Planner::status`].
//!
//! Storage layout (all values are strings):
//!
//! | key                  | value                           |
//! |----------------------|---------------------------------|
//! | `contentcal_state`   | calendar document as JSON       |
//! | `contentcal_backup`  | last backup of the document     |
//! | `contentcal_theme`   | theme name                      |
//! | `contentcal_fs`      | font size                       |
//! | `contentcal_palette` | palette name                    |
//! | `contentcal_history` | undo history as JSON            |

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::calendar::CalendarState;
use crate::error::Result;
use crate::history::HistoryStack;
use crate::storage::{Config, KvBackend, SafeStore, TimeFormat, UiConfig};
use crate::theme::{Palette, Theme};

pub const STATE_KEY: &str = "contentcal_state";
pub const BACKUP_KEY: &str = "contentcal_backup";
pub const THEME_KEY: &str = "contentcal_theme";
pub const FONT_SIZE_KEY: &str = "contentcal_fs";
pub const PALETTE_KEY: &str = "contentcal_palette";
pub const HISTORY_KEY: &str = "contentcal_history";

const ALL_KEYS: [&str; 6] = [
    STATE_KEY,
    BACKUP_KEY,
    THEME_KEY,
    FONT_SIZE_KEY,
    PALETTE_KEY,
    HISTORY_KEY,
];

pub const MSG_SAVED: &str = "all changes saved";
pub const MSG_CORRUPTED: &str = "state was corrupted and has been reinitialized";
pub const MSG_NOTHING_TO_UNDO: &str = "nothing to undo";
pub const MSG_NOTHING_TO_REDO: &str = "nothing to redo";
pub const MSG_UNDONE: &str = "change undone";
pub const MSG_REDONE: &str = "change restored";
pub const MSG_BACKUP: &str = "backup written";
pub const MSG_RESET: &str = "storage reset";

/// Result of [`Planner::storage_report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageReport {
    /// Durable storage accepted a test write.
    pub durable: bool,
    /// Some values currently live only in memory.
    pub degraded: bool,
    /// Size of the stored document in KiB.
    pub state_kb: f64,
    pub undo_steps: usize,
    pub redo_steps: usize,
}

pub struct Planner<B> {
    state: CalendarState,
    history: HistoryStack<String>,
    store: SafeStore<B>,
    status: String,
    ui: UiConfig,
}

impl<B: KvBackend> Planner<B> {
    /// Load the document and its history from `store`.
    ///
    /// A missing document starts an empty one for `today`'s year; a
    /// malformed one is replaced the same way and reported through the
    /// status line. The history is restored when readable and always ends
    /// at the loaded document.
    pub fn open(store: SafeStore<B>, config: &Config, today: NaiveDate) -> Result<Self> {
        let mut status = String::new();
        let stored = store.get(STATE_KEY);
        let state = match stored.as_deref().map(serde_json::from_str::<CalendarState>) {
            Some(Ok(state)) => state,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "stored state unreadable, reinitializing");
                status = MSG_CORRUPTED.to_string();
                initial_state(&store, &config.ui, today.year())
            }
            None => initial_state(&store, &config.ui, today.year()),
        };

        let mut history = store
            .get(HISTORY_KEY)
            .and_then(|raw| match serde_json::from_str::<HistoryStack<String>>(&raw) {
                Ok(h) => Some(h),
                Err(e) => {
                    tracing::warn!(error = %e, "stored history unreadable, starting fresh");
                    None
                }
            })
            .unwrap_or_else(|| HistoryStack::new(config.history.limit));
        history.set_limit(config.history.limit);

        let snapshot = serde_json::to_string(&state)?;
        if history.current() != Some(&snapshot) {
            history.push(snapshot);
        }

        Ok(Self {
            state,
            history,
            store,
            status,
            ui: config.ui.clone(),
        })
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    pub fn history(&self) -> &HistoryStack<String> {
        &self.history
    }

    pub fn store(&self) -> &SafeStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SafeStore<B> {
        &mut self.store
    }

    /// Last user-facing status message.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn time_format(&self) -> TimeFormat {
        self.ui.time_format
    }

    // ── Commands ───────────────────────────────────────────────────────

    /// Mutate the document, log `msg` and persist.
    pub fn apply<F>(&mut self, msg: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut CalendarState),
    {
        self.try_apply(msg, |s| {
            f(s);
            Ok(())
        })
    }

    /// Like [`apply`](Self::apply) for edits that can fail. On error the
    /// document is left untouched and nothing is written.
    pub fn try_apply<F>(&mut self, msg: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut CalendarState) -> Result<()>,
    {
        let mut next = self.state.clone();
        f(&mut next)?;
        self.state = next;
        self.state
            .log_event(msg, Local::now().naive_local(), self.ui.time_format);
        self.persist()
    }

    /// Snapshot the document into the history and write everything out.
    pub fn persist(&mut self) -> Result<()> {
        let snapshot = serde_json::to_string(&self.state)?;
        self.history.push(snapshot.clone());
        self.write_state(&snapshot);
        self.write_history()?;
        self.set_saved_status(MSG_SAVED);
        Ok(())
    }

    /// Step back one snapshot. Returns whether anything changed.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.undo().cloned() else {
            self.status = MSG_NOTHING_TO_UNDO.to_string();
            return Ok(false);
        };
        self.restore(&snapshot)?;
        self.set_saved_status(MSG_UNDONE);
        Ok(true)
    }

    /// Step forward one snapshot. Returns whether anything changed.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.redo().cloned() else {
            self.status = MSG_NOTHING_TO_REDO.to_string();
            return Ok(false);
        };
        self.restore(&snapshot)?;
        self.set_saved_status(MSG_REDONE);
        Ok(true)
    }

    /// Write the current document to the backup key.
    pub fn backup(&mut self) -> Result<()> {
        let snapshot = serde_json::to_string(&self.state)?;
        self.store.set(BACKUP_KEY, &snapshot);
        self.set_saved_status(MSG_BACKUP);
        Ok(())
    }

    /// Write a backup only if none exists yet. Returns whether one was
    /// written.
    pub fn ensure_backup(&mut self) -> Result<bool> {
        if self.store.get(BACKUP_KEY).is_some() {
            return Ok(false);
        }
        self.backup()?;
        Ok(true)
    }

    /// The stored backup, if it can be read.
    pub fn read_backup(&self) -> Option<CalendarState> {
        let raw = self.store.get(BACKUP_KEY)?;
        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!(error = %e, "stored backup unreadable"))
            .ok()
    }

    /// Drop every stored key and start over with an empty document.
    pub fn reset(&mut self, today: NaiveDate) -> Result<()> {
        for key in ALL_KEYS {
            self.store.remove(key);
        }
        self.state = initial_state(&self.store, &self.ui, today.year());
        self.history = HistoryStack::new(self.history.limit());
        self.persist()?;
        self.status = MSG_RESET.to_string();
        Ok(())
    }

    /// Probe durable storage and measure the stored document.
    pub fn storage_report(&mut self) -> StorageReport {
        let durable = self.store.probe();
        let bytes = self.store.get(STATE_KEY).map_or(0, |s| s.len());
        StorageReport {
            durable,
            degraded: self.store.is_degraded(),
            state_kb: bytes as f64 / 1024.0,
            undo_steps: self.history.undo_len(),
            redo_steps: self.history.redo_len(),
        }
    }

    fn restore(&mut self, snapshot: &str) -> Result<()> {
        self.state = serde_json::from_str(snapshot)?;
        self.write_state(snapshot);
        self.write_history()
    }

    fn write_state(&mut self, snapshot: &str) {
        self.store.set(STATE_KEY, snapshot);
        self.store.set(THEME_KEY, self.state.theme.as_str());
        self.store
            .set(FONT_SIZE_KEY, &self.state.font_size.to_string());
        self.store.set(PALETTE_KEY, self.state.palette.as_str());
    }

    fn write_history(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.history)?;
        self.store.set(HISTORY_KEY, &raw);
        Ok(())
    }

    fn set_saved_status(&mut self, ok: &str) {
        self.status = if self.store.is_degraded() {
            "saved to temporary in-memory storage only".to_string()
        } else {
            ok.to_string()
        };
    }
}

/// Empty document, picking up display settings from their own keys first
/// and the config second.
fn initial_state<B: KvBackend>(store: &SafeStore<B>, ui: &UiConfig, year: i32) -> CalendarState {
    let mut state = CalendarState::new(year);
    state.theme = store
        .get(THEME_KEY)
        .map_or(ui.theme, |t| Theme::normalize(&t));
    state.font_size = store
        .get(FONT_SIZE_KEY)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(ui.font_size);
    state.palette = store
        .get(PALETTE_KEY)
        .map_or(ui.palette, |p| Palette::from_name(&p));
    state
}
