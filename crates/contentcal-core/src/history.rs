//! Bounded undo/redo history of state snapshots.
//!
//! The stack keeps a linear timeline: a `current` snapshot, the snapshots
//! before it (`undo`) and the snapshots that were undone (`redo`). Pushing a
//! new snapshot always discards the redo side. The undo side is capped at
//! `limit` entries and drops its oldest entry first.
//!
//! Snapshots are opaque to the stack. Pushing the same value twice records
//! it twice; callers that want de-duplication must compare before pushing.
//!
//! ## Usage
//!
//! ```
//! use contentcal_core::HistoryStack;
//!
//! let mut h = HistoryStack::new(50);
//! h.push("a".to_string());
//! h.push("b".to_string());
//! assert_eq!(h.undo().map(String::as_str), Some("a"));
//! assert_eq!(h.redo().map(String::as_str), Some("b"));
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStack<T = String> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    current: Option<T>,
    limit: usize,
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T> HistoryStack<T> {
    /// Create an empty stack. A `limit` of zero is raised to one.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            current: None,
            limit: limit.max(1),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record a new snapshot as current.
    ///
    /// The previous current moves onto the undo side; the redo side is
    /// cleared unconditionally.
    pub fn push(&mut self, snapshot: T) {
        if let Some(prev) = self.current.take() {
            self.push_undo(prev);
        }
        self.current = Some(snapshot);
        self.redo.clear();
    }

    /// Step back one snapshot. Returns `None` (state unchanged) when there
    /// is nothing to undo.
    pub fn undo(&mut self) -> Option<&T> {
        let prev = self.undo.pop_back()?;
        if let Some(cur) = self.current.replace(prev) {
            self.redo.push(cur);
        }
        self.current.as_ref()
    }

    /// Step forward one snapshot. Returns `None` (state unchanged) when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.redo.pop()?;
        if let Some(cur) = self.current.replace(next) {
            self.push_undo(cur);
        }
        self.current.as_ref()
    }

    /// Change the cap, evicting the oldest undo entries if needed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.evict();
    }

    fn push_undo(&mut self, snapshot: T) {
        self.undo.push_back(snapshot);
        self.evict();
    }

    fn evict(&mut self) {
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_and_redo_simple_states() {
        let mut h = HistoryStack::default();
        h.push("a");
        h.push("b");
        assert!(h.can_undo());
        assert_eq!(h.undo(), Some(&"a"));
        assert!(h.can_redo());
        assert_eq!(h.redo(), Some(&"b"));
    }

    #[test]
    fn empty_stack_has_nothing_to_do() {
        let mut h: HistoryStack = HistoryStack::new(5);
        assert!(h.current().is_none());
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn first_push_only_sets_current() {
        let mut h = HistoryStack::new(5);
        h.push(1);
        assert_eq!(h.current(), Some(&1));
        assert!(!h.can_undo());
        assert!(h.undo().is_none());
        assert_eq!(h.current(), Some(&1));
    }

    #[test]
    fn push_clears_redo() {
        let mut h = HistoryStack::new(5);
        h.push(1);
        h.push(2);
        h.undo();
        assert!(h.can_redo());
        h.push(3);
        assert!(!h.can_redo());
        assert_eq!(h.undo(), Some(&1));
    }

    #[test]
    fn duplicate_push_is_recorded() {
        let mut h = HistoryStack::new(5);
        h.push("x");
        h.push("x");
        assert_eq!(h.undo_len(), 1);
        assert_eq!(h.undo(), Some(&"x"));
    }

    #[test]
    fn limit_evicts_oldest_first() {
        let mut h = HistoryStack::new(3);
        for i in 0..10 {
            h.push(i);
        }
        assert_eq!(h.undo_len(), 3);
        assert_eq!(h.undo(), Some(&8));
        assert_eq!(h.undo(), Some(&7));
        assert_eq!(h.undo(), Some(&6));
        assert!(h.undo().is_none());
        assert_eq!(h.current(), Some(&6));
    }

    #[test]
    fn zero_limit_is_raised_to_one() {
        let mut h = HistoryStack::new(0);
        h.push(1);
        h.push(2);
        h.push(3);
        assert_eq!(h.limit(), 1);
        assert_eq!(h.undo(), Some(&2));
    }

    #[test]
    fn shrinking_limit_evicts() {
        let mut h = HistoryStack::new(10);
        for i in 0..6 {
            h.push(i);
        }
        h.set_limit(2);
        assert_eq!(h.undo_len(), 2);
        assert_eq!(h.undo(), Some(&4));
    }

    #[test]
    fn survives_json_roundtrip() {
        let mut h = HistoryStack::new(4);
        h.push("a".to_string());
        h.push("b".to_string());
        h.undo();
        let json = serde_json::to_string(&h).unwrap();
        let mut back: HistoryStack = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
        assert_eq!(back.redo().map(String::as_str), Some("b"));
    }
}
