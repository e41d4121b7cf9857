//! Key/value storage that never fails its caller.
//!
//! [`SafeStore`] writes through a durable [`KvBackend`]. When the backend
//! fails (unavailable, full, broken) the value goes into a process-lifetime
//! in-memory map instead and a degraded-mode status is reported. Values in
//! the fallback are lost when the process ends: the store is
//! "durable if possible", not durable.
//!
//! A key lives in the fallback only while its latest write failed: a
//! durable write drops it again. Reads therefore check the fallback first
//! and only then the backend, so a value written while the backend was down
//! or full wins over an older durable copy, and stays readable after the
//! backend comes back.

use std::collections::HashMap;
use std::fmt;

use super::database::KvBackend;

const PROBE_KEY: &str = "__contentcal_probe";

/// Status reported after a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreStatus {
    /// A write could not reach durable storage and was kept in memory.
    Degraded { key: String, reason: String },
}

impl StoreStatus {
    /// Short text suitable for a status line.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Degraded { .. } => {
                "saving to durable storage failed, using temporary in-memory fallback"
            }
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degraded { key, reason } => write!(f, "{} ({key}: {reason})", self.message()),
        }
    }
}

type StatusCallback = Box<dyn FnMut(&StoreStatus)>;

pub struct SafeStore<B> {
    backend: B,
    fallback: HashMap<String, String>,
    on_status: Option<StatusCallback>,
}

impl<B: KvBackend> SafeStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            fallback: HashMap::new(),
            on_status: None,
        }
    }

    /// Register a callback that receives degraded-mode notifications.
    pub fn with_status_callback(mut self, f: impl FnMut(&StoreStatus) + 'static) -> Self {
        self.on_status = Some(Box::new(f));
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Read a value. Never fails; an unknown key is `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(v) = self.fallback.get(key) {
            return Some(v.clone());
        }
        self.backend.get(key).unwrap_or_else(|e| {
            tracing::debug!(key, error = %e, "durable read failed");
            None
        })
    }

    /// Write a value. On backend failure the value is kept in memory and a
    /// [`StoreStatus::Degraded`] is reported.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.backend.set(key, value) {
            Ok(()) => {
                self.fallback.remove(key);
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "durable write failed, keeping value in memory");
                self.fallback.insert(key.to_string(), value.to_string());
                let status = StoreStatus::Degraded {
                    key: key.to_string(),
                    reason: e.to_string(),
                };
                if let Some(cb) = self.on_status.as_mut() {
                    cb(&status);
                }
            }
        }
    }

    /// Remove a value from both the backend (best effort) and the fallback.
    pub fn remove(&mut self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            tracing::debug!(key, error = %e, "durable remove failed");
        }
        self.fallback.remove(key);
    }

    /// Check whether durable storage currently accepts writes.
    pub fn probe(&mut self) -> bool {
        let ok = self.backend.set(PROBE_KEY, "1").is_ok();
        let _ = self.backend.remove(PROBE_KEY);
        ok
    }

    /// Whether any value currently lives only in memory.
    pub fn is_degraded(&self) -> bool {
        !self.fallback.is_empty()
    }

    /// Keys held only in memory, sorted.
    pub fn fallback_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.fallback.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
