//! Session log shared by every tab
//!
//! Append-only, oldest first, unbounded, lives until the process exits.
//! The handle is cheap to clone; each tab controller gets its own clone.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};

use crate::types::{LogEntry, LogLevel};

#[derive(Debug, Clone, Default)]
pub struct LogStore {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, message: impl Into<String>, level: LogLevel) {
        let message = message.into();
        match level {
            LogLevel::Error => tracing::error!(target: "sff::log", "{message}"),
            LogLevel::Info | LogLevel::Success => {
                tracing::info!(target: "sff::log", kind = %level, "{message}")
            }
        }
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            message,
            level,
        };
        self.lock().push(entry);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.add(message, LogLevel::Info);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.add(message, LogLevel::Error);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.add(message, LogLevel::Success);
    }

    /// Snapshot of all entries in insertion order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn last(&self) -> Option<LogEntry> {
        self.lock().last().cloned()
    }

    // A panic while holding the lock cannot leave a half-written Vec,
    // so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_in_order() {
        let log = LogStore::new();
        assert!(log.is_empty());

        log.info("first");
        log.error("second");
        log.success("third");

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[1].level, LogLevel::Error);
        assert_eq!(entries[2].level, LogLevel::Success);
    }

    #[test]
    fn test_clones_share_entries() {
        let log = LogStore::new();
        let other = log.clone();
        other.info("from clone");
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().message, "from clone");
    }

    #[test]
    fn test_no_deduplication() {
        let log = LogStore::new();
        log.info("same");
        log.info("same");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let log = LogStore::new();
        log.info("x");
        let entry = log.last().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
        assert!(entry.timestamp.ends_with('Z'));
    }
}
