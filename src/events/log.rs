//! Capacity-bounded, newest-first event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Number of records retained before the oldest is evicted.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// What produced an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Emotion,
    Gesture,
    Alert,
    Status,
}

/// How prominently a record should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventKind::Emotion => "emotion",
            EventKind::Gesture => "gesture",
            EventKind::Alert => "alert",
            EventKind::Status => "status",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// An immutable entry in the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub message: String,
    pub severity: Severity,
}

impl EventRecord {
    pub fn new(kind: EventKind, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            message: message.into(),
            severity,
        }
    }

    /// Single-line rendering: `[HH:MM:SS] kind/severity message`.
    pub fn display_line(&self) -> String {
        format!(
            "[{}] {}/{} {}",
            self.timestamp.format("%H:%M:%S"),
            self.kind,
            self.severity,
            self.message
        )
    }
}

/// Append-only log that keeps the newest `capacity` records.
///
/// Eviction is strictly by age; a critical record is dropped like any other
/// once it becomes the oldest.
#[derive(Debug, Clone)]
pub struct EventLog {
    records: VecDeque<EventRecord>,
    capacity: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Create a log with a custom bound. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend a record, evicting the oldest once the log is full.
    pub fn append(&mut self, record: EventRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    /// Records in newest-first order.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Owned copy of the records, newest first.
    pub fn to_vec(&self) -> Vec<EventRecord> {
        self.records.iter().cloned().collect()
    }

    /// The most recently appended record.
    pub fn latest(&self) -> Option<&EventRecord> {
        self.records.front()
    }

    /// Number of records held, never more than [`EventLog::capacity`].
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of records kept; older ones are dropped on append.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Count of retained records of a given kind.
    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(n: usize) -> EventRecord {
        EventRecord::new(EventKind::Status, format!("event {n}"), Severity::Info)
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut log = EventLog::new();
        log.append(status(1));
        log.append(status(2));

        let messages: Vec<_> = log.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["event 2", "event 1"]);
        assert_eq!(log.latest().unwrap().message, "event 2");
    }

    #[test]
    fn test_log_bound_evicts_oldest() {
        let mut log = EventLog::new();
        for n in 1..=51 {
            log.append(status(n));
        }

        assert_eq!(log.len(), DEFAULT_LOG_CAPACITY);
        assert!(log.iter().all(|r| r.message != "event 1"));

        let expected: Vec<String> = (2..=51).rev().map(|n| format!("event {n}")).collect();
        let actual: Vec<String> = log.iter().map(|r| r.message.clone()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_eviction_ignores_severity() {
        let mut log = EventLog::with_capacity(2);
        log.append(EventRecord::new(EventKind::Alert, "alert", Severity::Critical));
        log.append(status(1));
        log.append(status(2));

        assert_eq!(log.count_kind(EventKind::Alert), 0);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = status(1);
        let b = status(1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_display_line_format() {
        let record = EventRecord::new(EventKind::Alert, "SOS", Severity::Critical);
        let line = record.display_line();
        assert!(line.contains("alert/critical SOS"));
        assert!(line.starts_with('['));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut log = EventLog::with_capacity(0);
        log.append(status(1));
        assert_eq!(log.len(), 1);
        assert_eq!(log.capacity(), 1);
    }
}
