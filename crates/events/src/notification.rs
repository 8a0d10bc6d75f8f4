//! Notification sink: ordered, append-only text events for the host UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One notification entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub text: String,
    pub at: DateTime<Utc>,
    pub seen: bool,
}

/// Sink for discrete text events emitted by engine operations.
///
/// The engine requires no acknowledgement or delivery guarantee from the sink;
/// it only appends.
pub trait NotificationSink {
    fn push(&mut self, text: impl Into<String>, at: DateTime<Utc>);
}

/// In-memory, ordered notification log (newest last).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn unseen_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.seen).count()
    }

    pub fn mark_all_seen(&mut self) {
        for entry in &mut self.entries {
            entry.seen = true;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl NotificationSink for NotificationLog {
    fn push(&mut self, text: impl Into<String>, at: DateTime<Utc>) {
        self.entries.push(Notification {
            id: Uuid::now_v7(),
            text: text.into(),
            at,
            seen: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_order() {
        let mut log = NotificationLog::new();
        let now = Utc::now();
        log.push("first", now);
        log.push("second", now);

        let texts: Vec<_> = log.entries().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn mark_all_seen_clears_unseen_count() {
        let mut log = NotificationLog::new();
        log.push("a", Utc::now());
        log.push("b", Utc::now());
        assert_eq!(log.unseen_count(), 2);

        log.mark_all_seen();
        assert_eq!(log.unseen_count(), 0);
    }
}
