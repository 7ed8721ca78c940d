use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One recorded transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub sequence: u64,
    pub from: String,
    pub to: String,
    pub event: String,
    pub row: String,
    pub at: DateTime<Utc>,
}

/// A bounded, sequential record of a machine's transitions.
///
/// Oldest entries are evicted once `limit` is reached; `sequence` keeps
/// counting so gaps are visible. A limit of zero records nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    entries: VecDeque<TimelineEntry>,
    limit: usize,
    next_sequence: u64,
}

impl Timeline {
    pub const DEFAULT_LIMIT: usize = 64;

    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(Self::DEFAULT_LIMIT)),
            limit,
            next_sequence: 0,
        }
    }

    pub fn record(&mut self, from: &str, to: &str, event: &str, row: &str) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        if self.limit == 0 {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(TimelineEntry {
            sequence,
            from: from.to_string(),
            to: to.to_string(),
            event: event.to_string(),
            row: row.to_string(),
            at: Utc::now(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TimelineEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Transitions recorded since creation, evicted ones included.
    pub fn total_recorded(&self) -> u64 {
        self.next_sequence
    }

    /// Destination names in order, oldest first.
    pub fn path(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.to.as_str()).collect()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_evicts_oldest() {
        let mut timeline = Timeline::with_limit(2);
        timeline.record("a", "b", "go", "a->b");
        timeline.record("b", "c", "go", "b->c");
        timeline.record("c", "d", "go", "c->d");

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.path(), vec!["c", "d"]);
        assert_eq!(timeline.entries().next().map(|e| e.sequence), Some(1));
        assert_eq!(timeline.total_recorded(), 3);
    }

    #[test]
    fn test_zero_limit_only_counts() {
        let mut timeline = Timeline::with_limit(0);
        timeline.record("a", "b", "go", "a->b");

        assert!(timeline.is_empty());
        assert_eq!(timeline.total_recorded(), 1);
    }
}
