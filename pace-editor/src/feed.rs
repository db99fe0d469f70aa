//! Results feed, most recent entry first.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Text shown while the feed is empty.
pub const EMPTY_FEED_PLACEHOLDER: &str =
    "Select code and apply a template to see AI results here.";

/// Outcome of one successful template application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    template_name: String,
    timestamp: DateTime<Utc>,
    completion_text: String,
}

impl ResultEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(
        template_name: impl Into<String>,
        timestamp: DateTime<Utc>,
        completion_text: impl Into<String>,
    ) -> Self {
        Self {
            template_name: template_name.into(),
            timestamp,
            completion_text: completion_text.into(),
        }
    }

    /// Name of the applied template.
    #[must_use]
    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// When the completion arrived.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Completion text returned by the provider.
    #[must_use]
    pub fn completion_text(&self) -> &str {
        &self.completion_text
    }
}

/// In-memory, session-local sequence of results.
#[derive(Clone, Debug, Default)]
pub struct ResultFeed {
    entries: VecDeque<ResultEntry>,
}

impl ResultFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry at the front.
    pub fn push_front(&mut self, entry: ResultEntry) {
        self.entries.push_front(entry);
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter()
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&ResultEntry> {
        self.entries.front()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the feed holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the placeholder text while empty.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_FEED_PLACEHOLDER)
    }
}
