use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::content::Content;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Input,
    Output,
    Error,
}

/// One line of the session log. Never changed after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub content: Content,
}

impl TranscriptEntry {
    pub fn new(kind: EntryKind, content: Content) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content,
        }
    }

    pub fn input(line: &str) -> Self {
        Self::new(EntryKind::Input, Content::text(line))
    }

    pub fn output(content: Content) -> Self {
        Self::new(EntryKind::Output, content)
    }

    pub fn error(content: Content) -> Self {
        Self::new(EntryKind::Error, content)
    }
}

/// Ordered, append-only log of a terminal session.
///
/// Unbounded unless built with [`Transcript::with_limit`], in which case the
/// oldest entries are dropped once the limit is reached. `clear` is the only
/// other mutation.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: VecDeque<TranscriptEntry>,
    limit: Option<usize>,
    appended: u64,
    generation: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    pub fn append(&mut self, entry: TranscriptEntry) {
        if let Some(limit) = self.limit {
            while self.entries.len() >= limit {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(entry);
        self.appended += 1;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TranscriptEntry> + '_ {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.back()
    }

    /// Total entries ever appended, including cleared and evicted ones.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Bumped on every `clear`, so renderers can tell a wipe from growth.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.append(TranscriptEntry::input("about"));
        transcript.append(TranscriptEntry::output(Content::text("hi")));

        let kinds: Vec<_> = transcript.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EntryKind::Input, EntryKind::Output]);
        assert_eq!(transcript.appended(), 2);
    }

    #[test]
    fn entry_ids_are_unique() {
        let a = TranscriptEntry::input("help");
        let b = TranscriptEntry::input("help");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn clear_empties_and_bumps_generation() {
        let mut transcript = Transcript::new();
        transcript.append(TranscriptEntry::input("about"));
        transcript.clear();

        assert!(transcript.is_empty());
        assert_eq!(transcript.generation(), 1);
        assert_eq!(transcript.appended(), 1);
    }

    #[test]
    fn limit_drops_oldest_entries() {
        let mut transcript = Transcript::with_limit(2);
        for line in ["one", "two", "three"] {
            transcript.append(TranscriptEntry::input(line));
        }

        let lines: Vec<_> = transcript.iter().map(|e| e.content.plain_text()).collect();
        assert_eq!(lines, vec!["two", "three"]);
        assert_eq!(transcript.appended(), 3);
    }
}
