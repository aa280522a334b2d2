use std::collections::VecDeque;

/// Previously submitted command lines, most recent first, with a recall cursor.
///
/// The cursor is `None` while the user is not browsing. Recall only moves the
/// cursor; the buffer itself changes only through [`HistoryBuffer::push`].
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    entries: VecDeque<String>,
    cursor: Option<usize>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line and stop browsing.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push_front(line.into());
        self.cursor = None;
    }

    /// Step to an older entry, clamping at the oldest one.
    ///
    /// Returns the entry to show, or `None` when there is no history.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(i) => (i + 1).min(self.entries.len() - 1),
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Step to a newer entry.
    ///
    /// Moving past the newest entry stops browsing and yields an empty line.
    /// Returns `None` when not browsing.
    pub fn newer(&mut self) -> Option<&str> {
        match self.cursor {
            None => None,
            Some(0) => {
                self.cursor = None;
                Some("")
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                self.entries.get(i - 1).map(String::as_str)
            }
        }
    }

    /// Cursor position, `-1` when not browsing.
    pub fn cursor(&self) -> isize {
        self.cursor.map_or(-1, |i| i as isize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Entries from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> HistoryBuffer {
        let mut history = HistoryBuffer::new();
        for line in lines {
            history.push(*line);
        }
        history
    }

    #[test]
    fn push_prepends_and_resets_cursor() {
        let mut history = buffer(&["about", "skills"]);
        history.older();
        history.push("projects");

        assert_eq!(history.cursor(), -1);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["projects", "skills", "about"]);
    }

    #[test]
    fn older_on_empty_buffer_is_a_no_op() {
        let mut history = HistoryBuffer::new();
        assert_eq!(history.older(), None);
        assert_eq!(history.cursor(), -1);
    }

    #[test]
    fn older_clamps_at_oldest_entry() {
        let mut history = buffer(&["about", "skills"]);
        assert_eq!(history.older(), Some("skills"));
        assert_eq!(history.older(), Some("about"));
        assert_eq!(history.older(), Some("about"));
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn newer_walks_back_to_an_empty_line() {
        let mut history = buffer(&["about", "skills"]);
        history.older();
        history.older();

        assert_eq!(history.newer(), Some("skills"));
        assert_eq!(history.newer(), Some(""));
        assert_eq!(history.cursor(), -1);
        assert_eq!(history.newer(), None);
        assert_eq!(history.len(), 2);
    }
}
