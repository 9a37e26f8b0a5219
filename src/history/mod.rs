//! Linear undo/redo stacks, one pair per generated artifact.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The two generated texts a teacher can edit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Report,
    Strategies,
}

impl ArtifactKind {
    pub const ALL: [Self; 2] = [Self::Report, Self::Strategies];

    pub fn label(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Strategies => "strategies",
        }
    }
}

/// Undo/redo stacks for a single artifact. Every operation is infallible;
/// undo and redo on an empty stack return `None` and change nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditHistory {
    undo: Vec<String>,
    redo: Vec<String>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the pre-edit text. Any redo path is discarded.
    pub fn checkpoint(&mut self, text: impl Into<String>) {
        self.undo.push(text.into());
        self.redo.clear();
    }

    /// Step back. On success `current` is kept for redo and the earlier text
    /// is returned for the caller to put in the buffer.
    pub fn undo(&mut self, current: &str) -> Option<String> {
        let previous = self.undo.pop()?;
        self.redo.push(current.to_string());
        Some(previous)
    }

    pub fn redo(&mut self, current: &str) -> Option<String> {
        let next = self.redo.pop()?;
        self.undo.push(current.to_string());
        Some(next)
    }

    /// Start a new baseline.
    pub fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Apply three checkpointed edits S0 -> S1 -> S2 -> S3.
    fn edited() -> (EditHistory, String) {
        let mut history = EditHistory::new();
        let mut buffer = "S0".to_string();
        for next in ["S1", "S2", "S3"] {
            history.checkpoint(buffer.clone());
            buffer = next.to_string();
        }
        (history, buffer)
    }

    #[test]
    fn undo_walks_back_then_redo_walks_forward() {
        let (mut history, mut buffer) = edited();

        let mut seen = Vec::new();
        while let Some(previous) = history.undo(&buffer) {
            buffer = previous;
            seen.push(buffer.clone());
        }
        assert_eq!(seen, vec!["S2", "S1", "S0"]);
        assert_eq!(history.undo(&buffer), None);
        assert_eq!(buffer, "S0");

        let mut seen = Vec::new();
        while let Some(next) = history.redo(&buffer) {
            buffer = next;
            seen.push(buffer.clone());
        }
        assert_eq!(seen, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn new_edit_after_undo_drops_redo_path() {
        let (mut history, mut buffer) = edited();
        buffer = history.undo(&buffer).unwrap();
        buffer = history.undo(&buffer).unwrap();
        assert_eq!(buffer, "S1");

        history.checkpoint(buffer.clone());
        buffer = "S4".to_string();

        assert!(!history.can_redo());
        assert_eq!(history.redo(&buffer), None);
        assert_eq!(history.undo(&buffer).as_deref(), Some("S1"));
    }

    #[test]
    fn availability_tracks_stack_emptiness() {
        let mut history = EditHistory::new();
        assert!(!history.can_undo() && !history.can_redo());

        history.checkpoint("a");
        assert!(history.can_undo());

        let _ = history.undo("b");
        assert!(!history.can_undo() && history.can_redo());

        history.reset();
        assert_eq!((history.undo_depth(), history.redo_depth()), (0, 0));
    }

    #[test]
    fn artifact_kind_parses_lowercase() {
        assert_eq!("strategies".parse::<ArtifactKind>().unwrap(), ArtifactKind::Strategies);
        assert_eq!(ArtifactKind::Report.to_string(), "report");
    }
}
