use crate::history::EditHistory;

/// A generated text buffer and its edit history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifact {
    pub text: String,
    pub history: EditHistory,
}

impl Artifact {
    /// Swap in the previous text; the buffer is unchanged when there is none.
    pub fn undo(&mut self) -> Option<String> {
        let previous = self.history.undo(&self.text)?;
        self.text = previous;
        Some(self.text.clone())
    }

    pub fn redo(&mut self) -> Option<String> {
        let next = self.history.redo(&self.text)?;
        self.text = next;
        Some(self.text.clone())
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.history.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_on_fresh_artifact_is_a_no_op() {
        let mut artifact = Artifact {
            text: "draft".into(),
            ..Artifact::default()
        };
        assert_eq!(artifact.undo(), None);
        assert_eq!(artifact.text, "draft");
    }

    #[test]
    fn undo_then_redo_restores_text() {
        let mut artifact = Artifact::default();
        artifact.history.checkpoint("v1");
        artifact.text = "v2".into();

        assert_eq!(artifact.undo().as_deref(), Some("v1"));
        assert_eq!(artifact.redo().as_deref(), Some("v2"));
    }
}
