use std::collections::HashSet;

/// Display texts already asked in the current session.
///
/// Owned by the session state and lent mutably to the generator, which is the
/// only writer while a session runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedQuestions(HashSet<String>);

impl UsedQuestions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, display_text: &str) -> bool {
        self.0.contains(display_text)
    }

    /// Records a display text. Returns `false` if it was already present.
    pub fn insert(&mut self, display_text: impl Into<String>) -> bool {
        self.0.insert(display_text.into())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
