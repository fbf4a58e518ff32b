//! Detects the start of a typing session in an input field.

/// Tracks one input field. Reports once when the field goes from empty to
/// non-empty, and re-arms when it is emptied again.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypingGuard {
    typing: bool,
}

impl TypingGuard {
    /// Creates a guard for an empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the field's new value. Returns `true` exactly when a typing
    /// session starts.
    pub fn on_input(&mut self, value: &str) -> bool {
        if value.is_empty() {
            self.typing = false;
            return false;
        }
        let started = !self.typing;
        self.typing = true;
        started
    }

    /// Whether a typing session is in progress.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing
    }
}
