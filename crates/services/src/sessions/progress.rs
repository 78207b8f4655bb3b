/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// One-based position of the current question, `0` without a session.
    pub position: usize,
    pub is_complete: bool,
}
