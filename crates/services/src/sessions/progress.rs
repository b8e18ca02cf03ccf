use super::state::EngineState;

/// Aggregated view of lesson progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// One-based position of the current exercise; 0 when idle.
    pub position: usize,
    pub total: usize,
    pub answered: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub hearts_remaining: u32,
    pub state: EngineState,
}

impl SessionProgress {
    #[must_use]
    pub fn idle() -> Self {
        Self {
            position: 0,
            total: 0,
            answered: 0,
            correct: 0,
            incorrect: 0,
            hearts_remaining: 0,
            state: EngineState::Idle,
        }
    }
}
