/// Position pointer into the current working set during one session.
///
/// Created once at 0, only ever incremented. Exhaustion against the working
/// set length is the caller's check; an exhausted cursor means the stage is
/// complete, not that anything went wrong.
#[derive(Debug, Clone, Default)]
pub struct SessionCursor {
    position: usize,
}

impl SessionCursor {
    pub fn new() -> SessionCursor {
        SessionCursor { position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move to the next document. No upper bound is enforced here.
    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// Rewind to the start of the working set (used on stage change under
    /// the `reset` cursor policy).
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn is_exhausted(&self, eligible_count: usize) -> bool {
        self.position >= eligible_count
    }

    /// Row identity under the cursor, None once the working set is exhausted.
    pub fn current_row(&self, eligible: &[usize]) -> Option<usize> {
        eligible.get(self.position).copied()
    }
}
