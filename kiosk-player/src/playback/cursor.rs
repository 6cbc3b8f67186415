//! Playback cursor over the active queue
//!
//! Invariant: in `Playing(i)`, `i < len` of the queue the cursor was last
//! synced against.

/// Cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Queue has no items
    Empty,
    /// Index into the active queue
    Playing(usize),
}

#[derive(Debug, Clone)]
pub struct PlaybackCursor {
    state: CursorState,
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackCursor {
    pub fn new() -> Self {
        Self { state: CursorState::Empty }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            CursorState::Playing(i) => Some(i),
            CursorState::Empty => None,
        }
    }

    /// Mode switch: restart at the head of a queue of `len` items
    pub fn reset(&mut self, len: usize) -> CursorState {
        self.state = if len > 0 {
            CursorState::Playing(0)
        } else {
            CursorState::Empty
        };
        self.state
    }

    /// Hold expiry or media end: step to the next item, wrapping around
    ///
    /// Returns `None` when there is nothing to advance over.
    pub fn advance(&mut self, len: usize) -> Option<CursorState> {
        match self.state {
            CursorState::Playing(i) if len > 0 => {
                self.state = CursorState::Playing((i + 1) % len);
                Some(self.state)
            }
            _ => None,
        }
    }
}
