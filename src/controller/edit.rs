//! Inline edit session

use crate::domain::TaskId;

/// An open inline edit on one row
///
/// The session is consumed by [`EditSession::finish`], so an edit can only be
/// committed once no matter how many commit triggers fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    id: TaskId,
    buffer: String,
}

impl EditSession {
    /// Opens an edit pre-filled with the task's current text
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            buffer: text.into(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn pop(&mut self) {
        self.buffer.pop();
    }

    /// Closes the session, yielding the task and the edited text
    pub fn finish(self) -> (TaskId, String) {
        (self.id, self.buffer)
    }
}
