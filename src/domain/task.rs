//! Task domain model
//!
//! A task is a short line of text with a completion flag. Tasks are kept in a
//! [`TaskList`], newest first, and are only ever changed in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::id::{IdError, TaskId};

/// Why a task could not be created
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a task name")]
    EmptyText,

    #[error(transparent)]
    Id(#[from] IdError),
}

/// Trims task text, returning `None` when nothing is left
pub fn normalize_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique ID, fixed at creation
    pub id: TaskId,

    /// Task text, never empty after trimming
    pub text: String,

    /// Whether the task is done
    pub completed: bool,

    /// When the task was created (millisecond precision)
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new open task
    ///
    /// The text is trimmed; text that is empty after trimming is rejected.
    pub fn new(id: TaskId, text: &str, created_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        let text = normalize_text(text).ok_or(ValidationError::EmptyText)?;
        Ok(Self {
            id,
            text: text.to_string(),
            completed: false,
            created_at: truncate_to_millis(created_at),
        })
    }

    /// Flips the completion flag
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Replaces the text if the new text is non-empty after trimming
    ///
    /// Returns false (and leaves the task untouched) otherwise.
    pub fn set_text(&mut self, text: &str) -> bool {
        match normalize_text(text) {
            Some(text) => {
                self.text = text.to_string();
                true
            }
            None => false,
        }
    }
}

/// Drops sub-millisecond precision so timestamps survive an ISO-8601 round-trip
fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp.timestamp_millis()).unwrap_or(timestamp)
}

/// Ordered list of tasks, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList(Vec<Task>);

impl TaskList {
    /// Creates an empty list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a list from tasks in stored order
    ///
    /// Later tasks whose ID repeats an earlier one are dropped so that IDs
    /// stay unique.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut seen = HashSet::new();
        Self(tasks.into_iter().filter(|t| seen.insert(t.id)).collect())
    }

    /// Returns the tasks in display order
    pub fn as_slice(&self) -> &[Task] {
        &self.0
    }

    /// Iterates over tasks in display order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.0.iter()
    }

    /// Returns the number of tasks
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no tasks
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a task by ID
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.0.iter().find(|t| t.id == id)
    }

    /// Returns true if a task with this ID exists
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the largest ID in the list
    pub fn newest_id(&self) -> Option<TaskId> {
        self.0.iter().map(|t| t.id).max()
    }

    /// Creates a task with a fresh ID and puts it at the front
    pub fn create(&mut self, text: &str, now: DateTime<Utc>) -> Result<&Task, ValidationError> {
        if normalize_text(text).is_none() {
            return Err(ValidationError::EmptyText);
        }
        let id = TaskId::allocate(now, self.newest_id())?;
        let task = Task::new(id, text, now)?;
        self.0.insert(0, task);
        Ok(&self.0[0])
    }

    /// Flips completion on the matching task
    ///
    /// Returns false if no task has this ID.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        match self.0.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        }
    }

    /// Replaces the text on the matching task
    ///
    /// Returns false if no task has this ID or the text is empty.
    pub fn update_text(&mut self, id: TaskId, text: &str) -> bool {
        self.0
            .iter_mut()
            .find(|t| t.id == id)
            .map(|task| task.set_text(text))
            .unwrap_or(false)
    }

    /// Removes the matching task
    ///
    /// Returns false if no task has this ID.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let len_before = self.0.len();
        self.0.retain(|t| t.id != id);
        self.0.len() != len_before
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
