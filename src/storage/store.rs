//! Task store
//!
//! Owns the canonical [`TaskList`] and mirrors it to a [`Slot`]. Every
//! mutation ends with [`TaskStore::save`], which rewrites the whole slot and
//! marks the view as due for a rebuild.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::slot::Slot;
use crate::domain::{Task, TaskId, TaskList, ValidationError};

/// Failure while adding a task
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{0:#}")]
    Persist(anyhow::Error),
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        StoreError::Persist(err)
    }
}

/// Owner of the task list and its persisted copy
pub struct TaskStore {
    slot: Slot,
    tasks: TaskList,
    load_warning: Option<String>,
    render_due: bool,
}

impl TaskStore {
    /// Opens the store and loads whatever the slot holds
    pub fn open(slot: Slot) -> Result<Self> {
        let mut store = Self {
            slot,
            tasks: TaskList::new(),
            load_warning: None,
            render_due: false,
        };
        store.load()?;
        Ok(store)
    }

    /// Returns the backing slot
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Returns the current tasks, newest first
    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Returns the warning raised by the last load, if the slot was unreadable
    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    /// Replaces the in-memory list with the slot contents
    ///
    /// A missing slot loads as an empty list. A slot that does not parse also
    /// loads as an empty list; the file is copied aside first and a warning is
    /// kept for the caller to show.
    pub fn load(&mut self) -> Result<&TaskList> {
        self.load_warning = None;

        let raw = self.slot.read()?;
        self.tasks = match raw {
            None => {
                tracing::debug!(path = %self.slot.path().display(), "no saved tasks");
                TaskList::new()
            }
            Some(raw) if raw.trim().is_empty() => TaskList::new(),
            Some(raw) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => {
                    let count = tasks.len();
                    let list = TaskList::from_tasks(tasks);
                    if list.len() != count {
                        tracing::warn!(
                            dropped = count - list.len(),
                            "dropped tasks with duplicate ids"
                        );
                    }
                    list
                }
                Err(err) => {
                    tracing::warn!(error = %err, path = %self.slot.path().display(), "saved tasks are unreadable");
                    let kept = self.slot.quarantine()?;
                    self.load_warning = Some(format!(
                        "Saved tasks could not be read ({}); starting empty. A copy was kept at {}",
                        err,
                        kept.display()
                    ));
                    TaskList::new()
                }
            },
        };

        tracing::debug!(count = self.tasks.len(), "loaded tasks");
        self.render_due = true;
        Ok(&self.tasks)
    }

    /// Adds a task at the front of the list
    pub fn add(&mut self, text: &str) -> Result<Task, StoreError> {
        self.add_at(text, Utc::now())
    }

    /// Adds a task created at `now`
    pub fn add_at(&mut self, text: &str, now: DateTime<Utc>) -> Result<Task, StoreError> {
        let previous = self.tasks.clone();
        let task = self.tasks.create(text, now)?.clone();
        tracing::debug!(id = %task.id, "added task");
        self.save_or_restore(previous)?;
        Ok(task)
    }

    /// Flips completion on a task; unknown IDs change nothing
    ///
    /// Returns whether a task matched.
    pub fn toggle(&mut self, id: TaskId) -> Result<bool> {
        let previous = self.tasks.clone();
        let found = self.tasks.toggle(id);
        if !found {
            tracing::debug!(%id, "toggle: no such task");
        }
        self.save_or_restore(previous)?;
        Ok(found)
    }

    /// Replaces a task's text
    ///
    /// Text that is empty after trimming is discarded without touching the
    /// list. Returns whether the text was changed.
    pub fn update_text(&mut self, id: TaskId, text: &str) -> Result<bool> {
        if crate::domain::normalize_text(text).is_none() {
            tracing::debug!(%id, "update: empty text discarded");
            self.render_due = true;
            return Ok(false);
        }
        let previous = self.tasks.clone();
        let changed = self.tasks.update_text(id, text);
        if !changed {
            tracing::debug!(%id, "update: no such task");
        }
        self.save_or_restore(previous)?;
        Ok(changed)
    }

    /// Removes a task; unknown IDs change nothing
    ///
    /// Returns whether a task was removed.
    pub fn delete(&mut self, id: TaskId) -> Result<bool> {
        let previous = self.tasks.clone();
        let removed = self.tasks.remove(id);
        if !removed {
            tracing::debug!(%id, "delete: no such task");
        }
        self.save_or_restore(previous)?;
        Ok(removed)
    }

    /// Writes the full list to the slot and flags a re-render
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks).context("Failed to serialize tasks")?;
        self.slot.write(&json)?;
        tracing::trace!(count = self.tasks.len(), "saved tasks");
        self.render_due = true;
        Ok(())
    }

    /// Saves, or puts `previous` back if the slot could not be written
    ///
    /// The in-memory list never holds a change the slot does not.
    fn save_or_restore(&mut self, previous: TaskList) -> Result<()> {
        if let Err(err) = self.save() {
            tracing::warn!(error = %format!("{:#}", err), "save failed; change rolled back");
            self.tasks = previous;
            self.render_due = true;
            return Err(err);
        }
        Ok(())
    }

    /// Returns true once after each save or load
    pub fn take_render_due(&mut self) -> bool {
        std::mem::take(&mut self.render_due)
    }
}
