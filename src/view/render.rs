//! Projection of the task list into the visible list

use serde::Serialize;

use super::escape::escape_text;
use crate::domain::{Filter, Task, TaskId, TaskList};

/// Shown instead of the list when nothing passes the filter
pub const EMPTY_PLACEHOLDER: &str = "No tasks";

/// Width of the toggle region at the start of a row (`[x] `)
pub const TOGGLE_WIDTH: u16 = 4;

/// Action controls at the end of a row
pub const ACTIONS: &str = "[e] [d]";

/// Clickable region of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    /// The checkbox
    Toggle,
    /// The task text
    Content,
    /// The edit control
    Edit,
    /// The delete control
    Delete,
}

impl RowTarget {
    /// Finds the region under `column` on a row `width` cells wide
    ///
    /// Returns `None` for the gap between the action controls.
    pub fn at(column: u16, width: u16) -> Option<Self> {
        let actions_width = ACTIONS.len() as u16;
        if column < TOGGLE_WIDTH {
            return Some(RowTarget::Toggle);
        }
        if width < TOGGLE_WIDTH + actions_width || column >= width {
            return Some(RowTarget::Content);
        }

        let actions_start = width - actions_width;
        match column.checked_sub(actions_start) {
            None => Some(RowTarget::Content),
            Some(0..=2) => Some(RowTarget::Edit),
            Some(3) => None,
            Some(_) => Some(RowTarget::Delete),
        }
    }
}

/// One visible task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: TaskId,
    /// Escaped text, safe to print
    pub text: String,
    /// Completed rows are drawn distinctly
    pub completed: bool,
}

impl Row {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            text: escape_text(&task.text).into_owned(),
            completed: task.completed,
        }
    }

    /// Checkbox marker for the toggle region
    pub fn marker(&self) -> &'static str {
        if self.completed {
            "[x]"
        } else {
            "[ ]"
        }
    }
}

/// The list as it should be displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewList {
    pub filter: Filter,
    pub rows: Vec<Row>,
    /// Set when `rows` is empty; the list is hidden and this is shown instead
    pub placeholder: Option<&'static str>,
}

impl ViewList {
    /// Returns true if the list itself is visible
    pub fn shows_list(&self) -> bool {
        self.placeholder.is_none()
    }

    /// Finds the position of a task among the visible rows
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }
}

/// Builds the visible list for `filter`, keeping list order
pub fn render(tasks: &TaskList, filter: Filter) -> ViewList {
    let rows: Vec<Row> = tasks
        .iter()
        .filter(|t| filter.matches(t))
        .map(Row::from_task)
        .collect();

    let placeholder = if rows.is_empty() {
        Some(EMPTY_PLACEHOLDER)
    } else {
        None
    };

    ViewList {
        filter,
        rows,
        placeholder,
    }
}
