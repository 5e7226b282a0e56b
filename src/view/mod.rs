//! Renderer
//!
//! [`render`] is a pure function from the task list and the active filter to
//! the rows that should be visible. The terminal UI and the `list` command
//! both draw from its output, and rebuild it in full after every change.

mod escape;
mod render;

pub use escape::escape_text;
pub use render::{render, Row, RowTarget, ViewList, ACTIONS, EMPTY_PLACEHOLDER, TOGGLE_WIDTH};
