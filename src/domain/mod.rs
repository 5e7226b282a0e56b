//! Domain models for Daylist
//!
//! Contains the task list logic without any I/O concerns.

mod id;
mod task;
mod filter;

pub use id::{IdError, TaskId};
pub use task::{normalize_text, Task, TaskList, ValidationError};
pub use filter::Filter;
