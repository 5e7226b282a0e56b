//! Daylist - A local-first task list for the terminal
//!
//! Tasks live in a single JSON slot on disk. Every mutation rewrites the
//! whole slot, and every view is rebuilt from the full list and the current
//! filter.

pub mod domain;
pub mod storage;
pub mod view;
pub mod controller;
pub mod logging;
pub mod cli;

pub use domain::{Filter, Task, TaskId};
pub use storage::TaskStore;
pub use view::{render, ViewList};
pub use controller::Controller;
