//! # Storage Layer
//!
//! Persistence for Daylist.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSON array, newest first | `<data dir>/tasks.json` |
//! | Config | TOML | `<config dir>/config.toml` |
//!
//! ## Write Discipline
//!
//! - Every mutation rewrites the whole task file (no partial updates)
//! - Writes are atomic (temp file + rename) under an `fs2` lock
//! - An unreadable task file is copied to `tasks.json.corrupt` and the list
//!   starts empty
//!
//! ## Key Types
//!
//! - [`TaskStore`] - Owns the task list and saves it after every change
//! - [`Slot`] - The file the list is mirrored to
//! - [`Config`] - User configuration

mod slot;
mod store;
mod config;

pub use slot::Slot;
pub use store::{StoreError, TaskStore};
pub use config::{Config, ConfigError};
