//! TUI screens

pub mod list;
