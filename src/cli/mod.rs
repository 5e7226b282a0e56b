//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | (none), `tui` | Interactive task list |
//! | `add` | Add a task |
//! | `list` | Show tasks, optionally filtered |
//! | `toggle` | Mark a task done or open |
//! | `edit` | Change a task's text |
//! | `rm` | Delete a task after confirmation |
//! | `path` | Show file locations |
//!
//! ## Output Formats
//!
//! All one-shot commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logging, or set `DAYLIST_LOG`:
//! ```bash
//! daylist --verbose list
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod task;
mod tui;

pub use app::{run, Cli, Commands, Session};
pub use output::{Output, OutputFormat};
