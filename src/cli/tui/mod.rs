//! Interactive TUI for Daylist
//!
//! Shows the task list in the terminal using ratatui. Keyboard and mouse
//! input go through the [`Controller`](crate::controller::Controller); the
//! screen is redrawn from its view after every event.

mod app;
mod event;
mod ui;
mod utils;
mod views;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::app::Session;
use super::output::{Output, OutputFormat};
use crate::controller::Controller;
use app::App;
use event::EventHandler;

/// Launch the TUI
pub fn run(session: &Session) -> Result<()> {
    tracing::info!(data_file = %session.data_file.display(), "starting TUI");

    // Open before touching the terminal so errors print normally
    let store = session.open_store(&Output::new(OutputFormat::Text))?;
    let controller = Controller::new(store, &session.config);
    let mut app = App::new(controller);

    let mut terminal = ui::init_terminal()?;

    // Tick often enough for the removal highlight to feel smooth
    let event_handler = EventHandler::new(100);

    // Run the main loop with panic safety
    // This ensures terminal is restored even if the app panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        app.run(&mut terminal, event_handler)
    }));

    // Always restore terminal, even on panic
    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            }
        }
    }
}
