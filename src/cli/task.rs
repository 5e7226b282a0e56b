//! One-shot task commands

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use super::app::Session;
use super::output::Output;
use crate::domain::{Filter, TaskId};
use crate::view::{escape_text, render};

pub fn add(session: &Session, output: &Output, text: &str) -> Result<()> {
    let mut store = session.open_store(output)?;
    let task = store.add(text)?;

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Added task {}: {}", task.id, escape_text(&task.text)));
    }

    Ok(())
}

pub fn list(session: &Session, output: &Output, filter: Filter) -> Result<()> {
    let store = session.open_store(output)?;
    let view = render(store.tasks(), filter);

    if output.is_json() {
        output.data(&view);
    } else if let Some(placeholder) = view.placeholder {
        println!("{}", placeholder);
    } else {
        for row in &view.rows {
            println!("{} {:<14} {}", row.marker(), row.id, row.text);
        }
    }

    Ok(())
}

pub fn toggle(session: &Session, output: &Output, id_str: &str) -> Result<()> {
    let id: TaskId = id_str.parse()?;
    let mut store = session.open_store(output)?;

    if !store.toggle(id)? {
        return not_found(output, id);
    }

    let Some(task) = store.tasks().get(id) else {
        return not_found(output, id);
    };

    if output.is_json() {
        output.data(task);
    } else if task.completed {
        output.success(&format!("Completed task {}", id));
    } else {
        output.success(&format!("Reopened task {}", id));
    }

    Ok(())
}

pub fn edit(session: &Session, output: &Output, id_str: &str, text: &str) -> Result<()> {
    let id: TaskId = id_str.parse()?;
    let mut store = session.open_store(output)?;

    if !store.tasks().contains(id) {
        return not_found(output, id);
    }

    if !store.update_text(id, text)? {
        output.success(&format!("Task {} unchanged: text is empty", id));
        return Ok(());
    }

    if output.is_json() {
        if let Some(task) = store.tasks().get(id) {
            output.data(task);
        }
    } else {
        output.success(&format!("Updated task {}", id));
    }

    Ok(())
}

pub fn remove(session: &Session, output: &Output, id_str: &str, yes: bool) -> Result<()> {
    let id: TaskId = id_str.parse()?;
    let mut store = session.open_store(output)?;

    let Some(task) = store.tasks().get(id) else {
        return not_found(output, id);
    };

    if !yes && !confirm(&format!("Delete this task? \"{}\"", escape_text(&task.text)))? {
        output.success("Cancelled");
        return Ok(());
    }

    store.delete(id)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "deleted": true,
        }));
    } else {
        output.success(&format!("Deleted task {}", id));
    }

    Ok(())
}

fn not_found(output: &Output, id: TaskId) -> Result<()> {
    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "found": false,
        }));
    } else {
        println!("No task with id {}", id);
    }
    Ok(())
}

/// Asks a yes/no question on stderr; anything but y/yes is a no
fn confirm(question: &str) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{} [y/N] ", question)?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
