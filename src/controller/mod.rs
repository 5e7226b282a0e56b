//! Interaction controller
//!
//! Turns user intents (submit, filter selection, row clicks, inline edits,
//! delete confirmation) into [`TaskStore`] calls and transient feedback. The
//! controller owns all interactive state; the terminal front end only maps
//! keys and mouse events onto these methods and draws what the accessors
//! return.
//!
//! Per row, the controller moves through:
//!
//! ```text
//! Viewing -> Editing -> Viewing                      (commit or empty edit)
//! Viewing -> PendingDelete -> Removing -> (removed)  (confirmed)
//!                          -> Viewing                (declined)
//! ```
//!
//! Only one row is ever editing or pending deletion. Persistence failures are
//! logged and shown as a flash message; nothing here is fatal.

mod edit;
mod flash;

use std::time::{Duration, Instant};

use crate::domain::{Filter, TaskId};
use crate::storage::{Config, StoreError, TaskStore};
use crate::view::{render, RowTarget, ViewList};

pub use edit::EditSession;
pub use flash::Flash;

/// Where typed characters go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The new-task input line
    #[default]
    Input,
    /// The task list
    List,
}

/// Interaction mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Viewing,
    Editing(EditSession),
    PendingDelete(TaskId),
}

/// State of a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Viewing,
    Editing,
    PendingDelete,
    Removing,
}

/// A confirmed delete waiting for its removal highlight to finish
#[derive(Debug, Clone, Copy)]
struct Removal {
    id: TaskId,
    due: Instant,
}

/// Application state for one interactive session
pub struct Controller {
    store: TaskStore,
    filter: Filter,
    view: ViewList,
    focus: Focus,
    mode: Mode,
    input: String,
    selected: usize,
    removals: Vec<Removal>,
    removal_delay: Duration,
    flash: Flash,
}

impl Controller {
    /// Creates a controller over an opened store
    ///
    /// A warning from loading the store is shown as the first message.
    pub fn new(store: TaskStore, config: &Config) -> Self {
        let view = render(store.tasks(), Filter::default());
        let mut flash = Flash::new(config.message_ttl());
        if let Some(warning) = store.load_warning() {
            flash.set(warning);
        }

        let mut controller = Self {
            store,
            filter: Filter::default(),
            view,
            focus: Focus::Input,
            mode: Mode::Viewing,
            input: String::new(),
            selected: 0,
            removals: Vec::new(),
            removal_delay: config.removal_delay(),
            flash,
        };
        controller.refresh();
        controller
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn view(&self) -> &ViewList {
        &self.view
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn message(&self) -> Option<&str> {
        self.flash.current()
    }

    /// Index of the selected row in the visible list
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.view.rows.get(self.selected).map(|r| r.id)
    }

    /// Returns the open edit session, if any
    pub fn editing(&self) -> Option<&EditSession> {
        match &self.mode {
            Mode::Editing(session) => Some(session),
            _ => None,
        }
    }

    /// Returns the task waiting for delete confirmation, if any
    pub fn pending_delete(&self) -> Option<TaskId> {
        match self.mode {
            Mode::PendingDelete(id) => Some(id),
            _ => None,
        }
    }

    pub fn row_state(&self, id: TaskId) -> RowState {
        match &self.mode {
            Mode::Editing(session) if session.id() == id => return RowState::Editing,
            Mode::PendingDelete(pending) if *pending == id => return RowState::PendingDelete,
            _ => {}
        }
        if self.removals.iter().any(|r| r.id == id) {
            RowState::Removing
        } else {
            RowState::Viewing
        }
    }

    // ---------------------------------------------------------------------
    // Text entry
    // ---------------------------------------------------------------------

    /// Types a character into the edit field, or the input line
    pub fn type_char(&mut self, c: char) {
        match &mut self.mode {
            Mode::Editing(session) => session.push(c),
            Mode::PendingDelete(_) => {}
            Mode::Viewing => {
                self.focus = Focus::Input;
                self.input.push(c);
            }
        }
    }

    /// Deletes the last character of the edit field, or the input line
    pub fn backspace(&mut self) {
        match &mut self.mode {
            Mode::Editing(session) => session.pop(),
            Mode::PendingDelete(_) => {}
            Mode::Viewing => {
                self.input.pop();
            }
        }
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.blur_edit();
        self.focus = focus;
    }

    pub fn toggle_focus(&mut self) {
        let next = match self.focus {
            Focus::Input => Focus::List,
            Focus::List => Focus::Input,
        };
        self.set_focus(next);
    }

    // ---------------------------------------------------------------------
    // Intents
    // ---------------------------------------------------------------------

    /// Adds the input line as a new task
    ///
    /// Empty input shows a validation message. On success the input is
    /// cleared and focus returns to it.
    pub fn submit(&mut self) {
        match self.store.add(&self.input) {
            Ok(task) => {
                tracing::info!(id = %task.id, "task added");
                self.input.clear();
                self.flash.clear();
                self.focus = Focus::Input;
                self.selected = 0;
            }
            Err(StoreError::Invalid(err)) => self.flash.set(err.to_string()),
            Err(StoreError::Persist(err)) => self.report(err),
        }
        self.refresh();
    }

    /// Makes `filter` the single active filter
    pub fn select_filter(&mut self, filter: Filter) {
        if self.pending_delete().is_some() {
            return;
        }
        self.blur_edit();
        self.filter = filter;
        self.selected = 0;
        tracing::debug!(%filter, "filter selected");
        self.view = render(self.store.tasks(), self.filter);
    }

    /// Selects the next filter tab
    pub fn cycle_filter(&mut self) {
        let current = Filter::TABS
            .iter()
            .position(|f| *f == self.filter)
            .unwrap_or(0);
        self.select_filter(Filter::TABS[(current + 1) % Filter::TABS.len()]);
    }

    /// Moves the row selection, wrapping at either end
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.view.rows.len();
        if len == 0 || self.editing().is_some() {
            return;
        }
        self.selected = (self.selected as isize + delta).rem_euclid(len as isize) as usize;
    }

    pub fn select_row(&mut self, index: usize) {
        if index < self.view.rows.len() {
            self.selected = index;
        }
    }

    /// Handles a click on a row region
    pub fn click(&mut self, id: TaskId, target: RowTarget) {
        if self.pending_delete().is_some() {
            return;
        }
        if let Some(position) = self.view.position(id) {
            self.selected = position;
        }
        self.focus = Focus::List;

        match target {
            RowTarget::Toggle | RowTarget::Content => {
                if self.editing().is_some_and(|s| s.id() == id) {
                    return;
                }
                self.blur_edit();
                self.toggle(id);
            }
            RowTarget::Edit => self.begin_edit(id),
            RowTarget::Delete => self.request_delete(id),
        }
    }

    /// Flips completion on a task
    pub fn toggle(&mut self, id: TaskId) {
        if self.row_state(id) != RowState::Viewing {
            return;
        }
        if let Err(err) = self.store.toggle(id) {
            self.report(err);
        }
        self.refresh();
    }

    /// Opens an inline edit on a task
    pub fn begin_edit(&mut self, id: TaskId) {
        if self.editing().is_some_and(|s| s.id() == id) {
            return;
        }
        self.blur_edit();
        if self.row_state(id) != RowState::Viewing {
            return;
        }
        let Some(task) = self.store.tasks().get(id) else {
            return;
        };
        self.mode = Mode::Editing(EditSession::new(id, task.text.clone()));
        self.focus = Focus::List;
    }

    /// Commits the open edit (Enter)
    ///
    /// Returns false if no edit was open.
    pub fn commit_edit(&mut self) -> bool {
        let session = match std::mem::take(&mut self.mode) {
            Mode::Editing(session) => session,
            other => {
                self.mode = other;
                return false;
            }
        };
        let (id, text) = session.finish();
        match self.store.update_text(id, &text) {
            Ok(true) => tracing::info!(%id, "task edited"),
            Ok(false) => tracing::debug!(%id, "edit discarded"),
            Err(err) => self.report(err),
        }
        self.refresh();
        true
    }

    /// Commits the open edit because the field lost focus
    ///
    /// Does nothing if the edit was already committed.
    pub fn blur_edit(&mut self) -> bool {
        self.commit_edit()
    }

    /// Asks for confirmation before deleting a task
    pub fn request_delete(&mut self, id: TaskId) {
        self.blur_edit();
        if self.row_state(id) != RowState::Viewing || !self.store.tasks().contains(id) {
            return;
        }
        self.mode = Mode::PendingDelete(id);
    }

    /// Answers the pending delete confirmation
    ///
    /// With a removal delay, the task stays in the list until [`tick`]
    /// passes the deadline.
    ///
    /// [`tick`]: Controller::tick
    pub fn confirm_delete(&mut self, confirmed: bool) {
        let Mode::PendingDelete(id) = self.mode else {
            return;
        };
        self.mode = Mode::Viewing;

        if !confirmed {
            tracing::debug!(%id, "delete declined");
            return;
        }

        if self.removal_delay.is_zero() {
            self.delete_now(id);
        } else {
            self.removals.push(Removal {
                id,
                due: Instant::now() + self.removal_delay,
            });
        }
    }

    /// Re-reads the task file
    ///
    /// Confirmed deletes still in their removal highlight are carried out
    /// first.
    pub fn reload(&mut self) {
        self.blur_edit();
        for removal in std::mem::take(&mut self.removals) {
            self.delete_now(removal.id);
        }
        match self.store.load() {
            Ok(_) => {
                if let Some(warning) = self.store.load_warning() {
                    let warning = warning.to_string();
                    self.flash.set(warning);
                }
            }
            Err(err) => self.report(err),
        }
        self.refresh();
    }

    /// Advances timers: expires the message and finishes due removals
    pub fn tick(&mut self, now: Instant) {
        self.flash.tick(now);

        let (due, waiting): (Vec<Removal>, Vec<Removal>) = std::mem::take(&mut self.removals)
            .into_iter()
            .partition(|r| r.due <= now);
        self.removals = waiting;
        for removal in due {
            self.delete_now(removal.id);
        }
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn delete_now(&mut self, id: TaskId) {
        match self.store.delete(id) {
            Ok(true) => tracing::info!(%id, "task deleted"),
            Ok(false) => {}
            Err(err) => self.report(err),
        }
        self.refresh();
    }

    /// Rebuilds the view if the store saved or loaded since the last rebuild
    fn refresh(&mut self) {
        if !self.store.take_render_due() {
            return;
        }
        self.view = render(self.store.tasks(), self.filter);
        if self.selected >= self.view.rows.len() {
            self.selected = self.view.rows.len().saturating_sub(1);
        }
    }

    fn report(&mut self, err: anyhow::Error) {
        tracing::error!(error = %format!("{:#}", err), "failed to save tasks");
        self.flash.set(format!("Error: {:#}", err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Slot;
    use tempfile::TempDir;

    fn controller_with(dir: &TempDir, removal_delay_ms: u64) -> Controller {
        let store = TaskStore::open(Slot::new(dir.path().join("tasks.json"))).unwrap();
        let config = Config {
            removal_delay_ms,
            ..Config::default()
        };
        Controller::new(store, &config)
    }

    fn controller(dir: &TempDir) -> Controller {
        controller_with(dir, 0)
    }

    fn add(c: &mut Controller, text: &str) -> TaskId {
        for ch in text.chars() {
            c.type_char(ch);
        }
        c.submit();
        c.store().tasks().iter().next().unwrap().id
    }

    fn visible(c: &Controller) -> Vec<&str> {
        c.view().rows.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn submit_adds_and_clears_input() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);

        add(&mut c, "buy milk");
        assert_eq!(visible(&c), ["buy milk"]);
        assert_eq!(c.input(), "");
        assert_eq!(c.focus(), Focus::Input);
        assert_eq!(c.message(), None);
    }

    #[test]
    fn submit_whitespace_shows_message() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);

        add(&mut c, "A");
        c.type_char(' ');
        c.submit();

        assert_eq!(c.store().tasks().len(), 1);
        assert_eq!(c.message(), Some("Please enter a task name"));
    }

    #[test]
    fn validation_message_clears_after_ttl() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);

        c.submit();
        assert!(c.message().is_some());
        c.tick(Instant::now() + Duration::from_millis(3001));
        assert_eq!(c.message(), None);
    }

    #[test]
    fn filter_selection_only_changes_view() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");
        add(&mut c, "B");
        c.toggle(a);

        c.select_filter(Filter::Completed);
        assert_eq!(visible(&c), ["A"]);
        c.select_filter(Filter::Active);
        assert_eq!(visible(&c), ["B"]);
        assert_eq!(c.store().tasks().len(), 2);

        c.select_filter(Filter::All);
        assert_eq!(visible(&c), ["B", "A"]);
    }

    #[test]
    fn cycle_filter_wraps() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);

        c.cycle_filter();
        assert_eq!(c.filter(), Filter::Active);
        c.cycle_filter();
        c.cycle_filter();
        assert_eq!(c.filter(), Filter::All);
    }

    #[test]
    fn click_on_checkbox_or_text_toggles() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");

        c.click(a, RowTarget::Toggle);
        assert!(c.store().tasks().get(a).unwrap().completed);
        c.click(a, RowTarget::Content);
        assert!(!c.store().tasks().get(a).unwrap().completed);
    }

    #[test]
    fn click_on_editing_row_does_not_toggle() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");

        c.click(a, RowTarget::Edit);
        assert_eq!(c.row_state(a), RowState::Editing);

        c.click(a, RowTarget::Content);
        assert!(!c.store().tasks().get(a).unwrap().completed);
        assert_eq!(c.row_state(a), RowState::Editing);
    }

    #[test]
    fn edit_prefills_and_commits_on_enter() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");

        c.begin_edit(a);
        assert_eq!(c.editing().unwrap().text(), "A");
        c.type_char('2');
        assert!(c.commit_edit());

        assert_eq!(c.store().tasks().get(a).unwrap().text, "A2");
        assert_eq!(c.row_state(a), RowState::Viewing);
    }

    #[test]
    fn enter_then_blur_commits_once() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");

        c.begin_edit(a);
        c.type_char('!');
        assert!(c.commit_edit());
        assert!(!c.blur_edit());
        assert_eq!(c.store().tasks().get(a).unwrap().text, "A!");
    }

    #[test]
    fn blur_commits_edit() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");

        c.begin_edit(a);
        c.backspace();
        c.type_char('Z');
        c.set_focus(Focus::Input);

        assert_eq!(c.store().tasks().get(a).unwrap().text, "Z");
        assert!(c.editing().is_none());
    }

    #[test]
    fn empty_edit_reverts() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");

        c.begin_edit(a);
        c.backspace();
        c.type_char(' ');
        c.commit_edit();

        assert_eq!(c.store().tasks().get(a).unwrap().text, "A");
        assert_eq!(visible(&c), ["A"]);
    }

    #[test]
    fn editing_another_row_commits_the_first() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");
        let b = add(&mut c, "B");

        c.begin_edit(a);
        c.type_char('1');
        c.begin_edit(b);

        assert_eq!(c.store().tasks().get(a).unwrap().text, "A1");
        assert_eq!(c.editing().unwrap().id(), b);
    }

    #[test]
    fn delete_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");

        c.click(a, RowTarget::Delete);
        assert_eq!(c.pending_delete(), Some(a));

        c.confirm_delete(false);
        assert_eq!(c.pending_delete(), None);
        assert!(c.store().tasks().contains(a));

        c.request_delete(a);
        c.confirm_delete(true);
        assert!(!c.store().tasks().contains(a));
        assert_eq!(c.view().placeholder, Some("No tasks"));
    }

    #[test]
    fn pending_delete_blocks_other_actions() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        let a = add(&mut c, "A");

        c.request_delete(a);
        c.click(a, RowTarget::Toggle);
        c.select_filter(Filter::Completed);
        c.type_char('x');

        assert!(!c.store().tasks().get(a).unwrap().completed);
        assert_eq!(c.filter(), Filter::All);
        assert_eq!(c.input(), "");
        assert_eq!(c.pending_delete(), Some(a));
    }

    #[test]
    fn removal_waits_for_transition() {
        let dir = TempDir::new().unwrap();
        let mut c = controller_with(&dir, 250);
        let a = add(&mut c, "A");

        c.request_delete(a);
        c.confirm_delete(true);
        assert_eq!(c.row_state(a), RowState::Removing);
        assert!(c.store().tasks().contains(a));

        c.toggle(a);
        assert!(!c.store().tasks().get(a).unwrap().completed);

        c.tick(Instant::now() + Duration::from_millis(300));
        assert!(!c.store().tasks().contains(a));
        assert!(c.view().rows.is_empty());
    }

    #[test]
    fn reload_finishes_confirmed_removal() {
        let dir = TempDir::new().unwrap();
        let mut c = controller_with(&dir, 250);
        let a = add(&mut c, "A");
        let b = add(&mut c, "B");

        c.request_delete(a);
        c.confirm_delete(true);
        c.reload();

        assert!(!c.store().tasks().contains(a));
        assert!(c.store().tasks().contains(b));
        assert_eq!(c.row_state(a), RowState::Viewing);

        c.tick(Instant::now() + Duration::from_secs(5));
        let reopened = TaskStore::open(Slot::new(dir.path().join("tasks.json"))).unwrap();
        assert!(!reopened.tasks().contains(a));
        assert!(reopened.tasks().contains(b));
    }

    #[test]
    fn toggle_unknown_id_is_silent() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        add(&mut c, "A");

        c.toggle(TaskId::new(1));
        assert_eq!(c.message(), None);
        assert_eq!(visible(&c), ["A"]);
    }

    #[test]
    fn selection_follows_view() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);
        add(&mut c, "A");
        add(&mut c, "B");
        let last = add(&mut c, "C");

        c.move_selection(-1);
        assert_eq!(c.selected(), 2);
        let id = c.selected_id().unwrap();
        c.request_delete(id);
        c.confirm_delete(true);
        assert_eq!(c.selected(), 1);
        assert_eq!(c.selected_id(), c.view().rows.get(1).map(|r| r.id));
        assert!(c.store().tasks().contains(last));
    }

    #[test]
    fn load_warning_is_shown() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("tasks.json"), "[{").unwrap();
        let c = controller(&dir);

        assert!(c.message().unwrap().contains("could not be read"));
        assert_eq!(c.view().placeholder, Some("No tasks"));
    }

    #[test]
    fn scenario_from_empty() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir);

        let a = add(&mut c, "A");
        let b = add(&mut c, "B");
        assert_eq!(visible(&c), ["B", "A"]);

        c.toggle(a);
        c.select_filter(Filter::Completed);
        assert_eq!(visible(&c), ["A"]);

        c.select_filter(Filter::All);
        c.request_delete(b);
        c.confirm_delete(true);
        assert_eq!(visible(&c), ["A"]);
    }
}
