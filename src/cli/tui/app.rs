//! TUI application: maps terminal input onto the controller

use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::event::{Event, EventHandler};
use super::ui::Terminal;
use super::utils::contains;
use super::views::list;
use crate::controller::{Controller, Focus};
use crate::domain::Filter;
use crate::view::RowTarget;

/// Application state
pub struct App {
    controller: Controller,

    /// Screen size at the last draw, for mouse hit-testing
    area: Rect,

    /// Whether to quit
    should_quit: bool,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            area: Rect::default(),
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            let size = terminal.size()?;
            self.area = Rect::new(0, 0, size.width, size.height);
            terminal.draw(|frame| list::draw(frame, self))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                Event::Resize(_, _) => {} // Redrawn on the next pass
                Event::Tick => self.controller.tick(Instant::now()),
            }
        }

        // Leaving the screen is a blur too
        self.controller.blur_edit();
        Ok(())
    }

    /// Handle key events
    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('f') => self.controller.cycle_filter(),
                _ => {}
            }
            return;
        }

        if self.controller.pending_delete().is_some() {
            self.handle_confirm_key(key);
        } else if self.controller.editing().is_some() {
            self.handle_edit_key(key);
        } else {
            match self.controller.focus() {
                Focus::Input => self.handle_input_key(key),
                Focus::List => self.handle_list_key(key),
            }
        }
    }

    /// Keys while the delete confirmation is open
    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.controller.confirm_delete(true)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.controller.confirm_delete(false)
            }
            _ => {}
        }
    }

    /// Keys while a row is being edited
    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.controller.commit_edit();
            }
            KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => {
                self.controller.blur_edit();
            }
            KeyCode::Backspace => self.controller.backspace(),
            KeyCode::Char(c) => self.controller.type_char(c),
            _ => {}
        }
    }

    /// Keys while the new-task input has focus
    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.controller.submit(),
            KeyCode::Backspace => self.controller.backspace(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Esc => {
                self.controller.set_focus(Focus::List)
            }
            KeyCode::Char(c) => self.controller.type_char(c),
            _ => {}
        }
    }

    /// Keys while the task list has focus
    fn handle_list_key(&mut self, key: KeyEvent) {
        let selected = self.controller.selected_id();

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('j') | KeyCode::Down => self.controller.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.controller.move_selection(-1),

            KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => {
                if let Some(id) = selected {
                    self.controller.toggle(id);
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = selected {
                    self.controller.begin_edit(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = selected {
                    self.controller.request_delete(id);
                }
            }

            KeyCode::Char('1') => self.controller.select_filter(Filter::All),
            KeyCode::Char('2') => self.controller.select_filter(Filter::Active),
            KeyCode::Char('3') => self.controller.select_filter(Filter::Completed),
            KeyCode::Char('f') => self.controller.cycle_filter(),

            KeyCode::Char('r') => self.controller.reload(),

            KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc | KeyCode::Char('a') | KeyCode::Char('i') => {
                self.controller.set_focus(Focus::Input)
            }

            _ => {}
        }
    }

    /// Dispatches a mouse event to the region under the pointer
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let areas = list::layout(self.area);

        match mouse.kind {
            MouseEventKind::ScrollDown => self.controller.move_selection(1),
            MouseEventKind::ScrollUp => self.controller.move_selection(-1),
            MouseEventKind::Down(MouseButton::Left) => {
                let (column, row) = (mouse.column, mouse.row);

                if self.controller.pending_delete().is_some() {
                    return;
                }

                if contains(areas.input, column, row) {
                    self.controller.set_focus(Focus::Input);
                } else if let Some(filter) = list::tab_at(areas.tabs, column, row) {
                    self.controller.select_filter(filter);
                } else if let Some(index) = list::row_at(
                    areas.rows,
                    self.controller.selected(),
                    self.controller.view().rows.len(),
                    column,
                    row,
                ) {
                    let id = self.controller.view().rows[index].id;
                    match RowTarget::at(column - areas.rows.x, areas.rows.width) {
                        Some(target) => self.controller.click(id, target),
                        None => {
                            self.controller.set_focus(Focus::List);
                            self.controller.select_row(index);
                        }
                    }
                } else if contains(areas.list, column, row) {
                    self.controller.set_focus(Focus::List);
                }
            }
            _ => {}
        }
    }
}
