//! Task list screen: input line, filter tabs, rows, message and status bar

use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::cli::tui::app::App;
use crate::cli::tui::utils::{
    centered_rect, contains, pad_to_width, scroll_offset, tail_to_width, truncate_str,
};
use crate::controller::{Focus, RowState};
use crate::domain::Filter;
use crate::view::{escape_text, Row, ACTIONS, TOGGLE_WIDTH};

/// Screen regions, shared by drawing and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub input: Rect,
    pub tabs: Rect,
    pub list: Rect,
    pub rows: Rect,
    pub message: Rect,
    pub status: Rect,
}

/// Splits the screen into its regions
pub fn layout(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Input
            Constraint::Length(1), // Filter tabs
            Constraint::Min(3),    // Task list
            Constraint::Length(1), // Message
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let list = chunks[3];
    Areas {
        header: chunks[0],
        input: chunks[1],
        tabs: chunks[2],
        list,
        rows: Block::default().borders(Borders::ALL).inner(list),
        message: chunks[4],
        status: chunks[5],
    }
}

fn tab_label(index: usize, filter: Filter) -> String {
    format!(" {}:{} ", index + 1, filter.label())
}

/// Column ranges of the filter tabs, as (filter, start, end)
pub fn tab_ranges(tabs: Rect) -> Vec<(Filter, u16, u16)> {
    let mut x = tabs.x + 1;
    Filter::TABS
        .iter()
        .enumerate()
        .map(|(i, filter)| {
            let width = tab_label(i, *filter).chars().count() as u16;
            let range = (*filter, x, x + width);
            x += width + 1;
            range
        })
        .collect()
}

/// Finds the filter tab under a click
pub fn tab_at(tabs: Rect, column: u16, row: u16) -> Option<Filter> {
    if !contains(tabs, column, row) {
        return None;
    }
    tab_ranges(tabs)
        .into_iter()
        .find(|(_, start, end)| column >= *start && column < *end)
        .map(|(filter, _, _)| filter)
}

/// Finds the index of the visible row under a click
pub fn row_at(rows: Rect, selected: usize, row_count: usize, column: u16, row: u16) -> Option<usize> {
    if !contains(rows, column, row) {
        return None;
    }
    let offset = scroll_offset(selected, rows.height as usize);
    let index = offset + (row - rows.y) as usize;
    (index < row_count).then_some(index)
}

/// Draw the whole screen
pub fn draw(frame: &mut Frame, app: &App) {
    let areas = layout(frame.area());

    draw_header(frame, app, areas.header);
    draw_input(frame, app, areas.input);
    draw_tabs(frame, app, areas.tabs);
    draw_list(frame, app, areas.list, areas.rows);
    draw_message(frame, app, areas.message);
    draw_status_bar(frame, app, areas.status);

    if app.controller().pending_delete().is_some() {
        draw_confirm(frame, frame.area());
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let tasks = app.controller().store().tasks();
    let open = tasks.iter().filter(|t| !t.completed).count();
    let date = Local::now().format("%A, %b %-d").to_string();

    let line = Line::from(vec![
        Span::styled(" Daylist ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(date, Style::default().fg(Color::DarkGray)),
        Span::raw(format!("   {} open / {} total", open, tasks.len())),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let controller = app.controller();
    let focused = controller.focus() == Focus::Input && controller.editing().is_none();

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = if focused {
        format!("{}_", controller.input())
    } else if controller.input().is_empty() {
        "What needs to be done?".to_string()
    } else {
        controller.input().to_string()
    };

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(" New task (Enter to add) ")
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    frame.render_widget(paragraph, area);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.controller().filter();
    let mut spans = vec![Span::raw(" ")];

    for (i, filter) in Filter::TABS.iter().enumerate() {
        let style = if *filter == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(tab_label(i, *filter), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect, rows_area: Rect) {
    let controller = app.controller();
    let view = controller.view();
    let list_focused = controller.focus() == Focus::List || controller.editing().is_some();

    let block = Block::default()
        .title(format!(" Tasks ({}) ", view.rows.len()))
        .borders(Borders::ALL)
        .border_style(if list_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    frame.render_widget(block, area);

    if let Some(placeholder) = view.placeholder {
        let paragraph = Paragraph::new(placeholder)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, rows_area);
        return;
    }

    let height = rows_area.height as usize;
    let offset = scroll_offset(controller.selected(), height);

    let lines: Vec<Line> = view
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(index, row)| {
            let selected = list_focused && index == controller.selected();
            row_line(app, row, selected, rows_area.width)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), rows_area);
}

/// Columns left for task text between the marker and the action controls
fn row_text_width(width: u16) -> usize {
    width.saturating_sub(TOGGLE_WIDTH + ACTIONS.len() as u16 + 1) as usize
}

/// Task text cut and padded to exactly `width` columns
fn fit_text(text: &str, width: usize) -> String {
    pad_to_width(&truncate_str(text, width), width)
}

fn row_line(app: &App, row: &Row, selected: bool, width: u16) -> Line<'static> {
    let controller = app.controller();
    let state = controller.row_state(row.id);

    let text_width = row_text_width(width);
    let text = match (state, controller.editing()) {
        (RowState::Editing, Some(session)) => {
            // Show the tail of long edits so the cursor stays visible
            let buffer = escape_text(session.text());
            let shown = tail_to_width(&buffer, text_width.saturating_sub(1));
            pad_to_width(&format!("{}_", shown), text_width)
        }
        _ => fit_text(&row.text, text_width),
    };

    let mut text_style = match state {
        RowState::Editing => Style::default().fg(Color::Yellow),
        RowState::PendingDelete => Style::default().fg(Color::Red),
        RowState::Removing => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT),
        RowState::Viewing if row.completed => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT),
        RowState::Viewing => Style::default(),
    };
    let marker_style = if row.completed {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    if selected {
        text_style = text_style.add_modifier(Modifier::REVERSED);
    }

    Line::from(vec![
        Span::styled(format!("{} ", row.marker()), marker_style),
        Span::styled(text, text_style),
        Span::raw(" "),
        Span::styled(ACTIONS, Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_message(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(message) = app.controller().message() {
        let paragraph = Paragraph::new(format!(" {}", message))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let controller = app.controller();
    let help = if controller.pending_delete().is_some() {
        "[y]es [n]o"
    } else if controller.editing().is_some() {
        "Enter:save Esc/Tab:save and leave"
    } else if controller.focus() == Focus::Input {
        "Enter:add Tab:list ^F:filter ^C:quit"
    } else {
        "j/k:move space:toggle e:edit d:delete 1-3:filter Tab:input r:reload q:quit"
    };

    let paragraph = Paragraph::new(format!(" {}", help)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn draw_confirm(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(36, 5, area);
    frame.render_widget(Clear, popup);

    let paragraph = Paragraph::new(vec![
        Line::from("Delete this task?"),
        Line::from(""),
        Line::from("[y] Yes    [n] No"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Confirm ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );

    frame.render_widget(paragraph, popup);
}
