// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use bookman_app::{
    AppCommand, AppMode, AppState, Book, BookField, BookId, FilterKey, ResetDecision,
    SortDirection, SortSpec, ViewPage, ViewState,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const SORT_MARK_ASC: &str = "▲";
const SORT_MARK_DESC: &str = "▼";
const FILTER_MARK: &str = "●";
const CHANGED_MARK: &str = "*";

/// Everything the UI needs from the record layer. Implemented over the real
/// store by the binary and over an in-memory stub by the tests here.
pub trait AppRuntime {
    fn is_loaded(&self) -> bool;
    /// Display name of the loaded file, if any.
    fn source_name(&self) -> Option<String>;
    fn visible_page(&self, view: &ViewState) -> ViewPage;
    fn total_count(&self) -> usize;
    fn modified_count(&self) -> usize;
    fn update_field(&mut self, id: BookId, field: BookField, raw: &str);
    fn reset_all(&mut self, decision: ResetDecision) -> bool;
    fn export_csv(&mut self) -> Result<PathBuf>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditUiState {
    book_id: BookId,
    field: BookField,
    buffer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterUiState {
    key: FilterKey,
    buffer: String,
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    view: ViewState,
    page: ViewPage,
    selected_row: usize,
    selected_col: usize,
    edit: Option<EditUiState>,
    filter: Option<FilterUiState>,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(page_size: usize) -> Self {
        Self {
            view: ViewState::new(page_size),
            page: ViewPage::empty(),
            selected_row: 0,
            selected_col: 0,
            edit: None,
            filter: None,
            help_visible: false,
            status_token: 0,
        }
    }

    fn selected_book(&self) -> Option<&Book> {
        self.page.books.get(self.selected_row)
    }

    fn selected_field(&self) -> BookField {
        BookField::ALL[self.selected_col.min(BookField::ALL.len() - 1)]
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R, page_size: usize) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(page_size);
    let (internal_tx, internal_rx) = mpsc::channel();

    refresh_page(runtime, &mut view_data);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, runtime, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Re-derives the visible page from the runtime and clamps the selection
/// back onto it. Call after anything that can change filtering, ordering,
/// paging, or the records themselves.
fn refresh_page<R: AppRuntime>(runtime: &R, view_data: &mut ViewData) {
    view_data.page = runtime.visible_page(&view_data.view);
    if view_data.view.page > view_data.page.page_count {
        view_data.view.set_page(view_data.page.page_count);
        view_data.page = runtime.visible_page(&view_data.view);
    }
    if !view_data.page.books.is_empty() && view_data.selected_row >= view_data.page.books.len() {
        view_data.selected_row = view_data.page.books.len() - 1;
    }
    if view_data.page.books.is_empty() {
        view_data.selected_row = 0;
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    match state.mode {
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
        AppMode::EditCell => {
            handle_edit_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::Filter => {
            handle_filter_key(state, runtime, view_data, key);
            false
        }
        AppMode::ConfirmReset => {
            handle_confirm_key(state, runtime, view_data, internal_tx, key);
            false
        }
    }
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        (KeyCode::Char('j') | KeyCode::Down, _) => {
            let last = view_data.page.books.len().saturating_sub(1);
            view_data.selected_row = (view_data.selected_row + 1).min(last);
        }
        (KeyCode::Char('k') | KeyCode::Up, _) => {
            view_data.selected_row = view_data.selected_row.saturating_sub(1);
        }
        (KeyCode::Char('h') | KeyCode::Left, _) => {
            view_data.selected_col = view_data.selected_col.saturating_sub(1);
        }
        (KeyCode::Char('l') | KeyCode::Right, _) => {
            view_data.selected_col = (view_data.selected_col + 1).min(BookField::ALL.len() - 1);
        }
        (KeyCode::Char('g'), KeyModifiers::NONE) => view_data.selected_row = 0,
        (KeyCode::Char('G'), _) => {
            view_data.selected_row = view_data.page.books.len().saturating_sub(1);
        }
        (KeyCode::Char('n'), KeyModifiers::NONE) => {
            if view_data.view.page < view_data.page.page_count {
                view_data.view.set_page(view_data.view.page + 1);
                view_data.selected_row = 0;
                refresh_page(runtime, view_data);
            }
        }
        (KeyCode::Char('p'), KeyModifiers::NONE) => {
            if view_data.view.page > 1 {
                view_data.view.set_page(view_data.view.page - 1);
                view_data.selected_row = 0;
                refresh_page(runtime, view_data);
            }
        }
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            view_data.view.cycle_sort(view_data.selected_field());
            refresh_page(runtime, view_data);
        }
        (KeyCode::Char('S'), _) => {
            view_data.view.clear_sort();
            refresh_page(runtime, view_data);
        }
        (KeyCode::Char('/'), _) => {
            let key = FilterKey::ALL[0];
            view_data.filter = Some(FilterUiState {
                key,
                buffer: view_data.view.filters.get(key).to_owned(),
            });
            state.dispatch(AppCommand::OpenFilter);
        }
        (KeyCode::Char('C'), _) => {
            view_data.view.clear_filters();
            refresh_page(runtime, view_data);
            emit_status(state, view_data, internal_tx, "filters cleared");
        }
        (KeyCode::Char('e') | KeyCode::Enter, _) => {
            if let Some(book) = view_data.selected_book() {
                let field = view_data.selected_field();
                view_data.edit = Some(EditUiState {
                    book_id: book.id,
                    field,
                    buffer: book.field_text(field),
                });
                state.dispatch(AppCommand::StartEdit);
            }
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            if runtime.modified_count() == 0 {
                emit_status(state, view_data, internal_tx, "no edits to discard");
            } else {
                state.dispatch(AppCommand::RequestReset);
            }
        }
        (KeyCode::Char('x'), KeyModifiers::NONE) => {
            if runtime.is_loaded() {
                match runtime.export_csv() {
                    Ok(path) => {
                        emit_status(
                            state,
                            view_data,
                            internal_tx,
                            format!("exported to {}", path.display()),
                        );
                    }
                    Err(error) => {
                        emit_status(state, view_data, internal_tx, format!("export failed: {error}"));
                    }
                }
            } else {
                emit_status(state, view_data, internal_tx, "nothing to export");
            }
        }
        _ => {}
    }
    false
}

fn handle_edit_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.edit.is_none() {
        state.dispatch(AppCommand::ExitToNav);
        return;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            view_data.edit = None;
            state.dispatch(AppCommand::ExitToNav);
        }
        (KeyCode::Enter, _) => {
            if let Some(EditUiState { book_id, field, buffer }) = view_data.edit.take() {
                runtime.update_field(book_id, field, &buffer);
                state.dispatch(AppCommand::ExitToNav);
                refresh_page(runtime, view_data);
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("{} updated", field.label()),
                );
            }
        }
        (KeyCode::Backspace, _) => {
            if let Some(edit) = view_data.edit.as_mut() {
                edit.buffer.pop();
            }
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(edit) = view_data.edit.as_mut() {
                edit.buffer.push(ch);
            }
        }
        _ => {}
    }
}

fn handle_filter_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) {
    let Some(filter) = view_data.filter.as_mut() else {
        state.dispatch(AppCommand::ExitToNav);
        return;
    };

    match (key.code, key.modifiers) {
        (KeyCode::Esc | KeyCode::Enter, _) => {
            view_data.filter = None;
            state.dispatch(AppCommand::ExitToNav);
        }
        (KeyCode::Tab, _) => {
            filter.key = next_filter_key(filter.key);
            filter.buffer = view_data.view.filters.get(filter.key).to_owned();
        }
        (KeyCode::Backspace, _) => {
            filter.buffer.pop();
            let (key, text) = (filter.key, filter.buffer.clone());
            view_data.view.set_filter(key, text);
            view_data.selected_row = 0;
            refresh_page(runtime, view_data);
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            filter.buffer.push(ch);
            let (key, text) = (filter.key, filter.buffer.clone());
            view_data.view.set_filter(key, text);
            view_data.selected_row = 0;
            refresh_page(runtime, view_data);
        }
        _ => {}
    }
}

fn handle_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            state.dispatch(AppCommand::ResolveReset(ResetDecision::Confirmed));
            runtime.reset_all(ResetDecision::Confirmed);
            refresh_page(runtime, view_data);
            emit_status(state, view_data, internal_tx, "all edits discarded");
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.dispatch(AppCommand::ResolveReset(ResetDecision::Declined));
            runtime.reset_all(ResetDecision::Declined);
        }
        _ => {}
    }
}

fn next_filter_key(key: FilterKey) -> FilterKey {
    let index = FilterKey::ALL
        .iter()
        .position(|candidate| *candidate == key)
        .unwrap_or(0);
    FilterKey::ALL[(index + 1) % FilterKey::ALL.len()]
}

fn render<R: AppRuntime>(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    runtime: &R,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(runtime, view_data))
        .block(Block::default().title("bookman").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], runtime, view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if state.mode == AppMode::ConfirmReset {
        let area = centered_rect(44, 22, frame.area());
        frame.render_widget(Clear, area);
        let modal = Paragraph::new(confirm_reset_text(runtime.modified_count())).block(
            Block::default()
                .title("reset")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(modal, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn header_text<R: AppRuntime>(runtime: &R, view_data: &ViewData) -> String {
    let source = runtime
        .source_name()
        .unwrap_or_else(|| "no file loaded".to_owned());
    let first = view_data.page.first_row_index(view_data.view.page_size);
    let last = if first == 0 {
        0
    } else {
        first + view_data.page.books.len() - 1
    };
    format!(
        "{source} | {} books | {} matching | {} modified | page {}/{} | showing {first}-{last}",
        runtime.total_count(),
        view_data.page.filtered,
        runtime.modified_count(),
        view_data.page.page,
        view_data.page.page_count,
    )
}

fn render_table<R: AppRuntime>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    runtime: &R,
    view_data: &ViewData,
) {
    if !runtime.is_loaded() {
        let empty = Paragraph::new("open a .csv file to begin")
            .block(Block::default().borders(Borders::ALL).title("books"));
        frame.render_widget(empty, area);
        return;
    }

    let header_cells = BookField::ALL.iter().map(|field| {
        Cell::from(column_header_label(*field, view_data)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let editing = view_data.edit.as_ref();
    let rows = view_data.page.books.iter().enumerate().map(|(row_index, book)| {
        let selected_row = row_index == view_data.selected_row;
        let cells = BookField::ALL
            .iter()
            .enumerate()
            .map(|(column_index, field)| {
                let in_edit = editing.is_some_and(|edit| {
                    selected_row && edit.book_id == book.id && edit.field == *field
                });
                let mut text = if in_edit {
                    editing.map(|edit| edit.buffer.clone()).unwrap_or_default()
                } else {
                    book.field_text(*field)
                };
                if !in_edit && book.field_changed(*field) {
                    text.push_str(CHANGED_MARK);
                }

                let mut style = Style::default();
                if book.modified {
                    style = style.fg(Color::Yellow);
                }
                if selected_row {
                    style = style.bg(Color::DarkGray);
                }
                if selected_row && column_index == view_data.selected_col {
                    style = Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD);
                }
                Cell::from(text).style(style)
            })
            .collect::<Vec<_>>();
        Row::new(cells)
    });

    let widths = vec![Constraint::Min(8); BookField::ALL.len()];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(table_title(view_data)).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn column_header_label(field: BookField, view_data: &ViewData) -> String {
    let mut label = field.label().to_owned();
    if let Some(SortSpec { field: sorted, direction }) = view_data.view.sort
        && sorted == field
    {
        label.push(' ');
        label.push_str(match direction {
            SortDirection::Asc => SORT_MARK_ASC,
            SortDirection::Desc => SORT_MARK_DESC,
        });
    }
    if let Some(key) = filter_key_for_field(field)
        && !view_data.view.filters.get(key).is_empty()
    {
        label.push(' ');
        label.push_str(FILTER_MARK);
    }
    label
}

const fn filter_key_for_field(field: BookField) -> Option<FilterKey> {
    match field {
        BookField::Title => Some(FilterKey::Title),
        BookField::Author => Some(FilterKey::Author),
        BookField::Genre => Some(FilterKey::Genre),
        BookField::PublishedYear => Some(FilterKey::Year),
        BookField::Isbn => None,
    }
}

fn table_title(view_data: &ViewData) -> String {
    match &view_data.filter {
        Some(filter) => format!(
            "books | filter {}: {}▏ (tab next field, enter done)",
            filter.key.label(),
            filter.buffer,
        ),
        None if !view_data.view.filters.is_empty() => "books (filtered)".to_owned(),
        None => "books".to_owned(),
    }
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let mode = match state.mode {
        AppMode::Nav => "NAV",
        AppMode::EditCell => "EDIT",
        AppMode::Filter => "FILTER",
        AppMode::ConfirmReset => "CONFIRM",
    };
    let default = match state.mode {
        AppMode::EditCell => {
            let buffer = view_data
                .edit
                .as_ref()
                .map(|edit| edit.buffer.as_str())
                .unwrap_or("");
            format!("editing: {buffer}▏ | enter save | esc cancel")
        }
        AppMode::Filter => "type to filter | tab field | enter/esc done".to_owned(),
        AppMode::ConfirmReset => "y discard all edits | n keep".to_owned(),
        AppMode::Nav => {
            "j/k/h/l move | n/p page | s/S sort | / filter C clear | e edit | r reset | x export | ? help | q quit"
                .to_owned()
        }
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {default}"),
        None => format!("{mode} | {default}"),
    }
}

fn confirm_reset_text(modified: usize) -> String {
    format!(
        "Discard edits to {modified} book{}?\n\nAll fields return to their loaded values.\n\n  y - discard    n - keep",
        if modified == 1 { "" } else { "s" },
    )
}

fn help_overlay_text() -> &'static str {
    "nav: j/k/h/l or arrows move | g/G first/last row | n/p page\n\
sort: s cycle on selected column | S clear\n\
filter: / open (tab switches field, live as you type) | C clear all\n\
edit: e or enter edit cell | enter save | esc cancel\n\
data: r reset all edits (y/n confirm) | x export csv\n\
other: ? help | q or ctrl+q quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, EditUiState, ViewData, column_header_label, confirm_reset_text,
        handle_key_event, header_text, next_filter_key, refresh_page, status_text,
    };
    use bookman_app::{
        AppMode, AppState, Book, BookField, BookId, FilterKey, ResetDecision, SortDirection,
        ViewPage, ViewState, visible_page,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::path::PathBuf;
    use std::sync::mpsc;

    #[derive(Debug, Default)]
    struct TestRuntime {
        books: Vec<Book>,
        exports: usize,
        resets: Vec<ResetDecision>,
    }

    impl TestRuntime {
        fn with_books(titles: &[&str]) -> Self {
            let books = titles
                .iter()
                .enumerate()
                .map(|(index, title)| Book {
                    id: BookId::new(index as i64 + 1),
                    title: (*title).to_owned(),
                    author: "Author".to_owned(),
                    genre: "Genre".to_owned(),
                    published_year: 2000 + index as i32,
                    isbn: format!("isbn-{index}"),
                    modified: false,
                    original: None,
                })
                .collect();
            Self {
                books,
                exports: 0,
                resets: Vec::new(),
            }
        }
    }

    impl AppRuntime for TestRuntime {
        fn is_loaded(&self) -> bool {
            !self.books.is_empty()
        }

        fn source_name(&self) -> Option<String> {
            self.is_loaded().then(|| "books.csv".to_owned())
        }

        fn visible_page(&self, view: &ViewState) -> ViewPage {
            visible_page(&self.books, view)
        }

        fn total_count(&self) -> usize {
            self.books.len()
        }

        fn modified_count(&self) -> usize {
            self.books.iter().filter(|b| b.modified).count()
        }

        fn update_field(&mut self, id: BookId, field: BookField, raw: &str) {
            if let Some(book) = self.books.iter_mut().find(|b| b.id == id) {
                if book.original.is_none() {
                    book.original = Some(book.snapshot());
                }
                book.set_field(field, raw);
                book.recompute_modified();
            }
        }

        fn reset_all(&mut self, decision: ResetDecision) -> bool {
            self.resets.push(decision);
            decision == ResetDecision::Confirmed
        }

        fn export_csv(&mut self) -> anyhow::Result<PathBuf> {
            self.exports += 1;
            Ok(PathBuf::from("/tmp/edited-books.csv"))
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup(titles: &[&str]) -> (AppState, TestRuntime, ViewData) {
        let mut runtime = TestRuntime::with_books(titles);
        let mut view_data = ViewData::new(2);
        refresh_page(&mut runtime, &mut view_data);
        (AppState::default(), runtime, view_data)
    }

    #[test]
    fn ctrl_q_quits_from_any_mode() {
        let (mut state, mut runtime, mut view_data) = setup(&["A"]);
        let (tx, _rx) = mpsc::channel();
        state.dispatch(bookman_app::AppCommand::StartEdit);
        let quit = handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &tx,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        assert!(quit);
    }

    #[test]
    fn navigation_clamps_to_the_visible_page() {
        let (mut state, mut runtime, mut view_data) = setup(&["A", "B"]);
        let (tx, _rx) = mpsc::channel();

        for _ in 0..5 {
            handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('j')));
        }
        assert_eq!(view_data.selected_row, 1);

        for _ in 0..5 {
            handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('l')));
        }
        assert_eq!(view_data.selected_col, BookField::ALL.len() - 1);
    }

    #[test]
    fn paging_keys_respect_page_bounds() {
        let (mut state, mut runtime, mut view_data) = setup(&["A", "B", "C"]);
        let (tx, _rx) = mpsc::channel();
        assert_eq!(view_data.page.page_count, 2);

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('p')));
        assert_eq!(view_data.view.page, 1);

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('n')));
        assert_eq!(view_data.view.page, 2);
        assert_eq!(view_data.page.books.len(), 1);

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('n')));
        assert_eq!(view_data.view.page, 2);
    }

    #[test]
    fn sort_key_cycles_direction_on_the_selected_column() {
        let (mut state, mut runtime, mut view_data) = setup(&["B", "A"]);
        let (tx, _rx) = mpsc::channel();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('s')));
        assert_eq!(view_data.page.books[0].title, "A");
        assert_eq!(
            view_data.view.sort.map(|s| s.direction),
            Some(SortDirection::Asc),
        );

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('s')));
        assert_eq!(view_data.page.books[0].title, "B");
        assert_eq!(
            view_data.view.sort.map(|s| s.direction),
            Some(SortDirection::Desc),
        );

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('S')));
        assert!(view_data.view.sort.is_none());
    }

    #[test]
    fn filter_mode_applies_live_and_resets_the_page() {
        let (mut state, mut runtime, mut view_data) = setup(&["Apple", "Banana", "Apricot"]);
        let (tx, _rx) = mpsc::channel();
        view_data.view.set_page(2);
        refresh_page(&mut runtime, &mut view_data);

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('/')));
        assert_eq!(state.mode, AppMode::Filter);

        for ch in "ap".chars() {
            handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char(ch)));
        }
        assert_eq!(view_data.view.page, 1);
        assert_eq!(view_data.page.filtered, 2);

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Enter));
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(view_data.view.filters.get(FilterKey::Title), "ap");
    }

    #[test]
    fn tab_cycles_the_filter_field() {
        let (mut state, mut runtime, mut view_data) = setup(&["A"]);
        let (tx, _rx) = mpsc::channel();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('/')));
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Tab));
        assert_eq!(
            view_data.filter.as_ref().map(|f| f.key),
            Some(FilterKey::Author),
        );

        assert_eq!(next_filter_key(FilterKey::Year), FilterKey::Title);
    }

    #[test]
    fn editing_a_cell_commits_through_the_runtime() {
        let (mut state, mut runtime, mut view_data) = setup(&["Old Title"]);
        let (tx, _rx) = mpsc::channel();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('e')));
        assert_eq!(state.mode, AppMode::EditCell);
        assert_eq!(
            view_data.edit,
            Some(EditUiState {
                book_id: BookId::new(1),
                field: BookField::Title,
                buffer: "Old Title".to_owned(),
            }),
        );

        for _ in 0.."Old Title".len() {
            handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Backspace));
        }
        for ch in "New".chars() {
            handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char(ch)));
        }
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Enter));

        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(runtime.books[0].title, "New");
        assert!(runtime.books[0].modified);
        assert!(view_data.page.books[0].modified);
    }

    #[test]
    fn escape_cancels_an_edit_without_touching_the_record() {
        let (mut state, mut runtime, mut view_data) = setup(&["Keep Me"]);
        let (tx, _rx) = mpsc::channel();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Enter));
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('!')));
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Esc));

        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(runtime.books[0].title, "Keep Me");
        assert!(!runtime.books[0].modified);
    }

    #[test]
    fn reset_needs_edits_and_a_confirmation() {
        let (mut state, mut runtime, mut view_data) = setup(&["A"]);
        let (tx, _rx) = mpsc::channel();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('r')));
        assert_eq!(state.mode, AppMode::Nav, "no edits, no confirm modal");

        runtime.update_field(BookId::new(1), BookField::Title, "Changed");
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('r')));
        assert_eq!(state.mode, AppMode::ConfirmReset);

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('n')));
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(runtime.resets, vec![ResetDecision::Declined]);

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('r')));
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('y')));
        assert_eq!(
            runtime.resets,
            vec![ResetDecision::Declined, ResetDecision::Confirmed],
        );
    }

    #[test]
    fn export_key_calls_the_runtime_once() {
        let (mut state, mut runtime, mut view_data) = setup(&["A"]);
        let (tx, _rx) = mpsc::channel();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('x')));
        assert_eq!(runtime.exports, 1);
        assert!(
            state
                .status_line
                .as_deref()
                .is_some_and(|s| s.contains("edited-books.csv")),
        );
    }

    #[test]
    fn column_headers_mark_sort_and_active_filters() {
        let (mut state, mut runtime, mut view_data) = setup(&["A"]);
        let (tx, _rx) = mpsc::channel();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('s')));
        assert_eq!(column_header_label(BookField::Title, &view_data), "Title ▲");

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('s')));
        assert_eq!(column_header_label(BookField::Title, &view_data), "Title ▼");

        view_data.view.set_filter(FilterKey::Genre, "sf".to_owned());
        assert_eq!(column_header_label(BookField::Genre, &view_data), "Genre ●");
        assert_eq!(column_header_label(BookField::Isbn, &view_data), "ISBN");
    }

    #[test]
    fn status_text_includes_mode_and_message() {
        let (mut state, _runtime, view_data) = setup(&["A"]);
        state.dispatch(bookman_app::AppCommand::SetStatus("saved".to_owned()));
        let text = status_text(&state, &view_data);
        assert!(text.starts_with("NAV | saved | "));
    }

    #[test]
    fn header_counts_cover_the_visible_window() {
        let (_state, runtime, view_data) = setup(&["A", "B", "C"]);
        let text = header_text(&runtime, &view_data);
        assert!(text.contains("3 books"));
        assert!(text.contains("3 matching"));
        assert!(text.contains("page 1/2"));
        assert!(text.contains("showing 1-2"));
    }

    #[test]
    fn confirm_text_pluralizes() {
        assert!(confirm_reset_text(1).contains("1 book?"));
        assert!(confirm_reset_text(3).contains("3 books?"));
    }

    #[test]
    fn refresh_clamps_page_and_selection_after_shrinking() {
        let (mut state, mut runtime, mut view_data) = setup(&["A", "B", "C", "D", "E"]);
        let (tx, _rx) = mpsc::channel();
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('n')));
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('n')));
        assert_eq!(view_data.view.page, 3);

        runtime.books.truncate(2);
        refresh_page(&mut runtime, &mut view_data);
        assert_eq!(view_data.view.page, 1);
        assert!(view_data.selected_row < view_data.page.books.len());
    }
}
