//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Every ingestion action
//! (form submit, JSON import, sheet load) runs to completion inside one key
//! press and reports its outcome on the status line.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent, Direction},
    theme::Theme,
    widgets::{
        call_table::{CallTable, CallTableState},
        command_bar::{CommandBar, CommandBarState},
        detail::{DetailPane, DetailTab, NO_RECORDING},
        entry_form::{EntryForm, EntryFormState, FormAction},
        help::HelpPopup,
        stats_bar::StatsBar,
        status_line::{StatusLine, StatusMessage},
    },
};
use callcrm_core::{
    config::{Config, KeybindingsConfig},
    export,
    normalizer::normalize_manual,
    CallRecord, CallStore, IngestBatch, ManualEntry,
};
use callcrm_feeds::{json_file, SheetFetcher};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{
    io,
    path::{Path, PathBuf},
    process::{Child, Stdio},
    time::Duration,
};

const DETAIL_PAGE: u16 = 10;

// ---------------------------------------------------------------------------
// Focus + key types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Detail,
    /// The add-call form popup is open.
    Form,
    /// Vim-style `:` command line is active.
    Command,
}

/// Single-character bindings resolved from `[keybindings]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    pub add_call: char,
    pub command: char,
    pub help: char,
    pub open_recording: char,
}

impl Keys {
    pub fn from_config(cfg: &KeybindingsConfig) -> Self {
        Self {
            add_call: KeybindingsConfig::key(&cfg.add_call, 'a'),
            command: KeybindingsConfig::key(&cfg.command, ':'),
            help: KeybindingsConfig::key(&cfg.help, '?'),
            open_recording: KeybindingsConfig::key(&cfg.open_recording, 'o'),
        }
    }
}

/// Sources to ingest before the first frame.
#[derive(Debug, Clone, Default)]
pub struct Preload {
    pub imports: Vec<PathBuf>,
    pub sheet: Option<String>,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub store: CallStore,
    pub table: CallTableState,
    pub detail_tab: DetailTab,
    pub detail_scroll: u16,
    pub focus: Focus,
    /// Focus before a popup or the command line opened, restored on close.
    pub prev_focus: Focus,
    pub form: EntryFormState,
    pub command_bar: CommandBarState,
    pub status: Option<StatusMessage>,
    pub theme: Theme,
    pub config: Config,
    pub keys: Keys,
    pub show_help: bool,
    pub quit: bool,
    /// Manually added calls not yet written out by `:export`.
    pub unexported_manual: usize,
    runtime: tokio::runtime::Runtime,
    fetcher: SheetFetcher,
    /// Launched recording players not yet reaped.
    players: Vec<Child>,
}

impl AppState {
    pub fn new(store: CallStore, config: Config, theme: Theme) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let fetcher = SheetFetcher::new(&config.sheets)?;
        let mut table = CallTableState::default();
        table.select_last(store.len());

        Ok(Self {
            store,
            table,
            detail_tab: DetailTab::default(),
            detail_scroll: 0,
            focus: Focus::Table,
            prev_focus: Focus::Table,
            form: EntryFormState::default(),
            command_bar: CommandBarState::default(),
            status: None,
            theme,
            keys: Keys::from_config(&config.keybindings),
            config,
            show_help: false,
            quit: false,
            unexported_manual: 0,
            runtime,
            fetcher,
            players: Vec::new(),
        })
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::info(text));
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        let msg = StatusMessage::error(text);
        tracing::debug!(status = %msg.text, "status: error");
        self.status = Some(msg);
    }

    pub fn selected_record(&self) -> Option<&CallRecord> {
        self.store.get(self.table.selected)
    }

    pub fn open_form(&mut self) {
        if !matches!(self.focus, Focus::Form | Focus::Command) {
            self.prev_focus = self.focus;
        }
        tracing::debug!("form opened");
        self.focus = Focus::Form;
    }

    /// Normalize a validated form submission and append it.
    pub fn submit_entry(&mut self, entry: ManualEntry) {
        let record = normalize_manual(entry, self.store.next_manual_index());
        let id = record.call_id.clone();
        self.store.append(record);
        self.table.select_last(self.store.len());
        self.detail_scroll = 0;
        self.unexported_manual += 1;
        tracing::info!(call_id = %id, "manual call added");
        self.set_info(format!("Call record {id} added."));
    }

    pub fn import_file(&mut self, path: &Path) {
        match json_file::load(path) {
            Ok(batch) => self.ingest(batch, &path.display().to_string()),
            Err(e) => self.set_error(format!("Import failed: {e}")),
        }
    }

    /// Load a sheet, falling back to `[sheets] default_url`.
    pub fn load_sheet(&mut self, url: Option<&str>) {
        let url = url
            .map(str::to_string)
            .unwrap_or_else(|| self.config.sheets.default_url.clone());
        if url.trim().is_empty() {
            self.set_error("No sheet URL: use :sheet <url> or set [sheets] default_url.");
            return;
        }
        match self.runtime.block_on(self.fetcher.load(&url)) {
            Ok(batch) => self.ingest(batch, url.trim()),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn ingest(&mut self, batch: IngestBatch, origin: &str) {
        let issues = batch.issues.len();
        let added = self.store.extend(batch);
        if added > 0 {
            self.table.select_last(self.store.len());
            self.detail_scroll = 0;
        }
        let mut msg = format!("Imported {added} call(s) from {origin}.");
        if issues > 0 {
            msg.push_str(&format!(" {issues} field value(s) defaulted (see log)."));
        }
        self.set_info(msg);
    }

    pub fn export(&mut self, path: &Path) {
        match export::write_json(path, self.store.records()) {
            Ok(()) => {
                self.unexported_manual = 0;
                self.set_info(format!("Exported {} call(s) to {}.", self.store.len(), path.display()));
            }
            Err(e) => self.set_error(format!("Export failed: {e}")),
        }
    }

    pub fn clear(&mut self) {
        let dropped = self.store.len();
        self.store.clear();
        self.table.clamp(0);
        self.detail_scroll = 0;
        self.unexported_manual = 0;
        self.set_info(format!("Cleared {dropped} call(s)."));
    }

    /// Quit unless manually added calls would be lost.
    pub fn request_quit(&mut self) {
        if self.unexported_manual > 0 {
            self.set_error(format!(
                "{} manually added call(s) not exported: :export <file> first, or :q! to discard.",
                self.unexported_manual
            ));
        } else {
            tracing::debug!("quit");
            self.quit = true;
        }
    }

    /// Hand the selected call's recording URL to the configured player.
    pub fn open_recording(&mut self) {
        let Some(record) = self.selected_record() else {
            self.set_error("No call selected.");
            return;
        };
        if !record.has_recording() {
            self.set_info(NO_RECORDING);
            return;
        }
        let url = record.recording_url.trim().to_string();
        let id = record.call_id.clone();
        let player = self.config.ui.player_command.clone();
        let spawned = std::process::Command::new(&player)
            .arg(&url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                self.players.push(child);
                tracing::info!(call_id = %id, %url, %player, "recording opened");
                self.set_info(format!("Opening recording for {id} with {player}."));
            }
            Err(e) => self.set_error(format!("Could not start {player}: {e}")),
        }
    }

    /// Wait on players that have exited; returns how many are still running.
    pub fn reap_players(&mut self) -> usize {
        self.players.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!(pid = child.id(), %status, "player exited");
                false
            }
            Ok(None) => true,
            Err(e) => {
                tracing::debug!(pid = child.id(), error = %e, "player wait failed");
                false
            }
        });
        self.players.len()
    }

    /// Ingest the startup sources. Every failure is kept for the status line.
    pub fn apply_preload(&mut self, preload: &Preload) {
        let mut errors = Vec::new();
        let mut last_info = None;
        for path in &preload.imports {
            self.import_file(path);
            self.take_outcome(&mut errors, &mut last_info);
        }
        if let Some(url) = &preload.sheet {
            self.load_sheet(Some(url));
            self.take_outcome(&mut errors, &mut last_info);
        }
        self.status = if errors.is_empty() {
            last_info
        } else {
            Some(StatusMessage::error(errors.join(" | ")))
        };
    }

    fn take_outcome(&mut self, errors: &mut Vec<String>, last_info: &mut Option<StatusMessage>) {
        match self.status.take() {
            Some(msg) if msg.is_error() => errors.push(msg.text),
            other => *last_info = other,
        }
    }

    fn select_tab(&mut self, tab: DetailTab) {
        tracing::debug!(tab = tab.title(), "detail tab");
        self.detail_tab = tab;
        self.detail_scroll = 0;
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(store: CallStore, config: Config, theme: Theme) -> anyhow::Result<Self> {
        Ok(App { state: AppState::new(store, config, theme)? })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            self.state.reap_players();

            if ct_event::poll(Duration::from_millis(50))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle(&mut self, event: AppEvent) {
        let s = &mut self.state;

        // Help popup intercepts all events; only close keys pass through.
        if s.show_help {
            match event {
                AppEvent::Char(c) if c == s.keys.help => s.show_help = false,
                AppEvent::Escape | AppEvent::Quit => s.show_help = false,
                _ => {}
            }
            return;
        }

        match s.focus {
            Focus::Command => {
                handle_command_bar(s, event);
                return;
            }
            Focus::Form => {
                if event == AppEvent::Quit {
                    s.request_quit();
                    return;
                }
                match s.form.handle(&event) {
                    Some(FormAction::Submit(entry)) => {
                        s.focus = s.prev_focus;
                        s.submit_entry(entry);
                    }
                    Some(FormAction::Cancel) => {
                        s.focus = s.prev_focus;
                        s.set_info("Add call cancelled.");
                    }
                    None => {}
                }
                return;
            }
            Focus::Table | Focus::Detail => {}
        }

        let keys = s.keys.clone();
        match event {
            AppEvent::Char(c) if c == keys.help => {
                tracing::debug!("help popup opened");
                s.show_help = true;
            }
            AppEvent::Char(c) if c == keys.command => {
                tracing::debug!(prev_focus = ?s.focus, "entering command mode");
                s.prev_focus = s.focus;
                s.command_bar.clear();
                s.focus = Focus::Command;
            }
            AppEvent::Char(c) if c == keys.add_call => s.open_form(),
            AppEvent::Char(c) if c == keys.open_recording => {
                s.select_tab(DetailTab::Recording);
                s.open_recording();
            }
            AppEvent::Char(c) => {
                if let Some(tab) = DetailTab::from_digit(c) {
                    s.select_tab(tab);
                }
            }

            AppEvent::Quit => s.request_quit(),

            AppEvent::Escape => {
                if s.focus == Focus::Detail {
                    s.focus = Focus::Table;
                }
            }
            AppEvent::FocusNext | AppEvent::FocusPrev => {
                s.focus = match s.focus {
                    Focus::Table => Focus::Detail,
                    _ => Focus::Table,
                };
                tracing::debug!(to = ?s.focus, "focus cycle");
            }
            AppEvent::Enter if s.focus == Focus::Table && !s.store.is_empty() => {
                s.focus = Focus::Detail;
            }

            AppEvent::Nav(Direction::Left) => s.select_tab(s.detail_tab.prev()),
            AppEvent::Nav(Direction::Right) => s.select_tab(s.detail_tab.next()),

            other if s.focus == Focus::Detail => scroll_detail(s, &other),
            other => {
                let before = s.table.selected;
                s.table.handle(&other, s.store.len());
                if s.table.selected != before {
                    s.detail_scroll = 0;
                }
            }
        }
    }
}

fn handle_command_bar(s: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Escape => {
            tracing::debug!("command bar cancelled");
            s.command_bar.clear();
            s.focus = s.prev_focus;
        }
        AppEvent::Enter => match Command::parse(&s.command_bar.input) {
            Ok(cmd) => {
                tracing::debug!(command = ?cmd, "executing command");
                s.command_bar.clear();
                s.focus = s.prev_focus;
                execute_command(s, cmd);
            }
            Err(msg) if msg.is_empty() => {
                s.command_bar.clear();
                s.focus = s.prev_focus;
            }
            Err(msg) => {
                // Show the error; bar stays open
                s.command_bar.error = Some(msg);
            }
        },
        other => s.command_bar.handle(&other),
    }
}

fn scroll_detail(s: &mut AppState, event: &AppEvent) {
    s.detail_scroll = match event {
        AppEvent::Nav(Direction::Up) => s.detail_scroll.saturating_sub(1),
        AppEvent::Nav(Direction::Down) => s.detail_scroll.saturating_add(1),
        AppEvent::ScrollUp => s.detail_scroll.saturating_sub(DETAIL_PAGE),
        AppEvent::ScrollDown => s.detail_scroll.saturating_add(DETAIL_PAGE),
        AppEvent::ScrollToTop => 0,
        _ => return,
    };
}

/// Returns true when a text input has focus, meaning alphabetic keys should
/// produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::Form | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub(crate) fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line stats bar | body | 1-line status line
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([Constraint::Length(1), Constraint::Fill(1), Constraint::Length(1)])
        .split(area);

    let pct = state.config.ui.table_height_pct.clamp(10, 90);
    let body = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([Constraint::Percentage(pct), Constraint::Fill(1)])
        .split(vert[1]);

    let stats = state.store.stats();
    frame.render_widget(StatsBar::new(&stats, &state.keys, &state.theme), vert[0]);
    frame.render_widget(
        CallTable::new(state.store.records(), &state.table, state.focus == Focus::Table, &state.theme)
            .add_key(state.keys.add_call),
        body[0],
    );
    frame.render_widget(
        DetailPane::new(state.selected_record(), state.detail_tab, &state.config.ui, &state.theme)
            .scroll(state.detail_scroll)
            .focused(state.focus == Focus::Detail)
            .open_key(state.keys.open_recording),
        body[1],
    );
    frame.render_widget(StatusLine::new(state.status.as_ref(), &state.theme), vert[2]);

    if state.focus == Focus::Form {
        let form = EntryForm::new(&state.form, &state.theme);
        let cursor = form.cursor_position(area);
        frame.render_widget(form, area);
        frame.set_cursor_position(cursor);
    }

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.keys, &state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
