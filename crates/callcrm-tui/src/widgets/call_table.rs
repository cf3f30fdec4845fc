//! Call table: every stored call, one row each, with a selection cursor.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Select previous call |
//! | `↓` / `j` | Select next call |
//! | `PageUp` / `Ctrl+u` | Move up one page |
//! | `PageDown` / `Ctrl+d` | Move down one page |
//! | `g` / `G` | First / last call |
//!
//! # Scroll semantics
//!
//! `selected` is an index into the store (0 = oldest). `offset` is the first
//! visible row; render keeps the selection inside the visible window.

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use callcrm_core::view::{format_cost, transcript_preview};
use callcrm_core::CallRecord;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Cell as TableCell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Table, Widget,
    },
};

const PAGE_STEP: usize = 10;

const HEADERS: [&str; 7] = [
    "call_id",
    "customer_number",
    "started_at",
    "cost",
    "transcript",
    "call_summary",
    "source",
];

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CallTableState {
    /// Index of the highlighted call.
    pub selected: usize,
    /// First visible row, adjusted at render time.
    offset: Cell<usize>,
    /// Visible rows from the last render, for page steps.
    last_height: Cell<usize>,
}

impl CallTableState {
    fn page(&self) -> usize {
        match self.last_height.get() {
            0 => PAGE_STEP,
            h => h,
        }
    }

    /// Handle a navigation event for a table of `len` rows.
    pub fn handle(&mut self, event: &AppEvent, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let last = len - 1;
        self.selected = match event {
            AppEvent::Nav(Direction::Up) => self.selected.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => (self.selected + 1).min(last),
            AppEvent::ScrollUp => self.selected.saturating_sub(self.page()),
            AppEvent::ScrollDown => (self.selected + self.page()).min(last),
            AppEvent::ScrollToTop => 0,
            AppEvent::ScrollToTail => last,
            _ => return,
        };
        tracing::debug!(selected = self.selected, "table: selection moved");
    }

    /// Select the newest row, as after an insert.
    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Pull the selection back inside `len` rows, as after a clear.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
        if len == 0 {
            self.offset.set(0);
        }
    }

    /// First visible row for a viewport of `height` rows.
    fn window_start(&self, height: usize) -> usize {
        let height = height.max(1);
        let mut offset = self.offset.get();
        if self.selected < offset {
            offset = self.selected;
        } else if self.selected >= offset + height {
            offset = self.selected + 1 - height;
        }
        self.offset.set(offset);
        offset
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct CallTable<'a> {
    records: &'a [CallRecord],
    state: &'a CallTableState,
    focused: bool,
    add_key: char,
    theme: &'a Theme,
}

impl<'a> CallTable<'a> {
    pub fn new(records: &'a [CallRecord], state: &'a CallTableState, focused: bool, theme: &'a Theme) -> Self {
        Self { records, state, focused, add_key: 'a', theme }
    }

    pub fn add_key(mut self, key: char) -> Self {
        self.add_key = key;
        self
    }
}

impl Widget for CallTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" All Calls ")
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.records.is_empty() {
            let dim = Style::default().add_modifier(Modifier::DIM);
            Paragraph::new(vec![
                Line::from("No calls stored yet."),
                Line::from(Span::styled(
                    format!(
                        "Press {} to add your first record, or :import <file.json> / :sheet <url>.",
                        self.add_key
                    ),
                    dim,
                )),
            ])
            .render(inner, buf);
            return;
        }

        // Header row takes one line of the inner area
        let height = inner.height.saturating_sub(1) as usize;
        self.state.last_height.set(height);
        let total = self.records.len();
        let start = self.state.window_start(height);
        let end = (start + height).min(total);

        let rows: Vec<Row> = self.records[start..end]
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let row = Row::new(vec![
                    TableCell::from(r.call_id.clone()),
                    TableCell::from(r.customer_number.clone()),
                    TableCell::from(r.started_at.clone()),
                    TableCell::from(format_cost(r.cost)),
                    TableCell::from(transcript_preview(&r.transcript)),
                    TableCell::from(r.call_summary.replace('\n', " ")),
                    TableCell::from(Span::styled(r.source.to_string(), self.theme.source_style(r.source))),
                ]);
                if start + i == self.state.selected {
                    row.style(self.theme.table_selected)
                } else {
                    row
                }
            })
            .collect();

        let widths = [
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Length(21),
            Constraint::Length(10),
            Constraint::Length(34),
            Constraint::Fill(1),
            Constraint::Length(13),
        ];

        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect {
            x: inner.right().saturating_sub(1),
            width: 1,
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
        };

        Widget::render(
            Table::new(rows, widths)
                .header(Row::new(HEADERS).style(self.theme.table_header))
                .column_spacing(1),
            text_area,
            buf,
        );

        let mut sb_state = ScrollbarState::new(total)
            .position(self.state.selected)
            .viewport_content_length(height);
        StatefulWidget::render(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            sb_area,
            buf,
            &mut sb_state,
        );
    }
}
