//! Add-call form: a centred popup with the eight manual-entry fields.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor of the active field.
//! - `Backspace` deletes the character before the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor.
//! - `Tab` / `↓` and `Shift+Tab` / `↑` move between fields, wrapping.
//! - `Enter` validates and submits; `Escape` cancels.
//!
//! Cost must parse as a finite number ≥ 0 (blank means 0). Anything else keeps
//! the form open with an error so the normalizer only ever sees valid costs.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use crate::widgets::centered_rect;
use crate::widgets::command_bar::{next_boundary, prev_boundary};
use callcrm_core::ManualEntry;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const LABEL_WIDTH: u16 = 30;
const POPUP_WIDTH: u16 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Transcript,
    RecordingUrl,
    CallSummary,
    Cost,
    CustomerNumber,
    StartedAt,
    EndedAt,
    CallId,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Transcript,
        FormField::RecordingUrl,
        FormField::CallSummary,
        FormField::Cost,
        FormField::CustomerNumber,
        FormField::StartedAt,
        FormField::EndedAt,
        FormField::CallId,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Transcript => "Transcript",
            FormField::RecordingUrl => "Recording URL (audio link)",
            FormField::CallSummary => "Summary",
            FormField::Cost => "Cost (USD)",
            FormField::CustomerNumber => "Customer Number",
            FormField::StartedAt => "Started At (ISO)",
            FormField::EndedAt => "Ended At (ISO)",
            FormField::CallId => "Call ID",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            FormField::RecordingUrl => "https://...",
            FormField::Cost => "0.000",
            FormField::CustomerNumber => "+1...",
            FormField::StartedAt | FormField::EndedAt => "YYYY-MM-DDTHH:MM:SSZ",
            FormField::CallId => "generated when blank",
            FormField::Transcript | FormField::CallSummary => "",
        }
    }
}

/// What the app shell should do after a form key.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    Submit(ManualEntry),
    Cancel,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct EntryFormState {
    values: [String; 8],
    /// Byte offset of the cursor within each value.
    cursors: [usize; 8],
    /// Index into [`FormField::ALL`].
    pub active: usize,
    /// Validation message from the last failed submit.
    pub error: Option<String>,
}

impl EntryFormState {
    pub fn active_field(&self) -> FormField {
        FormField::ALL[self.active]
    }

    pub fn value(&self, field: FormField) -> &str {
        &self.values[field as usize]
    }

    /// Replace a field's text, cursor at the end.
    pub fn set_value(&mut self, field: FormField, text: impl Into<String>) {
        let i = field as usize;
        self.values[i] = text.into();
        self.cursors[i] = self.values[i].len();
    }

    /// Blank every field, as after a successful submit.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Handle a key while the form is open. Returns `Some` when the form
    /// should close.
    pub fn handle(&mut self, event: &AppEvent) -> Option<FormAction> {
        let n = FormField::ALL.len();
        match event {
            AppEvent::FocusNext | AppEvent::Nav(Direction::Down) => {
                self.active = (self.active + 1) % n;
            }
            AppEvent::FocusPrev | AppEvent::Nav(Direction::Up) => {
                self.active = (self.active + n - 1) % n;
            }
            AppEvent::Escape => {
                tracing::debug!("form: cancelled");
                self.reset();
                return Some(FormAction::Cancel);
            }
            AppEvent::Enter => match self.to_entry() {
                Ok(entry) => {
                    tracing::debug!("form: submitted");
                    self.reset();
                    return Some(FormAction::Submit(entry));
                }
                Err(msg) => {
                    tracing::debug!(error = %msg, "form: rejected");
                    self.active = FormField::Cost as usize;
                    self.error = Some(msg);
                }
            },
            AppEvent::Char(c) => {
                let i = self.active;
                self.values[i].insert(self.cursors[i], *c);
                self.cursors[i] += c.len_utf8();
                self.error = None;
            }
            AppEvent::Backspace => {
                let i = self.active;
                if let Some(prev) = prev_boundary(&self.values[i], self.cursors[i]) {
                    self.values[i].remove(prev);
                    self.cursors[i] = prev;
                }
                self.error = None;
            }
            AppEvent::Nav(Direction::Left) => {
                let i = self.active;
                if let Some(prev) = prev_boundary(&self.values[i], self.cursors[i]) {
                    self.cursors[i] = prev;
                }
            }
            AppEvent::Nav(Direction::Right) => {
                let i = self.active;
                self.cursors[i] = next_boundary(&self.values[i], self.cursors[i]);
            }
            _ => {}
        }
        None
    }

    /// Validate the form into a [`ManualEntry`].
    pub fn to_entry(&self) -> Result<ManualEntry, String> {
        let text = |f: FormField| self.value(f).to_string();
        Ok(ManualEntry {
            transcript: text(FormField::Transcript),
            recording_url: text(FormField::RecordingUrl),
            call_summary: text(FormField::CallSummary),
            cost: parse_cost(self.value(FormField::Cost))?,
            customer_number: text(FormField::CustomerNumber),
            started_at: text(FormField::StartedAt),
            ended_at: text(FormField::EndedAt),
            call_id: text(FormField::CallId),
        })
    }
}

fn parse_cost(raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(format!("Cost must be a number ≥ 0 (got {raw:?})")),
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct EntryForm<'a> {
    state: &'a EntryFormState,
    theme: &'a Theme,
}

impl<'a> EntryForm<'a> {
    pub fn new(state: &'a EntryFormState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Screen rectangle the popup occupies inside `area`.
    pub fn popup_area(area: Rect) -> Rect {
        // fields + error line + hint line + borders
        centered_rect(POPUP_WIDTH, FormField::ALL.len() as u16 + 4, area)
    }

    /// Absolute terminal position of the text cursor in the active field.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let inner = Self::inner(Self::popup_area(area));
        let i = self.state.active;
        let avail = value_width(inner);
        let (start, col) = scroll_window(&self.state.values[i], self.state.cursors[i], avail);
        let x = inner.x + LABEL_WIDTH + (col - start) as u16;
        (x.min(inner.right().saturating_sub(1)), inner.y + i as u16)
    }

    fn inner(popup: Rect) -> Rect {
        Block::bordered().inner(popup)
    }
}

fn value_width(inner: Rect) -> usize {
    inner.width.saturating_sub(LABEL_WIDTH).max(1) as usize
}

/// First visible char index and cursor char index for a value that may be
/// wider than the field.
fn scroll_window(value: &str, cursor: usize, avail: usize) -> (usize, usize) {
    let col = value[..cursor].chars().count();
    (col.saturating_sub(avail.saturating_sub(1)), col)
}

impl Widget for EntryForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = Self::popup_area(area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" Add call (Enter submit, Esc cancel) ")
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let avail = value_width(inner);
        let dim = Style::default().add_modifier(Modifier::DIM);

        let mut lines: Vec<Line> = FormField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let active = i == self.state.active;
                let label_style = if active {
                    self.theme.border_focused
                } else {
                    Style::default()
                };
                let label = Span::styled(
                    format!("{:<width$}", field.label(), width = LABEL_WIDTH as usize),
                    label_style,
                );
                let value = &self.state.values[i];
                let shown = if value.is_empty() {
                    Span::styled(field.placeholder(), dim)
                } else {
                    let start = if active {
                        scroll_window(value, self.state.cursors[i], avail).0
                    } else {
                        0
                    };
                    Span::raw(value.chars().skip(start).take(avail).collect::<String>())
                };
                Line::from(vec![label, shown])
            })
            .collect();

        lines.push(match &self.state.error {
            Some(err) => Line::from(Span::styled(err.clone(), self.theme.status_error)),
            None => Line::default(),
        });
        lines.push(Line::from(Span::styled(
            "Tab/↓ next field  Shift+Tab/↑ previous field",
            dim,
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
