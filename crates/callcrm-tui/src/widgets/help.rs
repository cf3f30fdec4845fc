//! Help popup: centred floating overlay listing keybindings and usage notes.
//!
//! Toggle with `?` (or the configured help key); close with the same key or
//! `Escape`.

use crate::app::Keys;
use crate::theme::Theme;
use crate::widgets::centered_rect;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};

const USAGE: &[&str] = &[
    "Add as many call records as you need with the form or :import / :sheet.",
    "Every call appears in the table; select one to see its details by tab.",
    "Records live only for this session; :export <file> saves them as JSON.",
];

pub struct HelpPopup<'a> {
    keys: &'a Keys,
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(keys: &'a Keys, theme: &'a Theme) -> Self {
        Self { keys, theme }
    }

    fn bindings(&self) -> Vec<(String, &'static str)> {
        let k = self.keys;
        vec![
            ("q  /  Ctrl+c".to_string(), "Quit (:q! to discard unexported calls)"),
            ("↑ k  /  ↓ j".to_string(), "Select call (scroll detail when focused)"),
            ("PageUp / PageDown".to_string(), "Move selection a page"),
            ("g  /  G".to_string(), "First / last call"),
            ("← h  /  → l".to_string(), "Previous / next detail tab"),
            ("1 – 5".to_string(), "Jump to detail tab"),
            ("Tab  /  Enter".to_string(), "Focus detail pane"),
            (k.add_call.to_string(), "Add a call"),
            (k.open_recording.to_string(), "Open recording in external player"),
            (k.command.to_string(), "Command: import, sheet, export, clear, theme, q"),
            (k.help.to_string(), "Toggle this help popup"),
        ]
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bindings = self.bindings();
        let height = (bindings.len() + USAGE.len() + 3) as u16;
        let popup = centered_rect(84, height, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(format!(" callcrm keybindings ({} to close) ", self.keys.help))
            .border_style(self.theme.border_focused);

        let inner = block.inner(popup);
        block.render(popup, buf);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line> = bindings
            .into_iter()
            .map(|(key, desc)| {
                Line::from(vec![Span::styled(format!("  {key:<22}"), bold), Span::raw(desc)])
            })
            .collect();
        lines.push(Line::default());
        lines.extend(
            USAGE
                .iter()
                .map(|u| Line::from(Span::styled(format!("  {u}"), self.theme.stats_label))),
        );

        Paragraph::new(lines).wrap(Wrap { trim: false }).render(inner, buf);
    }
}
