//! Stats bar: the 1-line summary across the top of the screen.

use crate::app::Keys;
use crate::theme::Theme;
use callcrm_core::view::format_cost;
use callcrm_core::{Source, Stats};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Record count, total cost, and per-source counts, with keybinding hints
/// right-aligned in the same row.
pub struct StatsBar<'a> {
    stats: &'a Stats,
    keys: &'a Keys,
    theme: &'a Theme,
}

impl<'a> StatsBar<'a> {
    pub fn new(stats: &'a Stats, keys: &'a Keys, theme: &'a Theme) -> Self {
        Self { stats, keys, theme }
    }

    fn line(&self) -> Line<'static> {
        let t = self.theme;
        let mut spans = vec![
            Span::styled(" Calls ", t.stats_label),
            Span::styled(self.stats.count.to_string(), t.stats_value),
            Span::styled("  Total cost ", t.stats_label),
            Span::styled(format_cost(self.stats.total_cost), t.stats_value),
            Span::raw("  "),
        ];
        for source in Source::ALL {
            spans.push(Span::styled(format!(" {source} "), t.source_style(source)));
            spans.push(Span::styled(self.stats.by_source(source).to_string(), t.stats_value));
        }
        Line::from(spans)
    }
}

impl Widget for StatsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_line(area.x, area.y, &self.line(), area.width);

        let k = self.keys;
        let hint = format!(" {}:add  {}:cmd  {}:help  q:quit ", k.add_call, k.command, k.help);
        let hint_x = area.right().saturating_sub(hint.chars().count() as u16);
        buf.set_string(hint_x, area.y, hint, Style::default().add_modifier(Modifier::DIM));
    }
}
