//! Tab bar widget: the strip of detail tabs above the detail pane.

use crate::theme::Theme;
use crate::widgets::detail::DetailTab;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::Line,
    widgets::{Tabs, Widget},
};

/// Renders the 1-line strip of detail tabs, numbered for the `1`–`5` keys.
/// The active tab is highlighted.
pub struct TabBar<'a> {
    active: DetailTab,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(active: DetailTab, theme: &'a Theme) -> Self {
        Self { active, theme }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels: Vec<Line> = DetailTab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!(" {}:{} ", i + 1, tab.title())))
            .collect();

        Tabs::new(labels)
            .select(self.active.index())
            .highlight_style(self.theme.table_selected.add_modifier(Modifier::BOLD))
            .divider("")
            .render(area, buf);
    }
}
