//! Ratatui widgets for the callcrm TUI.

use ratatui::layout::Rect;

pub mod call_table;
pub mod command_bar;
pub mod detail;
pub mod entry_form;
pub mod help;
pub mod stats_bar;
pub mod status_line;
pub mod tab_bar;

/// A `width` x `height` rectangle centred in `area`, clipped to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
