//! Detail pane: the selected call split into five read-only tabs.
//!
//! | Tab | Content |
//! |-----|---------|
//! | Transcript | full transcript |
//! | Summary | call summary |
//! | Customer Info | phone number and call id |
//! | Recording | recording URL, opened externally with the open key |
//! | Cost & Timing | cost, start/end times, ingestion time, source |

use crate::theme::Theme;
use crate::widgets::tab_bar::TabBar;
use callcrm_core::config::UiConfig;
use callcrm_core::view::{format_cost, format_timestamp};
use callcrm_core::CallRecord;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

pub const NO_RECORDING: &str = "No recording URL for this call.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Transcript,
    Summary,
    CustomerInfo,
    Recording,
    CostTiming,
}

impl DetailTab {
    pub const ALL: [DetailTab; 5] = [
        DetailTab::Transcript,
        DetailTab::Summary,
        DetailTab::CustomerInfo,
        DetailTab::Recording,
        DetailTab::CostTiming,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::Transcript => "Transcript",
            DetailTab::Summary => "Summary",
            DetailTab::CustomerInfo => "Customer Info",
            DetailTab::Recording => "Recording",
            DetailTab::CostTiming => "Cost & Timing",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// `'1'`..=`'5'` to the matching tab.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Lines shown for `record` under `tab`.
pub fn body_lines(record: &CallRecord, tab: DetailTab, ui: &UiConfig, open_key: char) -> Vec<Line<'static>> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let field = |label: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{label}: "), bold),
            Span::raw(value.to_string()),
        ])
    };
    let text_or = |text: &str, empty: &'static str| -> Vec<Line<'static>> {
        if text.is_empty() {
            vec![Line::from(Span::styled(empty, dim))]
        } else {
            text.lines().map(|l| Line::from(l.to_string())).collect()
        }
    };

    match tab {
        DetailTab::Transcript => text_or(&record.transcript, "(no transcript)"),
        DetailTab::Summary => text_or(&record.call_summary, "(no summary)"),
        DetailTab::CustomerInfo => vec![
            field("Phone Number", &record.customer_number),
            field("Call ID", &record.call_id),
        ],
        DetailTab::Recording if record.has_recording() => vec![
            field("Recording URL", record.recording_url.trim()),
            Line::default(),
            Line::from(Span::styled(
                format!("Press {open_key} to play it with {}", ui.player_command),
                dim,
            )),
        ],
        DetailTab::Recording => vec![Line::from(NO_RECORDING)],
        DetailTab::CostTiming => {
            let mut lines = vec![
                field("Cost (USD)", &format_cost(record.cost)),
                field("Started At", &record.started_at),
                field("Ended At", &record.ended_at),
            ];
            if ui.show_added_at {
                lines.push(field(
                    "Added to CRM",
                    &format_timestamp(&record.added_at, &ui.timestamp_format),
                ));
            }
            lines.push(field("Source", &record.source.to_string()));
            lines
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct DetailPane<'a> {
    record: Option<&'a CallRecord>,
    tab: DetailTab,
    scroll: u16,
    focused: bool,
    ui: &'a UiConfig,
    open_key: char,
    theme: &'a Theme,
}

impl<'a> DetailPane<'a> {
    pub fn new(record: Option<&'a CallRecord>, tab: DetailTab, ui: &'a UiConfig, theme: &'a Theme) -> Self {
        Self { record, tab, scroll: 0, focused: false, ui, open_key: 'o', theme }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn open_key(mut self, key: char) -> Self {
        self.open_key = key;
        self
    }
}

impl Widget for DetailPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.record {
            Some(r) => format!(" Call {} ", r.call_id),
            None => " Call ".to_string(),
        };
        let block = Block::bordered().title(title).border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(record) = self.record else {
            return;
        };

        let rows = Layout::default()
            .direction(LayoutDir::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)])
            .split(inner);

        TabBar::new(self.tab, self.theme).render(rows[0], buf);

        Paragraph::new(body_lines(record, self.tab, self.ui, self.open_key))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(rows[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callcrm_core::Source;

    fn record() -> CallRecord {
        CallRecord {
            transcript: "line one\nline two".into(),
            recording_url: String::new(),
            call_summary: String::new(),
            cost: 3.5,
            customer_number: "+15550100".into(),
            started_at: "2024-05-01T10:00:00Z".into(),
            ended_at: "2024-05-01T10:05:00Z".into(),
            call_id: "ID0001".into(),
            added_at: "2024-05-02T08:30:00.000000Z".into(),
            source: Source::Manual,
        }
    }

    fn text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(DetailTab::Transcript.prev(), DetailTab::CostTiming);
        assert_eq!(DetailTab::CostTiming.next(), DetailTab::Transcript);
        assert_eq!(DetailTab::from_digit('4'), Some(DetailTab::Recording));
        assert_eq!(DetailTab::from_digit('0'), None);
        assert_eq!(DetailTab::from_digit('6'), None);
    }

    #[test]
    fn transcript_keeps_lines() {
        let lines = body_lines(&record(), DetailTab::Transcript, &UiConfig::default(), 'o');
        assert_eq!(text(&lines), vec!["line one", "line two"]);
    }

    #[test]
    fn recording_tab_without_url() {
        let lines = body_lines(&record(), DetailTab::Recording, &UiConfig::default(), 'o');
        assert_eq!(text(&lines), vec![NO_RECORDING]);
    }

    #[test]
    fn recording_tab_with_url_mentions_player() {
        let mut r = record();
        r.recording_url = "https://x/a.wav".into();
        let lines = text(&body_lines(&r, DetailTab::Recording, &UiConfig::default(), 'o'));
        assert_eq!(lines[0], "Recording URL: https://x/a.wav");
        assert!(lines[2].contains("xdg-open"));
    }

    #[test]
    fn cost_and_timing() {
        let lines = text(&body_lines(&record(), DetailTab::CostTiming, &UiConfig::default(), 'o'));
        assert_eq!(lines[0], "Cost (USD): $3.50");
        assert_eq!(lines[3], "Added to CRM: 2024-05-02 08:30:00");
        assert_eq!(lines[4], "Source: manual");
    }

    #[test]
    fn added_at_can_be_hidden() {
        let ui = UiConfig { show_added_at: false, ..UiConfig::default() };
        let lines = text(&body_lines(&record(), DetailTab::CostTiming, &ui, 'o'));
        assert!(lines.iter().all(|l| !l.starts_with("Added")));
    }

    #[test]
    fn unusable_timestamp_format_shows_raw_value() {
        let ui = UiConfig { timestamp_format: "%Q".into(), ..UiConfig::default() };
        let lines = text(&body_lines(&record(), DetailTab::CostTiming, &ui, 'o'));
        assert_eq!(lines[3], "Added to CRM: 2024-05-02T08:30:00.000000Z");
    }

    #[test]
    fn customer_info() {
        let lines = text(&body_lines(&record(), DetailTab::CustomerInfo, &UiConfig::default(), 'o'));
        assert_eq!(lines, vec!["Phone Number: +15550100", "Call ID: ID0001"]);
    }
}
