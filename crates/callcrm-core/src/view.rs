//! Display helpers shared by the TUI and headless output.

use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;

/// Characters of transcript shown in the call table.
pub const PREVIEW_CHARS: usize = 30;

/// First [`PREVIEW_CHARS`] characters of a transcript followed by `...`,
/// short transcripts included. Control characters become spaces.
pub fn transcript_preview(transcript: &str) -> String {
    let head: String = transcript
        .chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    format!("{head}...")
}

/// `$12.50` style cost, rounded to cents.
pub fn format_cost(cost: f64) -> String {
    format!("${cost:.2}")
}

/// Whether `format` is a strftime string chrono can render.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Render an RFC 3339 timestamp with a chrono format string, keeping its
/// offset. Unparsable input or an unusable format returns `raw` unchanged.
pub fn format_timestamp(raw: &str, format: &str) -> String {
    let Ok(t) = chrono::DateTime::parse_from_rfc3339(raw.trim()) else {
        return raw.to_string();
    };
    let mut out = String::new();
    match write!(out, "{}", t.format(format)) {
        Ok(()) => out,
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundary() {
        let long = "é".repeat(40);
        let preview = transcript_preview(&long);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn preview_of_short_text_still_has_ellipsis() {
        assert_eq!(transcript_preview("hi"), "hi...");
        assert_eq!(transcript_preview(""), "...");
    }

    #[test]
    fn preview_flattens_newlines() {
        assert_eq!(transcript_preview("a\nb"), "a b...");
    }

    #[test]
    fn cost_has_two_decimals() {
        assert_eq!(format_cost(12.5), "$12.50");
        assert_eq!(format_cost(0.0), "$0.00");
    }

    #[test]
    fn timestamps_are_reformatted_or_passed_through() {
        assert_eq!(
            format_timestamp("2024-05-01T10:00:00.123456Z", "%Y-%m-%d %H:%M:%S"),
            "2024-05-01 10:00:00"
        );
        assert_eq!(format_timestamp("yesterday", "%Y"), "yesterday");
    }

    #[test]
    fn unknown_specifier_returns_raw_instead_of_panicking() {
        let raw = "2024-05-01T10:00:00Z";
        assert_eq!(format_timestamp(raw, "%Q"), raw);
        assert_eq!(format_timestamp(raw, "%Y-%"), raw);
    }

    #[test]
    fn format_validation() {
        assert!(is_valid_timestamp_format("%Y-%m-%d %H:%M:%S"));
        assert!(is_valid_timestamp_format("plain text"));
        assert!(!is_valid_timestamp_format("%Q"));
    }
}
