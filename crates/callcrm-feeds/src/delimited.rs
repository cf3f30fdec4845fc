//! Comma-separated text parsing for spreadsheet exports.
//!
//! Handles quoted fields, doubled quotes, commas and line breaks inside
//! quotes, CRLF line endings, and a leading UTF-8 BOM. The first record is the
//! header; every later record becomes a [`Row`] keyed by trimmed header name.

use callcrm_core::Row;

/// A parsed sheet: header names plus one [`Row`] per data line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DelimitedError {
    #[error("body is empty, expected a header row")]
    Empty,
    #[error("header row has no column names")]
    BlankHeader,
    #[error("unterminated quoted field starting on line {0}")]
    UnterminatedQuote(usize),
}

/// Parse a comma-separated body into a [`Table`].
///
/// Blank lines are skipped. Rows shorter than the header are padded with
/// empty cells; extra cells beyond the header are dropped.
pub fn parse(text: &str) -> Result<Table, DelimitedError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(text)?.into_iter();

    let headers: Vec<String> = records
        .next()
        .ok_or(DelimitedError::Empty)?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(DelimitedError::BlankHeader);
    }

    let rows = records
        .map(|cells| {
            let mut cells = cells.into_iter();
            headers
                .iter()
                .map(|h| (h, cells.next().unwrap_or_default()))
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, v)| (h.clone(), v))
                .collect::<Row>()
        })
        .collect();

    Ok(Table { headers, rows })
}

/// Split the body into records of cells, honouring quotes across line breaks.
fn split_records(text: &str) -> Result<Vec<Vec<String>>, DelimitedError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut quote_line = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    current.push('\n');
                }
                '\r' if chars.peek() == Some(&'\n') => {}
                other => current.push(other),
            }
            continue;
        }

        match ch {
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut current)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                finish_record(&mut records, &mut record, &mut current);
            }
            other => current.push(other),
        }
    }

    if in_quotes {
        return Err(DelimitedError::UnterminatedQuote(quote_line));
    }
    finish_record(&mut records, &mut record, &mut current);
    Ok(records)
}

fn finish_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, current: &mut String) {
    record.push(std::mem::take(current));
    let cells = std::mem::take(record);
    let blank = cells.len() == 1 && cells[0].trim().is_empty();
    if !blank {
        records.push(cells);
    }
}
