//! Non-interactive mode: ingest, print, optionally export, exit.
//!
//! Any batch-level failure aborts the run with an error naming its source, so
//! the binary exits non-zero. Field-level issues are printed to the error
//! stream as warnings and never abort.

use anyhow::Context;
use callcrm_core::config::Config;
use callcrm_core::view::{format_cost, transcript_preview};
use callcrm_core::{export, CallRecord, CallStore, IngestBatch, Source};
use callcrm_feeds::{json_file, SheetFetcher};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub imports: Vec<PathBuf>,
    pub sheet: Option<String>,
    pub export: Option<PathBuf>,
}

/// (header, width) per column; the last column is not padded.
const COLUMNS: [(&str, usize); 7] = [
    ("call_id", 12),
    ("customer_number", 16),
    ("started_at", 21),
    ("cost", 10),
    ("transcript", 34),
    ("source", 14),
    ("call_summary", 0),
];

/// Run one headless session and return the resulting store.
pub fn run(
    config: &Config,
    opts: &HeadlessOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<CallStore> {
    let mut store = CallStore::new();

    for path in &opts.imports {
        let batch = json_file::load(path).with_context(|| format!("importing {}", path.display()))?;
        ingest(&mut store, batch, err)?;
    }

    if let Some(url) = &opts.sheet {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let mut fetcher = SheetFetcher::new(&config.sheets)?;
        let batch = runtime
            .block_on(fetcher.load(url))
            .with_context(|| format!("loading sheet {url}"))?;
        ingest(&mut store, batch, err)?;
    }

    out.write_all(render_table(store.records()).as_bytes())?;
    out.write_all(render_stats(&store).as_bytes())?;

    if let Some(path) = &opts.export {
        export::write_json(path, store.records())
            .with_context(|| format!("exporting to {}", path.display()))?;
        writeln!(out, "Exported {} call(s) to {}", store.len(), path.display())?;
    }

    Ok(store)
}

fn ingest(store: &mut CallStore, batch: IngestBatch, err: &mut dyn Write) -> anyhow::Result<()> {
    for issue in &batch.issues {
        writeln!(err, "warning: {issue}")?;
    }
    store.extend(batch);
    Ok(())
}

/// The call table as fixed-width text, or the empty-state line.
pub fn render_table(records: &[CallRecord]) -> String {
    if records.is_empty() {
        return "No calls stored yet.\n".to_string();
    }

    let mut text = row(COLUMNS.iter().map(|(h, _)| h.to_string()));
    for r in records {
        text.push_str(&row([
            r.call_id.clone(),
            r.customer_number.clone(),
            r.started_at.clone(),
            format_cost(r.cost),
            transcript_preview(&r.transcript),
            r.source.to_string(),
            r.call_summary.clone(),
        ]));
    }
    text
}

fn row(cells: impl IntoIterator<Item = String>) -> String {
    let mut line = cells
        .into_iter()
        .zip(COLUMNS)
        .map(|(cell, (_, width))| {
            let cell = cell.replace(['\n', '\r', '\t'], " ");
            if width == 0 {
                cell
            } else {
                let clipped: String = cell.chars().take(width - 1).collect();
                format!("{clipped:<width$}")
            }
        })
        .collect::<String>()
        .trim_end()
        .to_string();
    line.push('\n');
    line
}

/// One-line totals: count, summed cost, and count per source.
pub fn render_stats(store: &CallStore) -> String {
    let stats = store.stats();
    let by_source = Source::ALL
        .iter()
        .map(|s| format!("{s}: {}", stats.by_source(*s)))
        .collect::<Vec<_>>()
        .join("  ");
    format!(
        "\nCalls: {}  Total cost: {}  {}\n",
        stats.count,
        format_cost(stats.total_cost),
        by_source
    )
}
