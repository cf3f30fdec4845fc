//! Spreadsheet source: resolves a sheet link to its CSV export, fetches it,
//! and normalizes the rows.
//!
//! Fetched tables are memoized per source URL for the configured freshness
//! window, so re-running a load within that window reuses the previous table.
//! A failed fetch never touches the memo.

use crate::cache::TtlCache;
use crate::delimited::{self, Table};
use callcrm_core::config::SheetsConfig;
use callcrm_core::error::IngestError;
use callcrm_core::normalizer::normalize_tabular_batch;
use callcrm_core::IngestBatch;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const GOOGLE_SHEETS_HOST: &str = "docs.google.com";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid sheet URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("could not create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not read sheet from {url}: {reason}")]
    Body { url: String, reason: String },
}

impl From<FetchError> for IngestError {
    fn from(err: FetchError) -> Self {
        IngestError::Fetch(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// URL resolution
// ---------------------------------------------------------------------------

/// Turn a sheet link into the URL of its CSV export.
///
/// - `docs.google.com/spreadsheets/d/<id>/…` becomes
///   `…/spreadsheets/d/<id>/export?format=csv`, keeping a `gid` found in the
///   query string or the `#gid=` fragment.
/// - Any other link whose path ends in `/edit` gets the same treatment
///   generically: `/edit` → `/export` plus `format=csv`.
/// - Everything else is assumed to already serve CSV and is used as-is.
pub fn resolve_export_url(source: &str) -> Result<Url, FetchError> {
    let source = source.trim();
    let invalid = |reason: &str| FetchError::InvalidUrl {
        url: source.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(source).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("only http and https links are supported"));
    }

    let gid = find_gid(&url);
    let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();

    if url.host_str() == Some(GOOGLE_SHEETS_HOST) {
        return match segments.as_slice() {
            ["spreadsheets", "d", id, ..] if !id.is_empty() => {
                let mut export = Url::parse(&format!(
                    "https://{GOOGLE_SHEETS_HOST}/spreadsheets/d/{id}/export"
                ))
                .map_err(|e| invalid(&e.to_string()))?;
                {
                    let mut query = export.query_pairs_mut();
                    query.append_pair("format", "csv");
                    if let Some(gid) = &gid {
                        query.append_pair("gid", gid);
                    }
                }
                Ok(export)
            }
            _ => Err(invalid("not a spreadsheet link (expected /spreadsheets/d/<id>/...)")),
        };
    }

    if segments.last() == Some(&"edit") {
        let mut export = url.clone();
        let mut path: Vec<&str> = segments[..segments.len() - 1].to_vec();
        path.push("export");
        export.set_path(&path.join("/"));
        export.set_fragment(None);
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "format" && k != "gid")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        {
            let mut query = export.query_pairs_mut();
            query.clear();
            query.extend_pairs(kept);
            query.append_pair("format", "csv");
            if let Some(gid) = &gid {
                query.append_pair("gid", gid);
            }
        }
        return Ok(export);
    }

    Ok(url)
}

fn find_gid(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == "gid")
        .map(|(_, v)| v.into_owned())
        .or_else(|| {
            url.fragment()?
                .split('&')
                .find_map(|part| part.strip_prefix("gid="))
                .map(str::to_string)
        })
        .filter(|gid| !gid.is_empty())
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Fetches sheets over HTTP and memoizes the parsed tables.
///
/// Methods take `&mut self`, so one fetcher never has two requests in flight.
pub struct SheetFetcher {
    client: Client,
    cache: TtlCache<Table>,
}

impl SheetFetcher {
    pub fn new(config: &SheetsConfig) -> Result<Self, FetchError> {
        Self::with_settings(config.cache_ttl(), config.request_timeout(), &config.user_agent)
    }

    pub fn with_settings(ttl: Duration, timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, cache: TtlCache::new(ttl) })
    }

    /// Return the parsed table behind `source`, from the memo while fresh.
    pub async fn fetch(&mut self, source: &str) -> Result<Arc<Table>, FetchError> {
        let key = source.trim();
        if let Some(table) = self.cache.get(key) {
            tracing::debug!(source = key, rows = table.rows.len(), "sheet: cache hit");
            return Ok(table);
        }

        let export = resolve_export_url(key)?;
        let table = self.retrieve(&export).await?;
        tracing::info!(source = key, export = %export, rows = table.rows.len(), "sheet: fetched");
        Ok(self.cache.insert(key, table))
    }

    /// Fetch `source` and normalize its rows into a batch.
    pub async fn load(&mut self, source: &str) -> callcrm_core::error::Result<IngestBatch> {
        let table = self.fetch(source).await?;
        Ok(normalize_tabular_batch(&table.rows))
    }

    /// Drop the memoized table for `source` so the next load refetches.
    pub fn invalidate(&mut self, source: &str) {
        self.cache.invalidate(source.trim());
    }

    async fn retrieve(&self, export: &Url) -> Result<Table, FetchError> {
        let url = export.to_string();
        let response = self
            .client
            .get(export.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status: status.as_u16() });
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false);
        if is_html {
            return Err(FetchError::Body {
                url,
                reason: "got an HTML page instead of CSV (is the sheet shared publicly?)".to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        delimited::parse(&body).map_err(|e| FetchError::Body { url, reason: e.to_string() })
    }
}
