//! Batch export of quote selections as a compressed archive.
//!
//! Entries are fetched, transcoded and appended one at a time under a
//! `Unit/Category/filename` virtual path; only the clip currently being
//! processed is held in memory. A failing entry is skipped, never fatal.

use crate::audio::ClipSource;
use crate::error::{BattlecryError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument, warn};

/// One quote in an export selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveQuote {
    pub source_url: String,
    pub filename: String,
    #[serde(default)]
    pub unit_name: String,
    #[serde(default)]
    pub category_name: String,
}

impl ArchiveQuote {
    /// Virtual path of this quote inside the archive.
    pub fn entry_path(&self) -> String {
        format!("{}/{}/{}", self.unit_name, self.category_name, self.filename)
    }
}

/// One entry the exporter could not include.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveFailure {
    pub filename: String,
    pub error: String,
}

/// What ended up in (and out of) the archive.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveSummary {
    pub added: Vec<String>,
    pub skipped: Vec<ArchiveFailure>,
}

/// Build a ZIP archive of the selection at `out_path`.
///
/// Rejects an empty selection before any I/O. Every entry is attempted;
/// the archive is finalized regardless of how many were skipped.
#[instrument(skip_all, fields(quotes = quotes.len()))]
pub async fn build_archive(
    source: &dyn ClipSource,
    quotes: &[ArchiveQuote],
    out_path: &Path,
) -> Result<ArchiveSummary> {
    if quotes.is_empty() {
        return Err(BattlecryError::InvalidInput("No quotes provided".into()));
    }

    let file = std::fs::File::create(out_path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut summary = ArchiveSummary::default();

    for quote in quotes {
        let bytes = match source.fetch_clip(&quote.source_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping {}: {}", quote.filename, e);
                summary.skipped.push(ArchiveFailure {
                    filename: quote.filename.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        let entry_path = quote.entry_path();
        zip.start_file(&entry_path, options).map_err(|e| {
            BattlecryError::Archive(format!("zip start file failed ({entry_path}): {e}"))
        })?;
        zip.write_all(&bytes)?;
        info!("Added {}", entry_path);
        summary.added.push(entry_path);
    }

    zip.finish()
        .map_err(|e| BattlecryError::Archive(format!("zip finish failed: {e}")))?;

    info!(
        added = summary.added.len(),
        skipped = summary.skipped.len(),
        "Archive complete"
    );
    Ok(summary)
}
