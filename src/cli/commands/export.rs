//! Export command - build a ZIP archive from a quote selection.

use crate::archive::{build_archive, ArchiveQuote};
use crate::audio::WikiClipSource;
use crate::cli::Output;
use crate::config::Settings;
use std::path::Path;

/// Run a batch export to a ZIP archive.
pub async fn run_export(quotes_path: &str, output: &str, settings: Settings) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(quotes_path)?;
    let quotes: Vec<ArchiveQuote> = serde_json::from_str(&content)?;

    let source = WikiClipSource::new(&settings)?;

    let spinner = Output::spinner(&format!("Archiving {} quotes...", quotes.len()));
    let summary = build_archive(&source, &quotes, Path::new(output)).await?;
    spinner.finish_and_clear();

    Output::success(&format!(
        "Wrote {} with {} entries ({} skipped)",
        output,
        summary.added.len(),
        summary.skipped.len()
    ));
    for failure in &summary.skipped {
        Output::warning(&format!("{}: {}", failure.filename, failure.error));
    }

    Ok(())
}
