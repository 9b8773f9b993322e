//! Save command - force-save a quote selection into one folder.

use crate::audio::WikiClipSource;
use crate::cli::Output;
use crate::config::Settings;
use crate::library::{Library, QuoteFile};
use std::sync::Arc;

/// Run a scoped save: every quote is fetched and written, overwriting
/// anything already there.
pub async fn run_save(folder: &str, quotes_path: &str, settings: Settings) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(quotes_path)?;
    let quotes: Vec<QuoteFile> = serde_json::from_str(&content)?;

    let source = Arc::new(WikiClipSource::new(&settings)?);
    let library = Library::new(settings.sounds_dir(), source);

    let spinner = Output::spinner(&format!("Saving {} quotes to {}/...", quotes.len(), folder));
    let report = library.save_to_folder(folder, &quotes).await?;
    spinner.finish_and_clear();

    Output::success(&format!(
        "Saved {} of {} quotes to {}",
        report.saved.len(),
        quotes.len(),
        report.target_dir.display()
    ));
    for failure in &report.failed {
        Output::warning(&format!("{}: {}", failure.filename, failure.error));
    }

    Ok(())
}
