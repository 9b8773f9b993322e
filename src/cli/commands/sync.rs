//! Sync command - reconcile the sound library with the active list.

use crate::audio::WikiClipSource;
use crate::cli::Output;
use crate::config::Settings;
use crate::library::Library;
use crate::lists::{canonical_hooks, ListStore};
use crate::manifest::ManifestBuilder;
use std::sync::Arc;

/// Run a full sync pass from the active list.
pub async fn run_sync(settings: Settings) -> anyhow::Result<()> {
    let store = ListStore::new(settings.state_path());
    let collection = store.load(canonical_hooks())?;
    let Some(active) = collection.active_list() else {
        anyhow::bail!("No lists in state file");
    };

    let manifest = ManifestBuilder::new().build(active);

    Output::header("Battlecry Sync");
    println!();
    Output::kv("List", &format!("{} ({})", active.name, active.id));
    Output::kv("Library", &settings.sounds_dir().display().to_string());
    Output::kv("Quotes", &manifest.len().to_string());
    println!();

    let source = Arc::new(WikiClipSource::new(&settings)?);
    let library = Library::new(settings.sounds_dir(), source);

    let spinner = Output::spinner("Reconciling folders...");
    let report = library.sync_all(&manifest).await?;
    spinner.finish_and_clear();

    Output::sync_counts(
        report.saved.len(),
        report.skipped.len(),
        report.deleted.len(),
        report.failed.len(),
    );

    for failure in &report.failed {
        Output::warning(&format!(
            "{}/{}: {}",
            failure.folder, failure.filename, failure.error
        ));
    }

    println!();
    if report.is_clean() {
        Output::success("Library is in sync with the active list.");
    } else {
        Output::warning("Some quotes failed; run sync again to retry them.");
    }

    Ok(())
}
