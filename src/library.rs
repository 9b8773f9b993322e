//! Sound library reconciliation.
//!
//! The reconciler diffs a desired manifest against the on-disk folder
//! tree and converges the tree toward it: orphans are deleted, files
//! already present are skipped by name, and missing files are fetched,
//! transcoded and written. Decisions are recomputed from disk state on
//! every pass, so an interrupted pass self-heals on the next run.
//!
//! Two sync invocations against the same folder race unguarded (last
//! writer wins); callers that expose reconciliation concurrently must
//! serialize passes themselves.

use crate::audio::ClipSource;
use crate::error::{BattlecryError, Result};
use crate::manifest::{ManifestEntry, LIBRARY_FOLDERS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// One file touched by a sync pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItem {
    pub filename: String,
    pub folder: String,
}

/// One file a sync pass could not produce.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub filename: String,
    pub folder: String,
    pub error: String,
}

/// Per-item breakdown of a full sync pass.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub saved: Vec<SyncItem>,
    pub skipped: Vec<SyncItem>,
    pub deleted: Vec<SyncItem>,
    pub failed: Vec<SyncFailure>,
}

impl SyncReport {
    /// True when every desired entry was either written or already present.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of a scoped save into a single folder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub target_dir: PathBuf,
    pub saved: Vec<String>,
    pub failed: Vec<SyncFailure>,
}

/// A quote addressed at a single folder (scoped save input).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFile {
    pub source_url: String,
    pub filename: String,
}

/// The managed sound library: a folder per canonical hook under one root.
pub struct Library {
    sounds_dir: PathBuf,
    source: Arc<dyn ClipSource>,
}

impl Library {
    pub fn new(sounds_dir: impl Into<PathBuf>, source: Arc<dyn ClipSource>) -> Self {
        Self {
            sounds_dir: sounds_dir.into(),
            source,
        }
    }

    /// Root directory of the library.
    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    /// Whether `folder` is one of the managed folder slugs.
    pub fn is_valid_folder(folder: &str) -> bool {
        LIBRARY_FOLDERS.contains(&folder)
    }

    /// Bring every managed folder into correspondence with the manifest.
    ///
    /// Entries whose folder is not one of the managed slugs are ignored.
    /// Item failures are recorded and never abort the pass.
    #[instrument(skip_all, fields(entries = manifest.len()))]
    pub async fn sync_all(&self, manifest: &[ManifestEntry]) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for folder in LIBRARY_FOLDERS {
            let desired: Vec<&ManifestEntry> =
                manifest.iter().filter(|e| e.folder == folder).collect();
            self.sync_folder(folder, &desired, &mut report).await?;
        }

        info!(
            saved = report.saved.len(),
            skipped = report.skipped.len(),
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "Sync complete"
        );
        Ok(report)
    }

    /// Reconcile a single folder against its slice of the manifest.
    async fn sync_folder(
        &self,
        folder: &str,
        desired: &[&ManifestEntry],
        report: &mut SyncReport,
    ) -> Result<()> {
        let target_dir = self.sounds_dir.join(folder);
        std::fs::create_dir_all(&target_dir)?;

        let snapshot = folder_snapshot(&target_dir)?;
        let desired_names: BTreeSet<&str> = desired.iter().map(|e| e.filename.as_str()).collect();

        // Orphans come from the pre-pass snapshot only; a file written
        // later in this pass can never be treated as one.
        for orphan in snapshot.iter().filter(|n| !desired_names.contains(n.as_str())) {
            let path = target_dir.join(orphan);
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    info!("Deleted orphan {}", path.display());
                    report.deleted.push(SyncItem {
                        filename: orphan.clone(),
                        folder: folder.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Could not delete orphan {}: {}", path.display(), e);
                }
            }
        }

        for entry in desired {
            // Presence by name is the whole idempotence check; content
            // freshness of existing files is out of contract.
            if snapshot.contains(&entry.filename) {
                report.skipped.push(SyncItem {
                    filename: entry.filename.clone(),
                    folder: folder.to_string(),
                });
                continue;
            }

            match self.write_clip(&entry.source_url, &target_dir, &entry.filename).await {
                Ok(()) => {
                    info!("Saved {}/{}", folder, entry.filename);
                    report.saved.push(SyncItem {
                        filename: entry.filename.clone(),
                        folder: folder.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Failed {}/{}: {}", folder, entry.filename, e);
                    report.failed.push(SyncFailure {
                        filename: entry.filename.clone(),
                        folder: folder.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Force-save quotes into one folder: always fetch, always overwrite,
    /// never delete anything else. Validation happens before any I/O.
    #[instrument(skip_all, fields(folder = folder, quotes = quotes.len()))]
    pub async fn save_to_folder(&self, folder: &str, quotes: &[QuoteFile]) -> Result<SaveReport> {
        if !Self::is_valid_folder(folder) {
            return Err(BattlecryError::InvalidInput(format!(
                "Invalid folder '{}'. Must be one of: {}",
                folder,
                LIBRARY_FOLDERS.join(", ")
            )));
        }
        if quotes.is_empty() {
            return Err(BattlecryError::InvalidInput("No quotes provided".into()));
        }

        let target_dir = self.sounds_dir.join(folder);
        std::fs::create_dir_all(&target_dir)?;

        let mut report = SaveReport {
            target_dir: target_dir.clone(),
            saved: Vec::new(),
            failed: Vec::new(),
        };

        for quote in quotes {
            match self.write_clip(&quote.source_url, &target_dir, &quote.filename).await {
                Ok(()) => {
                    info!("Saved {}/{}", folder, quote.filename);
                    report.saved.push(quote.filename.clone());
                }
                Err(e) => {
                    warn!("Failed {}/{}: {}", folder, quote.filename, e);
                    report.failed.push(SyncFailure {
                        filename: quote.filename.clone(),
                        folder: folder.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    async fn write_clip(&self, source_url: &str, target_dir: &Path, filename: &str) -> Result<()> {
        let bytes = self.source.fetch_clip(source_url).await?;
        std::fs::write(target_dir.join(filename), bytes)?;
        Ok(())
    }
}

/// Names of regular files currently in a folder.
fn folder_snapshot(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Clip source backed by a fixed map; unknown URLs fail like a dead
    /// remote would.
    struct StaticClipSource {
        clips: HashMap<String, Vec<u8>>,
        fetches: AtomicUsize,
    }

    impl StaticClipSource {
        fn new(clips: &[(&str, &[u8])]) -> Self {
            Self {
                clips: clips
                    .iter()
                    .map(|(url, bytes)| (url.to_string(), bytes.to_vec()))
                    .collect(),
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ClipSource for StaticClipSource {
        async fn fetch_clip(&self, source_url: &str) -> Result<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.clips
                .get(source_url)
                .cloned()
                .ok_or_else(|| BattlecryError::Fetch(format!("unexpected status 404 for {source_url}")))
        }
    }

    fn entry(url: &str, filename: &str, folder: &str) -> ManifestEntry {
        ManifestEntry {
            source_url: url.to_string(),
            filename: filename.to_string(),
            folder: folder.to_string(),
        }
    }

    fn folder_files(dir: &Path) -> BTreeSet<String> {
        folder_snapshot(dir).unwrap()
    }

    #[tokio::test]
    async fn test_orphan_deleted_existing_skipped() {
        let root = TempDir::new().unwrap();
        let done = root.path().join("done");
        std::fs::create_dir_all(&done).unwrap();
        std::fs::write(done.join("a.mp3"), b"old").unwrap();
        std::fs::write(done.join("orphan.mp3"), b"stale").unwrap();

        let source = Arc::new(StaticClipSource::new(&[("u://a", b"mp3")]));
        let library = Library::new(root.path(), source.clone());

        let report = library
            .sync_all(&[entry("u://a", "a.mp3", "done")])
            .await
            .unwrap();

        assert_eq!(report.saved.len(), 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.deleted.len(), 1);
        assert_eq!(report.failed.len(), 0);
        assert!(done.join("a.mp3").exists());
        assert!(!done.join("orphan.mp3").exists());
        // Skipped files are never re-fetched.
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_folder_downloads_everything() {
        let root = TempDir::new().unwrap();
        let source = Arc::new(StaticClipSource::new(&[
            ("u://a", b"clip-a"),
            ("u://b", b"clip-b"),
        ]));
        let library = Library::new(root.path(), source);

        let report = library
            .sync_all(&[
                entry("u://a", "a.mp3", "start"),
                entry("u://b", "b.mp3", "start"),
            ])
            .await
            .unwrap();

        assert_eq!(report.saved.len(), 2);
        assert_eq!(report.skipped.len(), 0);
        assert_eq!(report.deleted.len(), 0);
        assert_eq!(
            std::fs::read(root.path().join("start").join("a.mp3")).unwrap(),
            b"clip-a"
        );
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_rest() {
        let root = TempDir::new().unwrap();
        let source = Arc::new(StaticClipSource::new(&[("u://good", b"ok")]));
        let library = Library::new(root.path(), source);

        let report = library
            .sync_all(&[
                entry("u://missing", "broken.mp3", "question"),
                entry("u://good", "good.mp3", "question"),
            ])
            .await
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].filename, "broken.mp3");
        assert_eq!(report.saved.len(), 1);
        assert!(root.path().join("question").join("good.mp3").exists());
        assert!(!root.path().join("question").join("broken.mp3").exists());
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let root = TempDir::new().unwrap();
        let source = Arc::new(StaticClipSource::new(&[
            ("u://a", b"clip-a"),
            ("u://b", b"clip-b"),
        ]));
        let library = Library::new(root.path(), source.clone());
        let manifest = vec![
            entry("u://a", "a.mp3", "start"),
            entry("u://b", "b.mp3", "done"),
        ];

        library.sync_all(&manifest).await.unwrap();
        let fetched_first = source.fetch_count();
        let second = library.sync_all(&manifest).await.unwrap();

        assert_eq!(second.saved.len(), 0);
        assert_eq!(second.deleted.len(), 0);
        assert_eq!(second.skipped.len(), manifest.len());
        assert_eq!(source.fetch_count(), fetched_first);
    }

    #[tokio::test]
    async fn test_converges_to_exact_desired_set() {
        let root = TempDir::new().unwrap();
        let done = root.path().join("done");
        std::fs::create_dir_all(&done).unwrap();
        std::fs::write(done.join("stale1.mp3"), b"x").unwrap();
        std::fs::write(done.join("stale2.mp3"), b"y").unwrap();

        let source = Arc::new(StaticClipSource::new(&[
            ("u://a", b"a"),
            ("u://b", b"b"),
        ]));
        let library = Library::new(root.path(), source);
        let manifest = vec![
            entry("u://a", "a.mp3", "done"),
            entry("u://b", "b.mp3", "done"),
        ];

        let report = library.sync_all(&manifest).await.unwrap();

        assert!(report.is_clean());
        let expected: BTreeSet<String> =
            ["a.mp3".to_string(), "b.mp3".to_string()].into_iter().collect();
        assert_eq!(folder_files(&done), expected);
    }

    #[tokio::test]
    async fn test_unmanaged_folder_entries_are_ignored() {
        let root = TempDir::new().unwrap();
        let source = Arc::new(StaticClipSource::new(&[("u://a", b"a")]));
        let library = Library::new(root.path(), source);

        let report = library
            .sync_all(&[entry("u://a", "a.mp3", "somewhere-else")])
            .await
            .unwrap();

        assert_eq!(report.saved.len(), 0);
        assert!(!root.path().join("somewhere-else").exists());
    }

    #[tokio::test]
    async fn test_save_to_folder_rejects_invalid_folder() {
        let root = TempDir::new().unwrap();
        let source = Arc::new(StaticClipSource::new(&[]));
        let library = Library::new(root.path(), source);

        let err = library
            .save_to_folder(
                "attic",
                &[QuoteFile {
                    source_url: "u://a".to_string(),
                    filename: "a.mp3".to_string(),
                }],
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
        // Rejected before any I/O: nothing was created.
        assert!(!root.path().join("attic").exists());
    }

    #[tokio::test]
    async fn test_save_to_folder_rejects_empty_quotes() {
        let root = TempDir::new().unwrap();
        let source = Arc::new(StaticClipSource::new(&[]));
        let library = Library::new(root.path(), source);

        let err = library.save_to_folder("done", &[]).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_save_to_folder_overwrites_existing() {
        let root = TempDir::new().unwrap();
        let done = root.path().join("done");
        std::fs::create_dir_all(&done).unwrap();
        std::fs::write(done.join("a.mp3"), b"old-bytes").unwrap();

        let source = Arc::new(StaticClipSource::new(&[("u://a", b"new-bytes")]));
        let library = Library::new(root.path(), source.clone());

        let report = library
            .save_to_folder(
                "done",
                &[QuoteFile {
                    source_url: "u://a".to_string(),
                    filename: "a.mp3".to_string(),
                }],
            )
            .await
            .unwrap();

        assert_eq!(report.saved, vec!["a.mp3".to_string()]);
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(std::fs::read(done.join("a.mp3")).unwrap(), b"new-bytes");
    }

    #[tokio::test]
    async fn test_save_to_folder_partial_failure() {
        let root = TempDir::new().unwrap();
        let source = Arc::new(StaticClipSource::new(&[("u://ok", b"fine")]));
        let library = Library::new(root.path(), source);

        let report = library
            .save_to_folder(
                "permission",
                &[
                    QuoteFile {
                        source_url: "u://gone".to_string(),
                        filename: "gone.mp3".to_string(),
                    },
                    QuoteFile {
                        source_url: "u://ok".to_string(),
                        filename: "ok.mp3".to_string(),
                    },
                ],
            )
            .await
            .unwrap();

        assert_eq!(report.saved, vec!["ok.mp3".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].filename, "gone.mp3");
    }
}
