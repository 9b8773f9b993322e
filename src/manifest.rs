//! Desired-state manifest derivation.
//!
//! Flattens the active recommendation list into the set of
//! (source URL, filename, folder) entries one synchronization pass
//! should converge the sound library toward. Manifests are recomputed
//! fresh before every pass and never stored.

use crate::lists::RecommendationList;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Folder slugs managed by the reconciler, in canonical hook order.
pub const LIBRARY_FOLDERS: [&str; 6] = [
    "start",
    "userpromptsubmit",
    "done",
    "precompact",
    "permission",
    "question",
];

/// Map a hook name to its library folder slug. Unrecognized hook names
/// fall back to the lowercased name.
pub fn hook_folder(hook_name: &str) -> String {
    match hook_name {
        "SessionStart" => "start".to_string(),
        "UserPromptSubmit" => "userpromptsubmit".to_string(),
        "Stop" => "done".to_string(),
        "PreCompact" => "precompact".to_string(),
        "PermissionPrompt" => "permission".to_string(),
        "Question" => "question".to_string(),
        other => other.to_lowercase(),
    }
}

/// One desired file in the sound library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub source_url: String,
    pub filename: String,
    pub folder: String,
}

/// Derives manifest entries from recommendation lists.
pub struct ManifestBuilder {
    base_name_regex: Regex,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        // Wiki clip URLs look like .../images/a/ab/Name.ogg/revision/latest?...
        // The segment before ".ogg/" is a stable base identifier.
        let base_name_regex = Regex::new(r"/([^/]+)\.ogg/").expect("Invalid regex");
        Self { base_name_regex }
    }

    /// Flatten a list into manifest entries, one per recommendation.
    pub fn build(&self, list: &RecommendationList) -> Vec<ManifestEntry> {
        let mut entries = Vec::new();
        for hook in &list.hooks {
            let folder = hook_folder(&hook.name);
            for rec in &hook.recommendations {
                let base = self
                    .extract_base_name(&rec.source_url)
                    .unwrap_or_else(|| format!("audio_{}", entries.len()));
                let filename = format!("{} - {}.mp3", base, sanitize_title(&rec.text));
                entries.push(ManifestEntry {
                    source_url: rec.source_url.clone(),
                    filename,
                    folder: folder.clone(),
                });
            }
        }
        entries
    }

    /// Extract the filename-like token preceding the container marker.
    fn extract_base_name(&self, source_url: &str) -> Option<String> {
        self.base_name_regex
            .captures(source_url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip characters that are unsafe in filenames on common filesystems.
pub fn sanitize_title(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect()
}
