//! Persistence for recommendation list state.
//!
//! The on-disk shape is JSON with camelCase keys. Two shapes are
//! accepted: the current `{lists, activeListId}` collection and the
//! legacy `{hooks}` single-list export. Both decode into
//! [`ListCollection`] here, at the boundary; nothing downstream ever
//! branches on the raw shape.

use super::{normalize_hooks, Hook, ListCollection};
use crate::error::{BattlecryError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Raw persisted state, before migration.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersistedState {
    Collection(ListCollection),
    Legacy { hooks: Vec<Hook> },
}

/// Loads and saves the list state file.
pub struct ListStore {
    path: PathBuf,
}

impl ListStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection, migrating legacy shapes. A missing file
    /// yields a collection holding only the default list built from
    /// `defaults`.
    pub fn load(&self, defaults: Vec<Hook>) -> Result<ListCollection> {
        if !self.path.exists() {
            debug!("No state file at {}, using defaults", self.path.display());
            return Ok(migrate(None, defaults));
        }

        let content = std::fs::read_to_string(&self.path)?;
        let state: PersistedState = serde_json::from_str(&content).map_err(|e| {
            BattlecryError::State(format!(
                "unreadable state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(migrate(Some(state), defaults))
    }

    /// Persist the collection. Called after every mutation.
    pub fn save(&self, collection: &ListCollection) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(collection)?;
        std::fs::write(&self.path, content)?;
        debug!("Saved list state to {}", self.path.display());
        Ok(())
    }
}

/// Bring any accepted persisted shape into the canonical collection.
fn migrate(state: Option<PersistedState>, defaults: Vec<Hook>) -> ListCollection {
    match state {
        None => ListCollection::with_default(defaults),
        Some(PersistedState::Collection(collection)) => {
            if collection.lists.is_empty() {
                return ListCollection::with_default(defaults);
            }
            let mut migrated = collection;
            for list in &mut migrated.lists {
                list.hooks = normalize_hooks(&list.hooks);
            }
            migrated
        }
        Some(PersistedState::Legacy { hooks }) => {
            info!("Migrating legacy single-list state");
            ListCollection::with_default(hooks)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::{Recommendation, DEFAULT_LIST_ID};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ListStore {
        ListStore::new(dir.path().join("lists.json"))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let col = store_in(&dir).load(Vec::new()).unwrap();
        assert_eq!(col.lists.len(), 1);
        assert_eq!(col.lists[0].id, DEFAULT_LIST_ID);
        assert_eq!(col.active_list_id, DEFAULT_LIST_ID);
    }

    #[test]
    fn test_save_load_roundtrip_uses_camel_case() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let rec = Recommendation {
            text: "My life for Aiur!".to_string(),
            unit: "Zealot".to_string(),
            faction: "Protoss".to_string(),
            source_url: "https://example.com/Zealot.ogg/rev".to_string(),
        };
        let col = ListCollection::with_default(Vec::new()).add_recommendation("Stop", &rec);
        store.save(&col).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"activeListId\""));
        assert!(raw.contains("\"sourceUrl\""));

        let loaded = store.load(Vec::new()).unwrap();
        assert_eq!(loaded, col);
    }

    #[test]
    fn test_legacy_shape_migrates_to_single_default_list() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let legacy = r#"{
            "hooks": [
                {"name": "Stop", "recommendations": [
                    {"text": "Job's finished", "unit": "SCV", "faction": "Terran",
                     "sourceUrl": "https://example.com/SCV.ogg/rev"}
                ]}
            ]
        }"#;
        std::fs::write(store.path(), legacy).unwrap();

        let col = store.load(Vec::new()).unwrap();
        assert_eq!(col.lists.len(), 1);
        assert_eq!(col.lists[0].id, DEFAULT_LIST_ID);
        assert_eq!(col.lists[0].hooks.len(), 6);
        assert_eq!(col.lists[0].hooks[2].recommendations.len(), 1);
    }

    #[test]
    fn test_collection_without_active_id_defaults_pointer() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let raw = r#"{"lists": [{"id": "default", "name": "Recommended", "hooks": []}]}"#;
        std::fs::write(store.path(), raw).unwrap();

        let col = store.load(Vec::new()).unwrap();
        assert_eq!(col.active_list_id, DEFAULT_LIST_ID);
        // Hooks were normalized to the canonical six.
        assert_eq!(col.lists[0].hooks.len(), 6);
    }

    #[test]
    fn test_non_array_recommendations_coerce_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let raw = r#"{
            "lists": [{"id": "default", "name": "Recommended", "hooks": [
                {"name": "Stop", "recommendations": null},
                {"name": "Question", "recommendations": 7}
            ]}],
            "activeListId": "default"
        }"#;
        std::fs::write(store.path(), raw).unwrap();

        let col = store.load(Vec::new()).unwrap();
        let hooks = &col.lists[0].hooks;
        assert!(hooks.iter().all(|h| h.recommendations.is_empty()));
    }

    #[test]
    fn test_unknown_hooks_survive_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let raw = r#"{
            "lists": [{"id": "default", "name": "Recommended", "hooks": [
                {"name": "SomeFutureHook", "description": "tbd", "recommendations": []}
            ]}],
            "activeListId": "default"
        }"#;
        std::fs::write(store.path(), raw).unwrap();

        let col = store.load(Vec::new()).unwrap();
        let hooks = &col.lists[0].hooks;
        assert_eq!(hooks.len(), 7);
        assert_eq!(hooks[6].name, "SomeFutureHook");
    }

    #[test]
    fn test_corrupt_file_is_a_state_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json").unwrap();
        let err = store.load(Vec::new()).unwrap_err();
        assert!(matches!(err, BattlecryError::State(_)));
    }
}
