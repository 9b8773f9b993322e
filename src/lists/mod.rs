//! Recommendation list state for Battlecry.
//!
//! A collection of named lists, each mapping lifecycle hooks of the
//! assistant tool to an ordered set of audio quote recommendations. All
//! state transitions are pure: they take the collection by reference and
//! return a new collection, leaving the input untouched.

mod store;

pub use store::ListStore;

use serde::{Deserialize, Deserializer, Serialize};

/// The one list that always exists and can never be deleted.
pub const DEFAULT_LIST_ID: &str = "default";

/// Display name of the built-in list.
pub const DEFAULT_LIST_NAME: &str = "Recommended";

/// Canonical hooks in their fixed display order, with default descriptions.
pub const HOOK_DEFINITIONS: [(&str, &str); 6] = [
    ("SessionStart", "When Claude Code starts or resumes a session"),
    ("UserPromptSubmit", "When user submits a prompt"),
    ("Stop", "When Claude finishes responding"),
    ("PreCompact", "Before conversation context is compacted"),
    ("PermissionPrompt", "When Claude needs permission to use a tool"),
    ("Question", "When Claude asks the user a question"),
];

/// A single audio quote bound to a hook.
///
/// `source_url` is the identity key; a hook never holds two
/// recommendations with the same source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub faction: String,
    pub source_url: String,
}

/// A named lifecycle hook and its ordered recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "recommendations_or_empty")]
    pub recommendations: Vec<Recommendation>,
}

impl Hook {
    /// Create a hook with no recommendations.
    pub fn empty(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            recommendations: Vec::new(),
        }
    }
}

/// A named, ordered set of hook-to-recommendations mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hooks: Vec<Hook>,
}

/// All lists plus the active-list pointer.
///
/// `active_list_id` is not guaranteed to resolve; readers fall back to
/// the first list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCollection {
    pub lists: Vec<RecommendationList>,
    #[serde(default = "default_active_id")]
    pub active_list_id: String,
}

fn default_active_id() -> String {
    DEFAULT_LIST_ID.to_string()
}

/// Lenient decode for a hook's recommendations: anything that is not an
/// array (absent, null, a stray scalar from a hand-edited file) becomes
/// an empty sequence, and malformed elements are dropped.
fn recommendations_or_empty<'de, D>(deserializer: D) -> Result<Vec<Recommendation>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// The six canonical hooks, each with an empty recommendation set.
pub fn canonical_hooks() -> Vec<Hook> {
    HOOK_DEFINITIONS
        .iter()
        .map(|(name, description)| Hook::empty(name, description))
        .collect()
}

/// Normalize a hook sequence: the six canonical hooks first, in fixed
/// order, reusing existing entries (and filling a missing description
/// from the canonical default); unknown hook names are preserved after
/// them in their original relative order.
pub fn normalize_hooks(hooks: &[Hook]) -> Vec<Hook> {
    let mut normalized: Vec<Hook> = HOOK_DEFINITIONS
        .iter()
        .map(|(name, description)| {
            match hooks.iter().find(|h| h.name == *name) {
                Some(existing) => {
                    let mut hook = existing.clone();
                    if hook.description.is_empty() {
                        hook.description = description.to_string();
                    }
                    hook
                }
                None => Hook::empty(name, description),
            }
        })
        .collect();

    let known: Vec<&str> = HOOK_DEFINITIONS.iter().map(|(name, _)| *name).collect();
    normalized.extend(
        hooks
            .iter()
            .filter(|h| !known.contains(&h.name.as_str()))
            .cloned(),
    );

    normalized
}

impl ListCollection {
    /// Build a collection holding only the default list with the given hooks.
    pub fn with_default(hooks: Vec<Hook>) -> Self {
        Self {
            lists: vec![RecommendationList {
                id: DEFAULT_LIST_ID.to_string(),
                name: DEFAULT_LIST_NAME.to_string(),
                hooks: normalize_hooks(&hooks),
            }],
            active_list_id: DEFAULT_LIST_ID.to_string(),
        }
    }

    /// The list the pointer resolves to, falling back to the first list.
    pub fn active_list(&self) -> Option<&RecommendationList> {
        self.lists
            .iter()
            .find(|l| l.id == self.active_list_id)
            .or_else(|| self.lists.first())
    }

    /// Look up a list by id.
    pub fn get_list(&self, id: &str) -> Option<&RecommendationList> {
        self.lists.iter().find(|l| l.id == id)
    }

    /// Append a new list with empty canonical hooks and make it active.
    ///
    /// Ids are generated, not derived from the name, so two lists may
    /// share a display name without colliding.
    pub fn create_list(&self, name: &str) -> Self {
        let new_list = RecommendationList {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            hooks: canonical_hooks(),
        };
        let mut next = self.clone();
        next.active_list_id = new_list.id.clone();
        next.lists.push(new_list);
        next
    }

    /// Remove a list. The default list is never removed; deleting the
    /// active list moves the pointer back to the default.
    pub fn delete_list(&self, id: &str) -> Self {
        if id == DEFAULT_LIST_ID {
            return self.clone();
        }
        let mut next = self.clone();
        next.lists.retain(|l| l.id != id);
        if next.active_list_id == id {
            next.active_list_id = DEFAULT_LIST_ID.to_string();
        }
        next
    }

    /// Rename a list; unknown ids are a no-op.
    pub fn rename_list(&self, id: &str, name: &str) -> Self {
        let mut next = self.clone();
        if let Some(list) = next.lists.iter_mut().find(|l| l.id == id) {
            list.name = name.to_string();
        }
        next
    }

    /// Point at a list. No existence check: readers validate lazily.
    pub fn set_active_list(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.active_list_id = id.to_string();
        next
    }

    /// Replace the active list's hooks wholesale with a normalized copy
    /// of the given hooks (legacy import path).
    pub fn import_hooks(&self, hooks: &[Hook]) -> Self {
        self.update_active_list(|list| {
            list.hooks = normalize_hooks(hooks);
        })
    }

    /// Append a recommendation to the named hook in the active list.
    /// A recommendation with the same source URL already present in that
    /// hook makes this a no-op.
    pub fn add_recommendation(&self, hook_name: &str, rec: &Recommendation) -> Self {
        self.update_active_hook(hook_name, |hook| {
            if !hook
                .recommendations
                .iter()
                .any(|r| r.source_url == rec.source_url)
            {
                hook.recommendations.push(rec.clone());
            }
        })
    }

    /// Remove the recommendation with the given source URL from the named
    /// hook in the active list.
    pub fn remove_recommendation(&self, hook_name: &str, source_url: &str) -> Self {
        self.update_active_hook(hook_name, |hook| {
            hook.recommendations.retain(|r| r.source_url != source_url);
        })
    }

    /// Move a recommendation between two hooks of the active list in one
    /// transition: removed from the source hook, appended to the target
    /// hook unless the target already holds its source URL.
    pub fn move_recommendation(
        &self,
        from_hook: &str,
        to_hook: &str,
        rec: &Recommendation,
    ) -> Self {
        self.update_active_list(|list| {
            for hook in &mut list.hooks {
                if hook.name == from_hook {
                    hook.recommendations.retain(|r| r.source_url != rec.source_url);
                } else if hook.name == to_hook
                    && !hook
                        .recommendations
                        .iter()
                        .any(|r| r.source_url == rec.source_url)
                {
                    hook.recommendations.push(rec.clone());
                }
            }
        })
    }

    /// Move-splice within a hook's recommendation sequence. An
    /// out-of-range old index is a no-op; the new index clamps to the end.
    pub fn reorder_recommendations(
        &self,
        hook_name: &str,
        old_index: usize,
        new_index: usize,
    ) -> Self {
        self.update_active_hook(hook_name, |hook| {
            if old_index >= hook.recommendations.len() {
                return;
            }
            let rec = hook.recommendations.remove(old_index);
            let target = new_index.min(hook.recommendations.len());
            hook.recommendations.insert(target, rec);
        })
    }

    fn update_active_list(&self, update: impl FnOnce(&mut RecommendationList)) -> Self {
        let Some(active_id) = self.active_list().map(|l| l.id.clone()) else {
            return self.clone();
        };
        let mut next = self.clone();
        if let Some(list) = next.lists.iter_mut().find(|l| l.id == active_id) {
            update(list);
        }
        next
    }

    fn update_active_hook(&self, hook_name: &str, update: impl FnOnce(&mut Hook)) -> Self {
        self.update_active_list(|list| {
            if let Some(hook) = list.hooks.iter_mut().find(|h| h.name == hook_name) {
                update(hook);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(url: &str, text: &str) -> Recommendation {
        Recommendation {
            text: text.to_string(),
            unit: "Marine".to_string(),
            faction: "Terran".to_string(),
            source_url: url.to_string(),
        }
    }

    fn collection() -> ListCollection {
        ListCollection::with_default(Vec::new())
    }

    #[test]
    fn test_with_default_has_six_canonical_hooks() {
        let col = collection();
        assert_eq!(col.lists.len(), 1);
        let hooks = &col.lists[0].hooks;
        assert_eq!(hooks.len(), 6);
        assert_eq!(hooks[0].name, "SessionStart");
        assert_eq!(hooks[5].name, "Question");
        assert!(hooks.iter().all(|h| h.recommendations.is_empty()));
    }

    #[test]
    fn test_normalize_preserves_unknown_hooks_in_order() {
        let hooks = vec![
            Hook::empty("FutureHookB", "later"),
            Hook::empty("Stop", ""),
            Hook::empty("FutureHookA", ""),
        ];
        let normalized = normalize_hooks(&hooks);
        assert_eq!(normalized.len(), 8);
        // Canonical six first, then unknowns in their original order.
        assert_eq!(normalized[2].name, "Stop");
        assert_eq!(normalized[6].name, "FutureHookB");
        assert_eq!(normalized[7].name, "FutureHookA");
    }

    #[test]
    fn test_normalize_fills_missing_description() {
        let hooks = vec![Hook::empty("Stop", "")];
        let normalized = normalize_hooks(&hooks);
        assert_eq!(normalized[2].description, "When Claude finishes responding");
    }

    #[test]
    fn test_create_list_generates_distinct_ids() {
        let base = collection();
        let a = base.create_list("Foo");
        let b = base.create_list("Foo");
        assert_ne!(a.lists[1].id, b.lists[1].id);
        assert_eq!(a.active_list_id, a.lists[1].id);
    }

    #[test]
    fn test_delete_default_is_noop() {
        let col = collection().create_list("Other");
        let after = col.delete_list(DEFAULT_LIST_ID);
        assert_eq!(after, col);
    }

    #[test]
    fn test_delete_active_falls_back_to_default() {
        let col = collection().create_list("Other");
        let id = col.lists[1].id.clone();
        let after = col.delete_list(&id);
        assert_eq!(after.lists.len(), 1);
        assert_eq!(after.active_list_id, DEFAULT_LIST_ID);
    }

    #[test]
    fn test_rename_unknown_id_is_noop() {
        let col = collection();
        let after = col.rename_list("missing", "New Name");
        assert_eq!(after, col);
    }

    #[test]
    fn test_active_list_falls_back_to_first() {
        let col = collection().set_active_list("does-not-exist");
        let active = col.active_list().unwrap();
        assert_eq!(active.id, DEFAULT_LIST_ID);
    }

    #[test]
    fn test_add_recommendation_dedupes_by_source_url() {
        let col = collection();
        let r = rec("https://example.com/a.ogg/x", "You wanna piece of me, boy?");
        let once = col.add_recommendation("Stop", &r);
        let twice = once.add_recommendation("Stop", &r);
        let hook = &twice.active_list().unwrap().hooks[2];
        assert_eq!(hook.recommendations.len(), 1);
    }

    #[test]
    fn test_add_targets_active_list_only() {
        let col = collection().create_list("Other");
        let r = rec("https://example.com/a.ogg/x", "Jacked up and good to go.");
        let after = col.add_recommendation("Stop", &r);
        let default_hook = &after.get_list(DEFAULT_LIST_ID).unwrap().hooks[2];
        let active_hook = &after.active_list().unwrap().hooks[2];
        assert!(default_hook.recommendations.is_empty());
        assert_eq!(active_hook.recommendations.len(), 1);
    }

    #[test]
    fn test_remove_recommendation() {
        let r = rec("https://example.com/a.ogg/x", "Go go go!");
        let col = collection().add_recommendation("Question", &r);
        let after = col.remove_recommendation("Question", &r.source_url);
        assert!(after.active_list().unwrap().hooks[5].recommendations.is_empty());
    }

    #[test]
    fn test_move_recommendation() {
        let r = rec("https://example.com/a.ogg/x", "In the pipe, five by five.");
        let col = collection().add_recommendation("SessionStart", &r);
        let after = col.move_recommendation("SessionStart", "Stop", &r);
        let active = after.active_list().unwrap();
        assert!(active.hooks[0].recommendations.is_empty());
        assert_eq!(active.hooks[2].recommendations.len(), 1);
    }

    #[test]
    fn test_move_into_hook_that_already_has_it() {
        let r = rec("https://example.com/a.ogg/x", "Need a light?");
        let col = collection()
            .add_recommendation("SessionStart", &r)
            .add_recommendation("Stop", &r);
        let after = col.move_recommendation("SessionStart", "Stop", &r);
        let active = after.active_list().unwrap();
        // Source entry removed, target unchanged in length.
        assert!(active.hooks[0].recommendations.is_empty());
        assert_eq!(active.hooks[2].recommendations.len(), 1);
    }

    #[test]
    fn test_reorder_swaps_positions() {
        let a = rec("https://example.com/a.ogg/x", "first");
        let b = rec("https://example.com/b.ogg/x", "second");
        let col = collection()
            .add_recommendation("SessionStart", &a)
            .add_recommendation("SessionStart", &b);
        let after = col.reorder_recommendations("SessionStart", 0, 1);
        let recs = &after.active_list().unwrap().hooks[0].recommendations;
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].source_url, b.source_url);
        assert_eq!(recs[1].source_url, a.source_url);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let a = rec("https://example.com/a.ogg/x", "only");
        let col = collection().add_recommendation("SessionStart", &a);
        let after = col.reorder_recommendations("SessionStart", 5, 0);
        assert_eq!(after, col);
    }

    #[test]
    fn test_import_hooks_replaces_active_hooks_wholesale() {
        let r = rec("https://example.com/a.ogg/x", "old");
        let col = collection().add_recommendation("Stop", &r);
        let imported = vec![Hook {
            name: "SessionStart".to_string(),
            description: String::new(),
            recommendations: vec![rec("https://example.com/b.ogg/x", "new")],
        }];
        let after = col.import_hooks(&imported);
        let active = after.active_list().unwrap();
        assert_eq!(active.hooks.len(), 6);
        assert_eq!(active.hooks[0].recommendations.len(), 1);
        assert!(active.hooks[2].recommendations.is_empty());
    }

    #[test]
    fn test_operations_leave_input_unchanged() {
        let r = rec("https://example.com/a.ogg/x", "For Aiur!");
        let col = collection().add_recommendation("Stop", &r);
        let snapshot = col.clone();

        let _ = col.create_list("Foo");
        let _ = col.delete_list(DEFAULT_LIST_ID);
        let _ = col.rename_list(DEFAULT_LIST_ID, "Renamed");
        let _ = col.set_active_list("x");
        let _ = col.add_recommendation("Stop", &rec("https://example.com/b.ogg/x", "t"));
        let _ = col.remove_recommendation("Stop", &r.source_url);
        let _ = col.move_recommendation("Stop", "Question", &r);
        let _ = col.reorder_recommendations("Stop", 0, 0);
        let _ = col.import_hooks(&[]);

        assert_eq!(col, snapshot);
    }
}
