//! Lists command - manage recommendation lists.

use crate::cli::{ListsAction, Output};
use crate::config::Settings;
use crate::lists::{canonical_hooks, Hook, ListStore};
use console::style;
use serde::Deserialize;

/// Legacy hooks export shape accepted by `lists import`.
#[derive(Deserialize)]
struct HooksFile {
    hooks: Vec<Hook>,
}

/// Run a lists subcommand.
pub fn run_lists(action: &ListsAction, settings: Settings) -> anyhow::Result<()> {
    let store = ListStore::new(settings.state_path());
    let collection = store.load(canonical_hooks())?;

    match action {
        ListsAction::Show => {
            Output::header("Recommendation Lists");
            println!();
            let active_id = collection.active_list().map(|l| l.id.clone());
            for list in &collection.lists {
                let quotes: usize = list.hooks.iter().map(|h| h.recommendations.len()).sum();
                let marker = if Some(&list.id) == active_id.as_ref() {
                    style("(active)").green().to_string()
                } else {
                    String::new()
                };
                println!(
                    "  {} {} {} ({}, {} quotes)",
                    style("*").cyan(),
                    style(&list.name).bold(),
                    marker,
                    style(&list.id).dim(),
                    quotes
                );
            }

            if let Some(active) = collection.active_list() {
                println!();
                Output::header(&format!("Hooks in '{}'", active.name));
                println!();
                for hook in &active.hooks {
                    Output::hook_line(&hook.name, &hook.description, hook.recommendations.len());
                }
            }
        }

        ListsAction::Create { name } => {
            let next = collection.create_list(name);
            store.save(&next)?;
            let created = next.active_list().map(|l| l.id.clone()).unwrap_or_default();
            Output::success(&format!("Created list '{}' ({}) and made it active", name, created));
        }

        ListsAction::Delete { id } => {
            let next = collection.delete_list(id);
            if next == collection {
                Output::warning(&format!("List '{}' was not deleted (default or unknown id)", id));
            } else {
                store.save(&next)?;
                Output::success(&format!("Deleted list '{}'", id));
            }
        }

        ListsAction::Rename { id, name } => {
            let next = collection.rename_list(id, name);
            if next == collection {
                Output::warning(&format!("No list with id '{}'", id));
            } else {
                store.save(&next)?;
                Output::success(&format!("Renamed list '{}' to '{}'", id, name));
            }
        }

        ListsAction::Use { id } => {
            let next = collection.set_active_list(id);
            store.save(&next)?;
            match next.get_list(id) {
                Some(list) => Output::success(&format!("Active list is now '{}'", list.name)),
                None => Output::warning(&format!(
                    "No list with id '{}'; readers will fall back to the first list",
                    id
                )),
            }
        }

        ListsAction::Import { file } => {
            let content = std::fs::read_to_string(file)?;
            let parsed: HooksFile = serde_json::from_str(&content)?;
            let next = collection.import_hooks(&parsed.hooks);
            store.save(&next)?;
            let quotes: usize = next
                .active_list()
                .map(|l| l.hooks.iter().map(|h| h.recommendations.len()).sum())
                .unwrap_or(0);
            Output::success(&format!(
                "Imported {} hooks ({} quotes) into the active list",
                parsed.hooks.len(),
                quotes
            ));
        }
    }

    Ok(())
}
