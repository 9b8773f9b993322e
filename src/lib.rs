//! Battlecry - game-unit voice lines as notification sounds
//!
//! Battlecry curates named lists of short audio quotes (unit voice lines
//! scraped from game wikis) mapped to lifecycle hooks of Claude Code,
//! and keeps a local sound library in exact correspondence with the
//! active list.
//!
//! # Overview
//!
//! Battlecry allows you to:
//! - Maintain multiple named recommendation lists per hook
//! - Sync quotes into `~/.claude/sounds/<hook-folder>/` idempotently
//!   (missing files downloaded, present files skipped, orphans removed)
//! - Force-save ad hoc selections into a single folder
//! - Export selections as a ZIP archive organized by unit and category
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `lists` - Recommendation list state and persistence
//! - `manifest` - Desired-state manifest derivation
//! - `audio` - Clip fetch and transcode primitives
//! - `library` - The sound library reconciler
//! - `archive` - Batch ZIP export
//!
//! # Example
//!
//! ```rust,no_run
//! use battlecry::audio::WikiClipSource;
//! use battlecry::config::Settings;
//! use battlecry::library::Library;
//! use battlecry::lists::{canonical_hooks, ListStore};
//! use battlecry::manifest::ManifestBuilder;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let store = ListStore::new(settings.state_path());
//!     let collection = store.load(canonical_hooks())?;
//!
//!     if let Some(active) = collection.active_list() {
//!         let manifest = ManifestBuilder::new().build(active);
//!         let source = Arc::new(WikiClipSource::new(&settings)?);
//!         let library = Library::new(settings.sounds_dir(), source);
//!         let report = library.sync_all(&manifest).await?;
//!         println!("{} saved, {} skipped", report.saved.len(), report.skipped.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod lists;
pub mod manifest;

pub use error::{BattlecryError, Result};
