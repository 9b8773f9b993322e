//! Configuration module for Battlecry.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    FetchSettings, GeneralSettings, ServerSettings, Settings, TranscodeSettings,
};
