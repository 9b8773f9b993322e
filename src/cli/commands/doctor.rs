//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::lists::{canonical_hooks, ListStore};
use crate::manifest::LIBRARY_FOLDERS;
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Battlecry Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    let tool_check = check_ffmpeg(&settings.transcode.ffmpeg_path);
    tool_check.print();
    checks.push(tool_check);

    println!();

    println!("{}", style("Sound Library").bold());
    let library_checks = check_library(settings);
    for check in &library_checks {
        check.print();
    }
    checks.extend(library_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    let state_check = check_state_file(settings);
    state_check.print();
    checks.push(state_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Battlecry.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Battlecry is ready to use.");
    }

    Ok(())
}

/// Check that ffmpeg runs.
fn check_ffmpeg(ffmpeg_path: &str) -> CheckResult {
    match Command::new(ffmpeg_path).arg("-version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();

            let version_display = if version.len() > 50 {
                format!("{}...", &version[..50])
            } else {
                version
            };

            CheckResult::ok("ffmpeg", &version_display)
        }
        Ok(_) => CheckResult::error("ffmpeg", "installed but not working", install_hint_ffmpeg()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error("ffmpeg", "not found", install_hint_ffmpeg())
        }
        Err(e) => CheckResult::error("ffmpeg", &format!("error: {}", e), install_hint_ffmpeg()),
    }
}

/// Check the sound library root and its hook folders.
fn check_library(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let sounds_dir = settings.sounds_dir();
    if sounds_dir.exists() {
        let present = LIBRARY_FOLDERS
            .iter()
            .filter(|folder| sounds_dir.join(folder).exists())
            .count();
        results.push(CheckResult::ok(
            "Sounds directory",
            &format!(
                "{} ({}/{} hook folders)",
                sounds_dir.display(),
                present,
                LIBRARY_FOLDERS.len()
            ),
        ));
    } else {
        results.push(CheckResult::warning(
            "Sounds directory",
            &format!("{} (will be created)", sounds_dir.display()),
            "Folders are created on the first sync",
        ));
    }

    let data_dir = settings.data_dir();
    if data_dir.exists() {
        results.push(CheckResult::ok(
            "Data directory",
            &format!("{}", data_dir.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "Data directory",
            &format!("{} (will be created)", data_dir.display()),
            "Directory will be created on first use",
        ));
    }

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: battlecry init (or battlecry config edit)",
        )
    }
}

/// Check that the state file loads and report its shape.
fn check_state_file(settings: &Settings) -> CheckResult {
    let path = settings.state_path();
    if !path.exists() {
        return CheckResult::warning(
            "List state",
            "no state file yet",
            "Created on the first list change or with: battlecry init",
        );
    }

    match ListStore::new(&path).load(canonical_hooks()) {
        Ok(collection) => {
            let quotes: usize = collection
                .lists
                .iter()
                .flat_map(|l| &l.hooks)
                .map(|h| h.recommendations.len())
                .sum();
            CheckResult::ok(
                "List state",
                &format!(
                    "{} ({} lists, {} quotes)",
                    path.display(),
                    collection.lists.len(),
                    quotes
                ),
            )
        }
        Err(e) => CheckResult::error(
            "List state",
            &format!("unreadable: {}", e),
            "Fix or remove the file; a fresh default is created on next run",
        ),
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}
