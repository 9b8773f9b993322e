//! Init command - first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use crate::lists::{canonical_hooks, ListStore};
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Battlecry Setup");
    println!();
    println!("Welcome to Battlecry! Let's get the sound library ready.\n");

    // Step 1: Check ffmpeg
    println!("{}", style("Step 1: Checking prerequisites").bold().cyan());
    println!();

    let ffmpeg_ok = std::process::Command::new(&settings.transcode.ffmpeg_path)
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    if ffmpeg_ok {
        Output::success("ffmpeg is installed.");
    } else {
        Output::warning("ffmpeg was not found. Downloads will fail until it is installed.");
        println!("    {} {}", style("→").dim(), style(install_hint()).dim());
        println!();
        if !prompt_continue("Continue anyway?")? {
            println!();
            Output::info("Setup cancelled. Install ffmpeg and run 'battlecry init' again.");
            return Ok(());
        }
    }

    println!();

    // Step 2: Create directories
    println!("{}", style("Step 2: Creating directories").bold().cyan());
    println!();

    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.sounds_dir())?;
    std::fs::create_dir_all(settings.temp_dir())?;
    Output::kv("Data", &settings.data_dir().display().to_string());
    Output::kv("Sounds", &settings.sounds_dir().display().to_string());
    Output::kv("Temp", &settings.temp_dir().display().to_string());

    println!();

    // Step 3: Config and state files
    println!("{}", style("Step 3: Writing configuration").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config already exists at {}", config_path.display()));
    } else {
        settings.save()?;
        Output::success(&format!("Created config at {}", config_path.display()));
    }

    let store = ListStore::new(settings.state_path());
    if store.path().exists() {
        Output::info(&format!("List state already exists at {}", store.path().display()));
    } else {
        let collection = store.load(canonical_hooks())?;
        store.save(&collection)?;
        Output::success(&format!("Created list state at {}", store.path().display()));
    }

    println!();
    Output::success("Setup complete!");
    println!();
    println!("Next steps:");
    Output::list_item("battlecry serve        - start the API for the browser frontend");
    Output::list_item("battlecry lists show   - inspect your lists");
    Output::list_item("battlecry sync         - sync the sound library");

    Ok(())
}

fn prompt_continue(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn install_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    }
}
