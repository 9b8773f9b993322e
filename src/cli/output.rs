//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a hook with its recommendation count.
    pub fn hook_line(name: &str, description: &str, count: usize) {
        println!(
            "  {} {} ({} {})",
            style("*").cyan(),
            style(name).bold(),
            count,
            if count == 1 { "sound" } else { "sounds" }
        );
        if !description.is_empty() {
            println!("    {}", style(description).dim());
        }
    }

    /// Print one line of a sync result breakdown.
    pub fn sync_counts(saved: usize, skipped: usize, deleted: usize, failed: usize) {
        println!(
            "  {} saved, {} skipped, {} deleted, {}",
            style(saved).green(),
            style(skipped).dim(),
            style(deleted).yellow(),
            if failed > 0 {
                style(format!("{failed} failed")).red().to_string()
            } else {
                "0 failed".to_string()
            }
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
