//! Download command - fetch and transcode a single clip.

use crate::audio::{ClipSource, WikiClipSource};
use crate::cli::Output;
use crate::config::Settings;

/// Download one clip, transcode it, and write it to disk.
pub async fn run_download(url: &str, output: Option<&str>, settings: Settings) -> anyhow::Result<()> {
    let target = output.unwrap_or("audio.mp3");

    let source = WikiClipSource::new(&settings)?;

    let spinner = Output::spinner(&format!("Downloading {}...", url));
    let bytes = source.fetch_clip(url).await?;
    spinner.finish_and_clear();

    std::fs::write(target, &bytes)?;
    Output::success(&format!("Wrote {} ({} bytes)", target, bytes.len()));

    Ok(())
}
