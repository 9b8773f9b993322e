//! Audio transcoding via ffmpeg.
//!
//! Clips arrive as OGG from the wiki and ship as MP3; the conversion
//! pipes bytes through an ffmpeg child process without touching disk.

use crate::config::TranscodeSettings;
use crate::error::{BattlecryError, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::instrument;

/// Re-encode source-container bytes to MP3 at the configured bitrate.
#[instrument(skip_all, fields(input_len = input.len()))]
pub async fn transcode(input: &[u8], settings: &TranscodeSettings) -> Result<Vec<u8>> {
    let mut child = Command::new(&settings.ffmpeg_path)
        .arg("-hide_banner")
        .arg("-loglevel").arg("error")
        .arg("-f").arg(&settings.source_format)
        .arg("-i").arg("pipe:0")
        .arg("-vn")
        .arg("-codec:a").arg("libmp3lame")
        .arg("-b:a").arg(format!("{}k", settings.bitrate_kbps))
        .arg("-f").arg("mp3")
        .arg("pipe:1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BattlecryError::ToolNotFound(settings.ffmpeg_path.clone())
            } else {
                BattlecryError::Transcode(format!("failed to spawn ffmpeg: {e}"))
            }
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| BattlecryError::Transcode("ffmpeg stdin unavailable".into()))?;

    // Feed stdin from its own task; ffmpeg produces stdout concurrently
    // and a write-then-read sequence can deadlock on larger clips.
    let payload = input.to_vec();
    let feeder = tokio::spawn(async move {
        let result = stdin.write_all(&payload).await;
        drop(stdin);
        result
    });

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| BattlecryError::Transcode(format!("ffmpeg did not run: {e}")))?;

    let feed_result = feeder.await;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BattlecryError::Transcode(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    match feed_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            return Err(BattlecryError::Transcode(format!(
                "failed to feed ffmpeg: {e}"
            )))
        }
        Err(e) => {
            return Err(BattlecryError::Transcode(format!(
                "ffmpeg input task failed: {e}"
            )))
        }
    }

    if output.stdout.is_empty() {
        return Err(BattlecryError::Transcode(
            "ffmpeg produced no output".into(),
        ));
    }

    Ok(output.stdout)
}
