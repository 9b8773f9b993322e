//! Clip retrieval and conversion for Battlecry.
//!
//! Provides the fetch and transcode primitives and the [`ClipSource`]
//! seam the reconciler and exporter consume.

mod fetcher;
mod transcoder;

pub use fetcher::Fetcher;
pub use transcoder::transcode;

use crate::config::{Settings, TranscodeSettings};
use crate::error::Result;
use async_trait::async_trait;

/// A source of distribution-ready audio clips.
///
/// Implementations return bytes already in the distribution format;
/// callers only decide where the bytes go.
#[async_trait]
pub trait ClipSource: Send + Sync {
    /// Fetch the clip at `source_url` and return transcoded bytes.
    async fn fetch_clip(&self, source_url: &str) -> Result<Vec<u8>>;
}

/// Production clip source: HTTP fetch chained into an ffmpeg re-encode.
///
/// The two steps run strictly in sequence per clip; a transcode is only
/// attempted after a successful fetch.
pub struct WikiClipSource {
    fetcher: Fetcher,
    transcode: TranscodeSettings,
}

impl WikiClipSource {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(&settings.fetch)?,
            transcode: settings.transcode.clone(),
        })
    }
}

#[async_trait]
impl ClipSource for WikiClipSource {
    async fn fetch_clip(&self, source_url: &str) -> Result<Vec<u8>> {
        let raw = self.fetcher.fetch(source_url).await?;
        transcode(&raw, &self.transcode).await
    }
}
