use reelforge_av::{Preset, TranscodeSettings};
use reelforge_exec::DEFAULT_MAX_CONCURRENCY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub workers: WorkersConfig,

    #[serde(default)]
    pub transcode: TranscodeConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkersConfig {
    /// Number of ffmpeg processes allowed to run at once (default: 10)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscodeConfig {
    /// Video encoder passed to ffmpeg's `-vcodec` (default: libx265)
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Constant rate factor, 0-51 (default: 28)
    #[serde(default = "default_crf")]
    pub crf: u8,

    #[serde(default)]
    pub preset: Preset,

    /// Overwrite existing outputs instead of skipping them
    #[serde(default)]
    pub overwrite: bool,
}

fn default_video_codec() -> String {
    "libx265".to_string()
}

fn default_crf() -> u8 {
    28
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
            crf: default_crf(),
            preset: Preset::default(),
            overwrite: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

impl Config {
    /// Transcode settings for this config with ffmpeg at `ffmpeg`.
    pub fn transcode_settings(&self, ffmpeg: PathBuf) -> TranscodeSettings {
        TranscodeSettings {
            ffmpeg,
            video_codec: self.transcode.video_codec.clone(),
            crf: self.transcode.crf,
            preset: self.transcode.preset,
            overwrite: self.transcode.overwrite,
        }
    }
}
