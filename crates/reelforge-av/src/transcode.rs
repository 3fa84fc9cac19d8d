//! ffmpeg transcode command construction.
//!
//! Commands are built as argument vectors; nothing here goes through a
//! shell, so source and destination paths need no quoting or validation.

use crate::{Error, Result, VideoContainer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Highest CRF value accepted by the x264/x265 encoders.
pub const MAX_CRF: u8 = 51;

/// Encoder speed / compression trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl Preset {
    /// All presets, fastest first.
    pub const ALL: [Preset; 9] = [
        Preset::Ultrafast,
        Preset::Superfast,
        Preset::Veryfast,
        Preset::Faster,
        Preset::Fast,
        Preset::Medium,
        Preset::Slow,
        Preset::Slower,
        Preset::Veryslow,
    ];

    /// Name passed to `-preset`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Ultrafast => "ultrafast",
            Preset::Superfast => "superfast",
            Preset::Veryfast => "veryfast",
            Preset::Faster => "faster",
            Preset::Fast => "fast",
            Preset::Medium => "medium",
            Preset::Slow => "slow",
            Preset::Slower => "slower",
            Preset::Veryslow => "veryslow",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == wanted)
            .ok_or_else(|| format!("Unknown preset: {}", s))
    }
}

/// Settings shared by every transcode in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeSettings {
    /// ffmpeg executable (a bare name is resolved on `PATH` at launch).
    pub ffmpeg: PathBuf,
    /// Video encoder passed to `-vcodec` (default: libx265).
    pub video_codec: String,
    /// Constant rate factor (default: 28).
    pub crf: u8,
    /// Encoder preset (default: ultrafast).
    pub preset: Preset,
    /// Overwrite existing destinations (`-y`) instead of refusing (`-n`).
    pub overwrite: bool,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            video_codec: "libx265".to_string(),
            crf: 28,
            preset: Preset::default(),
            overwrite: false,
        }
    }
}

/// A fully built transcoder invocation for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_container: VideoContainer,
    pub destination_container: VideoContainer,
}

impl TranscodeSettings {
    /// Check the settings before building any command.
    pub fn validate(&self) -> Result<()> {
        if self.video_codec.trim().is_empty() {
            return Err(Error::InvalidInput("video codec cannot be empty".into()));
        }
        if self.crf > MAX_CRF {
            return Err(Error::InvalidInput(format!(
                "crf must be between 0 and {}, got {}",
                MAX_CRF, self.crf
            )));
        }
        Ok(())
    }

    /// Build the ffmpeg invocation converting `source` into `destination`.
    ///
    /// # Errors
    ///
    /// Both paths must be valid UTF-8 and carry a known container extension.
    pub fn command(&self, source: &Path, destination: &Path) -> Result<TranscodeCommand> {
        self.validate()?;
        let source_arg = utf8_path(source)?;
        let destination_arg = utf8_path(destination)?;
        let source_container = VideoContainer::from_path(source)?;
        let destination_container = VideoContainer::from_path(destination)?;

        let args = vec![
            if self.overwrite { "-y" } else { "-n" }.to_string(),
            "-i".to_string(),
            source_arg.to_string(),
            "-vcodec".to_string(),
            self.video_codec.clone(),
            "-preset".to_string(),
            self.preset.to_string(),
            "-crf".to_string(),
            self.crf.to_string(),
            destination_arg.to_string(),
        ];

        #[cfg(feature = "tracing")]
        tracing::debug!(
            source = %source.display(),
            destination = %destination.display(),
            from = %source_container,
            to = %destination_container,
            "ffmpeg args: {:?}",
            args
        );

        Ok(TranscodeCommand {
            program: self.ffmpeg.clone(),
            args,
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_container,
            destination_container,
        })
    }
}

/// Arguments are passed as text; a lossy conversion would hand ffmpeg a
/// different file.
fn utf8_path(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::InvalidInput(format!("path is not valid UTF-8: {:?}", path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = TranscodeSettings::default();
        assert_eq!(settings.ffmpeg, PathBuf::from("ffmpeg"));
        assert_eq!(settings.video_codec, "libx265");
        assert_eq!(settings.crf, 28);
        assert_eq!(settings.preset, Preset::Ultrafast);
        assert!(!settings.overwrite);
    }

    #[test]
    fn test_command_args() {
        let settings = TranscodeSettings {
            preset: Preset::Slow,
            ..Default::default()
        };
        let cmd = settings
            .command(Path::new("/in/My Movie.avi"), Path::new("/out/My Movie.mkv"))
            .unwrap();

        assert_eq!(cmd.program, PathBuf::from("ffmpeg"));
        assert_eq!(
            cmd.args,
            vec![
                "-n",
                "-i",
                "/in/My Movie.avi",
                "-vcodec",
                "libx265",
                "-preset",
                "slow",
                "-crf",
                "28",
                "/out/My Movie.mkv",
            ]
        );
        assert_eq!(cmd.source_container, VideoContainer::Avi);
        assert_eq!(cmd.destination_container, VideoContainer::Mkv);
    }

    #[test]
    fn test_overwrite_flag() {
        let settings = TranscodeSettings {
            overwrite: true,
            ..Default::default()
        };
        let cmd = settings
            .command(Path::new("a.mp4"), Path::new("b.mkv"))
            .unwrap();
        assert_eq!(cmd.args[0], "-y");
    }

    #[test]
    fn test_unknown_destination_container() {
        let err = TranscodeSettings::default()
            .command(Path::new("a.mp4"), Path::new("b.webm"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let source = Path::new(OsStr::from_bytes(b"/in/caf\xe9.avi"));
        let err = TranscodeSettings::default()
            .command(source, Path::new("/out/cafe.mkv"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("UTF-8")));
    }

    #[test]
    fn test_validate_crf() {
        let settings = TranscodeSettings {
            crf: 52,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("medium".parse::<Preset>().unwrap(), Preset::Medium);
        assert_eq!("VerySlow".parse::<Preset>().unwrap(), Preset::Veryslow);
        assert!("warp".parse::<Preset>().is_err());
    }

    #[test]
    fn test_preset_serde() {
        let json = serde_json::to_string(&Preset::Superfast).unwrap();
        assert_eq!(json, "\"superfast\"");
        let preset: Preset = serde_json::from_str("\"faster\"").unwrap();
        assert_eq!(preset, Preset::Faster);
    }
}
