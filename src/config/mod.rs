mod types;

pub use types::*;

use anyhow::{Context, Result};
use reelforge_av::transcode::MAX_CRF;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./reelforge.toml",
        "~/.config/reelforge/config.toml",
        "/etc/reelforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.workers.max_concurrency == 0 {
        anyhow::bail!("workers.max_concurrency must be at least 1");
    }

    if config.transcode.crf > MAX_CRF {
        anyhow::bail!(
            "transcode.crf must be between 0 and {}, got {}",
            MAX_CRF,
            config.transcode.crf
        );
    }

    if config.transcode.video_codec.trim().is_empty() {
        anyhow::bail!("transcode.video_codec cannot be empty");
    }

    if let Some(ffmpeg) = unresolved_ffmpeg(config) {
        tracing::warn!("Configured ffmpeg not found on disk or PATH: {:?}", ffmpeg);
    }

    Ok(())
}

/// The configured ffmpeg, when it resolves neither as a path nor by name.
fn unresolved_ffmpeg(config: &Config) -> Option<&Path> {
    let ffmpeg = config.tools.ffmpeg_path.as_deref()?;
    match reelforge_av::resolve_program(ffmpeg) {
        Some(_) => None,
        None => Some(ffmpeg),
    }
}
