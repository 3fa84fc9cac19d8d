//! Locating the ffmpeg executable.
//!
//! A configured location may be a full path or a bare program name; bare
//! names are looked up on `PATH`.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Program name used when nothing is configured.
pub const FFMPEG: &str = "ffmpeg";

/// What `check-tools` reports about ffmpeg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegStatus {
    /// Location from the config, if any.
    pub configured: Option<PathBuf>,
    /// Where ffmpeg was found.
    pub path: Option<PathBuf>,
    /// First line of `ffmpeg -version`.
    pub version: Option<String>,
}

impl FfmpegStatus {
    /// Found and answered `-version`.
    pub fn is_usable(&self) -> bool {
        self.path.is_some() && self.version.is_some()
    }
}

/// Resolve a program to an executable path: an existing path is used as-is,
/// anything else is looked up on `PATH`.
pub fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.exists() {
        return Some(program.to_path_buf());
    }
    which::which(program).ok()
}

/// Find ffmpeg, preferring the configured location over `PATH`.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] when neither resolves.
///
/// # Example
///
/// ```no_run
/// use reelforge_av::find_ffmpeg;
///
/// let ffmpeg = find_ffmpeg(None)?;
/// println!("using {}", ffmpeg.display());
/// # Ok::<(), reelforge_av::Error>(())
/// ```
pub fn find_ffmpeg(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(program) = configured {
        if let Some(found) = resolve_program(program) {
            return Ok(found);
        }

        #[cfg(feature = "tracing")]
        tracing::warn!("Configured ffmpeg {:?} not found, using PATH", program);
    }

    resolve_program(Path::new(FFMPEG)).ok_or_else(|| Error::tool_not_found(FFMPEG))
}

/// Resolve ffmpeg and ask it for its version.
pub fn ffmpeg_status(configured: Option<&Path>) -> FfmpegStatus {
    let path = find_ffmpeg(configured).ok();
    let version = path.as_deref().and_then(version_line);

    FfmpegStatus {
        configured: configured.map(Path::to_path_buf),
        path,
        version,
    }
}

fn version_line(program: &Path) -> Option<String> {
    let output = Command::new(program).arg("-version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_existing_path() {
        let exe = std::env::current_exe().unwrap();
        assert_eq!(resolve_program(&exe), Some(exe.clone()));
        assert_eq!(find_ffmpeg(Some(exe.as_path())).unwrap(), exe);
    }

    #[test]
    fn test_resolve_missing_program() {
        assert_eq!(resolve_program(Path::new("nonexistent_tool_12345")), None);
        assert_eq!(resolve_program(Path::new("/nonexistent/bin/ffmpeg")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_bare_name_on_path() {
        let found = resolve_program(Path::new("sh")).unwrap();
        assert!(found.is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn test_status_reads_version_line() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("ffmpeg");
        let script = "#!/bin/sh\necho 'ffmpeg version 6.1-test'\necho 'built with gcc'\n";
        std::fs::write(&fake, script).unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let status = ffmpeg_status(Some(fake.as_path()));
        assert!(status.is_usable());
        assert_eq!(status.path.as_deref(), Some(fake.as_path()));
        assert_eq!(status.version.as_deref(), Some("ffmpeg version 6.1-test"));
    }

    #[cfg(unix)]
    #[test]
    fn test_status_failing_version_is_unusable() {
        let status = ffmpeg_status(Some(Path::new("false")));
        assert!(status.path.is_some());
        assert!(status.version.is_none());
        assert!(!status.is_usable());
    }
}
