//! Path utilities for detecting convertible video files by extension.
//!
//! The extension list mirrors the containers the transcoder knows how to
//! name, so anything discovered here can also be planned.

use std::path::Path;

/// List of supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "qt", "avi", "flv", "wmv", "asf", "mpeg", "mpg", "vob", "mkv",
];

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use reelforge_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.mkv")));
/// assert!(is_video_file(Path::new("/path/to/video.MPG")));
/// assert!(!is_video_file(Path::new("subtitle.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a path's extension is one of `extensions` (case-insensitive).
///
/// A leading dot on an entry is ignored, so `".mkv"` and `"mkv"` both match.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Get the list of video file extensions.
#[must_use]
pub fn video_extensions() -> &'static [&'static str] {
    VIDEO_EXTENSIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video_file() {
        for name in [
            "a.mp4", "a.m4v", "a.mov", "a.qt", "a.avi", "a.flv", "a.wmv", "a.asf", "a.mpeg",
            "a.mpg", "a.vob", "a.mkv",
        ] {
            assert!(is_video_file(Path::new(name)), "{name}");
        }

        // Case insensitive
        assert!(is_video_file(Path::new("movie.MKV")));
        assert!(is_video_file(Path::new("movie.Mp4")));

        // Not convertible
        assert!(!is_video_file(Path::new("movie.webm")));
        assert!(!is_video_file(Path::new("subtitle.srt")));
        assert!(!is_video_file(Path::new("no_extension")));
    }

    #[test]
    fn test_has_extension() {
        let exts = vec!["mkv".to_string(), ".MP4".to_string()];
        assert!(has_extension(Path::new("/v/a.mkv"), &exts));
        assert!(has_extension(Path::new("/v/a.mp4"), &exts));
        assert!(!has_extension(Path::new("/v/a.avi"), &exts));
        assert!(!has_extension(Path::new("/v/noext"), &exts));
    }

    #[test]
    fn test_edge_cases() {
        assert!(!is_video_file(Path::new("")));
        assert!(is_video_file(Path::new(".hidden.mkv")));
        assert!(is_video_file(Path::new("movie.1080p.mkv")));
        assert_eq!(video_extensions().len(), 12);
    }
}
