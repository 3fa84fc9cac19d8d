//! Container lookup by file extension.

use crate::{Error, Result};
use std::fmt;
use std::path::Path;

/// Container formats the converter reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoContainer {
    /// MPEG-4 Part 14 container
    Mp4,
    /// QuickTime container
    Mov,
    /// AVI container
    Avi,
    /// Flash video container
    Flv,
    /// Windows Media / Advanced Systems Format
    Wmv,
    /// MPEG program stream (including DVD VOB)
    Mpeg,
    /// Matroska container
    Mkv,
}

impl VideoContainer {
    /// All known containers.
    pub const ALL: [VideoContainer; 7] = [
        VideoContainer::Mp4,
        VideoContainer::Mov,
        VideoContainer::Avi,
        VideoContainer::Flv,
        VideoContainer::Wmv,
        VideoContainer::Mpeg,
        VideoContainer::Mkv,
    ];

    /// Short name of this container kind.
    pub fn name(&self) -> &'static str {
        match self {
            VideoContainer::Mp4 => "mp4",
            VideoContainer::Mov => "mov",
            VideoContainer::Avi => "avi",
            VideoContainer::Flv => "flv",
            VideoContainer::Wmv => "wmv",
            VideoContainer::Mpeg => "mpeg",
            VideoContainer::Mkv => "mkv",
        }
    }

    /// File extensions that map to this container.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            VideoContainer::Mp4 => &["mp4", "m4v"],
            VideoContainer::Mov => &["mov", "qt"],
            VideoContainer::Avi => &["avi"],
            VideoContainer::Flv => &["flv"],
            VideoContainer::Wmv => &["wmv", "asf"],
            VideoContainer::Mpeg => &["mpeg", "mpg", "vob"],
            VideoContainer::Mkv => &["mkv"],
        }
    }

    /// Look up the container for an extension (case-insensitive, no dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|container| container.extensions().contains(&extension.as_str()))
    }

    /// Look up the container of a path from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] when the extension is missing or
    /// unknown.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();

        Self::from_extension(&extension).ok_or_else(|| Error::unsupported_format(path, extension))
    }
}

impl fmt::Display for VideoContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
