//! # reelforge-av
//!
//! Transcode planning for video files.
//!
//! This crate provides functionality for:
//! - Mapping file extensions to container kinds
//! - Rendering output file names from naming templates
//! - Building ffmpeg invocations as argument vectors
//! - Locating the ffmpeg executable
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```
//! use reelforge_av::{TemplateContext, TranscodeSettings};
//! use std::path::Path;
//!
//! let source = Path::new("/videos/trip.avi");
//! let output = TemplateContext::for_source(source).render("{dir}/{rawname}.mkv")?;
//! let command = TranscodeSettings::default().command(source, Path::new(&output))?;
//! assert_eq!(command.args.last().map(String::as_str), Some("/videos/trip.mkv"));
//! # Ok::<(), reelforge_av::Error>(())
//! ```

pub mod container;
mod error;
pub mod template;
pub mod tools;
pub mod transcode;

// Re-exports
pub use container::VideoContainer;
pub use error::{Error, Result};
pub use template::TemplateContext;
pub use tools::{ffmpeg_status, find_ffmpeg, resolve_program, FfmpegStatus};
pub use transcode::{Preset, TranscodeCommand, TranscodeSettings};
