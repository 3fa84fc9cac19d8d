//! Reelforge-Common: shared error types and input discovery.
//!
//! - **Path Utilities**: detect convertible video files by extension
//! - **Discovery**: resolve explicit inputs or walk a directory tree
//! - **Error Handling**: common error type and result alias
//!
//! # Examples
//!
//! ```
//! use reelforge_common::paths::is_video_file;
//! use std::path::Path;
//!
//! assert!(is_video_file(Path::new("holiday.mkv")));
//! assert!(!is_video_file(Path::new("notes.txt")));
//! ```

pub mod discover;
pub mod error;
pub mod paths;

pub use discover::{discover_inputs, InputSelection};
pub use error::{Error, Result};
