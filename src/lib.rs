//! Reelforge - batch video conversion
//!
//! This library crate exposes configuration and batch planning for
//! integration testing; the engine lives in `reelforge-exec`.

pub mod config;
pub mod plan;
