use clap::{Parser, Subcommand};
use reelforge_av::Preset;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelforge")]
#[command(author, version, about = "Batch video converter running ffmpeg on a worker pool")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert video files with ffmpeg
    Convert(ConvertArgs),

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(clap::Args)]
pub struct ConvertArgs {
    /// Input files
    #[arg(
        short,
        long = "input",
        num_args = 1..,
        required_unless_present = "recursive",
        conflicts_with = "recursive"
    )]
    pub input: Vec<PathBuf>,

    /// Directory to search recursively for video files
    #[arg(short = 'R', long)]
    pub recursive: Option<PathBuf>,

    /// Only pick up these extensions in recursive mode (e.g. mkv,mp4)
    #[arg(long, value_delimiter = ',', requires = "recursive")]
    pub ext: Vec<String>,

    /// Output name template, e.g. "{dir}/{rawname}.mkv"
    #[arg(short, long, required = true)]
    pub output: String,

    /// Delete each source file once its conversion succeeded
    #[arg(long)]
    pub remove_source: bool,

    /// Number of conversions to run at once
    #[arg(short, long)]
    pub speedup: Option<usize>,

    /// Encoder preset
    #[arg(short, long)]
    pub preset: Option<Preset>,

    /// Constant rate factor (0-51)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=51))]
    pub crf: Option<u8>,

    /// Video encoder
    #[arg(long)]
    pub codec: Option<String>,

    /// Overwrite existing output files
    #[arg(short = 'y', long)]
    pub overwrite: bool,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,
}
