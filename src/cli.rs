//! Command-line interface for livescribe
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Transcribe audio and video files over a live streaming session
#[derive(Parser, Debug)]
#[command(
    name = "livescribe",
    version,
    about = "Transcribe audio and video files over a live streaming session"
)]
pub struct Cli {
    /// Media file to transcribe
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Transcription service endpoint (host:port)
    #[arg(long, value_name = "ADDR")]
    pub endpoint: Option<String>,

    /// Model to request from the service
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Emit segments as JSON instead of the timestamped listing
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output (quiet mode)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
