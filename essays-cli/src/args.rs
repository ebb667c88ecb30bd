//! Command-line arguments.

use clap::Parser;
use essays_core::{Pacing, ReaderConfig};
use std::path::PathBuf;

/// Read an essay aloud, line by line.
///
/// Keys while reading: p pause, r resume, o open link, q quit.
#[derive(Debug, Parser)]
#[command(name = "awesome-essays")]
#[command(version)]
pub struct Cli {
    /// Plain text file to read
    #[arg(short = 'f', long, conflicts_with = "author")]
    pub file: Option<PathBuf>,

    /// Essay catalog (TOML) to look the essay up in
    #[arg(long, env = "ESSAYS_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Author to read, as named in the catalog
    #[arg(short = 'a', long)]
    pub author: Option<String>,

    /// Essay title, as listed for the author
    #[arg(short = 't', long, requires = "author", conflicts_with = "index")]
    pub title: Option<String>,

    /// Essay position for the author (0-based)
    #[arg(short = 'n', long, requires = "author")]
    pub index: Option<usize>,

    /// Reader config file
    #[arg(short = 'c', long, env = "ESSAYS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Speech program to run for each line
    #[arg(long)]
    pub command: Option<String>,

    /// Per-line narration timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Wait before each line, in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Line pacing: "fixed" or "words"
    #[arg(long)]
    pub pacing: Option<Pacing>,

    /// Write logs to this file (the terminal is taken over while reading)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Fold command-line overrides into `config`.
    pub fn apply_overrides(&self, config: &mut ReaderConfig) {
        if let Some(command) = &self.command {
            config.narration.command = command.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.narration.timeout_secs = secs;
        }
        if let Some(ms) = self.tick_ms {
            config.playback.tick_ms = ms;
        }
        if let Some(pacing) = self.pacing {
            config.playback.pacing = pacing;
        }
    }
}
