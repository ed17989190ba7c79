use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{DEFAULT_BATCH_SIZE, DEFAULT_TEST_IMAGE_COUNT};
use crate::ledger::DEFAULT_LEDGER_FILE;
use crate::session::DEFAULT_SESSION_FILE;

/// Sort images into horizontal and vertical folders, with undo.
#[derive(Parser)]
#[command(name = "imgroup", version, about, long_about = None)]
pub struct Cli {
    /// Session file remembering the chosen folders.
    #[arg(long, global = true, default_value = DEFAULT_SESSION_FILE)]
    pub session: PathBuf,

    /// File holding moves that can still be undone.
    #[arg(long, global = true, default_value = DEFAULT_LEDGER_FILE)]
    pub ledger: PathBuf,

    /// Output events as JSON lines on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Move images from the pool into the horizontal or vertical folder.
    Group(GroupArgs),
    /// Move every recorded image back to where it came from.
    Undo(TuningArgs),
    /// Write sample landscape and portrait images into the pool.
    Generate(GenerateArgs),
}

#[derive(Args)]
pub struct GroupArgs {
    /// Folder to scan for images (defaults to the session's).
    #[arg(long)]
    pub pool: Option<PathBuf>,

    /// Folder for images wider than tall.
    #[arg(long)]
    pub horizontal: Option<PathBuf>,

    /// Folder for images taller than wide, or square.
    #[arg(long)]
    pub vertical: Option<PathBuf>,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Args, Clone, Copy)]
pub struct TuningArgs {
    /// Report progress every N files.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Attempts per file before giving up.
    #[arg(long, default_value_t = crate::mover::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Delay between attempts, e.g. `500ms` or `2s`.
    #[arg(long, default_value = "500ms", value_parser = humantime::parse_duration)]
    pub retry_delay: Duration,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Folder to write the images into (defaults to the session's).
    #[arg(long)]
    pub pool: Option<PathBuf>,

    /// Number of images to write.
    #[arg(long, default_value_t = DEFAULT_TEST_IMAGE_COUNT)]
    pub count: usize,
}

impl TuningArgs {
    /// Batch configuration with these overrides applied.
    pub fn config(&self) -> crate::config::GrouperConfig {
        crate::config::GrouperConfig {
            batch_size: self.batch_size,
            retry: crate::mover::RetryPolicy::new(self.max_attempts, self.retry_delay),
            ..Default::default()
        }
    }
}
