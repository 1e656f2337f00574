//! Command-line configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::animation::DEFAULT_MOVE_DURATION_MS;

/// Command-line options of the game.
///
/// Every option has a default, so the game starts on the built-in level when run without
/// arguments.
#[derive(Clone, Debug, Parser)]
#[command(name = "homeward", version, about)]
pub struct Cli {
    /// Directory scanned for `.level` files when the level menu is opened.
    #[arg(long, value_name = "DIR", default_value = "levels")]
    pub levels_dir: PathBuf,
    /// Level file to start with instead of the built-in level.
    #[arg(long, value_name = "FILE")]
    pub level: Option<PathBuf>,
    /// Duration of one tile-to-tile move of the player, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_MOVE_DURATION_MS)]
    pub move_duration_ms: u64,
    /// File receiving log output; nothing is logged without it.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Returns the configured move duration.
    pub(crate) const fn move_duration(&self) -> Duration {
        Duration::from_millis(self.move_duration_ms)
    }
}
