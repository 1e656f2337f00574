//! File loading utilities for level files.

use std::{fs, path::Path};

use color_eyre::eyre::{OptionExt as _, Result, WrapErr as _};
use tracing::{info, warn};

use crate::grid::{Level, LEVEL_EXTENSION};

/// Scans `dir` for `.level` files and appends the valid ones to `levels`.
///
/// Files are visited in file name order so the level menu is stable between runs. Files whose
/// contents fail to parse are skipped with a warning and do not abort the scan.
///
/// # Errors
///
/// This function returns an error when the directory or one of its entries cannot be read.
pub(crate) fn fetch_levels(dir: &Path, levels: &mut Vec<Level>) -> Result<()> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).wrap_err_with(|| format!("failed to read {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_dir()
            && entry
                .file_name()
                .to_str()
                .ok_or_eyre("failed to convert osstring to string slice")?
                .ends_with(LEVEL_EXTENSION)
        {
            entries.push(entry);
        }
    }
    entries.sort_by_key(fs::DirEntry::file_name);

    let before = levels.len();
    for entry in entries {
        let contents = fs::read_to_string(entry.path())?;

        match Level::new(entry.file_name(), &contents) {
            Ok(level) => levels.push(level),
            Err(err) => warn!(path = %entry.path().display(), %err, "skipping invalid level file"),
        }
    }

    info!(
        dir = %dir.display(),
        loaded = levels.len() - before,
        "scanned level directory"
    );

    Ok(())
}

/// Reads and parses a single level file.
///
/// # Errors
///
/// This function returns an error when the path has no file name, the file cannot be read, or
/// its contents are not a valid level.
pub(crate) fn load_level(path: &Path) -> Result<Level> {
    let file_name = path
        .file_name()
        .ok_or_eyre("level path has no file name")?
        .to_owned();
    let contents =
        fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;

    Level::new(file_name, &contents)
        .wrap_err_with(|| format!("failed to load level {}", path.display()))
}
