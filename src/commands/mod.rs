//! CLI command handlers.

mod build_lookup;
mod config;
mod fetch_sheet;
mod merge;

pub use build_lookup::run_build_lookup_command;
pub use config::run_config_show_command;
pub use fetch_sheet::run_fetch_sheet_command;
pub use merge::run_merge_command;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Creates the parent directory of an output file if it does not exist.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    Ok(())
}
