//! # Error Suggestions
//!
//! Helper functions for building CLI errors that say what went wrong AND how
//! to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use backstage_insights::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Project graph file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::graph_not_found(path));
//! ```

use std::path::{Path, PathBuf};

use crate::defaults::{CONFIG_DIR, CONFIG_FILE, OWNERS_FILE};

/// Generate an error for a run whose configuration files could not be found.
///
/// Names every missing file and points at `init` and the override flags.
pub fn missing_configuration(missing: &[&str]) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration files are missing: {files}\n\n\
         hint: Run 'backstage-insights init' to create them in {dir}/\n\
         hint: Use --config to point at a different {config}\n\
         hint: Use --owners to point at a different {owners}",
        files = missing.join(", "),
        dir = CONFIG_DIR,
        config = CONFIG_FILE,
        owners = OWNERS_FILE,
    )
}

/// Generate an error for a project graph file that does not exist.
pub fn graph_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Project graph file not found: {path}\n\n\
         hint: Generate it with 'nx graph --file={path}'\n\
         hint: Use --graph to specify a different path\n\
         hint: Set BACKSTAGE_INSIGHTS_GRAPH environment variable",
        path = path.display()
    )
}

/// Generate an error for `init` refusing to overwrite existing files.
pub fn init_files_exist(existing: &[PathBuf]) -> anyhow::Error {
    let files = existing
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    anyhow::anyhow!(
        "Configuration files already exist:\n{files}\n\n\
         hint: Use --force to overwrite them"
    )
}
