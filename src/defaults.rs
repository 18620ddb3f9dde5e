//! Default file names and search locations.
//!
//! Centralized here so the `generate` and `init` commands and the
//! configuration lookup agree on where things live.

use std::path::{Path, PathBuf};

/// Directory holding the generator's configuration inside a workspace.
pub const CONFIG_DIR: &str = ".backstage-insights";

/// File name of the field-mapping configuration.
pub const CONFIG_FILE: &str = "insights.config.json";

/// File name of the owner table.
pub const OWNERS_FILE: &str = "backstage-nx-owners-mapping.yml";

/// File name of the project graph written by `nx graph --file`.
pub const GRAPH_FILE: &str = "project-graph.json";

/// Output file holding the group entities.
pub const OWNERSHIP_OUTPUT: &str = "ownership.yaml";

/// Output file holding the component entities.
pub const CATALOG_OUTPUT: &str = "catalog-info.yaml";

/// Directories never descended into when scanning a workspace.
pub const IGNORED_DIRS: &[&str] = &["node_modules", ".git", "dist", "target"];

/// Candidate locations of the field-mapping configuration, in search order.
pub fn config_search_paths(workspace_root: &Path) -> Vec<PathBuf> {
    vec![
        workspace_root.join(CONFIG_DIR).join(CONFIG_FILE),
        workspace_root.join(CONFIG_FILE),
    ]
}

/// Candidate locations of the owner table, in search order.
pub fn owners_search_paths(workspace_root: &Path) -> Vec<PathBuf> {
    vec![workspace_root.join(CONFIG_DIR).join(OWNERS_FILE)]
}

/// Default location of the project graph file.
pub fn default_graph_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(GRAPH_FILE)
}
