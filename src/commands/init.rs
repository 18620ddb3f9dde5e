//! # Init Command Implementation
//!
//! This module implements the `init` subcommand, which scaffolds the two
//! configuration files `generate` needs:
//!
//! - `.backstage-insights/insights.config.json` with a default field-mapping
//!   set for Backstage components.
//! - `.backstage-insights/backstage-nx-owners-mapping.yml` with one identity
//!   entry per owner found in the workspace's `project.json` files, ready to
//!   be edited to match the organization's Backstage groups.
//!
//! Existing files are only replaced with `--force`. Running it again on an
//! unchanged workspace produces the same files byte for byte.

use anyhow::Result;
use clap::Args;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use backstage_insights::defaults::{CONFIG_DIR, CONFIG_FILE, IGNORED_DIRS, OWNERS_FILE};
use backstage_insights::metadata::PROJECT_FILE;
use backstage_insights::output::OutputConfig;
use backstage_insights::owners::OwnerRecord;
use backstage_insights::suggestions;

/// Create the configuration files for backstage-insights
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Workspace root (defaults to current directory)
    #[arg(short, long, value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// Overwrite existing configuration files
    #[arg(short, long)]
    pub force: bool,
}

const DEFAULT_CONFIG: &str = r#"{
  "mappings": {
    "apiVersion": { "resolverKind": "static", "key": "backstage.io/v1alpha1" },
    "kind": { "resolverKind": "static", "key": "Component" },
    "metadata.name": { "resolverKind": "graph", "key": "name" },
    "metadata.description": { "resolverKind": "localMetadata", "key": "description" },
    "metadata.annotations[\"github.com/project-slug\"]": { "resolverKind": "repositorySlug" },
    "metadata.annotations[\"nx.dev/project-path\"]": {
      "resolverKind": "composite",
      "parts": [
        { "resolverKind": "repositorySlug" },
        { "resolverKind": "graph", "key": "root" }
      ],
      "separator": "/"
    },
    "spec.type": { "resolverKind": "graph", "key": "kind" },
    "spec.lifecycle": { "resolverKind": "static", "key": "production" },
    "spec.owner": { "resolverKind": "localMetadata", "key": "owners" },
    "spec.dependsOn": { "resolverKind": "graph", "key": "dependencies" }
  }
}
"#;

const OWNERS_HEADER: &str = "\
# This file maps the owner strings found in your Nx project.json files
# to the Group entity names used in your Backstage instance.
# Review the 'backstageOwner' values and update them to match your organization.
";

/// Execute the `init` command.
pub fn execute(args: InitArgs, output: OutputConfig) -> Result<()> {
    let workspace_root = match args.workspace_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let config_dir = workspace_root.join(CONFIG_DIR);
    let config_path = config_dir.join(CONFIG_FILE);
    let owners_path = config_dir.join(OWNERS_FILE);

    let existing: Vec<PathBuf> = [&config_path, &owners_path]
        .into_iter()
        .filter(|p| p.exists())
        .cloned()
        .collect();
    if !existing.is_empty() && !args.force {
        return Err(suggestions::init_files_exist(&existing));
    }

    output.status("🎯", "[INIT]", "Initializing backstage-insights configuration...");

    let owners = discover_owners(&workspace_root);
    log::debug!("Discovered {} owners", owners.len());

    fs::create_dir_all(&config_dir)?;
    fs::write(&config_path, DEFAULT_CONFIG)?;
    fs::write(&owners_path, owner_mapping_yaml(&owners)?)?;

    output.status(
        "✅",
        "[OK]",
        &format!("Created {}/ with {} owner mappings", CONFIG_DIR, owners.len()),
    );
    output.status(
        "💡",
        "[HINT]",
        "Review the generated files, then run `backstage-insights generate`",
    );

    Ok(())
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
}

/// Collect every owner listed in the workspace's `project.json` files.
///
/// Files are visited in sorted path order and owners are deduplicated in
/// first-seen order. Unreadable or malformed files are skipped with a warning.
fn discover_owners(workspace_root: &Path) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut owners = Vec::new();

    let walker = WalkDir::new(workspace_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry));

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || entry.file_name() != PROJECT_FILE {
            continue;
        }
        let path = entry.path();
        let record: serde_json::Value = match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from))
        {
            Ok(record) => record,
            Err(e) => {
                log::warn!(
                    "Could not read project configuration {}: {}",
                    path.display(),
                    e
                );
                continue;
            }
        };

        let listed = record
            .get("owners")
            .and_then(serde_json::Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(serde_json::Value::as_str);
        for owner in listed {
            if seen.insert(owner.to_string()) {
                owners.push(owner.to_string());
            }
        }
    }

    owners
}

/// Render the owner table with an identity mapping for each owner.
fn owner_mapping_yaml(owners: &[String]) -> Result<String> {
    let records: Vec<OwnerRecord> = owners
        .iter()
        .map(|owner| OwnerRecord::new(owner.as_str(), owner.as_str()))
        .collect();
    Ok(format!("{}{}", OWNERS_HEADER, serde_yaml::to_string(&records)?))
}
