//! Orchestrator for a complete generation run
//!
//! This module ties the stages together behind a single [`run`] call:
//! locate the configuration, load the owner table and graph, resolve the
//! repository slug once, synthesize groups, compose components and, when an
//! output directory is given, write both catalog files.

use std::path::{Path, PathBuf};

use super::{compose::Composer, emit, locate};
use crate::config::{self, InsightsConfig};
use crate::defaults;
use crate::diagnostics::Diagnostics;
use crate::entity::Entity;
use crate::error::Result;
use crate::git::{self, RemoteOperations};
use crate::graph::GraphSource;
use crate::metadata::MetadataSource;
use crate::owners::{synthesize_groups, OwnerTable};

/// Options for a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub workspace_root: PathBuf,
    /// Explicit field-mapping configuration, tried before the defaults.
    pub config_path: Option<PathBuf>,
    /// Explicit owner table, tried before the default.
    pub owners_path: Option<PathBuf>,
    /// Where to write the catalog files. Nothing is written when `None`.
    pub output_dir: Option<PathBuf>,
    /// Compose projects on the rayon thread pool.
    pub parallel: bool,
}

impl GenerateOptions {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            ..Self::default()
        }
    }
}

/// External collaborators of a run.
pub struct Collaborators<'a> {
    pub diagnostics: &'a dyn Diagnostics,
    pub remote: &'a dyn RemoteOperations,
    pub metadata: &'a dyn MetadataSource,
}

/// The result of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// `false` only when a configuration input could not be found.
    pub success: bool,
    pub groups: Vec<Entity>,
    pub components: Vec<Entity>,
    /// Projects skipped because of missing or unmapped owners.
    pub skipped: usize,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
    /// File names of the configuration inputs that could not be found.
    pub missing: Vec<&'static str>,
}

impl RunReport {
    fn missing_configuration(missing: Vec<&'static str>) -> Self {
        Self {
            missing,
            ..Self::default()
        }
    }
}

/// Execute a complete generation run.
///
/// Missing configuration files are reported through the diagnostics sink
/// and yield an unsuccessful report with nothing written. Unreadable inputs
/// and malformed project metadata are errors.
pub fn run(
    options: &GenerateOptions,
    graph_source: &dyn GraphSource,
    collaborators: &Collaborators<'_>,
) -> Result<RunReport> {
    let diagnostics = collaborators.diagnostics;

    // Stage 1: Locate configuration
    let locations = locate::execute(
        &options.workspace_root,
        options.config_path.as_deref(),
        options.owners_path.as_deref(),
    );
    let (Some(config_path), Some(owners_path)) = (&locations.config, &locations.owners) else {
        let missing = locations.missing();
        diagnostics.error("Configuration files are missing.");
        for file in &missing {
            diagnostics.error(&format!("Could not find {}.", file));
        }
        diagnostics.error(
            "Please run the initialization command to create them: backstage-insights init",
        );
        return Ok(RunReport::missing_configuration(missing));
    };

    let config: InsightsConfig = config::from_file(config_path)?;
    let owners = load_owner_table(owners_path, diagnostics)?;
    let graph = graph_source.load_graph()?;
    log::debug!(
        "Loaded {} mappings, {} owner records and {} projects",
        config.len(),
        owners.len(),
        graph.nodes().len()
    );

    let repo_slug = git::resolve_repo_slug(collaborators.remote, diagnostics);

    // Stage 2: Group synthesis
    let groups = synthesize_groups(&owners)?;

    // Stage 3: Compose components
    let composer = Composer::new(
        &config,
        &owners,
        &graph,
        &repo_slug,
        collaborators.metadata,
        diagnostics,
    );
    let outcome = composer.compose_all(options.parallel)?;
    if outcome.skipped > 0 {
        diagnostics.info(&format!(
            "Skipped {} components due to missing or invalid ownership.",
            outcome.skipped
        ));
    }

    // Stage 4: Emit (if an output directory was given)
    let mut written = Vec::new();
    if let Some(output_dir) = &options.output_dir {
        written.push(emit::write_ownership_file(output_dir, &groups, diagnostics)?);
        written.push(emit::write_catalog_file(
            output_dir,
            &outcome.components,
            diagnostics,
        )?);
    }

    Ok(RunReport {
        success: true,
        groups,
        components: outcome.components,
        skipped: outcome.skipped,
        written,
        missing: Vec::new(),
    })
}

fn load_owner_table(path: &Path, diagnostics: &dyn Diagnostics) -> Result<OwnerTable> {
    let owners = OwnerTable::from_file(path)?;
    for id in owners.duplicate_owner_ids() {
        diagnostics.warn(&format!(
            "Owner '{}' is listed more than once in {}; using the first entry.",
            id,
            defaults::OWNERS_FILE
        ));
    }
    Ok(owners)
}
