//! Generate command implementation
//!
//! Runs the full pipeline against the current workspace: locate the
//! configuration, read the project graph, compose group and component
//! entities and write `ownership.yaml` and `catalog-info.yaml`.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use backstage_insights::defaults;
use backstage_insights::diagnostics::LogDiagnostics;
use backstage_insights::error::Error;
use backstage_insights::git::DefaultRemoteOperations;
use backstage_insights::graph::GraphFile;
use backstage_insights::metadata::FsMetadataSource;
use backstage_insights::output::OutputConfig;
use backstage_insights::phases::orchestrator::{self, Collaborators, GenerateOptions};
use backstage_insights::suggestions;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Workspace root (defaults to current directory)
    #[arg(short, long, value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// Path to the field-mapping configuration
    #[arg(short, long, value_name = "PATH", env = "BACKSTAGE_INSIGHTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the owner mapping file
    #[arg(long, value_name = "PATH", env = "BACKSTAGE_INSIGHTS_OWNERS")]
    pub owners: Option<PathBuf>,

    /// Path to the project graph JSON (defaults to <workspace>/project-graph.json)
    #[arg(short, long, value_name = "PATH", env = "BACKSTAGE_INSIGHTS_GRAPH")]
    pub graph: Option<PathBuf>,

    /// Output directory (defaults to the workspace root)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Compose projects in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, output: OutputConfig) -> Result<()> {
    let output = output.quiet(args.quiet);
    let start_time = Instant::now();

    let workspace_root = match args.workspace_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let graph_path = args
        .graph
        .unwrap_or_else(|| defaults::default_graph_path(&workspace_root));
    let output_dir = args.output.unwrap_or_else(|| workspace_root.clone());

    output.status("🔍", "[SCAN]", "Generating Backstage catalog");

    let options = GenerateOptions {
        workspace_root: workspace_root.clone(),
        config_path: args.config,
        owners_path: args.owners,
        output_dir: Some(output_dir.clone()),
        parallel: args.parallel,
    };
    let remote = DefaultRemoteOperations::new(&workspace_root);
    let metadata = FsMetadataSource::new(&workspace_root);
    let collaborators = Collaborators {
        diagnostics: &LogDiagnostics,
        remote: &remote,
        metadata: &metadata,
    };

    let report = match orchestrator::run(&options, &GraphFile::new(&graph_path), &collaborators) {
        Ok(report) => report,
        Err(Error::Graph { .. }) if !graph_path.exists() => {
            output.status("❌", "[FAIL]", "Generation failed");
            return Err(suggestions::graph_not_found(&graph_path));
        }
        Err(e) => {
            output.status("❌", "[FAIL]", "Generation failed");
            return Err(e.into());
        }
    };

    if !report.success {
        output.status("❌", "[FAIL]", "Generation failed");
        return Err(suggestions::missing_configuration(&report.missing));
    }

    output.status(
        "✅",
        "[OK]",
        &format!(
            "Generated {} components and {} groups in {:.2}s",
            report.components.len(),
            report.groups.len(),
            start_time.elapsed().as_secs_f64()
        ),
    );
    if report.skipped > 0 {
        output.detail(&format!("{} projects skipped", report.skipped));
    }
    output.detail(&format!("Files written to: {}", output_dir.display()));

    Ok(())
}
