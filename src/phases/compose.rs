//! Compose: build component entities from workspace projects.
//!
//! ## Process
//!
//! For every project node, in graph order:
//!
//! 1.  **Filter**: Only applications and libraries become components. Other
//!     kinds are ignored without a diagnostic.
//!
//! 2.  **Ownership gate**: The first entry of `owners` in the project's
//!     `project.json` is looked up in the owner table. A project with no
//!     owner, or with an owner the table does not list, is skipped with a
//!     warning.
//!
//! 3.  **Seed**: `spec.owner` is set to the owner's Backstage group.
//!
//! 4.  **Apply mappings**: Every configured mapping is resolved and written
//!     at its key path, in declaration order. Mappings that target
//!     `spec.owner` are ignored: the owner was validated and normalized in
//!     step 2, and a configured resolver for it would bypass that check and
//!     could emit an owner Backstage does not know.
//!
//! A metadata file that cannot be parsed stops the whole run.

use rayon::prelude::*;

use crate::config::{FieldMapping, InsightsConfig, ResolverKind};
use crate::diagnostics::Diagnostics;
use crate::entity::{parse_key_path, Entity, PathSegment};
use crate::error::Result;
use crate::graph::{ProjectGraph, ProjectNode};
use crate::metadata::MetadataSource;
use crate::owners::OwnerTable;
use crate::resolvers::{
    resolve_composite, resolve_local_metadata, resolve_value, ResolutionContext, ResolvedValue,
    OWNERS_KEY,
};

/// Key path of the owner field, which composition always fills itself.
pub const OWNER_PATH: &str = "spec.owner";

/// Why an eligible project produced no component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `project.json` is missing, has no `owners`, or lists none.
    MissingOwner,
    /// The owner is not in the owner table.
    UnmappedOwner { owner: String },
}

/// The outcome of composing one project.
#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    Component(Entity),
    Skipped(SkipReason),
    /// Not an application or library.
    Ineligible,
}

/// Components composed from a whole graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeOutcome {
    /// Components in graph order.
    pub components: Vec<Entity>,
    /// Number of eligible projects skipped for ownership reasons.
    pub skipped: usize,
}

/// Builds component entities for the projects of one graph.
pub struct Composer<'a> {
    config: &'a InsightsConfig,
    owners: &'a OwnerTable,
    graph: &'a ProjectGraph,
    repo_slug: &'a str,
    metadata: &'a dyn MetadataSource,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Composer<'a> {
    pub fn new(
        config: &'a InsightsConfig,
        owners: &'a OwnerTable,
        graph: &'a ProjectGraph,
        repo_slug: &'a str,
        metadata: &'a dyn MetadataSource,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            config,
            owners,
            graph,
            repo_slug,
            metadata,
            diagnostics,
        }
    }

    /// Compose the component for a single project.
    pub fn compose(&self, project: &ProjectNode) -> Result<Composition> {
        if !project.kind.is_catalog_eligible() {
            return Ok(Composition::Ineligible);
        }

        let ctx = ResolutionContext::new(
            project,
            self.graph,
            self.repo_slug,
            self.metadata,
            self.diagnostics,
        );

        let owner = match resolve_local_metadata(OWNERS_KEY, &ctx)? {
            Some(ResolvedValue::Text(owner)) if !owner.is_empty() => owner,
            _ => {
                self.diagnostics.warn(&format!(
                    "Skipping component '{}' because it has no 'owners' field in its project.json.",
                    project.name
                ));
                return Ok(Composition::Skipped(SkipReason::MissingOwner));
            }
        };

        let Some(group) = self.owners.normalize(&owner) else {
            self.diagnostics.warn(&format!(
                "Skipping component '{}' because its owner '{}' is not defined in the mapping file.",
                project.name, owner
            ));
            return Ok(Composition::Skipped(SkipReason::UnmappedOwner { owner }));
        };

        let mut entity = Entity::new();
        entity.set(OWNER_PATH, group)?;

        let owner_path = parse_key_path(OWNER_PATH);
        for (path, mapping) in &self.config.mappings {
            if targets_owner(path, &owner_path) {
                continue;
            }
            self.apply(&mut entity, path, mapping, &ctx)?;
        }

        Ok(Composition::Component(entity))
    }

    fn apply(
        &self,
        entity: &mut Entity,
        path: &str,
        mapping: &FieldMapping,
        ctx: &ResolutionContext<'_>,
    ) -> Result<()> {
        match mapping {
            FieldMapping::Composite(composite) => {
                entity.set(path, resolve_composite(composite, ctx))?;
            }
            FieldMapping::Value(value) => {
                if let ResolverKind::Unknown(kind) = &value.kind {
                    self.diagnostics.warn(&format!(
                        "Ignoring mapping for '{}': unknown resolver kind '{}'.",
                        path, kind
                    ));
                    return Ok(());
                }
                if let Some(resolved) = resolve_value(value, ctx)? {
                    entity.set(path, resolved.into_yaml()?)?;
                }
            }
        }
        Ok(())
    }

    /// Compose every project of the graph.
    ///
    /// With `parallel`, projects are composed on the rayon thread pool; the
    /// components still come out in graph order.
    pub fn compose_all(&self, parallel: bool) -> Result<ComposeOutcome> {
        let nodes = self.graph.nodes();
        let compositions: Vec<Composition> = if parallel {
            nodes
                .par_iter()
                .map(|node| self.compose(node))
                .collect::<Result<_>>()?
        } else {
            nodes
                .iter()
                .map(|node| self.compose(node))
                .collect::<Result<_>>()?
        };

        let mut outcome = ComposeOutcome::default();
        for composition in compositions {
            match composition {
                Composition::Component(entity) => outcome.components.push(entity),
                Composition::Skipped(_) => outcome.skipped += 1,
                Composition::Ineligible => {}
            }
        }
        Ok(outcome)
    }
}

fn targets_owner(path: &str, owner_path: &[PathSegment]) -> bool {
    parse_key_path(path) == owner_path
}
