//! # Value Resolvers
//!
//! A resolver turns a `(kind, key)` pair from the mapping configuration into
//! a value for one project:
//!
//! - `static`: the key itself.
//! - `graph`: `name`, `kind` (alias `type`), `root` or `dependencies` of the
//!   project's graph node.
//! - `localMetadata`: a property of the project's `project.json`.
//! - `repositorySlug`: the run-wide `org/repo` slug.
//! - `composite`: several `graph`/`repositorySlug` values joined by a
//!   separator.
//!
//! All resolvers read from a [`ResolutionContext`], which bundles the
//! project, the graph, the pre-computed slug and the metadata source.

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::cell::OnceCell;

use crate::config::{CompositeMapping, ResolverKind, ValueMapping};
use crate::diagnostics::Diagnostics;
use crate::entity::parse_key_path;
use crate::error::Result;
use crate::graph::{ProjectGraph, ProjectNode};
use crate::metadata::{self, MetadataSource};

/// Prefix given to workspace dependencies in `spec.dependsOn`.
pub const COMPONENT_REF_PREFIX: &str = "component:";

/// Metadata property holding the project's owners.
pub const OWNERS_KEY: &str = "owners";

/// A resolved field value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Text(String),
    List(Vec<String>),
    /// Any other metadata value (numbers, objects, mixed arrays), kept as is.
    Structured(JsonValue),
}

impl ResolvedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResolvedValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The value as a single string, as used inside composites.
    ///
    /// Lists are joined with `,`.
    pub fn to_joined_string(&self) -> String {
        match self {
            ResolvedValue::Text(text) => text.clone(),
            ResolvedValue::List(items) => items.join(","),
            ResolvedValue::Structured(JsonValue::String(s)) => s.clone(),
            ResolvedValue::Structured(other) => other.to_string(),
        }
    }

    pub fn into_yaml(self) -> Result<YamlValue> {
        Ok(match self {
            ResolvedValue::Text(text) => YamlValue::String(text),
            ResolvedValue::List(items) => {
                YamlValue::Sequence(items.into_iter().map(YamlValue::String).collect())
            }
            ResolvedValue::Structured(json) => serde_yaml::to_value(json)?,
        })
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(ResolvedValue::Text(s.clone())),
            JsonValue::Array(items) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect();
                Some(match strings {
                    Some(list) => ResolvedValue::List(list),
                    None => ResolvedValue::Structured(value.clone()),
                })
            }
            other => Some(ResolvedValue::Structured(other.clone())),
        }
    }
}

/// Everything a resolver may read for one project.
pub struct ResolutionContext<'a> {
    pub project: &'a ProjectNode,
    pub graph: &'a ProjectGraph,
    /// Computed once per run before any project is composed.
    pub repo_slug: &'a str,
    pub diagnostics: &'a dyn Diagnostics,
    metadata_source: &'a dyn MetadataSource,
    metadata: OnceCell<Option<JsonValue>>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        project: &'a ProjectNode,
        graph: &'a ProjectGraph,
        repo_slug: &'a str,
        metadata_source: &'a dyn MetadataSource,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            project,
            graph,
            repo_slug,
            diagnostics,
            metadata_source,
            metadata: OnceCell::new(),
        }
    }

    /// The project's metadata record, loaded on first use.
    pub fn metadata(&self) -> Result<Option<&JsonValue>> {
        if self.metadata.get().is_none() {
            let loaded = self.metadata_source.load(self.project)?;
            // Only this method fills the cell, so it is still empty here.
            let _ = self.metadata.set(loaded);
        }
        Ok(self.metadata.get().and_then(Option::as_ref))
    }
}

/// `static`: the configured key is the value.
///
/// Numeric and boolean keys keep their type.
pub fn resolve_static(mapping: &ValueMapping) -> ResolvedValue {
    match &mapping.literal {
        Some(literal) => ResolvedValue::Structured(literal.clone()),
        None => ResolvedValue::Text(mapping.key.clone()),
    }
}

/// `graph`: a property of the current project's graph node.
///
/// Unsupported keys are reported and resolve to an empty string.
pub fn resolve_graph(key: &str, ctx: &ResolutionContext<'_>) -> ResolvedValue {
    match key {
        "name" => ResolvedValue::Text(ctx.project.name.clone()),
        "kind" | "type" => ResolvedValue::Text(ctx.project.kind.as_str().to_string()),
        "root" => ResolvedValue::Text(ctx.project.root.clone()),
        "dependencies" => ResolvedValue::List(
            ctx.graph
                .dependencies_of(&ctx.project.name)
                .iter()
                .filter(|edge| !ctx.graph.is_external(&edge.target))
                .map(|edge| format!("{}{}", COMPONENT_REF_PREFIX, edge.target))
                .collect(),
        ),
        _ => {
            ctx.diagnostics.warn(&format!(
                "graph resolver: unsupported property '{}' requested.",
                key
            ));
            ResolvedValue::Text(String::new())
        }
    }
}

/// `localMetadata`: a property of the project's metadata record.
///
/// `key` may be a key path into nested objects. For `owners`, only the first
/// entry of the list is returned since a catalog entity has a single owner.
/// Returns `None` when the record or the property does not exist.
pub fn resolve_local_metadata(
    key: &str,
    ctx: &ResolutionContext<'_>,
) -> Result<Option<ResolvedValue>> {
    let Some(record) = ctx.metadata()? else {
        return Ok(None);
    };
    let Some(value) = metadata::lookup(record, &parse_key_path(key)) else {
        return Ok(None);
    };

    if key == OWNERS_KEY {
        if let JsonValue::Array(owners) = value {
            return Ok(owners.first().and_then(ResolvedValue::from_json));
        }
    }

    Ok(ResolvedValue::from_json(value))
}

/// `repositorySlug`: the slug computed once for the run.
pub fn resolve_repository_slug(ctx: &ResolutionContext<'_>) -> ResolvedValue {
    ResolvedValue::Text(ctx.repo_slug.to_string())
}

/// `composite`: resolve each part and join them with the separator.
///
/// Only `repositorySlug` and `graph` parts are supported; other kinds
/// contribute an empty string.
pub fn resolve_composite(mapping: &CompositeMapping, ctx: &ResolutionContext<'_>) -> String {
    mapping
        .parts
        .iter()
        .map(|part| match part.kind {
            ResolverKind::RepositorySlug => ctx.repo_slug.to_string(),
            ResolverKind::Graph => resolve_graph(&part.key, ctx).to_joined_string(),
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join(&mapping.separator)
}

/// Resolve a value mapping by dispatching on its kind.
///
/// `composite` and unknown kinds are not value kinds and resolve to `None`.
pub fn resolve_value(mapping: &ValueMapping, ctx: &ResolutionContext<'_>) -> Result<Option<ResolvedValue>> {
    Ok(match &mapping.kind {
        ResolverKind::Static => Some(resolve_static(mapping)),
        ResolverKind::Graph => Some(resolve_graph(&mapping.key, ctx)),
        ResolverKind::LocalMetadata => resolve_local_metadata(&mapping.key, ctx)?,
        ResolverKind::RepositorySlug => Some(resolve_repository_slug(ctx)),
        ResolverKind::Composite | ResolverKind::Unknown(_) => None,
    })
}
