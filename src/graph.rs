//! # Project Graph
//!
//! The generator does not build the workspace graph itself; it reads the
//! graph that Nx already computed (`nx graph --file=project-graph.json`).
//! This module holds the read-only model of that graph and the loader.
//!
//! Both the wrapped shape written by `nx graph --file`
//! (`{ "graph": { "nodes": ..., "dependencies": ... } }`) and the bare
//! `{ "nodes": ..., "dependencies": ... }` shape are accepted. Node order in
//! the file is kept and drives the order of the generated catalog.

use serde::Deserialize;
use serde_yaml::Value as YamlValue;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The kind of a workspace project.
///
/// Only applications and libraries are turned into catalog components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ProjectKind {
    Application,
    Library,
    /// Anything else Nx reports (e.g. `e2e`), kept verbatim.
    Other(String),
}

impl ProjectKind {
    /// The short name Nx uses for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            ProjectKind::Application => "app",
            ProjectKind::Library => "lib",
            ProjectKind::Other(name) => name,
        }
    }

    pub fn is_catalog_eligible(&self) -> bool {
        matches!(self, ProjectKind::Application | ProjectKind::Library)
    }
}

impl From<String> for ProjectKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "app" | "application" => ProjectKind::Application,
            "lib" | "library" => ProjectKind::Library,
            _ => ProjectKind::Other(name),
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project in the workspace graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode {
    pub name: String,
    pub kind: ProjectKind,
    /// Project root relative to the workspace root.
    pub root: String,
}

impl ProjectNode {
    pub fn new(name: impl Into<String>, kind: ProjectKind, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            root: root.into(),
        }
    }
}

/// A dependency of one project on another project or an external package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    /// `static`, `dynamic` or `implicit` in Nx graphs.
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl DependencyEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: kind.into(),
        }
    }
}

/// A read-only workspace graph: projects in file order plus their edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectGraph {
    nodes: Vec<ProjectNode>,
    /// Position in `nodes` of the first node with each name.
    index: HashMap<String, usize>,
    dependencies: HashMap<String, Vec<DependencyEdge>>,
}

impl ProjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Nodes are iterated in insertion order.
    pub fn add_node(&mut self, node: ProjectNode) {
        self.index
            .entry(node.name.clone())
            .or_insert(self.nodes.len());
        self.nodes.push(node);
    }

    /// Append an edge to its source project's dependency list.
    pub fn add_dependency(&mut self, edge: DependencyEdge) {
        self.dependencies
            .entry(edge.source.clone())
            .or_default()
            .push(edge);
    }

    pub fn nodes(&self) -> &[ProjectNode] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&ProjectNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    /// Edges leaving `project`, in discovery order.
    pub fn dependencies_of(&self, project: &str) -> &[DependencyEdge] {
        self.dependencies
            .get(project)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `target` names something outside the workspace.
    ///
    /// External nodes carry a namespace prefix such as `npm:react`. A target
    /// that is itself a workspace project is never external.
    pub fn is_external(&self, target: &str) -> bool {
        target.contains(':') && self.node(target).is_none()
    }

    /// Parse the JSON text of a project graph.
    pub fn parse(json_content: &str) -> Result<Self> {
        let root: YamlValue = serde_json::from_str(json_content)?;
        let root = match root.get("graph") {
            Some(inner) if inner.is_mapping() => inner,
            _ => &root,
        };

        let nodes = match root.get("nodes") {
            Some(YamlValue::Mapping(nodes)) => nodes,
            _ => {
                return Err(Error::Graph {
                    message: "Project graph has no 'nodes' object".to_string(),
                })
            }
        };

        let mut graph = ProjectGraph::new();
        for (key, value) in nodes {
            let key = key.as_str().ok_or_else(|| Error::Graph {
                message: format!("Node key must be a string, found {:?}", key),
            })?;
            let raw: RawNode = serde_yaml::from_value(value.clone()).map_err(|e| Error::Graph {
                message: format!("Invalid node '{}': {}", key, e),
            })?;
            graph.add_node(ProjectNode {
                name: raw.name.unwrap_or_else(|| key.to_string()),
                kind: raw.kind,
                root: raw.data.root,
            });
        }

        if let Some(deps) = root.get("dependencies") {
            let deps: HashMap<String, Vec<DependencyEdge>> = serde_yaml::from_value(deps.clone())
                .map_err(|e| Error::Graph {
                    message: format!("Invalid 'dependencies': {}", e),
                })?;
            graph.dependencies = deps;
        }

        Ok(graph)
    }

    /// Read and parse a project graph file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::parse(&content)
    }
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    kind: ProjectKind,
    #[serde(default)]
    data: RawNodeData,
}

#[derive(Default, Deserialize)]
struct RawNodeData {
    #[serde(default)]
    root: String,
}

/// Where the generator gets its graph from.
pub trait GraphSource {
    fn load_graph(&self) -> Result<ProjectGraph>;
}

/// A graph JSON file on disk.
#[derive(Debug, Clone)]
pub struct GraphFile {
    path: PathBuf,
}

impl GraphFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphSource for GraphFile {
    fn load_graph(&self) -> Result<ProjectGraph> {
        if !self.path.exists() {
            return Err(Error::Graph {
                message: format!("Project graph file not found: {}", self.path.display()),
            });
        }
        ProjectGraph::from_file(&self.path)
    }
}

impl GraphSource for ProjectGraph {
    fn load_graph(&self) -> Result<ProjectGraph> {
        Ok(self.clone())
    }
}
