//! Per-project metadata
//!
//! Each project's `project.json` carries metadata the graph does not, most
//! importantly its `owners`. The [`MetadataSource`] trait abstracts where that
//! record comes from so composition can be tested without a workspace on disk.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::entity::PathSegment;
use crate::error::{Error, Result};
use crate::graph::ProjectNode;

/// File name of the per-project metadata record.
pub const PROJECT_FILE: &str = "project.json";

/// Trait for loading project metadata - allows mocking in tests
pub trait MetadataSource: Send + Sync {
    /// The metadata record for `project`, or `None` if it has none.
    ///
    /// A record that exists but cannot be read or parsed is an error.
    fn load(&self, project: &ProjectNode) -> Result<Option<JsonValue>>;
}

/// Reads `<workspace root>/<project root>/project.json`.
#[derive(Debug, Clone)]
pub struct FsMetadataSource {
    workspace_root: PathBuf,
}

impl FsMetadataSource {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    pub fn metadata_path(&self, project: &ProjectNode) -> PathBuf {
        self.workspace_root.join(&project.root).join(PROJECT_FILE)
    }
}

impl MetadataSource for FsMetadataSource {
    fn load(&self, project: &ProjectNode) -> Result<Option<JsonValue>> {
        let path = self.metadata_path(project);
        if !path.exists() {
            return Ok(None);
        }
        read_metadata(&project.name, &path).map(Some)
    }
}

fn read_metadata(project: &str, path: &Path) -> Result<JsonValue> {
    let metadata_error = |message: String| Error::Metadata {
        project: project.to_string(),
        path: path.display().to_string(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| metadata_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| metadata_error(e.to_string()))
}

/// Metadata records held in memory, keyed by project name.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataSource {
    records: HashMap<String, JsonValue>,
}

impl MemoryMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, project: impl Into<String>, record: JsonValue) {
        self.records.insert(project.into(), record);
    }

    pub fn with(mut self, project: impl Into<String>, record: JsonValue) -> Self {
        self.insert(project, record);
        self
    }
}

impl MetadataSource for MemoryMetadataSource {
    fn load(&self, project: &ProjectNode) -> Result<Option<JsonValue>> {
        Ok(self.records.get(&project.name).cloned())
    }
}

/// Read the value at `path` inside a metadata record.
pub fn lookup<'a>(record: &'a JsonValue, path: &[PathSegment]) -> Option<&'a JsonValue> {
    path.iter().try_fold(record, |current, segment| match segment {
        PathSegment::Key(key) => current.as_object()?.get(key),
        PathSegment::Index(idx) => current.as_array()?.get(*idx),
    })
}
