//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a workspace fixture and canned configuration
//! snippets to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_default_inputs();
//!     fixture.command().arg("generate").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::inputs;
    pub use super::TestFixture;
}

/// Canned configuration inputs.
#[allow(dead_code)]
pub mod inputs {
    /// Field mappings for a typical Backstage component.
    pub const CONFIG: &str = r#"{
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
    "spec.owner": { "resolverKind": "localMetadata", "key": "owners" },
    "spec.dependsOn": { "resolverKind": "graph", "key": "dependencies" }
  }
}
"#;

    /// Owner table mapping two teams, one of them to a shared group.
    pub const OWNERS: &str = r#"- nxOwner: team-a
  backstageOwner: backstage-team-a
- nxOwner: team-b
  backstageOwner: platform
"#;

    /// Nx project graph with an app, two libs and an e2e project.
    pub const GRAPH: &str = r#"{
  "graph": {
    "nodes": {
      "storefront": { "name": "storefront", "type": "app", "data": { "root": "apps/storefront" } },
      "lib-b": { "name": "lib-b", "type": "lib", "data": { "root": "libs/lib-b" } },
      "legacy": { "name": "legacy", "type": "lib", "data": { "root": "libs/legacy" } },
      "storefront-e2e": { "name": "storefront-e2e", "type": "e2e", "data": { "root": "apps/storefront-e2e" } }
    },
    "dependencies": {
      "storefront": [
        { "source": "storefront", "target": "npm:react", "type": "static" },
        { "source": "storefront", "target": "lib-b", "type": "static" }
      ],
      "lib-b": [],
      "legacy": [],
      "storefront-e2e": [
        { "source": "storefront-e2e", "target": "storefront", "type": "implicit" }
      ]
    }
  }
}
"#;

    pub const STOREFRONT_PROJECT: &str =
        r#"{ "name": "storefront", "owners": ["team-a"], "description": "Customer-facing shop" }"#;

    pub const LIB_B_PROJECT: &str = r#"{ "name": "lib-b", "owners": ["team-b"] }"#;

    /// A project without an `owners` field.
    pub const LEGACY_PROJECT: &str = r#"{ "name": "legacy" }"#;
}

/// A temporary Nx-like workspace.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_config(inputs::CONFIG)
///     .with_owners(inputs::OWNERS)
///     .with_project("apps/storefront", inputs::STOREFRONT_PROJECT);
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `.backstage-insights/insights.config.json`.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file(".backstage-insights/insights.config.json", content)
    }

    /// Write `.backstage-insights/backstage-nx-owners-mapping.yml`.
    pub fn with_owners(self, content: &str) -> Self {
        self.with_file(".backstage-insights/backstage-nx-owners-mapping.yml", content)
    }

    /// Write `project-graph.json` at the workspace root.
    pub fn with_graph(self, content: &str) -> Self {
        self.with_file("project-graph.json", content)
    }

    /// Write `<root>/project.json`.
    pub fn with_project(self, root: &str, content: &str) -> Self {
        self.with_file(&format!("{}/project.json", root), content)
    }

    /// The standard workspace: config, owners, graph and three projects.
    pub fn with_default_inputs(self) -> Self {
        self.with_config(inputs::CONFIG)
            .with_owners(inputs::OWNERS)
            .with_graph(inputs::GRAPH)
            .with_project("apps/storefront", inputs::STOREFRONT_PROJECT)
            .with_project("libs/lib-b", inputs::LIB_B_PROJECT)
            .with_project("libs/legacy", inputs::LEGACY_PROJECT)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a file inside the workspace.
    pub fn file(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    ///
    /// Environment overrides are cleared so the host environment cannot leak
    /// into the test.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("backstage-insights");
        cmd.current_dir(self.path())
            .env_remove("BACKSTAGE_INSIGHTS_CONFIG")
            .env_remove("BACKSTAGE_INSIGHTS_OWNERS")
            .env_remove("BACKSTAGE_INSIGHTS_GRAPH")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_default_inputs() {
        let fixture = TestFixture::new().with_default_inputs();
        assert!(fixture
            .file(".backstage-insights/insights.config.json")
            .exists());
        assert!(fixture.file("libs/lib-b/project.json").exists());
    }

    #[test]
    fn test_inputs_are_valid() {
        serde_json::from_str::<serde_json::Value>(inputs::CONFIG).expect("config is JSON");
        serde_json::from_str::<serde_json::Value>(inputs::GRAPH).expect("graph is JSON");
        serde_yaml::from_str::<serde_yaml::Value>(inputs::OWNERS).expect("owners is YAML");
    }
}
