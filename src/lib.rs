//! # Backstage Insights Library
//!
//! This library turns an Nx workspace into a Backstage software catalog. It
//! reads the project graph Nx already computed, each project's
//! `project.json`, an owner table and a declarative field-mapping
//! configuration, and produces Backstage `Group` and `Component` entities.
//! It is designed to be used by the `backstage-insights` command-line tool
//! but can be embedded in other tools as well.
//!
//! ## Quick Example
//!
//! ```
//! use backstage_insights::config;
//! use backstage_insights::owners::{synthesize_groups, OwnerTable};
//! use backstage_insights::phases::emit::emit;
//!
//! let mappings = config::parse(r#"{
//!     "mappings": {
//!         "metadata.name": { "resolverKind": "graph", "key": "name" },
//!         "spec.owner": { "resolverKind": "localMetadata", "key": "owners" }
//!     }
//! }"#).unwrap();
//! assert_eq!(mappings.len(), 2);
//!
//! let owners = OwnerTable::parse("- nxOwner: team-a\n  backstageOwner: platform\n").unwrap();
//! assert_eq!(owners.normalize("team-a"), Some("platform"));
//!
//! let groups = synthesize_groups(&owners).unwrap();
//! assert!(emit(&groups).unwrap().contains("name: platform"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The field-mapping schema: for each key path
//!   of the output entity, which resolver computes its value.
//! - **Resolvers (`resolvers`)**: `static`, `graph`, `localMetadata`,
//!   `repositorySlug` and `composite` value resolution for one project.
//! - **Ownership (`owners`)**: Maps `project.json` owners to Backstage groups,
//!   gates which projects become components and yields the group entities.
//! - **Entities (`entity`)**: Nested records built up through key-path
//!   assignment.
//! - **Collaborators (`graph`, `metadata`, `git`, `diagnostics`)**: The project
//!   graph, per-project metadata, the origin remote and the diagnostics sink,
//!   each behind a trait so the engine can run against in-memory fixtures.
//! - **Phases (`phases`)**: The run pipeline.
//!
//! ## Execution Flow
//!
//! The main entry point is [`phases::orchestrator::run`], which:
//!
//! 1.  **Locates** the mapping configuration and owner table.
//! 2.  **Loads** the owner table and the project graph, and resolves the
//!     repository slug once.
//! 3.  **Synthesizes** one group entity per Backstage group.
//! 4.  **Composes** one component entity per owned application or library.
//! 5.  **Emits** `ownership.yaml` and `catalog-info.yaml`.

pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod git;
pub mod graph;
pub mod metadata;
pub mod output;
pub mod owners;
pub mod phases;
pub mod resolvers;
pub mod suggestions;

#[cfg(test)]
mod engine_proptest;
