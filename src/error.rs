//! # Error Handling
//!
//! This module defines the centralized error type for `backstage-insights`.
//! It uses the `thiserror` library to create an `Error` enum that covers the
//! failure modes of a catalog generation run, with messages that name the
//! offending file, project or mapping path.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum for everything that can go wrong inside the
//!   library. Variants carry enough context (paths, project names, hints) to
//!   produce a useful message on their own.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Not every anomaly is an error. A project without an owner, or with an
//! owner missing from the owner table, is reported through the diagnostics
//! sink and skipped. Missing configuration files are reported through the
//! run report. Only the variants below ever stop a run.

use thiserror::Error;

/// Main error type for backstage-insights operations
#[derive(Error, Debug)]
pub enum Error {
    /// The field-mapping configuration file could not be parsed.
    ///
    /// Includes the specific parsing issue and optionally a hint about how
    /// to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The owner table file could not be parsed.
    #[error("Owner table error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    OwnerTable {
        message: String,
        /// Optional hint for how to fix the owner table
        hint: Option<String>,
    },

    /// The project graph could not be loaded.
    #[error("Project graph error: {message}")]
    Graph { message: String },

    /// A project's metadata file exists but could not be read or parsed.
    ///
    /// This aborts the whole run rather than skipping the project.
    #[error("Metadata error for project '{project}' ({path}): {message}")]
    Metadata {
        project: String,
        path: String,
        message: String,
    },

    /// A dotted key path could not be applied to an entity.
    #[error("Key path error at '{path}': {message}")]
    KeyPath { path: String, message: String },

    /// A git command could not be run or exited unsuccessfully.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// An entity could not be serialized.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
