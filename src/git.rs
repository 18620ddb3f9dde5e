//! Repository slug resolution
//!
//! Components are annotated with the `org/repo` slug of the repository they
//! live in. The slug comes from the `origin` remote, read once per run with
//! the system `git` command, and falls back to [`UNKNOWN_SLUG`] when the
//! remote cannot be read or parsed.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};

/// Slug used when the origin remote cannot be determined.
pub const UNKNOWN_SLUG: &str = "unknown/unknown";

/// Matches the last two path segments of an HTTPS or SCP-style remote URL.
const SLUG_PATTERN: &str = r"[/:]([\w.-]+)/([\w.-]+?)(?:\.git)?/?$";

/// Trait for reading the repository remote - allows mocking in tests
pub trait RemoteOperations: Send + Sync {
    /// The URL of the `origin` remote.
    fn origin_url(&self) -> Result<String>;
}

/// Reads `remote.origin.url` with the system git command.
#[derive(Debug, Clone)]
pub struct DefaultRemoteOperations {
    repo_root: PathBuf,
}

impl DefaultRemoteOperations {
    pub fn new(repo_root: &Path) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
        }
    }
}

impl RemoteOperations for DefaultRemoteOperations {
    fn origin_url(&self) -> Result<String> {
        let command = "config --get remote.origin.url";
        let output = Command::new("git")
            .args(["config", "--get", "remote.origin.url"])
            .current_dir(&self.repo_root)
            .output()
            .map_err(|e| Error::GitCommand {
                command: command.to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::GitCommand {
                command: command.to_string(),
                stderr: if stderr.is_empty() {
                    "no remote named 'origin'".to_string()
                } else {
                    stderr
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Extract `org/repo` from a remote URL.
///
/// Handles `scheme://host/org/repo(.git)` and `user@host:org/repo(.git)`.
///
/// # Examples
///
/// ```
/// use backstage_insights::git::parse_repo_slug;
///
/// assert_eq!(
///     parse_repo_slug("git@github.com:acme/widgets.git").unwrap(),
///     Some("acme/widgets".to_string())
/// );
/// assert_eq!(parse_repo_slug("not a url").unwrap(), None);
/// ```
pub fn parse_repo_slug(url: &str) -> Result<Option<String>> {
    let regex = Regex::new(SLUG_PATTERN).map_err(Error::Regex)?;
    Ok(regex
        .captures(url.trim())
        .map(|caps| format!("{}/{}", &caps[1], &caps[2])))
}

/// Resolve the repository slug, falling back to [`UNKNOWN_SLUG`].
///
/// Never fails: problems are reported through `diagnostics`.
pub fn resolve_repo_slug(remote: &dyn RemoteOperations, diagnostics: &dyn Diagnostics) -> String {
    let url = match remote.origin_url() {
        Ok(url) => url,
        Err(e) => {
            diagnostics.error(
                "Could not determine git remote URL. Is this a git repository with a remote named 'origin'?",
            );
            log::debug!("git remote lookup failed: {}", e);
            return UNKNOWN_SLUG.to_string();
        }
    };

    match parse_repo_slug(&url) {
        Ok(Some(slug)) => slug,
        _ => {
            diagnostics.warn(&format!(
                "Could not parse a repository slug from remote URL '{}'; using '{}'.",
                url, UNKNOWN_SLUG
            ));
            UNKNOWN_SLUG.to_string()
        }
    }
}
