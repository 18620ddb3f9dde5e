//! Locate: find the configuration inputs of a run.
//!
//! Each input is looked up in order: the explicitly given path (from a flag
//! or environment variable) first, then the default locations under the
//! workspace root. The first existing file wins. A missing input is not an
//! error here; the orchestrator decides what to do about it.

use std::path::{Path, PathBuf};

use crate::defaults;

/// Where the configuration inputs were found, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLocations {
    pub config: Option<PathBuf>,
    pub owners: Option<PathBuf>,
}

impl ConfigLocations {
    pub fn is_complete(&self) -> bool {
        self.config.is_some() && self.owners.is_some()
    }

    /// File names of the inputs that could not be found.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.config.is_none() {
            missing.push(defaults::CONFIG_FILE);
        }
        if self.owners.is_none() {
            missing.push(defaults::OWNERS_FILE);
        }
        missing
    }
}

/// The first existing path among `explicit` and `candidates`.
pub fn first_existing(explicit: Option<&Path>, candidates: &[PathBuf]) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(candidates.iter().cloned())
        .find(|path| path.is_file())
}

/// Execute the locate stage.
pub fn execute(
    workspace_root: &Path,
    explicit_config: Option<&Path>,
    explicit_owners: Option<&Path>,
) -> ConfigLocations {
    let locations = ConfigLocations {
        config: first_existing(
            explicit_config,
            &defaults::config_search_paths(workspace_root),
        ),
        owners: first_existing(
            explicit_owners,
            &defaults::owners_search_paths(workspace_root),
        ),
    };
    log::debug!("Configuration locations: {:?}", locations);
    locations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_nothing_found() {
        let temp = TempDir::new().unwrap();
        let locations = execute(temp.path(), None, None);
        assert!(!locations.is_complete());
        assert_eq!(
            locations.missing(),
            vec!["insights.config.json", "backstage-nx-owners-mapping.yml"]
        );
    }

    #[test]
    fn test_default_locations() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join(".backstage-insights/insights.config.json");
        let owners = temp
            .path()
            .join(".backstage-insights/backstage-nx-owners-mapping.yml");
        touch(&config);
        touch(&owners);

        let locations = execute(temp.path(), None, None);
        assert!(locations.is_complete());
        assert_eq!(locations.config, Some(config));
        assert_eq!(locations.owners, Some(owners));
    }

    #[test]
    fn test_config_dir_preferred_over_root() {
        let temp = TempDir::new().unwrap();
        let in_dir = temp.path().join(".backstage-insights/insights.config.json");
        let at_root = temp.path().join("insights.config.json");
        touch(&in_dir);
        touch(&at_root);

        assert_eq!(execute(temp.path(), None, None).config, Some(in_dir));
    }

    #[test]
    fn test_root_config_fallback() {
        let temp = TempDir::new().unwrap();
        let at_root = temp.path().join("insights.config.json");
        touch(&at_root);

        let locations = execute(temp.path(), None, None);
        assert_eq!(locations.config, Some(at_root));
        assert_eq!(locations.missing(), vec!["backstage-nx-owners-mapping.yml"]);
    }

    #[test]
    fn test_explicit_path_wins() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("custom/mappings.json");
        let default = temp.path().join("insights.config.json");
        touch(&explicit);
        touch(&default);

        let locations = execute(temp.path(), Some(&explicit), None);
        assert_eq!(locations.config, Some(explicit));
    }

    #[test]
    fn test_missing_explicit_path_falls_back() {
        let temp = TempDir::new().unwrap();
        let default = temp.path().join("insights.config.json");
        touch(&default);

        let missing = temp.path().join("nope.json");
        let locations = execute(temp.path(), Some(&missing), None);
        assert_eq!(locations.config, Some(default));
    }
}
