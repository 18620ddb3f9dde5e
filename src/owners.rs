//! # Owner Table
//!
//! `backstage-nx-owners-mapping.yml` maps the owners named in each project's
//! `project.json` to Backstage groups:
//!
//! ```yaml
//! - nxOwner: team-a
//!   backstageOwner: backstage-team-a
//! - nxOwner: team-b
//!   backstageOwner: platform
//! ```
//!
//! The table decides which projects make it into the catalog (a project's
//! owner must be listed here) and which group entities are generated (one per
//! distinct Backstage group).
//!
//! When an internal owner is listed more than once, the first record wins.
//! [`OwnerTable::duplicate_owner_ids`] reports the shadowed ids so the run
//! can warn about them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::entity::Entity;
use crate::error::{Error, Result};

/// API version stamped on generated group entities.
pub const GROUP_API_VERSION: &str = "backstage.io/v1alpha1";

/// One row of the owner table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    /// Owner id as written in `project.json`.
    #[serde(rename = "nxOwner", alias = "internalOwnerId")]
    pub internal_owner_id: String,
    /// Backstage group the owner maps to.
    #[serde(rename = "backstageOwner", alias = "externalGroupId")]
    pub external_group_id: String,
}

impl OwnerRecord {
    pub fn new(internal_owner_id: impl Into<String>, external_group_id: impl Into<String>) -> Self {
        Self {
            internal_owner_id: internal_owner_id.into(),
            external_group_id: external_group_id.into(),
        }
    }
}

/// The ordered owner table with a first-match index.
#[derive(Debug, Clone, Default)]
pub struct OwnerTable {
    records: Vec<OwnerRecord>,
    index: HashMap<String, usize>,
}

impl OwnerTable {
    pub fn new(records: Vec<OwnerRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            index
                .entry(record.internal_owner_id.clone())
                .or_insert(position);
        }
        Self { records, index }
    }

    /// Parse the YAML text of an owner table.
    ///
    /// An empty document or `null` is an empty table.
    pub fn parse(yaml_content: &str) -> Result<Self> {
        let records: Option<Vec<OwnerRecord>> =
            serde_yaml::from_str(yaml_content).map_err(|e| Error::OwnerTable {
                message: e.to_string(),
                hint: Some(
                    "Each entry needs an 'nxOwner' and a 'backstageOwner' field".to_string(),
                ),
            })?;
        Ok(Self::new(records.unwrap_or_default()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::parse(&content)
    }

    pub fn records(&self) -> &[OwnerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Map an internal owner id to its Backstage group.
    ///
    /// Returns the group of the first matching record, or `None` when the
    /// owner is not listed.
    ///
    /// # Examples
    ///
    /// ```
    /// use backstage_insights::owners::{OwnerRecord, OwnerTable};
    ///
    /// let table = OwnerTable::new(vec![
    ///     OwnerRecord::new("team-a", "backstage-team-a"),
    ///     OwnerRecord::new("team-a", "shadowed"),
    /// ]);
    /// assert_eq!(table.normalize("team-a"), Some("backstage-team-a"));
    /// assert_eq!(table.normalize("team-z"), None);
    /// ```
    pub fn normalize(&self, internal_owner_id: &str) -> Option<&str> {
        self.index
            .get(internal_owner_id)
            .map(|&position| self.records[position].external_group_id.as_str())
    }

    /// Internal owner ids listed more than once, in first-occurrence order.
    pub fn duplicate_owner_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for record in &self.records {
            let id = record.internal_owner_id.as_str();
            if !seen.insert(id) && reported.insert(id) {
                duplicates.push(id);
            }
        }
        duplicates
    }

    /// Distinct Backstage group ids in first-occurrence order.
    pub fn group_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|record| record.external_group_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Build one group entity per distinct Backstage group in the table.
///
/// The output follows first-occurrence order, so identical tables always
/// yield identical entity lists.
pub fn synthesize_groups(table: &OwnerTable) -> Result<Vec<Entity>> {
    table.group_ids().into_iter().map(group_entity).collect()
}

fn group_entity(group_id: &str) -> Result<Entity> {
    let mut entity = Entity::new();
    entity.set("apiVersion", GROUP_API_VERSION)?;
    entity.set("kind", "Group")?;
    entity.set("metadata.name", group_id)?;
    entity.set("metadata.description", format!("The {} team", group_id))?;
    entity.set("spec.type", "team")?;
    entity.set("spec.children", serde_yaml::Value::Sequence(Vec::new()))?;
    Ok(entity)
}
