//! Emit: serialize entity lists and write the catalog files.
//!
//! Each entity is serialized on its own and the documents are joined with a
//! `---` separator line, giving a multi-document YAML stream that Backstage
//! reads as a list of entities. Groups and components are emitted separately
//! into `ownership.yaml` and `catalog-info.yaml`.

use serde::Deserialize;
use serde_yaml::Value as YamlValue;
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults::{CATALOG_OUTPUT, OWNERSHIP_OUTPUT};
use crate::diagnostics::Diagnostics;
use crate::entity::Entity;
use crate::error::{Error, Result};

/// Line separating two documents in the emitted stream.
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Serialize entities into one multi-document YAML string, in order.
pub fn emit(entities: &[Entity]) -> Result<String> {
    let documents = entities
        .iter()
        .map(|entity| {
            serde_yaml::to_string(entity).map_err(|e| Error::Serialization {
                message: format!(
                    "Failed to serialize entity '{}': {}",
                    entity.name().unwrap_or("<unnamed>"),
                    e
                ),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(documents.join(DOCUMENT_SEPARATOR))
}

/// Parse a multi-document YAML stream back into entities.
///
/// Empty documents are dropped.
pub fn parse_documents(text: &str) -> Result<Vec<Entity>> {
    let mut entities = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = YamlValue::deserialize(document)?;
        if !value.is_null() {
            entities.push(Entity::from(value));
        }
    }
    Ok(entities)
}

/// Write the group entities to `<dir>/ownership.yaml`.
pub fn write_ownership_file(
    dir: &Path,
    groups: &[Entity],
    diagnostics: &dyn Diagnostics,
) -> Result<PathBuf> {
    write_documents(dir, OWNERSHIP_OUTPUT, groups, "groups", diagnostics)
}

/// Write the component entities to `<dir>/catalog-info.yaml`.
pub fn write_catalog_file(
    dir: &Path,
    components: &[Entity],
    diagnostics: &dyn Diagnostics,
) -> Result<PathBuf> {
    write_documents(dir, CATALOG_OUTPUT, components, "components", diagnostics)
}

fn write_documents(
    dir: &Path,
    file_name: &str,
    entities: &[Entity],
    noun: &str,
    diagnostics: &dyn Diagnostics,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, emit(entities)?)?;
    diagnostics.info(&format!(
        "Generated {} with {} {}.",
        file_name,
        entities.len(),
        noun
    ));
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Level, MemoryDiagnostics};
    use crate::owners::{synthesize_groups, OwnerRecord, OwnerTable};
    use tempfile::TempDir;

    fn component(name: &str) -> Entity {
        let mut entity = Entity::new();
        entity.set("apiVersion", "backstage.io/v1alpha1").unwrap();
        entity.set("kind", "Component").unwrap();
        entity.set("metadata.name", name).unwrap();
        entity
            .set("metadata.annotations[\"github.com/project-slug\"]", "acme/shop")
            .unwrap();
        entity.set("spec.owner", "backstage-team-a").unwrap();
        entity
            .set(
                "spec.dependsOn",
                YamlValue::Sequence(vec![YamlValue::String("component:lib-b".to_string())]),
            )
            .unwrap();
        entity
    }

    #[test]
    fn test_emit_group_document() {
        let table = OwnerTable::new(vec![OwnerRecord::new("team-b", "platform")]);
        let groups = synthesize_groups(&table).unwrap();
        insta::assert_snapshot!(emit(&groups).unwrap(), @r"
        apiVersion: backstage.io/v1alpha1
        kind: Group
        metadata:
          name: platform
          description: The platform team
        spec:
          type: team
          children: []
        ");
    }

    #[test]
    fn test_emit_joins_with_separator() {
        let text = emit(&[component("storefront"), component("lib-b")]).unwrap();
        assert_eq!(text.matches("\n---\n").count(), 1);
        assert!(text.starts_with("apiVersion:"));
        assert!(!text.ends_with("---\n"));
    }

    #[test]
    fn test_emit_empty_list() {
        assert_eq!(emit(&[]).unwrap(), "");
        assert!(parse_documents("").unwrap().is_empty());
    }

    #[test]
    fn test_emit_then_parse_round_trip() {
        let entities = vec![component("storefront"), component("lib-b")];
        let parsed = parse_documents(&emit(&entities).unwrap()).unwrap();
        assert_eq!(parsed, entities);
    }

    #[test]
    fn test_parse_documents_skips_empty_documents() {
        let parsed = parse_documents("---\nkind: Group\n---\n---\nkind: Component\n").unwrap();
        let kinds: Vec<_> = parsed.iter().filter_map(|e| e.get_str("kind")).collect();
        assert_eq!(kinds, vec!["Group", "Component"]);
    }

    #[test]
    fn test_write_files() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("catalog");
        let diag = MemoryDiagnostics::new();

        let groups = synthesize_groups(&OwnerTable::new(vec![
            OwnerRecord::new("team-a", "backstage-team-a"),
            OwnerRecord::new("team-b", "platform"),
        ]))
        .unwrap();
        let ownership = write_ownership_file(&out, &groups, &diag).unwrap();
        let catalog = write_catalog_file(&out, &[component("storefront")], &diag).unwrap();

        assert_eq!(ownership, out.join("ownership.yaml"));
        assert_eq!(catalog, out.join("catalog-info.yaml"));
        assert_eq!(
            parse_documents(&fs::read_to_string(&ownership).unwrap())
                .unwrap()
                .len(),
            2
        );
        assert!(diag.contains(Level::Info, "Generated ownership.yaml with 2 groups."));
        assert!(diag.contains(Level::Info, "Generated catalog-info.yaml with 1 components."));
    }
}
