//! # Field-Mapping Configuration
//!
//! This module defines the data structures behind `insights.config.json`,
//! the file that tells the generator how to fill in each field of a
//! component entity, and the logic for parsing it.
//!
//! ## Format
//!
//! ```json
//! {
//!   "mappings": {
//!     "apiVersion": { "resolverKind": "static", "key": "backstage.io/v1alpha1" },
//!     "metadata.name": { "resolverKind": "graph", "key": "name" },
//!     "spec.owner": { "resolverKind": "localMetadata", "key": "owners" },
//!     "metadata.annotations[\"nx.dev/source\"]": {
//!       "resolverKind": "composite",
//!       "parts": [
//!         { "resolverKind": "repositorySlug" },
//!         { "resolverKind": "graph", "key": "root" }
//!       ],
//!       "separator": "/"
//!     }
//!   }
//! }
//! ```
//!
//! The keys of `mappings` are key paths into the output entity (see
//! [`crate::entity::parse_key_path`]). Declaration order is preserved, so
//! when two keys address the same field (`spec.owner` and `spec["owner"]`)
//! the later one wins. Duplicate JSON keys are rejected by the parser.
//!
//! The older spelling used by the Nx plugin is accepted as well:
//! `provider`/`value`/`values` for `resolverKind`/`key`/`parts`, and the kind
//! names `nxGraph`, `projectJson` and `git` for `graph`, `localMetadata` and
//! `repositorySlug`.

use serde_json::Value as JsonValue;
use serde_yaml::{Mapping, Value as YamlValue};
use std::fmt;

use crate::error::{Error, Result};

/// Selects how a field's value is computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolverKind {
    /// The mapping's key is the literal value.
    Static,
    /// A property of the project's graph node.
    Graph,
    /// A property of the project's `project.json`.
    LocalMetadata,
    /// The `org/repo` slug of the repository's origin remote.
    RepositorySlug,
    /// Several graph/slug values joined with a separator.
    Composite,
    /// A kind this version does not know. Mappings using it are skipped.
    Unknown(String),
}

impl ResolverKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResolverKind::Static => "static",
            ResolverKind::Graph => "graph",
            ResolverKind::LocalMetadata => "localMetadata",
            ResolverKind::RepositorySlug => "repositorySlug",
            ResolverKind::Composite => "composite",
            ResolverKind::Unknown(name) => name,
        }
    }

    /// Whether a value mapping of this kind needs a `key`.
    fn requires_key(&self) -> bool {
        matches!(
            self,
            ResolverKind::Static | ResolverKind::Graph | ResolverKind::LocalMetadata
        )
    }
}

impl From<String> for ResolverKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "static" => ResolverKind::Static,
            "graph" | "nxGraph" => ResolverKind::Graph,
            "localMetadata" | "projectJson" => ResolverKind::LocalMetadata,
            "repositorySlug" | "git" => ResolverKind::RepositorySlug,
            "composite" => ResolverKind::Composite,
            _ => ResolverKind::Unknown(name),
        }
    }
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `{ resolverKind, key }` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMapping {
    pub kind: ResolverKind,
    /// Resolver-specific key. For `static` this is the literal value; for
    /// `repositorySlug` it is ignored and may be empty.
    pub key: String,
    /// A number or boolean given as a `static` key, emitted with its type.
    pub literal: Option<JsonValue>,
}

impl ValueMapping {
    pub fn new(kind: ResolverKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            literal: None,
        }
    }

    /// A `static` mapping whose value is a non-string scalar.
    pub fn literal(value: JsonValue) -> Self {
        let key = match &value {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            kind: ResolverKind::Static,
            key,
            literal: Some(value),
        }
    }
}

/// A `composite` mapping: parts resolved independently and joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeMapping {
    pub parts: Vec<ValueMapping>,
    pub separator: String,
}

/// How one entity field is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMapping {
    Value(ValueMapping),
    Composite(CompositeMapping),
}

impl FieldMapping {
    pub fn kind(&self) -> &ResolverKind {
        match self {
            FieldMapping::Value(mapping) => &mapping.kind,
            FieldMapping::Composite(_) => &ResolverKind::Composite,
        }
    }
}

/// The parsed contents of `insights.config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightsConfig {
    /// `(key path, mapping)` pairs in declaration order.
    pub mappings: Vec<(String, FieldMapping)>,
}

impl InsightsConfig {
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// The mapping declared for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&FieldMapping> {
        self.mappings
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, m)| m)
    }
}

/// Parse the JSON text of a field-mapping configuration.
///
/// The document is read into an insertion-ordered YAML value first so that
/// the declaration order of `mappings` survives.
pub fn parse(json_content: &str) -> Result<InsightsConfig> {
    let root: YamlValue = serde_json::from_str(json_content)?;

    let YamlValue::Mapping(mut root) = root else {
        return Err(Error::ConfigParse {
            message: "Expected a JSON object at the top level".to_string(),
            hint: Some("The file should look like { \"mappings\": { ... } }".to_string()),
        });
    };

    let mappings = match root.remove("mappings") {
        Some(YamlValue::Mapping(map)) => map,
        Some(YamlValue::Null) | None => {
            return Err(Error::ConfigParse {
                message: "Missing 'mappings' object".to_string(),
                hint: Some("Run 'backstage-insights init' to generate a default configuration".to_string()),
            });
        }
        Some(_) => {
            return Err(Error::ConfigParse {
                message: "'mappings' must be an object keyed by entity path".to_string(),
                hint: None,
            });
        }
    };

    let mut parsed = Vec::with_capacity(mappings.len());
    for (key, value) in mappings {
        let path = key.as_str().ok_or_else(|| Error::ConfigParse {
            message: format!("Mapping key must be a string, found {:?}", key),
            hint: None,
        })?;
        let mapping = convert_field_mapping(path, value)?;
        parsed.push((path.to_string(), mapping));
    }

    Ok(InsightsConfig { mappings: parsed })
}

/// Read and parse a configuration file.
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<InsightsConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Remove the first of `names` present in `map`.
fn take_field(map: &mut Mapping, names: &[&str]) -> Option<YamlValue> {
    names.iter().find_map(|name| map.remove(*name))
}

/// Numbers and booleans as JSON values.
fn scalar_literal(value: &YamlValue) -> Option<JsonValue> {
    match value {
        YamlValue::Bool(b) => Some(JsonValue::Bool(*b)),
        YamlValue::Number(n) => n
            .as_i64()
            .map(JsonValue::from)
            .or_else(|| n.as_u64().map(JsonValue::from))
            .or_else(|| {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsonValue::Number)
            }),
        _ => None,
    }
}

/// Scalars become their string form; anything else is rejected.
fn scalar_to_string(value: YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn convert_value_mapping(path: &str, value: YamlValue) -> Result<ValueMapping> {
    let YamlValue::Mapping(mut map) = value else {
        return Err(Error::ConfigParse {
            message: format!("Mapping for '{}' must be an object", path),
            hint: None,
        });
    };

    let kind = take_field(&mut map, &["resolverKind", "provider"])
        .and_then(scalar_to_string)
        .map(ResolverKind::from)
        .ok_or_else(|| Error::ConfigParse {
            message: format!("Mapping for '{}' has no 'resolverKind'", path),
            hint: Some("Use one of: static, graph, localMetadata, repositorySlug, composite".to_string()),
        })?;

    let raw_key = take_field(&mut map, &["key", "value"]);
    let literal = match (&kind, &raw_key) {
        (ResolverKind::Static, Some(raw)) => scalar_literal(raw),
        _ => None,
    };

    let key = match raw_key {
        Some(raw) => scalar_to_string(raw).ok_or_else(|| Error::ConfigParse {
            message: format!("The 'key' of the mapping for '{}' must be a string", path),
            hint: None,
        })?,
        None if kind.requires_key() => {
            return Err(Error::ConfigParse {
                message: format!("Mapping for '{}' ({}) has no 'key'", path, kind),
                hint: None,
            });
        }
        None => String::new(),
    };

    Ok(ValueMapping { kind, key, literal })
}

fn convert_field_mapping(path: &str, value: YamlValue) -> Result<FieldMapping> {
    let is_composite = value
        .as_mapping()
        .and_then(|map| map.get("resolverKind").or_else(|| map.get("provider")))
        .and_then(YamlValue::as_str)
        == Some("composite");

    if !is_composite {
        return convert_value_mapping(path, value).map(FieldMapping::Value);
    }

    let YamlValue::Mapping(mut map) = value else {
        unreachable!("composite detection requires a mapping");
    };

    let parts = match take_field(&mut map, &["parts", "values"]) {
        Some(YamlValue::Sequence(items)) => items
            .into_iter()
            .map(|item| convert_value_mapping(path, item))
            .collect::<Result<Vec<_>>>()?,
        _ => {
            return Err(Error::ConfigParse {
                message: format!("Composite mapping for '{}' needs a 'parts' list", path),
                hint: None,
            });
        }
    };

    let separator = take_field(&mut map, &["separator"])
        .and_then(scalar_to_string)
        .ok_or_else(|| Error::ConfigParse {
            message: format!("Composite mapping for '{}' has no 'separator'", path),
            hint: Some("Add \"separator\": \"/\" (or \"\" to concatenate)".to_string()),
        })?;

    Ok(FieldMapping::Composite(CompositeMapping { parts, separator }))
}
