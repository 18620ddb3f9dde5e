//! Catalog entities and key-path assignment
//!
//! An [`Entity`] is a nested YAML record (`apiVersion`, `kind`, `metadata`,
//! `spec`, ...) assembled field by field from the mapping configuration.
//! Fields are addressed with key paths such as `spec.owner` or
//! `metadata.annotations["github.com/project-slug"]`.
//!
//! Mappings keep insertion order, so an entity serializes its fields in the
//! order they were first assigned.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};

/// A segment of a key path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A named key for accessing mapping members
    Key(String),
    /// A numeric index for accessing sequence elements
    Index(usize),
}

/// Parse a key path into segments.
///
/// Supports:
/// - Dot notation: `spec.owner`
/// - Quoted bracket keys: `metadata.annotations["github.com/project-slug"]`
/// - Array indices: `spec.tags[0]`
/// - Escaped characters: `foo\.bar` (literal dot)
///
/// # Examples
///
/// ```
/// use backstage_insights::entity::{parse_key_path, PathSegment};
///
/// let segments = parse_key_path(r#"metadata.annotations["backstage.io/source"]"#);
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[2], PathSegment::Key("backstage.io/source".to_string()));
/// ```
pub fn parse_key_path(path: &str) -> Vec<PathSegment> {
    if path.trim().is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }

        match ch {
            '\\' => escaped = true,
            '.' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current)));
                }

                match chars.peek().copied() {
                    Some(quote @ ('"' | '\'')) => {
                        chars.next();
                        let mut key = String::new();
                        let mut key_escaped = false;
                        while let Some(ch) = chars.next() {
                            if key_escaped {
                                key.push(ch);
                                key_escaped = false;
                            } else if ch == '\\' {
                                key_escaped = true;
                            } else if ch == quote && chars.peek() == Some(&']') {
                                chars.next();
                                break;
                            } else {
                                key.push(ch);
                            }
                        }
                        segments.push(PathSegment::Key(key));
                    }
                    _ => {
                        let mut content = String::new();
                        for next in chars.by_ref() {
                            if next == ']' {
                                break;
                            }
                            content.push(next);
                        }
                        let content = content.trim();
                        if let Ok(idx) = content.parse::<usize>() {
                            segments.push(PathSegment::Index(idx));
                        } else if !content.is_empty() {
                            segments.push(PathSegment::Key(content.to_string()));
                        }
                    }
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(PathSegment::Key(current));
    }

    segments
}

/// Largest sequence index a key path may address.
pub const MAX_INDEX: usize = 1024;

/// Walk `value` along `path`, creating intermediate containers as needed,
/// and return the slot at the end of the path.
///
/// A scalar standing where a container is needed is replaced by an empty
/// container of the required shape. Indices must not exceed [`MAX_INDEX`].
fn slot_for<'a>(value: &'a mut YamlValue, path: &[PathSegment]) -> &'a mut YamlValue {
    let mut current = value;
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !current.is_mapping() {
                    *current = YamlValue::Mapping(Mapping::new());
                }
                let YamlValue::Mapping(map) = current else {
                    unreachable!("slot was just made a mapping");
                };
                current = map
                    .entry(YamlValue::String(key.clone()))
                    .or_insert(YamlValue::Null);
            }
            PathSegment::Index(idx) => {
                if !current.is_sequence() {
                    *current = YamlValue::Sequence(Vec::new());
                }
                let YamlValue::Sequence(seq) = current else {
                    unreachable!("slot was just made a sequence");
                };
                if seq.len() <= *idx {
                    seq.resize(*idx + 1, YamlValue::Null);
                }
                current = &mut seq[*idx];
            }
        }
    }
    current
}

/// Read the value at `path` inside any YAML value.
pub fn lookup<'a>(value: &'a YamlValue, path: &[PathSegment]) -> Option<&'a YamlValue> {
    path.iter().try_fold(value, |current, segment| match segment {
        PathSegment::Key(key) => current.as_mapping()?.get(key.as_str()),
        PathSegment::Index(idx) => current.as_sequence()?.get(*idx),
    })
}

/// A catalog entity under construction or ready for emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(YamlValue);

impl Entity {
    /// An entity with no fields.
    pub fn new() -> Self {
        Self(YamlValue::Mapping(Mapping::new()))
    }

    /// Assign `value` at the key path `path`, overwriting whatever was there.
    pub fn set(&mut self, path: &str, value: impl Into<YamlValue>) -> Result<()> {
        let segments = parse_key_path(path);
        if segments.is_empty() {
            return Err(Error::KeyPath {
                path: path.to_string(),
                message: "key path is empty".to_string(),
            });
        }
        if let Some(idx) = segments.iter().find_map(|segment| match segment {
            PathSegment::Index(idx) if *idx > MAX_INDEX => Some(*idx),
            _ => None,
        }) {
            return Err(Error::KeyPath {
                path: path.to_string(),
                message: format!("index {} is out of range (maximum {})", idx, MAX_INDEX),
            });
        }
        *slot_for(&mut self.0, &segments) = value.into();
        Ok(())
    }

    /// The value at the key path `path`, if present.
    pub fn get(&self, path: &str) -> Option<&YamlValue> {
        lookup(&self.0, &parse_key_path(path))
    }

    /// The string at `path`, if present and a string.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(YamlValue::as_str)
    }

    /// Shorthand for `metadata.name`.
    pub fn name(&self) -> Option<&str> {
        self.get_str("metadata.name")
    }

    pub fn as_value(&self) -> &YamlValue {
        &self.0
    }

    pub fn into_value(self) -> YamlValue {
        self.0
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl From<YamlValue> for Entity {
    fn from(value: YamlValue) -> Self {
        Self(value)
    }
}
