//! Property tables loaded from YAML or JSON.
//!
//! A table maps property names to entries:
//!
//! ```yaml
//! owner:
//!   path: [labels, owner]
//!   doc: Team that owns the resource
//! image:
//!   path: spec.containers[0].image
//!   set: false
//!   delete: false
//! ```
//!
//! `path` accepts a segment list or the textual path syntax. `get`, `set`
//! and `delete` default to `true`. Entries keep their file order, and a name
//! that appears twice is reported when the schema is built.

use crate::container::Subscript;
use crate::errors::ConfigError;
use crate::path::Path;
use crate::property::PropertySpec;
use crate::schema::{Schema, SchemaBuilder};
use crate::value::Value;
use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::sync::Arc;

fn enabled() -> bool {
    true
}

/// One property as written in a table file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyEntry {
    pub path: Path,
    #[serde(default = "enabled")]
    pub get: bool,
    #[serde(default = "enabled")]
    pub set: bool,
    #[serde(default = "enabled")]
    pub delete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl PropertyEntry {
    pub fn to_spec<C>(&self) -> PropertySpec<C> {
        let spec = PropertySpec::new(self.path.clone())
            .get(self.get)
            .set(self.set)
            .delete(self.delete);
        match &self.doc {
            Some(doc) => spec.doc(doc.clone()),
            None => spec,
        }
    }
}

/// An ordered table of named property entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyTable {
    entries: Vec<(String, PropertyEntry)>,
}

impl PropertyTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: PropertyEntry) {
        self.entries.push((name.into(), entry));
    }

    /// Registers every entry on a fresh builder.
    pub fn to_builder<C>(&self, type_name: &str) -> SchemaBuilder<C> {
        SchemaBuilder::new(type_name).properties(
            self.entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.to_spec())),
        )
    }

    /// Builds the table into a schema for any container type.
    pub fn build<C: Subscript + Clone>(&self, type_name: &str) -> Result<Arc<Schema<C>>, ConfigError> {
        Ok(self.to_builder(type_name).build()?)
    }
}

impl<'de> Deserialize<'de> for PropertyTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = PropertyTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map of property names to property entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PropertyTable, A::Error> {
                let mut table = PropertyTable::default();
                while let Some((name, entry)) = map.next_entry::<String, PropertyEntry>()? {
                    table.insert(name, entry);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

// ============================================================================
// FORMATS AND LOADING
// ============================================================================

/// File formats understood by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &std::path::Path) -> Result<Format, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(ConfigError::UnsupportedFormat { extension }),
        }
    }
}

pub fn parse_yaml(text: &str) -> Result<PropertyTable, ConfigError> {
    Ok(serde_yaml::from_str(text)?)
}

pub fn parse_json(text: &str) -> Result<PropertyTable, ConfigError> {
    Ok(serde_json::from_str(text)?)
}

fn read(path: &std::path::Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a property table, choosing the parser from the file extension.
pub fn load_table(path: &std::path::Path) -> Result<PropertyTable, ConfigError> {
    let format = Format::from_path(path)?;
    let text = read(path)?;
    let table = match format {
        Format::Json => parse_json(&text)?,
        Format::Yaml => parse_yaml(&text)?,
    };
    debug!("loaded {} properties from {}", table.len(), path.display());
    Ok(table)
}

/// Loads a data document to wrap.
pub fn load_document(path: &std::path::Path) -> Result<Value, ConfigError> {
    let format = Format::from_path(path)?;
    let text = read(path)?;
    match format {
        Format::Json => Ok(serde_json::from_str(&text)?),
        Format::Yaml => Ok(serde_yaml::from_str(&text)?),
    }
}

/// Renders a document back in the given format.
pub fn render_document(value: &Value, format: Format) -> Result<String, ConfigError> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(value)?),
        Format::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    const TABLE: &str = r#"
owner:
  path: [labels, owner]
  doc: Team that owns the resource
image:
  path: spec.containers[0].image
  set: false
  delete: false
"#;

    #[test]
    fn yaml_entries_keep_file_order_and_defaults() {
        let table = parse_yaml(TABLE).unwrap();
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["owner", "image"]);

        let (_, owner) = table.iter().next().unwrap();
        assert_eq!(owner.path, path!["labels", "owner"]);
        assert!(owner.get && owner.set && owner.delete);

        let (_, image) = table.iter().nth(1).unwrap();
        assert_eq!(image.path, path!["spec", "containers", 0, "image"]);
        assert!(!image.set && !image.delete);
    }

    #[test]
    fn json_tables_build_schemas() {
        let table = parse_json(r#"{"owner": {"path": ["labels", "owner"], "delete": false}}"#).unwrap();
        let schema = table.build::<Value>("Resource").unwrap();
        let owner = schema.property("owner").unwrap();
        assert!(!owner.allows(crate::property::Operation::Delete));
    }

    #[test]
    fn json_duplicate_names_fail_at_build() {
        let table = parse_json(r#"{"a": {"path": ["x"]}, "a": {"path": ["y"]}}"#).unwrap();
        let err = table.build::<Value>("T").unwrap_err();
        assert!(matches!(err, ConfigError::Schema(e) if e.is_configuration()));
    }

    #[test]
    fn rejects_unknown_fields_and_bad_paths() {
        assert!(parse_yaml("a:\n  path: [x]\n  fget: true\n").is_err());
        assert!(parse_yaml("a:\n  path: 'x..y'\n").is_err());
    }

    #[test]
    fn empty_path_in_table_fails_at_build() {
        let table = parse_yaml("a:\n  path: []\n").unwrap();
        assert!(table.build::<serde_json::Value>("T").is_err());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::from_path(std::path::Path::new("a.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(std::path::Path::new("a.json")).unwrap(), Format::Json);
        assert!(Format::from_path(std::path::Path::new("a.toml")).is_err());
    }
}
