use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_yaml_ng::Value;

use super::operation::Operation;

/// Info object describing the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Info {
    #[serde(deserialize_with = "scalar_string")]
    pub title: String,

    #[serde(deserialize_with = "optional_scalar_string")]
    pub description: Option<String>,

    #[serde(deserialize_with = "scalar_string")]
    pub version: String,

    pub contact: Option<Contact>,
}

/// Contact information.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "optional_scalar_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "optional_scalar_string")]
    pub email: Option<String>,
}

/// A server URL definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Server {
    #[serde(deserialize_with = "scalar_string")]
    pub url: String,

    #[serde(deserialize_with = "optional_scalar_string")]
    pub description: Option<String>,
}

/// Tag definition from the top-level registry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tag {
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(deserialize_with = "optional_scalar_string")]
    pub description: Option<String>,
}

/// The document root as far as serde can type it. `paths` stays generic so
/// path items of any shape are tolerated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawDocument {
    #[serde(deserialize_with = "optional_scalar_string")]
    pub openapi: Option<String>,
    #[serde(deserialize_with = "optional_scalar_string")]
    pub swagger: Option<String>,
    pub info: Info,
    pub servers: Vec<Server>,
    pub paths: IndexMap<String, Value>,
    pub tags: Vec<Tag>,
}

/// Typed view of the fields the converter consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDocument {
    /// The `openapi` marker, or the legacy `swagger` one.
    pub version_marker: Option<String>,
    pub info: Info,
    pub servers: Vec<Server>,
    /// Path template -> method -> operation, in document order.
    pub paths: IndexMap<String, IndexMap<String, Operation>>,
    pub tags: Vec<Tag>,
}

impl SourceDocument {
    /// Number of (path, method) pairs.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }
}

/// Render a YAML scalar as text: strings as-is, numbers and booleans through
/// their display form. `null` and collections yield `None`.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_scalar_string(deserializer)?.unwrap_or_default())
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_version_is_kept_as_text() {
        let info: Info = serde_yaml_ng::from_str("title: Shop\nversion: 2\n").unwrap();
        assert_eq!(info.title, "Shop");
        assert_eq!(info.version, "2");
        assert!(info.description.is_none());
    }

    #[test]
    fn test_server_tolerates_unknown_fields() {
        let yaml = "url: https://api.example.com\nvariables:\n  region:\n    default: eu\n";
        let server: Server = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(server.url, "https://api.example.com");
        assert!(server.description.is_none());
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(
            scalar_to_string(&Value::String("a".into())),
            Some("a".to_string())
        );
        assert_eq!(scalar_to_string(&Value::Bool(true)), Some("true".to_string()));
        assert_eq!(scalar_to_string(&Value::Null), None);
        assert_eq!(scalar_to_string(&Value::Sequence(vec![])), None);
    }
}
