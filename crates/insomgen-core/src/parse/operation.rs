use indexmap::IndexMap;
use serde_yaml_ng::{Mapping, Value};

use super::document::scalar_to_string;

/// Path-item keys that are not operations.
pub const RESERVED_PATH_KEYS: &[&str] = &["parameters", "summary", "description"];

/// A parameter descriptor. Either field may be absent in a malformed or
/// `$ref`-only declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    pub name: Option<String>,
    /// The `in` field: `path`, `query`, `header` or `cookie`.
    pub location: Option<String>,
}

impl Parameter {
    pub fn is_path(&self) -> bool {
        self.location.as_deref() == Some("path")
    }

    fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_mapping()?;
        Some(Self {
            name: string_field(map, "name"),
            location: string_field(map, "in"),
        })
    }

    fn same_slot(&self, other: &Parameter) -> bool {
        self.name.is_some() && self.name == other.name && self.location == other.location
    }
}

/// One (path, method) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Method key as written in the document, e.g. `get`.
    pub method: String,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<Parameter>,
}

/// Project one path item into its operations, in document order.
///
/// Path-level `parameters` are shared by every operation; an operation-level
/// parameter with the same name and location replaces the shared one.
pub fn collect_path_item(path: &str, item: &Value) -> IndexMap<String, Operation> {
    let mut operations = IndexMap::new();
    let Some(item) = item.as_mapping() else {
        log::debug!("skipping path {path}: not a mapping");
        return operations;
    };

    let shared = parameter_list(item.get("parameters"));

    for (key, value) in item {
        let Some(method) = key.as_str() else {
            continue;
        };
        if RESERVED_PATH_KEYS.contains(&method) {
            continue;
        }
        let Some(op) = value.as_mapping() else {
            log::debug!("skipping {path} {method}: not an operation object");
            continue;
        };

        let mut parameters = parameter_list(op.get("parameters"));
        for param in &shared {
            if !parameters.iter().any(|p| p.same_slot(param)) {
                parameters.push(param.clone());
            }
        }

        operations.insert(
            method.to_string(),
            Operation {
                method: method.to_string(),
                path: path.to_string(),
                summary: string_field(op, "summary"),
                description: string_field(op, "description"),
                tags: string_list(op.get("tags")),
                parameters,
            },
        );
    }

    operations
}

fn string_field(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(scalar_to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_sequence)
        .map(|items| items.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

fn parameter_list(value: Option<&Value>) -> Vec<Parameter> {
    value
        .and_then(Value::as_sequence)
        .map(|items| items.iter().filter_map(Parameter::from_value).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(yaml: &str) -> Value {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_reserved_keys_are_not_operations() {
        let value = item(
            r#"
summary: Users
description: All users
parameters:
  - name: tenant
    in: header
get:
  summary: List users
post:
  tags: [users, admin]
"#,
        );
        let ops = collect_path_item("/users", &value);
        assert_eq!(ops.keys().collect::<Vec<_>>(), vec!["get", "post"]);
        assert_eq!(ops["get"].summary.as_deref(), Some("List users"));
        assert_eq!(ops["post"].tags, vec!["users", "admin"]);
        assert_eq!(ops["post"].path, "/users");
    }

    #[test]
    fn test_shared_parameters_are_merged() {
        let value = item(
            r#"
parameters:
  - name: id
    in: path
  - name: verbose
    in: query
get:
  parameters:
    - name: verbose
      in: query
      required: true
"#,
        );
        let ops = collect_path_item("/users/{id}", &value);
        let params = &ops["get"].parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name.as_deref(), Some("verbose"));
        assert!(params[1].is_path());
    }

    #[test]
    fn test_non_mapping_entries_are_skipped() {
        let value = item(
            r##"
servers:
  - url: https://other.example.com
$ref: "#/components/pathItems/Users"
get: {}
"##,
        );
        let ops = collect_path_item("/users", &value);
        assert_eq!(ops.len(), 1);
        assert!(ops["get"].summary.is_none());
        assert!(ops["get"].tags.is_empty());
    }

    #[test]
    fn test_non_string_tags_are_dropped() {
        let value = item("get:\n  tags: [users, 3, {a: b}]\n");
        let ops = collect_path_item("/users", &value);
        assert_eq!(ops["get"].tags, vec!["users"]);
    }

    #[test]
    fn test_parameter_without_name_is_kept_unnamed() {
        let value = item("get:\n  parameters:\n    - $ref: '#/components/parameters/Id'\n");
        let ops = collect_path_item("/users", &value);
        assert_eq!(ops["get"].parameters, vec![Parameter::default()]);
    }
}
