//! The Insomnia v5 workspace document and its YAML encoding.
//!
//! Field presence follows the format's defaults: an empty description, a
//! `false` private flag and a zero sort key are omitted; everything else is
//! always written.

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

/// Root type marker of every generated document.
pub const SCHEMA_VERSION: &str = "spec.insomnia.rest/5.0";

/// Folder name for operations without tags.
pub const DEFAULT_FOLDER: &str = "default";

pub const COOKIE_JAR_NAME: &str = "Default Jar";

pub const BASE_ENVIRONMENT_NAME: &str = "Base Environment";

/// The base environment's URL, composed from the sub-environment variables.
pub const BASE_URL_TEMPLATE: &str = "{{ _.scheme }}://{{ _.host }}{{ _.base_path }}";

/// Top-level Insomnia workspace export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsomniaExport {
    #[serde(rename = "type")]
    pub schema: String,
    pub name: String,
    pub meta: Meta,
    #[serde(default)]
    pub collection: Vec<Folder>,
    pub cookie_jar: CookieJar,
    pub environments: Environments,
    pub spec: SpecContainer,
}

/// Metadata shared by every entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub id: String,
    pub created: i64,
    pub modified: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sort_key: i64,
}

/// A tag folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub meta: Meta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Request>,
}

/// One request, built from one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub url: String,
    pub name: String,
    pub meta: Meta,
    pub method: String,
    pub settings: RequestSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSettings {
    pub render_request_body: bool,
    pub encode_url: bool,
    pub follow_redirects: String,
    pub cookies: CookieSettings,
    pub rebuild_path: bool,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            render_request_body: true,
            encode_url: true,
            follow_redirects: "global".to_string(),
            cookies: CookieSettings {
                send: true,
                store: true,
            },
            rebuild_path: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieSettings {
    pub send: bool,
    pub store: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieJar {
    pub name: String,
    pub meta: Meta,
}

/// The base environment with one sub-environment per declared server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environments {
    pub name: String,
    pub meta: Meta,
    pub data: BaseEnvironmentData,
    pub sub_environments: Vec<SubEnvironment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEnvironmentData {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEnvironment {
    pub name: String,
    pub meta: Meta,
    pub data: SubEnvironmentData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEnvironmentData {
    pub scheme: String,
    pub base_path: String,
    pub host: String,
}

/// The source document, embedded unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecContainer {
    pub contents: Value,
    pub meta: Meta,
}

/// Encode a workspace as YAML.
pub fn to_yaml(export: &InsomniaExport) -> Result<String, serde_yaml_ng::Error> {
    serde_yaml_ng::to_string(export)
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_omits_defaults() {
        let meta = Meta {
            id: "fld_1".to_string(),
            created: 10,
            modified: 11,
            ..Meta::default()
        };
        let yaml = serde_yaml_ng::to_string(&meta).unwrap();
        assert_eq!(yaml, "id: fld_1\ncreated: 10\nmodified: 11\n");
    }

    #[test]
    fn test_meta_writes_set_fields_in_camel_case() {
        let meta = Meta {
            id: "req_1".to_string(),
            created: 1,
            modified: 1,
            description: "Lists users".to_string(),
            is_private: true,
            sort_key: -5,
        };
        let yaml = serde_yaml_ng::to_string(&meta).unwrap();
        assert!(yaml.contains("description: Lists users\n"));
        assert!(yaml.contains("isPrivate: true\n"));
        assert!(yaml.contains("sortKey: -5\n"));
    }

    #[test]
    fn test_request_settings_encoding() {
        let yaml = serde_yaml_ng::to_string(&RequestSettings::default()).unwrap();
        assert_eq!(
            yaml,
            "renderRequestBody: true\nencodeUrl: true\nfollowRedirects: global\ncookies:\n  send: true\n  store: true\nrebuildPath: true\n"
        );
    }
}
