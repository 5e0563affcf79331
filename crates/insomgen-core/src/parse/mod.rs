pub mod document;
pub mod operation;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml_ng::Value;

use crate::error::ParseError;
use document::{RawDocument, SourceDocument, scalar_to_string};
use operation::collect_path_item;

/// A source document parsed once: the lossless generic tree plus the typed
/// projection computed from it.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub tree: Value,
    pub document: SourceDocument,
}

/// Parse an OpenAPI or Swagger document from YAML (JSON is accepted too).
pub fn from_str(input: &str) -> Result<ParsedDocument, ParseError> {
    let tree: Value = serde_yaml_ng::from_str(input)?;
    let mut document = project(&tree)?;
    respell_numbers(input, &tree, &mut document);
    Ok(ParsedDocument { tree, document })
}

/// The naming scalars read as raw source text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NamingText {
    openapi: Option<String>,
    swagger: Option<String>,
    info: Option<InfoText>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InfoText {
    title: Option<String>,
    version: Option<String>,
}

/// Numbers in the tree are normalized (`1.10` becomes `1.1`), so numeric
/// title, version and marker values take their spelling from the source.
fn respell_numbers(input: &str, tree: &Value, document: &mut SourceDocument) {
    let Ok(text) = serde_yaml_ng::from_str::<NamingText>(input) else {
        return;
    };
    let info = text.info.unwrap_or_default();

    if tree["info"]["title"].is_number() {
        if let Some(title) = info.title {
            document.info.title = title;
        }
    }
    if tree["info"]["version"].is_number() {
        if let Some(version) = info.version {
            document.info.version = version;
        }
    }

    let marker = if tree["openapi"].is_number() {
        text.openapi
    } else if scalar_to_string(&tree["openapi"]).is_none() && tree["swagger"].is_number() {
        text.swagger
    } else {
        None
    };
    if marker.is_some() {
        document.version_marker = marker;
    }
}

/// Compute the typed view of an already parsed tree.
pub fn project(tree: &Value) -> Result<SourceDocument, ParseError> {
    if !tree.is_mapping() {
        return Err(ParseError::NotAMapping);
    }
    let raw = RawDocument::deserialize(tree)?;

    let paths: IndexMap<_, _> = raw
        .paths
        .iter()
        .map(|(path, item)| (path.clone(), collect_path_item(path, item)))
        .collect();

    Ok(SourceDocument {
        version_marker: raw.openapi.or(raw.swagger),
        info: raw.info,
        servers: raw.servers,
        paths,
        tags: raw.tags,
    })
}
