use std::collections::HashMap;

use indexmap::IndexMap;

use crate::context::{EntityKind, GenerationContext};
use crate::export::{DEFAULT_FOLDER, Folder, Meta, Request, RequestSettings};
use crate::parse::document::SourceDocument;
use crate::parse::operation::Operation;

use super::url::build_url;

/// Processing order of methods within a path item. Any other key follows,
/// sorted lexicographically.
pub const METHOD_ORDER: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

const FOLDER_OFFSET: i64 = 5;
const REQUEST_OFFSET: i64 = 10;

/// Build one folder per first tag, each holding its requests.
///
/// Paths are visited in lexicographic order and methods in [`METHOD_ORDER`],
/// so identical input always yields the same folder and request order. Sort
/// keys count up from `-epoch`: one counter across all requests, a separate
/// one across folders in order of first appearance.
pub fn build_collection(doc: &SourceDocument, ctx: &GenerationContext) -> Vec<Folder> {
    let mut tag_descriptions: HashMap<&str, &str> = HashMap::new();
    for tag in &doc.tags {
        tag_descriptions.insert(&tag.name, tag.description.as_deref().unwrap_or_default());
    }

    let mut grouped: IndexMap<&str, Vec<Request>> = IndexMap::new();
    let mut sort_key = -ctx.epoch();

    for op in ordered_operations(doc) {
        let folder = op.tags.first().map(String::as_str).unwrap_or(DEFAULT_FOLDER);
        grouped
            .entry(folder)
            .or_default()
            .push(build_request(op, sort_key, ctx));
        sort_key += 1;
    }

    let mut folder_sort_key = -ctx.epoch();
    grouped
        .into_iter()
        .map(|(name, children)| {
            let description = match tag_descriptions.get(name) {
                Some(desc) if !desc.is_empty() => desc.to_string(),
                _ => format!("Operations related to {name}"),
            };
            let folder = Folder {
                name: name.to_string(),
                meta: Meta {
                    id: ctx.id(EntityKind::Folder),
                    created: ctx.at(FOLDER_OFFSET),
                    modified: ctx.at(FOLDER_OFFSET),
                    description,
                    sort_key: folder_sort_key,
                    ..Meta::default()
                },
                children,
            };
            folder_sort_key += 1;
            folder
        })
        .collect()
}

/// All operations of the document in processing order.
pub fn ordered_operations(doc: &SourceDocument) -> Vec<&Operation> {
    let mut paths: Vec<_> = doc.paths.iter().collect();
    paths.sort_by(|a, b| a.0.cmp(b.0));

    paths
        .into_iter()
        .flat_map(|(_, methods)| ordered_methods(methods))
        .collect()
}

fn ordered_methods(methods: &IndexMap<String, Operation>) -> Vec<&Operation> {
    let mut ops: Vec<&Operation> = METHOD_ORDER
        .iter()
        .filter_map(|m| methods.get(*m))
        .collect();

    let mut others: Vec<&Operation> = methods
        .iter()
        .filter(|(m, _)| !METHOD_ORDER.contains(&m.as_str()))
        .map(|(_, op)| op)
        .collect();
    others.sort_by(|a, b| a.method.cmp(&b.method));

    ops.extend(others);
    ops
}

fn build_request(op: &Operation, sort_key: i64, ctx: &GenerationContext) -> Request {
    let method = op.method.to_uppercase();
    let name = match op.summary.as_deref() {
        Some(summary) if !summary.is_empty() => summary.to_string(),
        _ => format!("{} {}", method, op.path),
    };

    Request {
        url: build_url(&op.path, &op.parameters),
        name,
        meta: Meta {
            id: ctx.id(EntityKind::Request),
            created: ctx.at(REQUEST_OFFSET),
            modified: ctx.at(REQUEST_OFFSET),
            description: op.description.clone().unwrap_or_default(),
            sort_key,
            ..Meta::default()
        },
        method,
        settings: RequestSettings::default(),
    }
}
