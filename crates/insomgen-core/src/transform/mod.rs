pub mod collection;
pub mod environment;
pub mod url;

use crate::context::{EntityKind, GenerationContext};
use crate::export::{
    COOKIE_JAR_NAME, CookieJar, InsomniaExport, Meta, SCHEMA_VERSION, SpecContainer,
};
use crate::parse::ParsedDocument;

pub use collection::build_collection;
pub use environment::build_environments;

/// Assemble the complete workspace for one parsed document.
///
/// The parsed tree moves into the spec container unchanged.
pub fn assemble(parsed: ParsedDocument, ctx: &GenerationContext) -> InsomniaExport {
    let ParsedDocument { tree, document } = parsed;

    // Identifier draw order: workspace, folders and requests, cookie jar,
    // environments, spec.
    let meta = Meta {
        id: ctx.id(EntityKind::Workspace),
        created: ctx.at(0),
        modified: ctx.at(-1),
        ..Meta::default()
    };
    let collection = build_collection(&document, ctx);
    let cookie_jar = CookieJar {
        name: COOKIE_JAR_NAME.to_string(),
        meta: Meta {
            id: ctx.id(EntityKind::CookieJar),
            created: ctx.at(-5),
            modified: ctx.at(-5),
            ..Meta::default()
        },
    };
    let environments = build_environments(&document.servers, ctx);
    let spec = SpecContainer {
        contents: tree,
        meta: Meta {
            id: ctx.id(EntityKind::Spec),
            created: ctx.at(3),
            modified: ctx.at(4),
            ..Meta::default()
        },
    };

    InsomniaExport {
        schema: SCHEMA_VERSION.to_string(),
        name: format!("{} {}", document.info.title, document.info.version),
        meta,
        collection,
        cookie_jar,
        environments,
        spec,
    }
}
