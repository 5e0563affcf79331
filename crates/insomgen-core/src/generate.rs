use std::fs;
use std::path::{Path, PathBuf};

use crate::context::GenerationContext;
use crate::error::GenerateError;
use crate::export::{self, InsomniaExport};
use crate::parse;
use crate::transform;

/// Tag inserted between a source's stem and the output extension.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-insomnia";

/// Extension of every generated file.
pub const OUTPUT_EXTENSION: &str = "yml";

/// Convert document text into a workspace.
pub fn generate(input: &str, ctx: &GenerationContext) -> Result<InsomniaExport, GenerateError> {
    let parsed = parse::from_str(input)?;
    Ok(transform::assemble(parsed, ctx))
}

/// Convert document text into workspace YAML.
pub fn render(input: &str, ctx: &GenerationContext) -> Result<String, GenerateError> {
    let export = generate(input, ctx)?;
    export::to_yaml(&export).map_err(GenerateError::Serialize)
}

/// Read `source`, convert it with a fresh context and write `output`.
pub fn generate_to_file(source: &Path, output: &Path) -> Result<(), GenerateError> {
    generate_to_file_with(source, output, &GenerationContext::new())
}

pub fn generate_to_file_with(
    source: &Path,
    output: &Path,
    ctx: &GenerationContext,
) -> Result<(), GenerateError> {
    let input = fs::read_to_string(source).map_err(|e| GenerateError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;
    let yaml = render(&input, ctx)?;
    fs::write(output, yaml).map_err(|e| GenerateError::Write {
        path: output.to_path_buf(),
        source: e,
    })
}

/// `<stem><suffix>.yml`, e.g. `petstore-insomnia.yml` for `api/petstore.yaml`.
pub fn output_file_name(source: &Path, suffix: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("{stem}{suffix}.{OUTPUT_EXTENSION}")
}

/// The output path next to `source`.
pub fn derive_output_path(source: &Path, suffix: &str) -> PathBuf {
    let name = output_file_name(source, suffix);
    match source.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
