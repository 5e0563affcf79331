use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use super::{Converter, Watcher};
use crate::error::WatchError;

/// Extensions a source document may have.
pub const SOURCE_EXTENSIONS: &[&str] = &["yml", "yaml"];

pub fn is_candidate_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Content sniff: an `openapi:` or `swagger:` key, or both `info:` and `paths:`.
pub fn looks_like_openapi(content: &str) -> bool {
    content.contains("openapi:")
        || content.contains("swagger:")
        || (content.contains("info:") && content.contains("paths:"))
}

/// Whether `path` is a source this scanner should register: a YAML file that
/// passes the content sniff and is not itself a generated workspace.
pub fn is_source_document(path: &Path, output_suffix: &str) -> bool {
    if !is_candidate_extension(path) || is_generated_output(path, output_suffix) {
        return false;
    }
    match fs::read_to_string(path) {
        Ok(content) => looks_like_openapi(&content),
        Err(_) => false,
    }
}

fn is_generated_output(path: &Path, output_suffix: &str) -> bool {
    !output_suffix.is_empty()
        && path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.ends_with(output_suffix))
}

impl<C: Converter> Watcher<C> {
    /// Walk `root` recursively and register every source document found,
    /// with derived output paths. Returns how many files were registered.
    ///
    /// Only an unreadable root is an error; unreadable entries below it are
    /// skipped.
    pub fn scan_directory(&mut self, root: &Path) -> Result<usize, WatchError> {
        let mut registered = 0;

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(WatchError::Scan {
                        path: root.to_path_buf(),
                        source: e,
                    });
                }
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {e}", root.display());
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_source_document(entry.path(), self.suffix()) {
                continue;
            }
            match self.add_file(entry.path(), None) {
                Ok(_) => registered += 1,
                Err(e) => log::warn!("Could not add file to watch: {e}"),
            }
        }

        Ok(registered)
    }

    /// Scan `root`, then poll forever if anything was found. Returns without
    /// blocking when the directory holds no source documents.
    pub fn auto_detect_and_watch(&mut self, root: &Path) -> Result<(), WatchError> {
        let found = self.scan_directory(root)?;
        if found == 0 {
            log::info!("No OpenAPI files found in directory: {}", root.display());
            return Ok(());
        }
        log::info!("Found {found} OpenAPI files to watch");
        self.run()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::watch::DEFAULT_INTERVAL;

    #[test]
    fn test_sniff() {
        assert!(looks_like_openapi("openapi: 3.0.0\ninfo:\n  title: x\n"));
        assert!(looks_like_openapi("swagger: '2.0'\n"));
        assert!(looks_like_openapi("info:\n  title: x\npaths: {}\n"));
        assert!(!looks_like_openapi("info:\n  title: x\n"));
        assert!(!looks_like_openapi("name: ci\njobs:\n  build: {}\n"));
    }

    #[test]
    fn test_extensions() {
        assert!(is_candidate_extension(Path::new("a/api.yaml")));
        assert!(is_candidate_extension(Path::new("api.YML")));
        assert!(!is_candidate_extension(Path::new("api.json")));
        assert!(!is_candidate_extension(Path::new("Makefile")));
    }

    #[test]
    fn test_generated_outputs_are_not_sources() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("api-insomnia.yml");
        fs::write(&output, "type: spec.insomnia.rest/5.0\nspec:\n  contents:\n    openapi: 3.0.0\n")
            .unwrap();
        assert!(!is_source_document(&output, "-insomnia"));
        assert!(is_source_document(&output, ""));
    }

    #[test]
    fn test_scan_registers_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("services/orders");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("api.yaml"), "openapi: 3.0.0\n").unwrap();
        fs::write(nested.join("orders.yml"), "info: {}\npaths: {}\n").unwrap();
        fs::write(dir.path().join("ci.yml"), "jobs: {}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "openapi: 3.0.0\n").unwrap();
        fs::write(dir.path().join("api-insomnia.yml"), "openapi: 3.0.0\n").unwrap();

        let mut watcher = Watcher::new(DEFAULT_INTERVAL);
        assert_eq!(watcher.scan_directory(dir.path()).unwrap(), 2);

        let files = watcher.watched_files();
        let sources: Vec<&PathBuf> = files.keys().collect();
        assert_eq!(
            sources,
            vec![&dir.path().join("api.yaml"), &nested.join("orders.yml")]
        );
        assert_eq!(files[&nested.join("orders.yml")], nested.join("orders-insomnia.yml"));
    }

    #[test]
    fn test_auto_detect_returns_when_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.yml"), "title: nothing here\n").unwrap();

        let mut watcher = Watcher::new(DEFAULT_INTERVAL);
        watcher.auto_detect_and_watch(dir.path()).unwrap();
        assert!(watcher.is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let mut watcher = Watcher::new(DEFAULT_INTERVAL);
        let err = watcher
            .scan_directory(Path::new("/nonexistent/specs"))
            .unwrap_err();
        assert!(matches!(err, WatchError::Scan { .. }));
    }
}
