use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("document root is not a mapping")]
    NotAMapping,
}

/// The pipeline stage a conversion failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Parse,
    Serialize,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Parse => "parse",
            Stage::Serialize => "serialize",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse OpenAPI document: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to serialize Insomnia workspace: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    pub fn stage(&self) -> Stage {
        match self {
            GenerateError::Read { .. } => Stage::Read,
            GenerateError::Parse(_) => Stage::Parse,
            GenerateError::Serialize(_) => Stage::Serialize,
            GenerateError::Write { .. } => Stage::Write,
        }
    }
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("OpenAPI file does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("error walking directory {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
