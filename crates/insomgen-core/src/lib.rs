//! Convert OpenAPI/Swagger documents into Insomnia v5 workspace exports, and
//! regenerate them when the source changes.

pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod generate;
pub mod parse;
pub mod transform;
pub mod watch;

pub use context::GenerationContext;
pub use export::InsomniaExport;
pub use generate::{generate, generate_to_file, render};
pub use watch::Watcher;
