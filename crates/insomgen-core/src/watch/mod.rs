//! Polling change detection over registered OpenAPI sources.
//!
//! Every registered source is in one of two states: not yet observed, or
//! observed with the modification time last seen. A poll tick converts a
//! source the first time it is observed and again whenever its modification
//! time moves strictly forward. Failures are logged and reported; they never
//! end the loop or drop a registration.
//!
//! The loop is single-threaded: sources are visited in path order and one
//! conversion runs at a time.

pub mod scanner;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};

use crate::error::{GenerateError, WatchError};
use crate::generate::{self, DEFAULT_OUTPUT_SUFFIX};

pub use scanner::{is_candidate_extension, is_source_document, looks_like_openapi};

/// Default time between poll ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Converts one source file into one output file.
pub trait Converter {
    fn convert(&self, source: &Path, output: &Path) -> Result<(), GenerateError>;
}

/// The full parse, assemble, serialize and write pipeline with a fresh
/// generation context per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConverter;

impl Converter for PipelineConverter {
    fn convert(&self, source: &Path, output: &Path) -> Result<(), GenerateError> {
        generate::generate_to_file(source, output)
    }
}

impl<F> Converter for F
where
    F: Fn(&Path, &Path) -> Result<(), GenerateError>,
{
    fn convert(&self, source: &Path, output: &Path) -> Result<(), GenerateError> {
        self(source, output)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Unobserved,
    Observed(SystemTime),
}

#[derive(Debug, Clone)]
struct WatchEntry {
    output: PathBuf,
    state: EntryState,
}

/// Outcome of one poll tick.
#[derive(Debug, Default)]
pub struct PollReport {
    pub regenerated: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, GenerateError)>,
}

impl PollReport {
    pub fn is_empty(&self) -> bool {
        self.regenerated.is_empty() && self.failed.is_empty()
    }
}

/// Source registry plus the poll loop that drives conversion.
pub struct Watcher<C = PipelineConverter> {
    converter: C,
    entries: BTreeMap<PathBuf, WatchEntry>,
    interval: Duration,
    output_suffix: String,
}

impl Watcher<PipelineConverter> {
    pub fn new(interval: Duration) -> Self {
        Self::with_converter(interval, PipelineConverter)
    }
}

impl<C: Converter> Watcher<C> {
    pub fn with_converter(interval: Duration, converter: C) -> Self {
        Self {
            converter,
            entries: BTreeMap::new(),
            interval,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }

    /// Use `suffix` instead of `-insomnia` when deriving output paths.
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    pub fn suffix(&self) -> &str {
        &self.output_suffix
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register `source`. Without an explicit `output` the path is derived
    /// next to the source. Fails if the source does not exist.
    ///
    /// A new source starts unobserved, so the next tick converts it.
    pub fn add_file(
        &mut self,
        source: impl Into<PathBuf>,
        output: Option<PathBuf>,
    ) -> Result<PathBuf, WatchError> {
        let source = source.into();
        if !source.exists() {
            return Err(WatchError::SourceMissing(source));
        }
        let output =
            output.unwrap_or_else(|| generate::derive_output_path(&source, &self.output_suffix));

        log::info!(
            "Added file to watch: {} -> {}",
            source.display(),
            output.display()
        );
        // Re-registering keeps what was already observed.
        let state = self
            .entries
            .get(&source)
            .map_or(EntryState::Unobserved, |entry| entry.state);
        self.entries.insert(
            source,
            WatchEntry {
                output: output.clone(),
                state,
            },
        );
        Ok(output)
    }

    /// Stop watching `source`. Returns whether it was registered.
    pub fn remove_file(&mut self, source: &Path) -> bool {
        let removed = self.entries.remove(source).is_some();
        if removed {
            log::info!("Removed file from watch: {}", source.display());
        }
        removed
    }

    /// Snapshot of source -> output registrations, in poll order.
    pub fn watched_files(&self) -> BTreeMap<PathBuf, PathBuf> {
        self.entries
            .iter()
            .map(|(source, entry)| (source.clone(), entry.output.clone()))
            .collect()
    }

    pub fn state(&self, source: &Path) -> Option<EntryState> {
        self.entries.get(source).map(|entry| entry.state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run one tick over every registered source.
    pub fn poll_once(&mut self) -> PollReport {
        let mut report = PollReport::default();
        let converter = &self.converter;

        for (source, entry) in self.entries.iter_mut() {
            let modified = match fs::metadata(source).and_then(|m| m.modified()) {
                Ok(time) => time,
                Err(e) => {
                    log::warn!("Error checking file status for {}: {e}", source.display());
                    continue;
                }
            };

            let changed = match entry.state {
                EntryState::Unobserved => true,
                EntryState::Observed(last) => modified > last,
            };
            if !changed {
                continue;
            }
            entry.state = EntryState::Observed(modified);

            log::info!("Detected change in: {}", source.display());
            match converter.convert(source, &entry.output) {
                Ok(()) => {
                    log::info!("Successfully regenerated: {}", entry.output.display());
                    report.regenerated.push(source.clone());
                }
                Err(e) => {
                    log::warn!(
                        "Error regenerating {} ({} stage): {e}",
                        entry.output.display(),
                        e.stage()
                    );
                    report.failed.push((source.clone(), e));
                }
            }
        }

        report
    }

    /// Poll forever. Stops only with the hosting process.
    pub fn run(&mut self) -> ! {
        log::info!(
            "Starting file watcher with {} second polling interval",
            self.interval.as_secs()
        );
        loop {
            self.poll_once();
            thread::sleep(self.interval);
        }
    }
}
