use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

/// Number of random bytes behind every entity identifier.
pub const ID_BYTES: usize = 16;

#[derive(Debug, Error)]
#[error("random source unavailable: {0}")]
pub struct RandomSourceError(String);

impl RandomSourceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Fills byte buffers for identifier generation.
pub trait RandomSource {
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomSourceError>;
}

/// The operating system's entropy source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomSourceError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| RandomSourceError::new(e.to_string()))
    }
}

/// Entity kinds that carry an identifier, each with its own prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Workspace,
    Spec,
    Folder,
    Request,
    Environment,
    CookieJar,
}

impl EntityKind {
    pub fn prefix(self) -> &'static str {
        match self {
            EntityKind::Workspace => "wrk",
            EntityKind::Spec => "spc",
            EntityKind::Folder => "fld",
            EntityKind::Request => "req",
            EntityKind::Environment => "env",
            EntityKind::CookieJar => "jar",
        }
    }
}

/// Per-conversion generation state: the epoch every timestamp and sort key is
/// derived from, and the byte source behind identifiers.
///
/// A context is created for one conversion and dropped with it.
pub struct GenerationContext {
    epoch: i64,
    random: Box<dyn RandomSource>,
}

impl GenerationContext {
    /// Capture the current time and bind the OS random source.
    pub fn new() -> Self {
        Self::with_source(now_millis(), Box::new(OsRandom))
    }

    pub fn with_source(epoch: i64, random: Box<dyn RandomSource>) -> Self {
        Self { epoch, random }
    }

    /// Milliseconds since the Unix epoch at context creation.
    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    /// `epoch + offset`, used for every entity timestamp.
    pub fn at(&self, offset: i64) -> i64 {
        self.epoch + offset
    }

    /// A fresh identifier such as `req_3f9a...`.
    ///
    /// Falls back to the epoch joined with the sub-second clock reading when
    /// the random source fails; that path never errors.
    pub fn id(&self, kind: EntityKind) -> String {
        let mut bytes = [0u8; ID_BYTES];
        let body = match self.random.fill(&mut bytes) {
            Ok(()) => hex::encode(bytes),
            Err(e) => {
                log::debug!("{e}; using clock-based identifier");
                format!("{}{}", self.epoch, subsec_nanos())
            }
        };
        format!("{}_{}", kind.prefix(), body)
    }
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

fn subsec_nanos() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default()
}

/// Deterministic byte sources for reproducible identifiers.
pub mod testing {
    use std::cell::Cell;

    use super::{RandomSource, RandomSourceError};

    /// Fills every buffer with a single byte that increments per call.
    #[derive(Debug, Default)]
    pub struct CountingSource {
        next: Cell<u8>,
    }

    impl RandomSource for CountingSource {
        fn fill(&self, dest: &mut [u8]) -> Result<(), RandomSourceError> {
            let byte = self.next.get();
            self.next.set(byte.wrapping_add(1));
            dest.fill(byte);
            Ok(())
        }
    }

    /// Always fails.
    #[derive(Debug, Default)]
    pub struct FailingSource;

    impl RandomSource for FailingSource {
        fn fill(&self, _dest: &mut [u8]) -> Result<(), RandomSourceError> {
            Err(RandomSourceError::new("no entropy"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{CountingSource, FailingSource};
    use super::*;

    #[test]
    fn test_id_format() {
        let ctx = GenerationContext::with_source(1_000, Box::new(CountingSource::default()));
        assert_eq!(
            ctx.id(EntityKind::Workspace),
            format!("wrk_{}", "00".repeat(ID_BYTES))
        );
        assert_eq!(
            ctx.id(EntityKind::Request),
            format!("req_{}", "01".repeat(ID_BYTES))
        );
    }

    #[test]
    fn test_os_ids_are_distinct() {
        let ctx = GenerationContext::new();
        let a = ctx.id(EntityKind::Folder);
        let b = ctx.id(EntityKind::Folder);
        assert!(a.starts_with("fld_"));
        assert_eq!(a.len(), 4 + ID_BYTES * 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fallback_never_fails() {
        let ctx = GenerationContext::with_source(1_700_000_000_000, Box::new(FailingSource));
        let id = ctx.id(EntityKind::CookieJar);
        assert!(id.starts_with("jar_1700000000000"));
    }

    #[test]
    fn test_offsets() {
        let ctx = GenerationContext::with_source(500, Box::new(CountingSource::default()));
        assert_eq!(ctx.epoch(), 500);
        assert_eq!(ctx.at(-7), 493);
        assert_eq!(ctx.at(10), 510);
    }
}
