//! Immutable run configuration.
//!
//! Built once at startup and handed to the engine by value; nothing in
//! the crate reads process-wide mutable globals.

use fxhash::FxHashSet;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::fingerprint::Digest256;
use crate::{Result, ScanError};

#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Digests to find; fixed for the run's lifetime.
    pub targets: FxHashSet<Digest256>,

    /// Candidate indices scanned: `[0, total)`.
    pub total: u64,

    /// Indices per work unit.
    pub chunk_size: u64,

    /// Worker threads kept in flight.
    pub threads: usize,

    /// Zero-padded decimal width of the candidate encoding.
    pub width: usize,

    /// Per-unit grace period while draining cancelled work.
    pub drain_grace: Duration,
}

impl SearchConfig {
    pub const DEFAULT_TOTAL: u64 = 100_000_000;
    pub const DEFAULT_CHUNK_SIZE: u64 = 1_000_000;
    pub const DEFAULT_WIDTH: usize = 8;
    pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(2);

    /// Build a config with default sizing; callers override fields as
    /// needed before handing it to the engine.
    pub fn new(targets: FxHashSet<Digest256>) -> Self {
        Self {
            targets,
            total: Self::DEFAULT_TOTAL,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            threads: detect_threads(),
            width: Self::DEFAULT_WIDTH,
            drain_grace: Self::DEFAULT_DRAIN_GRACE,
        }
    }

    /// Checked once at startup; the engine refuses to spawn anything
    /// on an invalid config.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(ScanError::Config("no target digests".into()));
        }
        if self.chunk_size == 0 {
            return Err(ScanError::Config("chunk size must be positive".into()));
        }
        if self.threads == 0 {
            return Err(ScanError::Config("thread count must be positive".into()));
        }
        if self.width == 0 {
            return Err(ScanError::Config("candidate width must be positive".into()));
        }
        if self.total > 0 {
            let needed = decimal_width(self.total - 1);
            if needed > self.width {
                return Err(ScanError::Config(format!(
                    "width {} cannot encode index {} (needs {} digits)",
                    self.width,
                    self.total - 1,
                    needed
                )));
            }
        }
        Ok(())
    }
}

/// Default worker count: one per available core.
pub fn detect_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn decimal_width(mut n: u64) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
