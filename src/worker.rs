//! Single-chunk scan loop.

use fxhash::FxHashSet;

use crate::fingerprint::{CandidateEncoder, Digest256, Fingerprinter};
use crate::partition::Chunk;
use crate::store::{Candidate, FoundStore, StopFlag};

/// Shared read-only context for the whole pool. The store and the two
/// flags are the only mutable state reachable from here.
pub struct ScanContext<E, F> {
    pub targets: FxHashSet<Digest256>,
    pub store: FoundStore,
    /// Set when the goal is met; workers bail at the next index.
    pub stop: StopFlag,
    /// Operator cancellation; same polling cadence as `stop`.
    pub interrupt: StopFlag,
    pub encoder: E,
    pub fingerprinter: F,
}

/// What one completed chunk reports back to the coordinator.
#[derive(Clone, Copy, Debug)]
pub struct ChunkReport {
    pub chunk: Chunk,
    /// Genuinely new digests credited to this chunk. Informational
    /// only; correctness comes from the store.
    pub new_hits: u64,
    /// Indices actually hashed before stopping.
    pub scanned: u64,
}

/// Scan every index of `chunk` in order, testing each candidate's
/// digest against the target set.
///
/// Both flags are polled before each index, so worst-case cancellation
/// latency is one hash computation, not one chunk. Store writes happen
/// before this function returns, which is what makes abandoning a slow
/// worker during drain safe.
pub fn scan_chunk<E, F>(chunk: Chunk, ctx: &ScanContext<E, F>) -> ChunkReport
where
    E: CandidateEncoder,
    F: Fingerprinter,
{
    let mut buf = String::with_capacity(24);
    let mut new_hits = 0u64;
    let mut scanned = 0u64;

    for index in chunk.start..chunk.end {
        if ctx.stop.is_set() || ctx.interrupt.is_set() {
            break;
        }

        ctx.encoder.encode(index, &mut buf);
        let digest = ctx.fingerprinter.fingerprint(&buf);
        scanned += 1;

        // Set membership is the cheap pre-filter; the store's locked
        // check-then-insert is the only duplicate guard we rely on.
        if ctx.targets.contains(&digest) {
            let candidate = Candidate {
                index,
                text: buf.clone(),
            };
            if ctx.store.try_insert(digest, candidate, &ctx.stop) {
                new_hits += 1;
            }
        }
    }

    ChunkReport {
        chunk,
        new_hits,
        scanned,
    }
}
