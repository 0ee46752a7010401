//! Search coordination: a bounded worker pool fed chunk-by-chunk, a
//! completion-driven replenishment loop, and a best-effort drain once
//! the goal is met or the operator cancels.
//!
//! States: FILLING (submit up to `threads` chunks) -> RUNNING (observe
//! completions in arrival order, replenish) -> DRAINING (stop feeding,
//! wait out in-flight units under a grace period) -> DONE.

use crossbeam_channel::{bounded, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::SearchConfig;
use crate::fingerprint::{CandidateEncoder, Digest256, Fingerprinter};
use crate::partition::{Chunk, Chunks};
use crate::store::{Candidate, FoundStore, StopFlag};
use crate::worker::{scan_chunk, ChunkReport, ScanContext};
use crate::{Result, ScanError};

/// Final coverage of one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coverage {
    /// Every target digest was matched.
    Full,
    /// The space was exhausted with targets left over.
    Partial { found: usize, wanted: usize },
}

/// Everything the caller learns from a finished run.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub coverage: Coverage,
    /// Matches sorted by candidate index. Empty unless coverage is
    /// full; partial results are never exposed as output.
    pub matches: Vec<(Digest256, Candidate)>,
    pub elapsed: Duration,
    /// Indices actually hashed across all workers.
    pub scanned: u64,
    /// Chunks handed to workers. Never grows after the stop flag is
    /// observed.
    pub chunks_dispatched: u64,
    /// Units that missed the drain grace period and were left behind.
    pub abandoned_units: usize,
}

/// Run the search to completion.
///
/// `interrupt` is the operator-cancellation flag; setting it (from a
/// signal handler or another thread) stops the run after a bounded
/// drain and surfaces as `ScanError::Interrupted` instead of either
/// outcome.
pub fn run<E, F>(
    config: SearchConfig,
    encoder: E,
    fingerprinter: F,
    interrupt: StopFlag,
) -> Result<SearchReport>
where
    E: CandidateEncoder + 'static,
    F: Fingerprinter + 'static,
{
    config.validate()?;
    let start = Instant::now();

    let SearchConfig {
        targets,
        total,
        chunk_size,
        threads,
        drain_grace,
        ..
    } = config;

    let wanted = targets.len();
    let stop = StopFlag::new();
    let ctx = Arc::new(ScanContext {
        targets,
        store: FoundStore::new(wanted),
        stop: stop.clone(),
        interrupt: interrupt.clone(),
        encoder,
        fingerprinter,
    });

    // Rendezvous channel: a send completes exactly when a worker takes
    // the chunk, so "dispatched" always means "a unit started it".
    let (chunk_tx, chunk_rx) = bounded::<Chunk>(0);
    // Sized to the pool so completion sends never block.
    let (done_tx, done_rx) = bounded::<ChunkReport>(threads);

    let mut handles = Vec::with_capacity(threads);
    for _ in 0..threads {
        let ctx = Arc::clone(&ctx);
        let chunk_rx = chunk_rx.clone();
        let done_tx = done_tx.clone();
        handles.push(thread::spawn(move || {
            for chunk in chunk_rx.iter() {
                let report = scan_chunk(chunk, &ctx);
                if done_tx.send(report).is_err() {
                    break; // coordinator gone
                }
            }
        }));
    }
    drop(chunk_rx);
    drop(done_tx);

    let mut chunks = Chunks::new(total, chunk_size);
    let mut in_flight = 0usize;
    let mut dispatched = 0u64;
    let mut scanned = 0u64;

    // FILLING: up to one chunk per pool slot, fewer if the partitioner
    // runs dry first.
    for _ in 0..threads {
        if stop.is_set() || interrupt.is_set() {
            break;
        }
        let Some(chunk) = chunks.next() else { break };
        if chunk_tx.send(chunk).is_err() {
            break;
        }
        in_flight += 1;
        dispatched += 1;
    }

    // RUNNING: first-of-N wait on the completion channel, replenish
    // until the flag is raised or the partitioner is exhausted.
    while in_flight > 0 {
        let report = match done_rx.recv() {
            Ok(r) => r,
            Err(_) => break, // pool died; nothing more will arrive
        };
        in_flight -= 1;
        scanned += report.scanned;

        if stop.is_set() || interrupt.is_set() {
            break;
        }
        if let Some(chunk) = chunks.next() {
            if chunk_tx.send(chunk).is_ok() {
                in_flight += 1;
                dispatched += 1;
            }
        }
    }

    // DRAINING: closing the channel guarantees no unit ever starts
    // another chunk; the flag tells running units to bail at their next
    // per-index check.
    drop(chunk_tx);
    stop.set();

    let mut abandoned = 0usize;
    while in_flight > 0 {
        match done_rx.recv_timeout(drain_grace) {
            Ok(report) => {
                in_flight -= 1;
                scanned += report.scanned;
            }
            Err(RecvTimeoutError::Timeout) => {
                // Grace expired; whatever these units found is already
                // in the store, so leaving them behind loses nothing.
                abandoned = in_flight;
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if abandoned == 0 {
        for handle in handles {
            let _ = handle.join();
        }
    }

    // DONE
    if interrupt.is_set() {
        return Err(ScanError::Interrupted);
    }

    let found = ctx.store.len();
    let elapsed = start.elapsed();
    if found == wanted {
        Ok(SearchReport {
            coverage: Coverage::Full,
            matches: ctx.store.matches(),
            elapsed,
            scanned,
            chunks_dispatched: dispatched,
            abandoned_units: abandoned,
        })
    } else {
        Ok(SearchReport {
            coverage: Coverage::Partial { found, wanted },
            matches: Vec::new(),
            elapsed,
            scanned,
            chunks_dispatched: dispatched,
            abandoned_units: abandoned,
        })
    }
}
