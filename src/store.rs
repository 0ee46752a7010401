//! The two pieces of cross-worker mutable state: the result store and
//! the one-shot stop flag. Everything else a worker touches is private
//! to it and travels back in its completion report.

use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::fingerprint::Digest256;

/// A matched candidate: its numeric index plus the rendered form that
/// actually hashed to the target. Keeping the index means final output
/// sorts numerically without re-parsing the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub index: u64,
    pub text: String,
}

/// One-shot stop signal shared by the coordinator and all workers.
///
/// `is_set` is a single relaxed load so it can be polled once per
/// candidate in the hot loop. There is no way to unset it.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Idempotent; concurrent redundant sets are harmless.
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Mutex-guarded map from target digest to the candidate that produced
/// it. Grows monotonically; each digest is credited at most once.
pub struct FoundStore {
    inner: Mutex<FxHashMap<Digest256, Candidate>>,
    wanted: usize,
}

impl FoundStore {
    pub fn new(wanted: usize) -> Self {
        Self {
            inner: Mutex::new(FxHashMap::default()),
            wanted,
        }
    }

    /// Atomic check-then-insert. Returns whether THIS call inserted.
    ///
    /// The duplicate check, the insert, and the coverage test that sets
    /// `stop` all happen inside one critical section, so "size reached
    /// wanted" can never race with a concurrent insert.
    pub fn try_insert(&self, digest: Digest256, candidate: Candidate, stop: &StopFlag) -> bool {
        let mut inner = self.inner.lock();
        if inner.contains_key(&digest) {
            return false;
        }
        inner.insert(digest, candidate);
        if inner.len() == self.wanted {
            stop.set();
        }
        true
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn wanted(&self) -> usize {
        self.wanted
    }

    /// Snapshot of all matches, sorted by candidate index. Final-report
    /// path only; never called from the scan loop.
    pub fn matches(&self) -> Vec<(Digest256, Candidate)> {
        let inner = self.inner.lock();
        let mut out: Vec<(Digest256, Candidate)> =
            inner.iter().map(|(d, c)| (*d, c.clone())).collect();
        out.sort_by_key(|(_, c)| c.index);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn digest(b: u8) -> Digest256 {
        Digest256::from_bytes([b; 32])
    }

    fn candidate(index: u64) -> Candidate {
        Candidate {
            index,
            text: format!("{:08}", index),
        }
    }

    #[test]
    fn test_insert_once() {
        let store = FoundStore::new(2);
        let stop = StopFlag::new();

        assert!(store.try_insert(digest(1), candidate(5), &stop));
        assert!(!store.try_insert(digest(1), candidate(9), &stop));
        assert_eq!(store.len(), 1);

        // First writer wins; the entry never mutates
        assert_eq!(store.matches()[0].1.index, 5);
    }

    #[test]
    fn test_stop_set_exactly_at_coverage() {
        let store = FoundStore::new(2);
        let stop = StopFlag::new();

        store.try_insert(digest(1), candidate(1), &stop);
        assert!(!stop.is_set());
        store.try_insert(digest(2), candidate(2), &stop);
        assert!(stop.is_set());
    }

    #[test]
    fn test_racing_inserts_credit_one_winner() {
        let store = Arc::new(FoundStore::new(100));
        let stop = StopFlag::new();

        let mut handles = Vec::new();
        for t in 0..8u64 {
            let store = Arc::clone(&store);
            let stop = stop.clone();
            handles.push(thread::spawn(move || {
                let mut wins = 0u32;
                for _ in 0..1000 {
                    if store.try_insert(digest(7), candidate(t), &stop) {
                        wins += 1;
                    }
                }
                wins
            }));
        }

        let total_wins: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total_wins, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_matches_sorted_by_index() {
        let store = FoundStore::new(10);
        let stop = StopFlag::new();

        store.try_insert(digest(3), candidate(300), &stop);
        store.try_insert(digest(1), candidate(4), &stop);
        store.try_insert(digest(2), candidate(77), &stop);

        let indices: Vec<u64> = store.matches().iter().map(|(_, c)| c.index).collect();
        assert_eq!(indices, vec![4, 77, 300]);
    }

    #[test]
    fn test_stop_flag_is_one_shot() {
        let stop = StopFlag::new();
        assert!(!stop.is_set());
        stop.set();
        stop.set();
        assert!(stop.is_set());
    }
}
