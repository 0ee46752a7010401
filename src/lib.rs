//! hashscan: parallel exhaustive search of a fixed-width decimal
//! candidate space for SHA-256 digest preimages.
//!
//! Architecture:
//! - `partition`: splits the index space into half-open chunks
//! - `fingerprint`: candidate encoding and digest computation
//! - `store`: mutex-guarded result map and one-shot stop flag
//! - `worker`: single-chunk scan loop
//! - `engine`: bounded worker pool, replenishment, drain, outcome
//! - `targets`: target digest loading (hex lists, JSON files)
//!
//! The engine owns all coordination; workers share exactly two pieces
//! of mutable state (the result store and the stop flag) and report
//! everything else back through their completion messages.

pub mod cli;
pub mod config;
pub mod engine;
pub mod fingerprint;
pub mod partition;
pub mod store;
pub mod targets;
pub mod worker;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid digest '{0}': expected 64 hex characters")]
    BadDigest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, ScanError>;
