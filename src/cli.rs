//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::config::SearchConfig;

/// Exhaustively scan a fixed-width decimal candidate space for
/// SHA-256 preimages of the given target digests.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Target digests as 64-char hex, in addition to --targets
    #[arg(value_name = "DIGEST")]
    pub digests: Vec<String>,

    /// Target file: .json with {"digests": [...]}, otherwise one hex
    /// digest per line
    #[arg(short = 'f', long = "targets", value_name = "FILE")]
    pub targets: Option<PathBuf>,

    /// Candidate indices to scan: [0, TOTAL)
    #[arg(long, value_name = "N", default_value_t = SearchConfig::DEFAULT_TOTAL)]
    pub total: u64,

    /// Indices per work unit
    #[arg(long = "chunk-size", value_name = "N", default_value_t = SearchConfig::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u64,

    /// Worker threads (default: auto-detect)
    #[arg(short = 't', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Zero-padded decimal width of candidates
    #[arg(long, value_name = "N", default_value_t = SearchConfig::DEFAULT_WIDTH)]
    pub width: usize,

    /// Report timing, rates, and the digest -> candidate mapping on
    /// stderr
    #[arg(long)]
    pub stats: bool,
}

/// Format number with thousands separator
pub fn format_num(n: u64) -> String {
    let s = n.to_string();
    let mut r = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            r.push(',');
        }
        r.push(c);
    }
    r.chars().rev().collect()
}

pub fn format_speed(s: f64) -> String {
    if s < 1_000.0 {
        format!("{:.0}/s", s)
    } else if s < 1_000_000.0 {
        format!("{:.1}K/s", s / 1_000.0)
    } else {
        format!("{:.2}M/s", s / 1_000_000.0)
    }
}

pub fn format_time(s: f64) -> String {
    if s < 60.0 {
        format!("{:.1}s", s)
    } else if s < 3600.0 {
        format!("{:.0}m{:.0}s", s / 60.0, s % 60.0)
    } else {
        format!("{:.0}h{:.0}m", s / 3600.0, (s % 3600.0) / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_num() {
        assert_eq!(format_num(0), "0");
        assert_eq!(format_num(999), "999");
        assert_eq!(format_num(1_000), "1,000");
        assert_eq!(format_num(100_000_000), "100,000,000");
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(500.0), "500/s");
        assert_eq!(format_speed(2_500.0), "2.5K/s");
        assert_eq!(format_speed(3_200_000.0), "3.20M/s");
    }

    #[test]
    fn test_defaults_follow_config() {
        let args = Args::parse_from(["hashscan", "ab".repeat(32).as_str()]);
        assert_eq!(args.total, SearchConfig::DEFAULT_TOTAL);
        assert_eq!(args.chunk_size, SearchConfig::DEFAULT_CHUNK_SIZE);
        assert_eq!(args.width, SearchConfig::DEFAULT_WIDTH);
        assert!(!args.stats);
    }
}
