// hashscan - parallel SHA-256 preimage search over a fixed decimal space
//
// Exit codes: 0 = all targets found, 1 = space exhausted with targets
// left over, 2 = usage/config error, 130 = interrupted.

use clap::Parser;

use hashscan::cli::{self, Args};
use hashscan::config::{detect_threads, SearchConfig};
use hashscan::engine::{self, Coverage, SearchReport};
use hashscan::fingerprint::{DecimalEncoder, Digest256, Sha256Fingerprinter};
use hashscan::store::StopFlag;
use hashscan::{targets, Result, ScanError};

fn main() {
    let args = Args::parse();
    std::process::exit(run(args));
}

fn run(args: Args) -> i32 {
    let config = match build_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[✗] {}", e);
            return 2;
        }
    };

    let interrupt = StopFlag::new();
    {
        let interrupt = interrupt.clone();
        ctrlc::set_handler(move || {
            eprintln!("\n[!] Stopping...");
            interrupt.set();
        })
        .ok();
    }

    if args.stats {
        eprintln!(
            "[*] Scanning {} candidates for {} targets ({} per chunk, {} threads)",
            cli::format_num(config.total),
            config.targets.len(),
            cli::format_num(config.chunk_size),
            config.threads
        );
    }

    let encoder = DecimalEncoder::new(config.width);
    let report = match engine::run(config, encoder, Sha256Fingerprinter, interrupt) {
        Ok(r) => r,
        Err(ScanError::Interrupted) => {
            eprintln!("[!] Interrupted; partial progress discarded");
            return 130;
        }
        Err(e) => {
            eprintln!("[✗] {}", e);
            return 2;
        }
    };

    match report.coverage {
        Coverage::Full => {
            for (_, candidate) in &report.matches {
                println!("{}", candidate.text);
            }
            if args.stats {
                print_stats(&report);
            }
            0
        }
        Coverage::Partial { found, wanted } => {
            eprintln!("[!] Found {} of {} targets; space exhausted", found, wanted);
            if args.stats {
                print_stats(&report);
            }
            1
        }
    }
}

fn build_config(args: &Args) -> Result<SearchConfig> {
    let mut digests = Vec::new();
    if let Some(path) = &args.targets {
        digests.extend(targets::load_file(path)?);
    }
    for hex in &args.digests {
        digests.push(Digest256::from_hex(hex)?);
    }

    let mut config = SearchConfig::new(targets::build_set(digests));
    config.total = args.total;
    config.chunk_size = args.chunk_size;
    config.threads = args.threads.unwrap_or_else(detect_threads);
    config.width = args.width;
    config.validate()?;
    Ok(config)
}

fn print_stats(report: &SearchReport) {
    let secs = report.elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        report.scanned as f64 / secs
    } else {
        0.0
    };
    eprintln!(
        "[stats] {} candidates hashed in {} @ {}",
        cli::format_num(report.scanned),
        cli::format_time(secs),
        cli::format_speed(rate)
    );
    eprintln!(
        "[stats] {} chunks dispatched, {} units abandoned in drain",
        cli::format_num(report.chunks_dispatched),
        report.abandoned_units
    );
    for (digest, candidate) in &report.matches {
        eprintln!("[stats] {} -> {}", digest, candidate.text);
    }
}
