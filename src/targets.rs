//! Target digest loading.
//!
//! Two file formats: `.json` files carry `{"digests": [...]}`, anything
//! else is one hex digest per line with `#` comments and blank lines
//! skipped. Either way, digests are parsed in parallel and deduplicated
//! into the run's target set.

use fxhash::FxHashSet;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::fingerprint::Digest256;
use crate::Result;

#[derive(Deserialize)]
struct TargetFile {
    digests: Vec<String>,
}

/// Load digests from a target file, format chosen by extension.
pub fn load_file(path: &Path) -> Result<Vec<Digest256>> {
    let content = fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        let file: TargetFile = serde_json::from_str(&content)?;
        parse_all(&file.digests)
    } else {
        let lines: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        parse_all(&lines)
    }
}

/// Parse hex digests in parallel; the first malformed entry fails the
/// whole load.
pub fn parse_all(entries: &[String]) -> Result<Vec<Digest256>> {
    entries
        .par_iter()
        .map(|s| Digest256::from_hex(s))
        .collect()
}

/// Deduplicate into the immutable target set.
pub fn build_set(digests: impl IntoIterator<Item = Digest256>) -> FxHashSet<Digest256> {
    digests.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DIGEST_A: &str = "9294ef4a2f92785dd933c51b99f2aabd0f8da54a2536349b46c708039eff4c9b";
    const DIGEST_B: &str = "9eb28d78bf031f585fa27cc8a86d417e050cf8a09c933feb73bbfdc756568561";

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("hashscan_test_{}", name));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_plain_list_with_comments() {
        let path = temp_file(
            "plain.txt",
            &format!("# targets\n{}\n\n  {}  \n", DIGEST_A, DIGEST_B),
        );
        let digests = load_file(&path).unwrap();
        assert_eq!(digests.len(), 2);
        assert_eq!(digests[0].to_string(), DIGEST_A);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_json_target_file() {
        let path = temp_file(
            "targets.json",
            &format!(r#"{{"digests": ["{}", "{}"]}}"#, DIGEST_A, DIGEST_B),
        );
        let digests = load_file(&path).unwrap();
        assert_eq!(digests.len(), 2);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_malformed_digest_fails_load() {
        let path = temp_file("bad.txt", "not-a-digest\n");
        assert!(load_file(&path).is_err());
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_build_set_deduplicates() {
        let a = Digest256::from_hex(DIGEST_A).unwrap();
        let set = build_set([a, a]);
        assert_eq!(set.len(), 1);
    }
}
