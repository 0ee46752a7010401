use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Result, ScanError};

/// Raw SHA-256 output, compared as bytes rather than hex strings.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(C, align(8))]
pub struct Digest256([u8; 32]);

impl Digest256 {
    #[inline(always)]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character lowercase/uppercase hex digest.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| ScanError::BadDigest(s.to_string()))?;
        if bytes.len() != 32 {
            return Err(ScanError::BadDigest(s.to_string()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Hash for Digest256 {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Feed all 32 bytes; FxHash works well with full data
        state.write(&self.0);
    }
}

impl fmt::Display for Digest256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Deterministic index -> candidate string encoding.
///
/// Implementations must be pure: the same index always produces the
/// same candidate, and distinct indices produce distinct candidates.
pub trait CandidateEncoder: Send + Sync {
    /// Render `index` into `out`, replacing its previous contents.
    /// Takes a buffer instead of returning a String so the scan loop
    /// allocates once per chunk, not once per index.
    fn encode(&self, index: u64, out: &mut String);
}

/// Zero-padded fixed-width decimal encoding, e.g. width 8 maps
/// index 5 to `"00000005"`.
#[derive(Clone, Copy, Debug)]
pub struct DecimalEncoder {
    width: usize,
}

impl DecimalEncoder {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

impl CandidateEncoder for DecimalEncoder {
    #[inline]
    fn encode(&self, index: u64, out: &mut String) {
        use std::fmt::Write;
        out.clear();
        // Writing to a String cannot fail
        let _ = write!(out, "{:0width$}", index, width = self.width);
    }
}

/// Deterministic one-way digest of a candidate string.
pub trait Fingerprinter: Send + Sync {
    fn fingerprint(&self, candidate: &str) -> Digest256;
}

/// SHA-256 over the candidate's UTF-8 bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Fingerprinter;

impl Fingerprinter for Sha256Fingerprinter {
    #[inline]
    fn fingerprint(&self, candidate: &str) -> Digest256 {
        Digest256::from_bytes(Sha256::digest(candidate.as_bytes()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_zero_pads() {
        let enc = DecimalEncoder::new(8);
        let mut buf = String::new();

        enc.encode(5, &mut buf);
        assert_eq!(buf, "00000005");

        enc.encode(42, &mut buf);
        assert_eq!(buf, "00000042");

        enc.encode(12_345_678, &mut buf);
        assert_eq!(buf, "12345678");
    }

    #[test]
    fn test_encoder_reuses_buffer() {
        let enc = DecimalEncoder::new(4);
        let mut buf = String::from("leftover");
        enc.encode(7, &mut buf);
        assert_eq!(buf, "0007");
    }

    #[test]
    fn test_sha256_known_vectors() {
        // python3: hashlib.sha256(b"00000005").hexdigest()
        let fp = Sha256Fingerprinter;
        assert_eq!(
            fp.fingerprint("00000005").to_string(),
            "9294ef4a2f92785dd933c51b99f2aabd0f8da54a2536349b46c708039eff4c9b"
        );
        assert_eq!(
            fp.fingerprint("00000042").to_string(),
            "9eb28d78bf031f585fa27cc8a86d417e050cf8a09c933feb73bbfdc756568561"
        );
        assert_eq!(
            fp.fingerprint("00000000").to_string(),
            "7e071fd9b023ed8f18458a73613a0834f6220bd5cc50357ba3493c6040a9ea8c"
        );
    }

    #[test]
    fn test_digest_hex_roundtrip() {
        let hex_str = "9294ef4a2f92785dd933c51b99f2aabd0f8da54a2536349b46c708039eff4c9b";
        let d = Digest256::from_hex(hex_str).unwrap();
        assert_eq!(d.to_string(), hex_str);
    }

    #[test]
    fn test_digest_rejects_bad_hex() {
        assert!(Digest256::from_hex("zz").is_err());
        assert!(Digest256::from_hex("abcd").is_err()); // too short
        let long = "00".repeat(33);
        assert!(Digest256::from_hex(&long).is_err());
    }

    #[test]
    fn test_digest_as_set_key() {
        use fxhash::FxHashSet;

        let mut set = FxHashSet::default();
        let a = Digest256::from_bytes([1u8; 32]);
        let b = Digest256::from_bytes([2u8; 32]);
        set.insert(a);

        assert!(set.contains(&a));
        assert!(!set.contains(&b));
    }
}
