//! Content Fingerprinting Module
//!
//! Deterministic content addressing for deduplication keys.

use sha2::{Digest, Sha256};

// == Normalize ==
/// Collapses whitespace runs and trims, so re-submissions of the same
/// document that differ only in layout map to the same fingerprint.
pub fn normalize(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

// == Fingerprint ==
/// SHA-256 of the normalized content, hex-encoded.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(content).as_bytes());
    format!("{:x}", hasher.finalize())
}
